// Domain-layer modules and shared errors/models
pub mod analysis {
    pub use crate::analysis::*;
}

pub mod extraction {
    pub use crate::extraction::*;
}

pub mod prompt {
    pub use crate::prompt::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
