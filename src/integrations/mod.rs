//! External service integrations.

pub mod completion_client {
    pub use crate::completion_client::*;
}
