use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use utoipa::ToSchema;

// ============ Request Models ============

/// Body of `POST /generate`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AnalysisRequest {
    /// Company whose customer base is analysed. Must not be blank.
    #[schema(example = "Acme Coffee")]
    pub company_name: String,
    /// Output of earlier pipeline stages.
    #[serde(default)]
    pub previous_data: Option<PreviousData>,
    /// Previous generation plus feedback, for iterative refinement.
    #[serde(default)]
    pub current_prompt_data: Option<CurrentPromptData>,
    /// Free-form extra input. Accepted but not used when building prompts.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub other_input_data: Option<HashMap<String, Value>>,
}

/// Context carried over from earlier analysis stages.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PreviousData {
    /// Competitor analysis text to weave into the prompt.
    #[serde(default)]
    pub competitor_analysis: Option<String>,
}

/// Prior output and the user's feedback on it.
///
/// Both halves must be present for a refinement to be requested.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CurrentPromptData {
    #[serde(default)]
    pub existing_generated_output: Option<String>,
    #[serde(default)]
    pub user_feedback: Option<String>,
}

// ============ Response Models ============

/// Successful analysis result.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AnalysisResponse {
    /// Prose analysis written by the model.
    pub generated_output: String,
    /// JSON object emitted by the model, passed through unmodified.
    /// Expected to hold a `customer_segments` list.
    #[schema(value_type = Object)]
    pub structured_data: Map<String, Value>,
}

/// A customer cluster as described by the model.
///
/// Values are model-produced and never validated: `size_percentage` is meant
/// to be 0-100 and `engagement_level` one of High/Medium/Low.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct CustomerSegment {
    #[schema(example = "Premium Loyalists")]
    pub name: String,
    #[schema(example = 15.0)]
    pub size_percentage: f64,
    pub characteristics: Vec<String>,
    pub preferred_rewards: Vec<String>,
    #[schema(example = "High")]
    pub engagement_level: String,
    #[schema(example = "$5000+")]
    pub lifetime_value: String,
}

/// Expected shape of `structured_data`. Used for the OpenAPI schema and
/// for diagnostics, never to reject a response.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SegmentReport {
    pub customer_segments: Vec<CustomerSegment>,
}

/// Body of every error response.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}
