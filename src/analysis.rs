use serde_json::{Map, Value};
use tracing::Instrument;
use uuid::Uuid;

use crate::completion_client::{ChatMessage, CompletionClient};
use crate::errors::{AppError, ResultExt};
use crate::extraction::split_model_output;
use crate::models::{AnalysisRequest, AnalysisResponse, SegmentReport};
use crate::prompt::{PromptContext, SYSTEM_PROMPT};

/// Produces a loyalty customer analysis for a company.
///
/// One call to [`AnalysisService::analyze`] makes exactly one completion
/// request. Failures are returned as-is; nothing is retried or cached.
pub struct AnalysisService<'a> {
    client: &'a CompletionClient,
}

impl<'a> AnalysisService<'a> {
    pub fn new(client: &'a CompletionClient) -> Self {
        Self { client }
    }

    /// Builds the prompts, queries the model and splits its answer.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AppError> {
        let analysis_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "analysis",
            %analysis_id,
            company = %request.company_name.trim()
        );

        self.run(request)
            .instrument(span)
            .await
            .with_context(|| format!("Analysis {} failed", analysis_id))
    }

    async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AppError> {
        let context = PromptContext::from_request(request);
        tracing::info!(
            "Building prompt (competitor analysis: {}, refinement: {})",
            context.competitor_analysis.is_some(),
            context.refinement.is_some()
        );
        if let Some(extra) = request.other_input_data.as_ref().filter(|m| !m.is_empty()) {
            tracing::debug!("Ignoring {} other_input_data key(s)", extra.len());
        }

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(context.user_prompt()),
        ];

        let raw = self.client.complete(&messages).await?;
        let output = split_model_output(&raw)?;

        log_segment_shape(&output.structured);

        Ok(AnalysisResponse {
            generated_output: output.prose,
            structured_data: output.structured,
        })
    }
}

/// Logs whether the model's JSON matches the documented segment schema.
/// The data is returned to the caller either way.
fn log_segment_shape(structured: &Map<String, Value>) {
    match serde_json::from_value::<SegmentReport>(Value::Object(structured.clone())) {
        Ok(report) => tracing::info!(
            "✓ Analysis complete with {} customer segment(s)",
            report.customer_segments.len()
        ),
        Err(e) => tracing::warn!("Structured data does not match the segment schema: {}", e),
    }
}
