use crate::analysis::AnalysisService;
use crate::completion_client::CompletionClient;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the chat completion API.
    pub completion_client: CompletionClient,
}

impl AppState {
    /// Builds state from configuration, creating the completion client.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let completion_client = CompletionClient::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )?;

        Ok(Self { completion_client })
    }
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /generate
///
/// Generates a loyalty customer analysis for the named company. The body is
/// validated before any call to the completion API is made.
#[utoipa::path(
    post,
    path = "/generate",
    tag = "analysis",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis generated", body = AnalysisResponse),
        (status = 422, description = "Invalid request body", body = ErrorBody),
        (status = 500, description = "Completion call or output parsing failed", body = ErrorBody)
    )
)]
pub async fn generate_analysis(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload?;
    validate_request(&request)?;

    tracing::info!("POST /generate - company: {}", request.company_name.trim());

    let service = AnalysisService::new(&state.completion_client);
    let response = service.analyze(&request).await?;

    Ok(Json(response))
}

/// Checks constraints serde cannot express.
pub fn validate_request(request: &AnalysisRequest) -> Result<(), AppError> {
    if request.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "company_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(company: &str) -> AnalysisRequest {
        AnalysisRequest {
            company_name: company.to_string(),
            previous_data: None,
            current_prompt_data: None,
            other_input_data: None,
        }
    }

    #[test]
    fn test_blank_company_name_rejected() {
        assert!(matches!(
            validate_request(&request("  ")),
            Err(AppError::Validation(_))
        ));
        assert!(validate_request(&request("Acme Coffee")).is_ok());
    }

    #[test]
    fn test_state_client_uses_configured_model() {
        let config = Config {
            port: 8000,
            openai_api_key: "key".to_string(),
            openai_base_url: "https://api.example.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
        };
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.completion_client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, Json(body)) = health().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}
