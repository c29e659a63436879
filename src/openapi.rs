use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    AnalysisRequest, AnalysisResponse, CurrentPromptData, CustomerSegment, ErrorBody,
    PreviousData, SegmentReport,
};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Loyalty Customer Analysis Service",
        description = "Generates customer loyalty segment analyses with an LLM."
    ),
    paths(handlers::generate_analysis, handlers::health),
    components(schemas(
        AnalysisRequest,
        PreviousData,
        CurrentPromptData,
        AnalysisResponse,
        CustomerSegment,
        SegmentReport,
        ErrorBody
    )),
    tags(
        (name = "analysis", description = "Customer loyalty analysis"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
