use serde_json::{Map, Value};

use crate::errors::AppError;

/// Marker the model places before the JSON block.
pub const JSON_START: &str = "[JSON_START]";
/// Marker the model places after the JSON block.
pub const JSON_END: &str = "[JSON_END]";

/// Model output split into its prose and structured halves.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutput {
    pub prose: String,
    pub structured: Map<String, Value>,
}

/// Returns the prose before `[JSON_START]` and the raw text between the
/// markers, both trimmed.
///
/// `[JSON_END]` is searched for only after the start marker, so a stray end
/// marker inside the prose is ignored.
pub fn locate_json_block(raw: &str) -> Result<(&str, &str), AppError> {
    let start = raw
        .find(JSON_START)
        .ok_or(AppError::MissingMarker(JSON_START))?;
    let body_start = start + JSON_START.len();
    let body_len = raw[body_start..]
        .find(JSON_END)
        .ok_or(AppError::MissingMarker(JSON_END))?;

    let prose = raw[..start].trim();
    let block = raw[body_start..body_start + body_len].trim();
    Ok((prose, block))
}

/// Splits raw model output and parses the JSON block.
///
/// Missing markers and malformed JSON are reported as different errors. The
/// block must be a JSON object; its contents are not checked further.
pub fn split_model_output(raw: &str) -> Result<SplitOutput, AppError> {
    let (prose, block) = locate_json_block(raw)?;
    let structured: Map<String, Value> = serde_json::from_str(block)?;

    Ok(SplitOutput {
        prose: prose.to_string(),
        structured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_splits_prose_and_json() {
        let raw = "Analysis text [JSON_START] {\"customer_segments\": []} [JSON_END]";
        let out = split_model_output(raw).unwrap();

        assert_eq!(out.prose, "Analysis text");
        assert_eq!(
            Value::Object(out.structured),
            json!({"customer_segments": []})
        );
    }

    #[test]
    fn test_multiline_output_with_trailing_text() {
        let raw = "\n  Overview of the base.\n\nSegments follow.\n[JSON_START]\n{\n  \"customer_segments\": [{\"name\": \"Value Seekers\", \"size_percentage\": 40}]\n}\n[JSON_END]\nThanks!";
        let out = split_model_output(raw).unwrap();

        assert_eq!(out.prose, "Overview of the base.\n\nSegments follow.");
        assert_eq!(
            out.structured["customer_segments"][0]["name"],
            json!("Value Seekers")
        );
    }

    #[test]
    fn test_missing_start_marker() {
        let err = split_model_output("Just prose, no data {} [JSON_END]").unwrap_err();
        assert!(matches!(err, AppError::MissingMarker(m) if m == JSON_START));
    }

    #[test]
    fn test_missing_end_marker() {
        let err = split_model_output("Prose [JSON_START] {\"customer_segments\": []}").unwrap_err();
        assert!(matches!(err, AppError::MissingMarker(m) if m == JSON_END));
    }

    #[test]
    fn test_end_marker_before_start_is_missing() {
        let err = split_model_output("[JSON_END] prose [JSON_START] {}").unwrap_err();
        assert!(matches!(err, AppError::MissingMarker(m) if m == JSON_END));
    }

    #[test]
    fn test_malformed_json_reports_parse_failure() {
        let err =
            split_model_output("Prose [JSON_START] {\"customer_segments\": [} [JSON_END]")
                .unwrap_err();
        assert!(matches!(err, AppError::InvalidStructuredData(_)));
        assert!(err.to_string().starts_with("Failed to parse structured data: "));
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let err = split_model_output("Prose [JSON_START] [1, 2, 3] [JSON_END]").unwrap_err();
        assert!(matches!(err, AppError::InvalidStructuredData(_)));
    }

    #[test]
    fn test_empty_block_is_parse_failure() {
        let err = split_model_output("Prose [JSON_START]   [JSON_END]").unwrap_err();
        assert!(matches!(err, AppError::InvalidStructuredData(_)));
    }

    #[test]
    fn test_structured_data_keeps_model_key_order() {
        let block = r#"{"customer_segments":[{"name":"A","size_percentage":1,"characteristics":[]}],"summary":"x"}"#;
        let raw = format!("P [JSON_START] {} [JSON_END]", block);
        let out = split_model_output(&raw).unwrap();

        assert_eq!(serde_json::to_string(&out.structured).unwrap(), block);
    }

    #[test]
    fn test_empty_prose_is_allowed() {
        let out = split_model_output("[JSON_START]{}[JSON_END]").unwrap();
        assert_eq!(out.prose, "");
        assert!(out.structured.is_empty());
    }
}
