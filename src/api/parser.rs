// src/api/parser.rs
//! Interprets search responses into order records.
//!
//! The caller only distinguishes "records" from "no records"; the error
//! variants returned here exist so the failure can be logged by category.

use super::client::ApiResponse;
use super::types::SearchResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::AppError;
use crate::model::OrderRecord;

/// Parses one page of search results.
pub fn parse_search_response(result: ApiResponse<String>) -> Result<Vec<OrderRecord>, AppError> {
    if !result.status.is_success() {
        return Err(AppError::UpstreamStatus {
            status: result.status,
            body_preview: preview(&result.data),
        });
    }

    let envelope: SearchResponse = serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(&result.data)))
    })?;

    if envelope.error {
        return Err(AppError::UpstreamFlagged {
            message: envelope
                .message
                .unwrap_or_else(|| "no message given".to_string()),
        });
    }

    envelope
        .result
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            serde_json::from_value(raw).map_err(|e| {
                AppError::MalformedResponse(format!("record {} on page: {}", position, e))
            })
        })
        .collect()
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn response(status: StatusCode, body: serde_json::Value) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.example.com/orders/search".to_string(),
        }
    }

    #[test]
    fn parses_result_list() {
        let parsed = parse_search_response(response(
            StatusCode::OK,
            json!({
                "error": false,
                "result": [
                    {"id": 1, "status": 1, "createdAt": "2024-12-10 10:00:00"},
                    {"id": 2, "status": 4, "createdAt": "2024-12-10 11:00:00"}
                ]
            }),
        ))
        .unwrap();
        let ids: Vec<_> = parsed.iter().map(|o| o.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn missing_or_null_result_is_an_empty_page() {
        let parsed = parse_search_response(response(StatusCode::OK, json!({"error": false})));
        assert!(parsed.unwrap().is_empty());
        let parsed = parse_search_response(response(StatusCode::OK, json!({"result": null})));
        assert!(parsed.unwrap().is_empty());
    }

    #[test]
    fn error_flag_is_reported() {
        let err = parse_search_response(response(
            StatusCode::OK,
            json!({"error": true, "message": "token expired", "result": []}),
        ))
        .unwrap_err();
        assert!(
            matches!(err, AppError::UpstreamFlagged { ref message } if message == "token expired")
        );
    }

    #[test]
    fn http_failure_is_reported_with_preview() {
        let err = parse_search_response(ApiResponse {
            data: "x".repeat(1000),
            status: StatusCode::BAD_GATEWAY,
            url: String::new(),
        })
        .unwrap_err();
        match err {
            AppError::UpstreamStatus {
                status,
                body_preview,
            } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body_preview.len(), ERROR_BODY_PREVIEW_LENGTH + 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn undecodable_record_fails_the_page() {
        let err = parse_search_response(response(
            StatusCode::OK,
            json!({"result": [{"id": 1, "status": 1, "createdAt": "yesterday"}]}),
        ))
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
