//! # Request Extraction Helpers
//!
//! Maps Axum rejections to [`AppError`] and decodes the `input` field that
//! ability requests carry.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`]
/// and oversized bodies to [`AppError::PayloadTooLarge`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result.map(|Json(v)| v).map_err(|err| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    })
}

/// Extract query parameters, mapping errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Decode the `input` field of an ability request.
///
/// A string is parsed as JSON text, as posted by a form; any other JSON
/// value is used as-is. Absent, `null` or blank input becomes `{}`.
pub fn decode_input(input: Option<Value>) -> Result<Value, AppError> {
    match input {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(Value::Object(Map::new())),
        Some(Value::String(text)) => serde_json::from_str(&text)
            .map_err(|err| AppError::Validation(format!("input is not valid JSON: {err}"))),
        Some(other) => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_input_is_empty_object() {
        assert_eq!(decode_input(None).unwrap(), json!({}));
        assert_eq!(decode_input(Some(Value::Null)).unwrap(), json!({}));
        assert_eq!(decode_input(Some(json!("  "))).unwrap(), json!({}));
    }

    #[test]
    fn string_input_is_decoded() {
        assert_eq!(
            decode_input(Some(json!(r#"{"name": "Ann"}"#))).unwrap(),
            json!({"name": "Ann"})
        );
    }

    #[test]
    fn structured_input_passes_through() {
        assert_eq!(decode_input(Some(json!({"a": 1}))).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn undecodable_string_is_rejected() {
        let err = decode_input(Some(json!("{not json"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
