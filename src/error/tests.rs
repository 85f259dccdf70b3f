#![allow(clippy::uninlined_format_args)] // format!("{}", x) is acceptable in tests

use super::transport::{MAX_ERROR_MESSAGE_LEN, body_message, truncate_message};
use super::*;
use serde_json::json;

#[test]
fn test_error_object_display() {
    let object = ErrorObject::new(ErrorCode::Int(400), "bad request");
    let display = format!("{object}");
    assert!(display.contains("400"));
    assert!(display.contains("bad request"));
}

#[test]
fn test_error_code_shapes() {
    assert_eq!(ErrorCode::from(404u16), ErrorCode::Int(404));
    assert_eq!(ErrorCode::from(-1i64), ErrorCode::UNKNOWN);
    assert_eq!(ErrorCode::from("E_LIMIT"), ErrorCode::Str("E_LIMIT".to_string()));
    assert_eq!(ErrorCode::Int(429).as_i64(), Some(429));
    assert_eq!(ErrorCode::from("E_LIMIT").as_i64(), None);
}

#[test]
fn test_error_object_serializes_flat() {
    let object = ErrorObject::from_status(404, None, &ErrorMessages::default());
    let value = serde_json::to_value(&object).unwrap();
    assert_eq!(value["code"], 404);
    assert_eq!(value["message"], "not found");
    assert_eq!(value["transport_status"], 404);
    assert_eq!(value["is_network_error"], false);
    // absent payload is omitted entirely
    assert!(value.get("payload").is_none());
}

#[test]
fn test_from_status_uses_table_default() {
    let messages = ErrorMessages::default();
    let object = ErrorObject::from_status(503, None, &messages);
    assert_eq!(object.code, ErrorCode::Int(503));
    assert_eq!(object.message, "service unavailable");
    assert_eq!(object.transport_status, Some(503));
    assert!(!object.is_network_error);
    assert!(!object.is_timeout_error);
}

#[test]
fn test_from_status_unknown_status_falls_back() {
    let messages = ErrorMessages::default();
    let object = ErrorObject::from_status(418, None, &messages);
    assert_eq!(object.message, ErrorMessages::FALLBACK);
}

#[test]
fn test_from_status_body_message_wins_over_table() {
    let messages = ErrorMessages::default();
    let body = json!({"message": "user does not exist"});
    let object = ErrorObject::from_status(404, Some(&body), &messages);
    assert_eq!(object.message, "user does not exist");
    assert_eq!(object.payload, Some(body));
}

#[test]
fn test_body_message_priority() {
    // message > msg > error
    let body = json!({"error": "c", "msg": "b", "message": "a"});
    assert_eq!(body_message(&body).as_deref(), Some("a"));

    let body = json!({"error": "c", "msg": "b"});
    assert_eq!(body_message(&body).as_deref(), Some("b"));

    let body = json!({"error": "c"});
    assert_eq!(body_message(&body).as_deref(), Some("c"));

    let body = json!({"detail": "ignored"});
    assert_eq!(body_message(&body), None);
}

#[test]
fn test_body_message_ignores_empty_and_non_string() {
    let body = json!({"message": ""});
    assert_eq!(body_message(&body), None);

    let body = json!({"message": 42});
    assert_eq!(body_message(&body), None);
}

#[test]
fn test_status_message_override() {
    let messages = ErrorMessages::default().with_status(404, "gone fishing");
    let object = ErrorObject::from_status(404, None, &messages);
    assert_eq!(object.message, "gone fishing");
}

#[test]
fn test_from_business_defaults_empty_message() {
    let object = ErrorObject::from_business(1001i64, "", None, Some(200));
    assert_eq!(object.message, ErrorMessages::FALLBACK);
    assert_eq!(object.code, ErrorCode::Int(1001));
    assert_eq!(object.transport_status, Some(200));
    assert!(!object.is_network_error);
    assert!(!object.is_timeout_error);
}

#[test]
fn test_from_business_keeps_payload() {
    let payload = json!({"code": 1001, "data": null, "message": "insufficient balance"});
    let object =
        ErrorObject::from_business(1001i64, "insufficient balance", Some(payload.clone()), None);
    assert_eq!(object.payload, Some(payload));
}

#[test]
fn test_truncate_message_cap() {
    let long = "x".repeat(MAX_ERROR_MESSAGE_LEN + 100);
    let truncated = truncate_message(long);
    assert!(truncated.len() <= MAX_ERROR_MESSAGE_LEN + "... (truncated)".len());
    assert!(truncated.ends_with("... (truncated)"));

    let short = "short".to_string();
    assert_eq!(truncate_message(short), "short");
}

#[test]
fn test_error_request_object_predicate() {
    let err = Error::from(ErrorObject::new(ErrorCode::Int(500), "boom"));
    assert!(err.request_object().is_some());
    assert!(!err.is_cancelled());

    let err = Error::cancelled("superseded");
    assert!(err.request_object().is_none());
    assert_eq!(err.as_cancelled(), Some("superseded"));
    assert!(err.is_cancelled());
}

#[test]
fn test_error_flag_helpers() {
    let mut object = ErrorObject::new(ErrorCode::UNKNOWN, "timed out");
    object.is_timeout_error = true;
    let err = Error::from(object);
    assert!(err.is_timeout_error());
    assert!(!err.is_network_error());

    assert!(!Error::cancelled("gone").is_timeout_error());
}

#[test]
fn test_error_display() {
    let err = Error::from(ErrorObject::new(ErrorCode::Int(404), "not found"));
    assert_eq!(err.to_string(), "not found (code: 404)");

    let err = Error::cancelled("newer request took over");
    assert!(err.to_string().contains("newer request took over"));

    let err = Error::config("invalid proxy URL");
    assert!(err.to_string().contains("invalid proxy URL"));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
    assert_send_sync::<ErrorObject>();
}

#[test]
fn test_error_size_stays_small() {
    // Request variant is boxed; the enum should not grow past the Cow variant
    assert!(std::mem::size_of::<Error>() <= 48);
}
