//! Regression coverage for the domain error envelope.

use rstest::rstest;
use serde_json::{Value, json};

use super::{Error, ErrorCode};

#[rstest]
#[case(ErrorCode::InvalidRequest, "invalid_request")]
#[case(ErrorCode::Unauthorized, "unauthorized")]
#[case(ErrorCode::Forbidden, "forbidden")]
#[case(ErrorCode::NotFound, "not_found")]
#[case(ErrorCode::Conflict, "conflict")]
#[case(ErrorCode::ServiceUnavailable, "service_unavailable")]
#[case(ErrorCode::InternalError, "internal_error")]
fn error_codes_serialize_as_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    let serialized = serde_json::to_value(code).expect("serialize error code");
    assert_eq!(serialized, Value::String(expected.to_owned()));
}

#[test]
fn error_serializes_to_camel_case_envelope() {
    let error = Error::conflict("username already registered")
        .with_details(json!({ "field": "username", "code": "duplicate_username" }));

    let value = serde_json::to_value(&error).expect("serialize error");
    assert_eq!(value.get("code"), Some(&json!("conflict")));
    assert_eq!(value.get("message"), Some(&json!("username already registered")));
    assert_eq!(
        value.pointer("/details/code"),
        Some(&json!("duplicate_username"))
    );
}

#[test]
fn details_are_omitted_when_absent() {
    let value = serde_json::to_value(Error::not_found("no such post")).expect("serialize error");
    assert!(value.get("details").is_none());
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_messages_are_rejected(#[case] message: &str) {
    let err = Error::try_new(ErrorCode::InternalError, message)
        .expect_err("blank messages must fail validation");
    assert_eq!(err.to_string(), "error message must not be empty");
}

#[test]
fn round_trips_through_serde() {
    let error = Error::forbidden("only the author may update a post");
    let json = serde_json::to_string(&error).expect("serialize");
    let parsed: Error = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, error);
}
