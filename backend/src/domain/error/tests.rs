//! Tests for the domain error payload and its serialisation contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn rejected_error() -> Error {
    Error::store_rejected(
        "role deletion rejected",
        ["role is referenced by a policy", "role is locked"],
    )
}

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.details().is_empty());
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[should_panic(expected = "error messages must satisfy validation")]
fn new_panics_on_blank_message() {
    let _ = Error::new(ErrorCode::InternalError, "");
}

#[rstest]
fn store_rejection_keeps_every_detail_in_order(rejected_error: Error) {
    assert_eq!(
        rejected_error.details(),
        ["role is referenced by a policy", "role is locked"]
    );
}

#[rstest]
fn with_details_appends_to_existing_details(rejected_error: Error) {
    let err = rejected_error.with_details(["third"]);
    assert_eq!(err.details().len(), 3);
    assert_eq!(err.details().last().map(String::as_str), Some("third"));
}

#[rstest]
fn display_joins_details_after_message(rejected_error: Error) {
    assert_eq!(
        rejected_error.to_string(),
        "role deletion rejected: role is referenced by a policy; role is locked"
    );
}

#[rstest]
fn display_without_details_is_the_message() {
    assert_eq!(Error::not_found("no role found").to_string(), "no role found");
}

#[rstest]
fn serialises_with_snake_case_code(rejected_error: Error) {
    let value = serde_json::to_value(&rejected_error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "store_rejected",
            "message": "role deletion rejected",
            "details": ["role is referenced by a policy", "role is locked"],
        })
    );
}

#[rstest]
fn omits_empty_details_when_serialising() {
    let value = serde_json::to_value(Error::conflict("duplicate")).expect("serialise error");
    assert_eq!(value, json!({ "code": "conflict", "message": "duplicate" }));
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let payload = json!({ "code": "not_found", "message": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
