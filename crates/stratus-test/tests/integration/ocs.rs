#![allow(clippy::expect_used)]
//! Tests for OCS endpoints and JSON mapping.

use reqwest::header::HeaderMap;
use serde_json::json;
use stratus_test::client::ApiResponse;
use stratus_test::client::response::NO_ENVELOPE_STATUS;
use stratus_test::model::dav::parse::{ResponseData, parse_many, parse_one};
use stratus_test::model::resources::{TAG, TagResource, standard_schema};

use super::helpers::*;

const URL: &str = "https://cloud.example.com/ocs/v2.php/apps/example";

fn envelope(statuscode: i64, message: &str, data: &serde_json::Value) -> String {
    json!({
        "ocs": {
            "meta": {"status": "ok", "statuscode": statuscode, "message": message},
            "data": data
        }
    })
    .to_string()
}

// ============================================================================
// Capabilities
// ============================================================================

/// ## Summary
/// Test that capabilities are fetched as JSON with the OCS request header
/// and come back unwrapped.
#[test_log::test(tokio::test)]
async fn get_capabilities_unwraps_envelope() {
    let payload = json!({
        "version": {"major": 28, "string": "28.0.1"},
        "capabilities": {"files": {"bigfilechunking": true}}
    });
    let server = MockServer::start(vec![MockReply::json(
        200,
        &json!({
            "ocs": {
                "meta": {"status": "ok", "statuscode": 100, "message": "OK"},
                "data": payload
            }
        }),
    )])
    .await;
    let client = server.client();

    let response = client
        .capabilities
        .get_capabilities()
        .await
        .expect("Request failed");

    assert!(response.is_ok);
    assert_eq!(response.status_code, 100);
    assert_eq!(response.data, ResponseData::Json(payload));

    let request = server.only_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/ocs/v1.php/cloud/capabilities?format=json");
    assert_eq!(request.header("ocs-apirequest"), Some("true"));
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("authorization"), Some(BASIC_AUTH));
}

/// ## Summary
/// Test that an OCS failure status is reported even on HTTP 200.
#[test_log::test(tokio::test)]
async fn capabilities_failure_status() {
    let server = MockServer::start(vec![MockReply::json(
        200,
        &json!({
            "ocs": {
                "meta": {"status": "failure", "statuscode": 997, "message": "Unauthorised"},
                "data": []
            }
        }),
    )])
    .await;
    let client = server.client();

    let response = client
        .capabilities
        .get_capabilities()
        .await
        .expect("Request failed");

    assert!(!response.is_ok);
    assert_eq!(response.status_code, 997);
    assert_eq!(response.http_status, 200);
    assert_eq!(response.error_message(), Some("Unauthorised"));
}

// ============================================================================
// JSON mapping
// ============================================================================

/// ## Summary
/// Test that an OCS object maps onto a tag by JSON key.
#[test_log::test]
fn ocs_object_maps_to_tag() {
    let body = envelope(
        100,
        "OK",
        &json!({"id": "5", "name": "urgent", "userVisible": false}),
    );
    let response = ApiResponse::ocs(200, HeaderMap::new(), URL, body);
    let schema = standard_schema(TAG).expect("Standard schema");

    let tag = parse_one(&schema, &response)
        .expect("Parse failed")
        .expect("Expected a tag");

    assert_eq!(tag.tag_id(), Some(5));
    assert_eq!(tag.tag_name(), Some("urgent"));
    assert_eq!(tag.value("user_visible"), &json!(false));
    assert!(tag.value("can_assign").is_null());
}

/// ## Summary
/// Test that an OCS array maps onto a result set.
#[test_log::test]
fn ocs_array_maps_to_result_set() {
    let body = envelope(
        200,
        "OK",
        &json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}, "ignored"]),
    );
    let response = ApiResponse::ocs(200, HeaderMap::new(), URL, body);
    let schema = standard_schema(TAG).expect("Standard schema");

    let tags = parse_many(&schema, &response, None).expect("Parse failed");

    let names: Vec<_> = tags.iter().filter_map(TagResource::tag_name).collect();
    assert_eq!(names, ["a", "b"]);
    assert!(tags.only().is_none());
}

/// ## Summary
/// Test that a failed OCS status maps to nothing and keeps the message.
#[test_log::test]
fn ocs_failure_maps_to_nothing() {
    let body = envelope(404, "Tag not found", &json!({"id": 9}));
    let response = ApiResponse::ocs(200, HeaderMap::new(), URL, body);
    let schema = standard_schema(TAG).expect("Standard schema");

    assert!(!response.is_ok);
    assert_eq!(response.error_message(), Some("Tag not found"));
    assert!(parse_one(&schema, &response).expect("Parse failed").is_none());
    assert!(parse_many(&schema, &response, None).expect("Parse failed").is_empty());
}

/// ## Summary
/// Test that JSON without the envelope keeps its body and gets the
/// no-envelope status.
#[test_log::test]
fn body_without_envelope() {
    let response = ApiResponse::ocs(
        200,
        HeaderMap::new(),
        URL,
        json!({"id": 3, "name": "bare"}).to_string(),
    );

    assert_eq!(response.status_code, NO_ENVELOPE_STATUS);
    assert!(!response.is_ok);
    assert_eq!(response.data, ResponseData::Json(json!({"id": 3, "name": "bare"})));
}

/// ## Summary
/// Test that tags mapped from JSON, which carry no href, still compare
/// equal to themselves.
#[test_log::test]
fn json_tags_equal_themselves() {
    let body = envelope(100, "OK", &json!([{"id": "1", "name": "a"}]));
    let response = ApiResponse::ocs(200, HeaderMap::new(), URL, body);
    let schema = standard_schema(TAG).expect("Standard schema");

    let tags = parse_many(&schema, &response, None).expect("Parse failed");
    let tag = tags.only().expect("Expected one tag");

    assert!(tag.identity().is_none());
    assert_eq!(&tags[0], tag);
    assert!(tags.contains(tag));
}
