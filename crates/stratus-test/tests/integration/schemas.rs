#![allow(clippy::expect_used)]
//! Tests for caller-defined schemas sent through a raw requester.

use std::sync::Arc;

use serde_json::json;
use stratus_test::client::requester::{ApiKind, Requester};
use stratus_test::client::wrappers::skip_root;
use stratus_test::common::config::ServerConfig;
use stratus_test::model::dav::build::{FieldSelection, QueryOptions, build_query};
use stratus_test::model::dav::core::{Namespace, Property, SchemaDefinition};
use stratus_test::model::dav::parse::parse_many;
use stratus_test::model::resources::{FILE, FileResource, file_schema};
use stratus_test::model::{ResourceSchema, SchemaError, SchemaRegistry};

use super::helpers::*;

const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";
const CALENDAR_ROUTE: &str = "/remote.php/dav/calendars/alice";

const EVENT_LISTING: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:response>
    <d:href>/remote.php/dav/calendars/alice/personal/</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Mon, 06 Nov 2023 10:00:00 GMT</d:getlastmodified>
        <d:resourcetype><d:collection/><cal:calendar/></d:resourcetype>
        <oc:fileid>300</oc:fileid>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/calendars/alice/personal/standup.ics</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Tue, 07 Nov 2023 09:30:00 GMT</d:getlastmodified>
        <d:resourcetype/>
        <oc:fileid>301</oc:fileid>
        <cal:calendar-data>BEGIN:VCALENDAR</cal:calendar-data>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

fn event_schema() -> Arc<ResourceSchema> {
    let registry = SchemaRegistry::builder()
        .namespace(Namespace::new("cal", CALDAV_NS))
        .schema(file_schema())
        .schema(
            SchemaDefinition::new("Event")
                .extends(FILE)
                .property(Property::new("cal").xml("calendar-data").required()),
        )
        .build()
        .expect("Failed to build registry");
    Arc::clone(registry.get("Event").expect("Event schema"))
}

fn requester(url: &str) -> Requester {
    let server = ServerConfig {
        url: url.to_string(),
        user: USER.to_string(),
        password: PASSWORD.to_string(),
    };
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client");
    Requester::new(http, &server, CALENDAR_ROUTE, ApiKind::WebDav, false)
}

// ============================================================================
// Custom schemas
// ============================================================================

/// ## Summary
/// Test that an inherited schema with an extra namespace is queried and
/// mapped end to end.
#[test_log::test(tokio::test)]
async fn extended_schema_round_trip() {
    let server = MockServer::start(vec![MockReply::multistatus(EVENT_LISTING)]).await;
    let schema = event_schema();
    let requester = requester(server.url());

    let body = build_query(&schema, &QueryOptions::new()).expect("Failed to build query");
    let response = requester
        .propfind("personal", Some(1), body)
        .await
        .expect("Request failed");
    let listing = parse_many(&schema, &response, None).expect("Parse failed");
    let events = skip_root(listing, &format!("{CALENDAR_ROUTE}/personal"));

    let event = events.try_only().expect("Expected one event");
    assert_eq!(event.schema().name(), "Event");
    assert_eq!(event.file_id(), Some(301));
    assert!(event.is_file());
    assert_eq!(event.value("calendar_data"), &json!("BEGIN:VCALENDAR"));

    let request = server.only_request();
    assert_eq!(request.target, "/remote.php/dav/calendars/alice/personal");
    assert!(request.body.contains(&format!(r#"xmlns:cal="{CALDAV_NS}""#)));
    assert!(!request.body.contains("xmlns:nc"));
    assert!(request.body.contains(
        "<d:prop><d:getlastmodified/><d:resourcetype/><oc:fileid/><cal:calendar-data/></d:prop>"
    ));
}

/// ## Summary
/// Test that a namespaced selection on a custom schema only asks for the
/// listed properties.
#[test_log::test]
fn namespaced_selection_on_custom_schema() {
    let schema = event_schema();

    let body = build_query(
        &schema,
        &QueryOptions::new().fields(FieldSelection::namespaced([("cal", ["calendar-data"])])),
    )
    .expect("Failed to build query")
    .expect("Query should not be empty");
    let body = String::from_utf8(body).expect("Query is UTF-8");

    assert!(body.contains("<d:prop><cal:calendar-data/></d:prop>"));
}

/// ## Summary
/// Test that a property in an unregistered namespace fails the build.
#[test_log::test]
fn unregistered_namespace_is_rejected() {
    let err = SchemaRegistry::builder()
        .schema(SchemaDefinition::new("Event").property(Property::new("cal").xml("calendar-data")))
        .build()
        .expect_err("Namespace was never registered");

    assert!(matches!(err, SchemaError::UnknownNamespace { ref code } if code == "cal"));
}
