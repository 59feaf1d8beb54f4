#![allow(clippy::expect_used)]
//! Tests for the system tag wrappers.

use serde_json::json;
use stratus_test::model::resources::TagResource;

use super::helpers::*;

// ============================================================================
// System tags
// ============================================================================

/// ## Summary
/// Test that the tag listing drops the collection entry and converts ids.
#[test_log::test(tokio::test)]
async fn get_systemtags_lists_every_tag() {
    let server = MockServer::start(vec![MockReply::multistatus(TAG_LISTING)]).await;
    let client = server.client();

    let tags = client.systemtags.get_systemtags().await.expect("Listing failed");

    let ids: Vec<_> = tags.iter().map(TagResource::tag_id).collect();
    assert_eq!(ids, [Some(1), Some(2)]);
    assert_eq!(tags[1].tag_name(), Some("archive"));
    assert_eq!(tags[1].value("user_visible"), &json!("false"));
    assert_eq!(
        tags[0].to_string(),
        "Tag{'href': '/remote.php/dav/systemtags/1', 'display_name': 'urgent'}"
    );

    let request = server.only_request();
    assert_eq!(request.method, "PROPFIND");
    assert_eq!(request.target, "/remote.php/dav/systemtags");
    assert_eq!(request.header("depth"), None);
    assert!(request.body.contains(concat!(
        "<d:prop><oc:id/><oc:display-name/><oc:user-visible/>",
        "<oc:can-assign/><oc:user-assignable/></d:prop>"
    )));
}

/// ## Summary
/// Test that a tag is found by its display name.
#[test_log::test(tokio::test)]
async fn get_systemtag_filters_by_name() {
    let server = MockServer::start(vec![
        MockReply::multistatus(TAG_LISTING),
        MockReply::multistatus(TAG_LISTING),
    ])
    .await;
    let client = server.client();

    let archive = client
        .systemtags
        .get_systemtag("archive")
        .await
        .expect("Listing failed")
        .expect("Tag should exist");
    assert_eq!(archive.tag_id(), Some(2));

    let missing = client.systemtags.get_systemtag("nope").await.expect("Listing failed");
    assert!(missing.is_none());
}

/// ## Summary
/// Test that tag creation posts the schema defaults and reads the id from
/// `Content-Location`.
#[test_log::test(tokio::test)]
async fn create_systemtag_posts_defaults() {
    let server = MockServer::start(vec![
        MockReply::new(201).header("Content-Location", "/remote.php/dav/systemtags/12"),
    ])
    .await;
    let client = server.client();

    let id = client
        .systemtags
        .create_systemtag("urgent")
        .await
        .expect("Request failed");
    assert_eq!(id, Some(12));

    let request = server.only_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/remote.php/dav/systemtags");
    assert_eq!(request.header("content-type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_str(&request.body).expect("Body is not JSON");
    assert_eq!(
        body,
        json!({
            "id": null,
            "name": "urgent",
            "userVisible": true,
            "canAssign": true,
            "userAssignable": true
        })
    );
}

/// ## Summary
/// Test that a refused creation yields no id.
#[test_log::test(tokio::test)]
async fn create_systemtag_conflict_is_none() {
    let server = MockServer::start(vec![MockReply::dav_error(409, "Tag already exists")]).await;
    let client = server.client();

    let id = client
        .systemtags
        .create_systemtag("urgent")
        .await
        .expect("Request failed");

    assert_eq!(id, None);
}

/// ## Summary
/// Test that a tag is deleted by id.
#[test_log::test(tokio::test)]
async fn delete_systemtag_by_id() {
    let server = MockServer::start(vec![MockReply::new(204)]).await;
    let client = server.client();

    let response = client.systemtags.delete_systemtag(12).await.expect("Request failed");
    assert!(response.is_ok);

    let request = server.only_request();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.target, "/remote.php/dav/systemtags/12");
}

// ============================================================================
// Tag relations
// ============================================================================

/// ## Summary
/// Test that the tags of a file are listed without the relation collection.
#[test_log::test(tokio::test)]
async fn get_systemtags_relation_lists_file_tags() {
    let server = MockServer::start(vec![MockReply::multistatus(RELATION_LISTING)]).await;
    let client = server.client();

    let tags = client
        .systemtags_relation
        .get_systemtags_relation(42)
        .await
        .expect("Listing failed");

    let tag = tags.only().expect("Expected one tag");
    assert_eq!(tag.tag_id(), Some(7));
    assert_eq!(tag.tag_name(), Some("reviewed"));

    assert_eq!(
        server.only_request().target,
        "/remote.php/dav/systemtags-relations/files/42"
    );
}

/// ## Summary
/// Test that assigning and unassigning target `file/tag`.
#[test_log::test(tokio::test)]
async fn add_and_remove_relation() {
    let server = MockServer::start(vec![MockReply::new(201), MockReply::new(204)]).await;
    let client = server.client();

    let added = client
        .systemtags_relation
        .add_systemtags_relation(42, 7)
        .await
        .expect("Request failed");
    assert!(added.is_ok);

    let removed = client
        .systemtags_relation
        .remove_systemtags_relation(42, 7)
        .await
        .expect("Request failed");
    assert!(removed.is_ok);

    let requests = server.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[1].method, "DELETE");
    for request in &requests {
        assert_eq!(request.target, "/remote.php/dav/systemtags-relations/files/42/7");
    }
}
