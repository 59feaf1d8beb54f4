use std::sync::Arc;

use serde_json::{Map, Value};
use stratus_model::dav::build::{QueryOptions, build_query};
use stratus_model::dav::core::KeyFormat;
use stratus_model::dav::parse::{Filter, parse_many};
use stratus_model::resources::{TAG, TagResource, standard_schema};
use stratus_model::{ModelError, Resource, ResourceSchema, ResultSet};

use super::skip_root;
use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::ApiResponse;

/// Server-wide system tags.
#[derive(Debug, Clone)]
pub struct SystemTags {
    requester: Requester,
    schema: Arc<ResourceSchema>,
}

impl SystemTags {
    /// ## Errors
    /// Returns an error if the standard `Tag` schema cannot be built.
    pub fn new(requester: Requester) -> ClientResult<Self> {
        Ok(Self {
            requester,
            schema: standard_schema(TAG)?,
        })
    }

    /// ## Summary
    /// Lists every system tag.
    ///
    /// ## Errors
    /// Returns an error on transport failure or when the listing cannot be
    /// parsed.
    pub async fn get_systemtags(&self) -> ClientResult<ResultSet> {
        self.fetch(None).await
    }

    /// ## Summary
    /// Finds the system tag named `name`.
    ///
    /// ## Errors
    /// See [`SystemTags::get_systemtags`].
    pub async fn get_systemtag(&self, name: &str) -> ClientResult<Option<Resource>> {
        let named: Filter<'_> = &|tag: &Resource| tag.tag_name() == Some(name);
        let tags = self.fetch(Some(named)).await?;
        Ok(tags.into_iter().next())
    }

    /// ## Summary
    /// Creates a tag named `name` with the schema defaults for everything else.
    ///
    /// Returns the new tag id read from the `Content-Location` header, or
    /// `None` when the server refused the tag.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_systemtag(&self, name: &str) -> ClientResult<Option<i64>> {
        let mut overrides = Map::new();
        overrides.insert("display_name".to_string(), Value::from(name));
        let body = Value::Object(self.schema.default_values(KeyFormat::Json, &overrides));

        let response = self.requester.post_json("", &body).await?;
        if !response.is_ok {
            tracing::debug!(
                status = response.status_code,
                message = response.error_message().unwrap_or_default(),
                "Tag creation refused"
            );
            return Ok(None);
        }

        Ok(response.header("Content-Location").and_then(tag_id_from_location))
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn delete_systemtag(&self, tag_id: i64) -> ClientResult<ApiResponse> {
        self.requester.delete(&tag_id.to_string()).await
    }

    async fn fetch(&self, filter: Option<Filter<'_>>) -> ClientResult<ResultSet> {
        let options = QueryOptions::new().all_defaults();
        let body = build_query(&self.schema, &options).map_err(ModelError::from)?;
        let response = self.requester.propfind("", None, body).await?;
        let tags = parse_many(&self.schema, &response, filter)?;
        Ok(skip_root(tags, &format!("{}/", self.requester.api_url())))
    }
}

/// Tags assigned to files.
#[derive(Debug, Clone)]
pub struct SystemTagsRelation {
    requester: Requester,
    schema: Arc<ResourceSchema>,
}

impl SystemTagsRelation {
    /// ## Errors
    /// Returns an error if the standard `Tag` schema cannot be built.
    pub fn new(requester: Requester) -> ClientResult<Self> {
        Ok(Self {
            requester,
            schema: standard_schema(TAG)?,
        })
    }

    /// ## Summary
    /// Lists the tags assigned to the file `file_id`.
    ///
    /// ## Errors
    /// Returns an error on transport failure or when the listing cannot be
    /// parsed.
    pub async fn get_systemtags_relation(&self, file_id: i64) -> ClientResult<ResultSet> {
        let options = QueryOptions::new().all_defaults();
        let body = build_query(&self.schema, &options).map_err(ModelError::from)?;
        let response = self.requester.propfind(&file_id.to_string(), None, body).await?;
        let tags = parse_many(&self.schema, &response, None)?;
        Ok(skip_root(
            tags,
            &format!("{}/{file_id}/", self.requester.api_url()),
        ))
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn add_systemtags_relation(
        &self,
        file_id: i64,
        tag_id: i64,
    ) -> ClientResult<ApiResponse> {
        self.requester
            .put(&format!("{file_id}/{tag_id}"), Vec::new(), None)
            .await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn remove_systemtags_relation(
        &self,
        file_id: i64,
        tag_id: i64,
    ) -> ClientResult<ApiResponse> {
        self.requester.delete(&format!("{file_id}/{tag_id}")).await
    }
}

/// Tag id at the end of a `Content-Location` such as
/// `/remote.php/dav/systemtags/12`.
fn tag_id_from_location(location: &str) -> Option<i64> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}
