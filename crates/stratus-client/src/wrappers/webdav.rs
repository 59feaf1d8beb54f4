use std::sync::Arc;

use stratus_core::codes::WebDavCode;
use stratus_model::dav::build::{FieldSelection, QueryOptions, build_query, build_update};
use stratus_model::dav::core::{DAV_NS, Namespace, NamespacedValues};
use stratus_model::dav::parse::{ResponseData, XmlElement, parse_document, parse_many};
use stratus_model::resources::{FILE, FileResource, standard_schema, strip_root};
use stratus_model::{ModelError, Resource, ResourceSchema, ResultSet, SchemaError};

use super::skip_root;
use crate::error::{ClientError, ClientResult};
use crate::requester::Requester;
use crate::response::ApiResponse;

/// Root element of a filtered file REPORT.
const FILTER_FILES: &str = "oc:filter-files";

/// Files and folders of the configured user.
#[derive(Debug, Clone)]
pub struct WebDav {
    requester: Requester,
    schema: Arc<ResourceSchema>,
}

impl WebDav {
    /// ## Errors
    /// Returns an error if the standard `File` schema cannot be built.
    pub fn new(requester: Requester) -> ClientResult<Self> {
        Ok(Self {
            requester,
            schema: standard_schema(FILE)?,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<ResourceSchema> {
        &self.schema
    }

    /// Href of the user's root folder, e.g. `/remote.php/dav/files/alice`.
    #[must_use]
    pub fn user_root(&self) -> String {
        format!("{}/{}", self.requester.api_url(), self.requester.user())
    }

    /// ## Summary
    /// Strips the user root from an href.
    ///
    /// `/remote.php/dav/files/alice/Docs/a.txt` gives `/Docs/a.txt`.
    #[must_use]
    pub fn relative_path(&self, href: &str) -> String {
        strip_root(href, &self.user_root())
    }

    /// Relative path of a listed file.
    #[must_use]
    pub fn path_of(&self, file: &Resource) -> String {
        file.relative_path(&self.user_root())
    }

    /// ## Summary
    /// Lists `path` and its descendants down to `depth`.
    ///
    /// The queried collection itself is the first entry. A failed request
    /// yields an empty set.
    ///
    /// ## Errors
    /// Returns an error on transport failure or when the listing cannot be
    /// parsed.
    #[tracing::instrument(skip(self, fields))]
    pub async fn list_folders(
        &self,
        path: &str,
        depth: u32,
        all_properties: bool,
        fields: FieldSelection,
    ) -> ClientResult<ResultSet> {
        let mut options = QueryOptions::new().fields(fields);
        if all_properties {
            options = options.all_defaults();
        }
        let body = build_query(&self.schema, &options).map_err(ModelError::from)?;

        let response = self
            .requester
            .propfind(&self.user_path(path), Some(depth), body)
            .await?;

        Ok(parse_many(&self.schema, &response, None)?)
    }

    /// ## Summary
    /// Lists the direct children of the folder at `path`.
    ///
    /// ## Errors
    /// See [`WebDav::list_folders`].
    pub async fn list_directory(
        &self,
        path: &str,
        all_properties: bool,
    ) -> ClientResult<ResultSet> {
        let listing = self
            .list_folders(path, 1, all_properties, FieldSelection::Default)
            .await?;
        Ok(skip_root(listing, &self.href_of(path)))
    }

    /// ## Summary
    /// Fetches the file or folder at `path`, or `None` when it does not exist.
    ///
    /// ## Errors
    /// See [`WebDav::list_folders`].
    pub async fn get_file(
        &self,
        path: &str,
        all_properties: bool,
        fields: FieldSelection,
    ) -> ClientResult<Option<Resource>> {
        let listing = self.list_folders(path, 0, all_properties, fields).await?;
        Ok(listing.into_iter().next())
    }

    /// ## Summary
    /// Fetches the folder at `path`, creating it when it does not exist.
    ///
    /// ## Errors
    /// Returns [`ClientError::NotACollection`] when `path` is a plain file,
    /// and the request error when the folder cannot be created.
    pub async fn get_folder(
        &self,
        path: &str,
        all_properties: bool,
    ) -> ClientResult<Option<Resource>> {
        let existing = self
            .get_file(path, all_properties, FieldSelection::Default)
            .await?;
        if let Some(existing) = existing {
            if existing.is_dir() {
                return Ok(Some(existing));
            }
            return Err(ClientError::NotACollection(self.path_of(&existing)));
        }

        tracing::debug!(path, "Folder missing, creating it");
        self.create_folder(path, false).await?.error_for_status()?;

        self.get_file(path, all_properties, FieldSelection::Default).await
    }

    /// ## Summary
    /// Sends a `REPORT` listing the files below `path` that match the filter
    /// rules.
    ///
    /// ## Errors
    /// Returns an error if a rule value cannot be written as XML, on transport
    /// failure or when the listing cannot be parsed.
    #[tracing::instrument(skip(self, filter_rules))]
    pub async fn fetch_files_with_filter(
        &self,
        path: &str,
        filter_rules: &NamespacedValues,
    ) -> ClientResult<ResultSet> {
        let options = QueryOptions::new()
            .instruction(FILTER_FILES)
            .filter_rules(filter_rules);
        let body = build_query(&self.schema, &options)
            .map_err(ModelError::from)?
            .unwrap_or_default();

        let response = self.requester.report(&self.user_path(path), body).await?;

        Ok(parse_many(&self.schema, &response, None)?)
    }

    /// ## Errors
    /// See [`WebDav::fetch_files_with_filter`].
    pub async fn list_favorites(&self, path: &str) -> ClientResult<ResultSet> {
        self.fetch_files_with_filter(path, &favorite_rule()).await
    }

    /// ## Summary
    /// Applies a `PROPPATCH` setting the given properties on `path`.
    ///
    /// ## Errors
    /// Returns an error if a value cannot be written as XML or on transport
    /// failure.
    pub async fn set_file_property(
        &self,
        path: &str,
        update_rules: &NamespacedValues,
    ) -> ClientResult<ApiResponse> {
        let body =
            build_update(self.schema.namespaces(), update_rules).map_err(ModelError::from)?;
        self.requester.proppatch(&self.user_path(path), body).await
    }

    /// ## Errors
    /// See [`WebDav::set_file_property`].
    pub async fn set_favorites(&self, path: &str) -> ClientResult<ApiResponse> {
        self.set_file_property(path, &favorite_rule()).await
    }

    /// ## Summary
    /// Reads one raw property of `path` as text.
    ///
    /// `field` may carry its namespace as `ns:field`, overriding `namespace`.
    /// Returns `None` when the request fails or the property is absent.
    ///
    /// ## Errors
    /// Returns [`SchemaError::UnknownNamespace`] for an unregistered namespace
    /// code, or an error on transport failure or malformed XML.
    pub async fn get_file_property(
        &self,
        path: &str,
        field: &str,
        namespace: &str,
    ) -> ClientResult<Option<String>> {
        let (namespace, field) = field.split_once(':').unwrap_or((namespace, field));
        let uri = self
            .schema
            .namespaces()
            .uri(namespace)
            .ok_or_else(|| {
                ModelError::from(SchemaError::UnknownNamespace {
                    code: namespace.to_string(),
                })
            })?
            .to_string();

        let options =
            QueryOptions::new().fields(FieldSelection::namespaced([(namespace, [field])]));
        let body = build_query(&self.schema, &options).map_err(ModelError::from)?;

        let response = self
            .requester
            .propfind(&self.user_path(path), Some(0), body)
            .await?;

        if !response.is_ok {
            return Ok(None);
        }
        let ResponseData::Text(xml) = &response.data else {
            return Ok(None);
        };

        let root = parse_document(xml.as_bytes()).map_err(ModelError::from)?;
        Ok(first_property_text(&root, &uri, field))
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn delete_path(&self, path: &str) -> ClientResult<ApiResponse> {
        self.requester.delete(&self.user_path(path)).await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn make_collection(&self, path: &str) -> ClientResult<ApiResponse> {
        self.requester.make_collection(&self.user_path(path)).await
    }

    /// ## Summary
    /// Creates the folder at `path`.
    ///
    /// With `already_exists`, an existing folder counts as success.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn create_folder(
        &self,
        path: &str,
        already_exists: bool,
    ) -> ClientResult<ApiResponse> {
        let mut response = self.make_collection(path).await?;
        if already_exists
            && !response.is_ok
            && response.http_status == WebDavCode::AlreadyExists.code()
        {
            response.is_ok = true;
        }
        Ok(response)
    }

    /// ## Summary
    /// Creates the folder at `path` unless it already exists.
    ///
    /// Returns whether the folder exists afterwards.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn ensure_folder_exists(&self, path: &str) -> ClientResult<bool> {
        let response = self.create_folder(path, true).await?;
        if !response.is_ok {
            tracing::warn!(
                path,
                status = response.http_status,
                message = response.error_message().unwrap_or_default(),
                "Could not create folder"
            );
        }
        Ok(response.is_ok)
    }

    /// ## Summary
    /// Creates every folder along `path`, parents first.
    ///
    /// `a/b/c` ensures `a`, then `a/b`, then `a/b/c`, stopping at the first
    /// folder that cannot be created. Returns whether the whole tree exists.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_tree_exists(&self, path: &str) -> ClientResult<bool> {
        for folder in tree_prefixes(path) {
            if !self.ensure_folder_exists(&folder).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// ## Summary
    /// Downloads the file at `path`.
    ///
    /// The body is held as text in the response data; a missing file or a
    /// folder gives a failed response.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn download_file(&self, path: &str) -> ClientResult<ApiResponse> {
        self.requester.get(&self.user_path(path)).await
    }

    /// ## Summary
    /// Moves the file or folder at `path` to `destination`.
    ///
    /// Without `overwrite`, an existing target makes the move fail.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn move_path(
        &self,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ClientResult<ApiResponse> {
        self.transfer("MOVE", path, destination, overwrite).await
    }

    /// ## Summary
    /// Copies the file or folder at `path` to `destination`.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn copy_path(
        &self,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ClientResult<ApiResponse> {
        self.transfer("COPY", path, destination, overwrite).await
    }

    /// ## Summary
    /// Uploads `contents` to `path`, optionally setting its modification time
    /// (seconds since the epoch).
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn upload_file_contents(
        &self,
        contents: Vec<u8>,
        path: &str,
        timestamp: Option<i64>,
    ) -> ClientResult<ApiResponse> {
        self.requester.put(&self.user_path(path), contents, timestamp).await
    }

    async fn transfer(
        &self,
        verb: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ClientResult<ApiResponse> {
        self.requester
            .transfer(
                verb,
                &self.user_path(path),
                &self.user_path(destination),
                overwrite,
            )
            .await
    }

    /// `user/path` with doubled slashes collapsed.
    fn user_path(&self, path: &str) -> String {
        user_path(self.requester.user(), path)
    }

    fn href_of(&self, path: &str) -> String {
        format!("{}/{}", self.requester.api_url(), self.user_path(path))
    }
}

fn user_path(user: &str, path: &str) -> String {
    if path.is_empty() {
        return user.to_string();
    }
    let mut joined = format!("{user}/{path}");
    while joined.contains("//") {
        joined = joined.replace("//", "/");
    }
    joined
}

/// Each ancestor folder of `path` followed by `path` itself.
fn tree_prefixes(path: &str) -> Vec<String> {
    let mut prefixes = Vec::new();
    let mut current = String::new();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        prefixes.push(current.clone());
    }
    prefixes
}

fn favorite_rule() -> NamespacedValues {
    NamespacedValues::new().with(Namespace::OC.code(), "favorite", 1)
}

/// Text of `{uri}field` in the propstats of the first `{DAV:}response`.
fn first_property_text(root: &XmlElement, uri: &str, field: &str) -> Option<String> {
    let response = root.child(DAV_NS, "response")?;
    response
        .children_named(DAV_NS, "propstat")
        .filter_map(|propstat| propstat.child(DAV_NS, "prop"))
        .find_map(|prop| prop.child(uri, field))
        .and_then(XmlElement::text)
        .map(str::to_owned)
}
