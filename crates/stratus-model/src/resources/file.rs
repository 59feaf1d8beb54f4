//! WebDAV file and folder resources.

use chrono::{DateTime, Utc};
use stratus_core::constants::COLLECTION_RESOURCE_TYPE;
use stratus_core::util::timestamp::datetime_from_string;

use crate::dav::core::{Property, Resource, SchemaDefinition, is_truthy, transform};

/// Schema name of files and folders.
pub const FILE: &str = "File";

/// The `File` schema definition.
#[must_use]
pub fn file_schema() -> SchemaDefinition {
    SchemaDefinition::new(FILE)
        .identity("href")
        .display(["id", "file_id", "href"])
        .property(Property::dav().xml("getlastmodified").field("last_modified").required())
        .property(Property::dav().xml("getetag").field("etag"))
        .property(Property::dav().xml("getcontenttype").field("content_type"))
        .property(
            Property::dav()
                .xml("resourcetype")
                .field("resource_type")
                .parse_xml(transform::resource_type)
                .required(),
        )
        .property(Property::dav().xml("getcontentlength").field("content_length"))
        .property(Property::oc().field("id"))
        .property(
            Property::oc()
                .xml("fileid")
                .field("file_id")
                .parse_value(transform::to_int)
                .required(),
        )
        .property(Property::oc().field("favorite"))
        .property(Property::oc().field("comments_href").parse_value(transform::unquote))
        .property(Property::oc().field("comments_count"))
        .property(Property::oc().field("comments_unread"))
        .property(Property::oc().field("owner_id"))
        .property(Property::oc().field("owner_display_name"))
        .property(Property::oc().field("share_types"))
        .property(Property::oc().field("size"))
        .property(Property::oc().field("href").parse_value(transform::unquote))
        .property(Property::nc().field("has_preview"))
        // The server answers checksums with an empty value.
        .property(Property::oc().xml("checksums").field("check_sums").disabled())
}

/// ## Summary
/// Strips `root` from an href.
///
/// `root` is the full href of the user's folder including any mount
/// point, e.g. `/nextcloud/remote.php/dav/files/alice`. An href outside
/// `root` is returned unchanged.
#[must_use]
pub fn strip_root(href: &str, root: &str) -> String {
    href.strip_prefix(root).unwrap_or(href).to_string()
}

/// Convenience accessors for resources of the `File` schema.
///
/// Path helpers take the user root href the listing was made under.
pub trait FileResource {
    /// Whether `resource_type` names a collection.
    fn is_dir(&self) -> bool;

    /// Whether `resource_type` is empty.
    fn is_file(&self) -> bool;

    /// Href with `root` removed.
    fn relative_path(&self, root: &str) -> String;

    /// Whether this is the user's root folder.
    fn is_root(&self, root: &str) -> bool {
        self.relative_path(root).replace('/', "").is_empty()
    }

    /// Last path segment, ignoring a trailing `/`.
    fn basename(&self, root: &str) -> String {
        let path = self.relative_path(root);
        let trimmed = path.strip_suffix('/').unwrap_or(&path);
        trimmed.rsplit('/').next().unwrap_or_default().to_string()
    }

    /// Parent path, ignoring a trailing `/`.
    fn dirname(&self, root: &str) -> String {
        let path = self.relative_path(root);
        let trimmed = path.strip_suffix('/').unwrap_or(&path);
        trimmed
            .rsplit_once('/')
            .map(|(parent, _)| parent.to_string())
            .unwrap_or_default()
    }

    fn last_modified_datetime(&self) -> Option<DateTime<Utc>>;

    fn file_id(&self) -> Option<i64>;
}

impl FileResource for Resource {
    fn is_dir(&self) -> bool {
        self.value("resource_type").as_str() == Some(COLLECTION_RESOURCE_TYPE)
    }

    fn is_file(&self) -> bool {
        !is_truthy(self.value("resource_type"))
    }

    fn relative_path(&self, root: &str) -> String {
        strip_root(self.value("href").as_str().unwrap_or_default(), root)
    }

    fn last_modified_datetime(&self) -> Option<DateTime<Utc>> {
        self.value("last_modified")
            .as_str()
            .and_then(datetime_from_string)
    }

    fn file_id(&self) -> Option<i64> {
        self.value("file_id").as_i64()
    }
}
