//! Per-endpoint wrappers that form URLs and hand responses to the mapping layer.

mod capabilities;
mod systemtags;
mod webdav;

pub use capabilities::Capabilities;
pub use systemtags::{SystemTags, SystemTagsRelation};
pub use webdav::WebDav;

use stratus_model::{Resource, ResultSet};

/// ## Summary
/// Drops the first entry of a listing when it is the queried collection
/// itself.
///
/// Hrefs are compared with trailing slashes ignored.
#[must_use]
pub fn skip_root(mut listing: ResultSet, root_href: &str) -> ResultSet {
    let is_root = listing
        .first()
        .and_then(Resource::dav_href)
        .is_some_and(|href| same_path(href, root_href));

    if is_root {
        let root = listing.remove(0);
        tracing::trace!(href = root.dav_href().unwrap_or_default(), "Skipping collection entry");
    }

    listing
}

fn same_path(left: &str, right: &str) -> bool {
    left.trim_end_matches('/') == right.trim_end_matches('/')
}
