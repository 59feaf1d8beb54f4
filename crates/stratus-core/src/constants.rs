/// Endpoint components shared across crates
pub const WEBDAV_ROUTE_PREFIX: &str = "/remote.php/dav";

pub const FILES_ROUTE_COMPONENT: &str = "files";
pub const FILES_ROUTE_PREFIX: &str =
    const_str::concat!(WEBDAV_ROUTE_PREFIX, "/", FILES_ROUTE_COMPONENT);

pub const SYSTEMTAGS_ROUTE_COMPONENT: &str = "systemtags";
pub const SYSTEMTAGS_ROUTE_PREFIX: &str =
    const_str::concat!(WEBDAV_ROUTE_PREFIX, "/", SYSTEMTAGS_ROUTE_COMPONENT);

pub const SYSTEMTAGS_RELATIONS_ROUTE_COMPONENT: &str = "systemtags-relations";
pub const SYSTEMTAGS_RELATIONS_ROUTE_PREFIX: &str = const_str::concat!(
    WEBDAV_ROUTE_PREFIX,
    "/",
    SYSTEMTAGS_RELATIONS_ROUTE_COMPONENT,
    "/files"
);

pub const OCS_V1_ROUTE_PREFIX: &str = "/ocs/v1.php";

/// Status line a `propstat` block must carry for its properties to be read.
pub const SUCCESS_STATUS: &str = "HTTP/1.1 200 OK";

/// Local name of the `resourcetype` child marking a collection.
pub const COLLECTION_RESOURCE_TYPE: &str = "collection";

/// Header carrying the OCS marker on every OCS request.
pub const OCS_API_REQUEST_HEADER: &str = "OCS-APIRequest";

/// Header used by the server to receive a file modification time.
pub const MTIME_HEADER: &str = "X-OC-MTIME";

/// Target URL of a `MOVE` or `COPY`.
pub const DESTINATION_HEADER: &str = "Destination";

/// `T` or `F`: whether a `MOVE` or `COPY` may replace its target.
pub const OVERWRITE_HEADER: &str = "Overwrite";

pub const CAPABILITIES_ROUTE: &str =
    const_str::concat!(OCS_V1_ROUTE_PREFIX, "/cloud/capabilities");
