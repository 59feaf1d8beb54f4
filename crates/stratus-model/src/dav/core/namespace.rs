//! XML namespace codes and the namespace map used for request building.

use std::borrow::Cow;

use crate::error::SchemaError;

/// `DAV:` namespace URI.
pub const DAV_NS: &str = "DAV:";

/// ownCloud extension namespace URI.
pub const OC_NS: &str = "http://owncloud.org/ns";

/// Nextcloud extension namespace URI.
pub const NC_NS: &str = "http://nextcloud.org/ns";

/// sabre/dav namespace URI, used by server error bodies.
pub const SABREDAV_NS: &str = "http://sabredav.org/ns";

/// Namespace codes declared on every generated request document.
pub const ALWAYS_DECLARED: [&str; 2] = ["d", "oc"];

/// An XML namespace bound to its short code (prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    code: Cow<'static, str>,
    uri: Cow<'static, str>,
}

impl Namespace {
    /// `DAV:` namespace, code `d`.
    pub const DAV: Self = Self::from_static("d", DAV_NS);

    /// ownCloud namespace, code `oc`.
    pub const OC: Self = Self::from_static("oc", OC_NS);

    /// Nextcloud namespace, code `nc`.
    pub const NC: Self = Self::from_static("nc", NC_NS);

    const fn from_static(code: &'static str, uri: &'static str) -> Self {
        Self {
            code: Cow::Borrowed(code),
            uri: Cow::Borrowed(uri),
        }
    }

    /// Creates a new namespace binding.
    #[must_use]
    pub fn new(code: impl Into<Cow<'static, str>>, uri: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            uri: uri.into(),
        }
    }

    /// Returns the namespace code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the namespace URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the declaring attribute name, e.g. `xmlns:d`.
    #[must_use]
    pub fn xmlns_attribute(&self) -> String {
        format!("xmlns:{}", self.code)
    }
}

/// Ordered code → URI table.
///
/// Insertion order is kept so generated documents declare namespaces
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: Vec<Namespace>,
}

impl NamespaceMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `d`, `oc` and `nc` bindings.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: vec![Namespace::DAV, Namespace::OC, Namespace::NC],
        }
    }

    /// ## Summary
    /// Adds a binding. Re-registering an identical binding is a no-op.
    ///
    /// ## Errors
    /// Returns `SchemaError::ConflictingNamespace` if the code is already
    /// bound to a different URI.
    pub fn register(&mut self, namespace: Namespace) -> Result<(), SchemaError> {
        match self.get(namespace.code()) {
            Some(existing) if existing.uri() == namespace.uri() => Ok(()),
            Some(existing) => Err(SchemaError::ConflictingNamespace {
                code: namespace.code().to_string(),
                existing: existing.uri().to_string(),
                uri: namespace.uri().to_string(),
            }),
            None => {
                self.entries.push(namespace);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Namespace> {
        self.entries.iter().find(|ns| ns.code() == code)
    }

    /// Returns the URI bound to `code`.
    #[must_use]
    pub fn uri(&self, code: &str) -> Option<&str> {
        self.get(code).map(Namespace::uri)
    }

    /// Returns the code bound to `uri`.
    #[must_use]
    pub fn code_for_uri(&self, uri: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|ns| ns.uri() == uri)
            .map(Namespace::code)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a NamespaceMap {
    type Item = &'a Namespace;
    type IntoIter = std::slice::Iter<'a, Namespace>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
