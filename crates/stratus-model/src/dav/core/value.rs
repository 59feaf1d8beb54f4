//! Dynamic property values.

use serde_json::Value;

/// ## Summary
/// Returns whether a value counts as "present" for transform purposes.
///
/// `null`, `false`, zero, the empty string and empty containers are
/// falsy; everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short type name for diagnostics.
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered `namespace code → { xml name → value }` mapping.
///
/// Used both for REPORT filter rules and PROPPATCH values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespacedValues {
    groups: Vec<(String, Vec<(String, Value)>)>,
}

impl NamespacedValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(namespace, key, value);
        self
    }

    /// Sets `key` in `namespace`, replacing an earlier value for the same key.
    pub fn insert(
        &mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let namespace = namespace.into();
        let key = key.into();
        let value = value.into();

        let group = match self.groups.iter().position(|(ns, _)| *ns == namespace) {
            Some(index) => &mut self.groups[index].1,
            None => {
                self.groups.push((namespace, Vec::new()));
                let last = self.groups.len() - 1;
                &mut self.groups[last].1
            }
        };

        match group.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => group.push((key, value)),
        }
    }

    /// Namespace codes in insertion order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(ns, _)| ns.as_str())
    }

    /// Entries of one namespace.
    pub fn entries<'a>(&'a self, namespace: &str) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.groups
            .iter()
            .filter(move |(ns, _)| ns == namespace)
            .flat_map(|(_, entries)| entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// All `(namespace, key, value)` triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.groups.iter().flat_map(|(ns, entries)| {
            entries
                .iter()
                .map(move |(k, v)| (ns.as_str(), k.as_str(), v))
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, entries)| entries.is_empty())
    }
}
