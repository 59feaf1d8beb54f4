//! PROPFIND / REPORT request bodies.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use serde_json::Value;

use super::{BuildResult, start_with_namespaces, write_value_element};
use crate::dav::core::{ALWAYS_DECLARED, NamespacedValues, ResourceSchema};

/// Root element used when no instruction is given.
pub const DEFAULT_INSTRUCTION: &str = "d:propfind";

/// Container of REPORT filter rules.
pub const FILTER_RULES_ELEMENT: &str = "oc:filter-rules";

/// Which properties a query asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelection {
    /// Required fields of the schema, or every enabled field with
    /// `use_all_defaults`.
    #[default]
    Default,
    /// Explicit `namespace code → [xml name]` lists.
    Namespaced(Vec<(String, Vec<String>)>),
    /// Schema field names; disabled fields are skipped.
    Names(Vec<String>),
}

impl FieldSelection {
    /// Builds a [`FieldSelection::Namespaced`] selection.
    #[must_use]
    pub fn namespaced<N, I, K>(groups: impl IntoIterator<Item = (N, I)>) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::Namespaced(
            groups
                .into_iter()
                .map(|(ns, keys)| (ns.into(), keys.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Builds a [`FieldSelection::Names`] selection.
    #[must_use]
    pub fn names<K: Into<String>>(names: impl IntoIterator<Item = K>) -> Self {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Default => true,
            Self::Namespaced(groups) => groups.iter().all(|(_, keys)| keys.is_empty()),
            Self::Names(names) => names.is_empty(),
        }
    }
}

/// Inputs of [`build_query`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions<'a> {
    /// Root element, `d:propfind` when unset.
    pub instruction: Option<&'a str>,
    pub filter_rules: Option<&'a NamespacedValues>,
    pub fields: FieldSelection,
    pub use_all_defaults: bool,
}

impl<'a> QueryOptions<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn instruction(mut self, instruction: &'a str) -> Self {
        self.instruction = Some(instruction);
        self
    }

    #[must_use]
    pub fn filter_rules(mut self, rules: &'a NamespacedValues) -> Self {
        self.filter_rules = Some(rules);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: FieldSelection) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn all_defaults(mut self) -> Self {
        self.use_all_defaults = true;
        self
    }
}

/// ## Summary
/// Builds a PROPFIND (or custom REPORT) body for `schema`.
///
/// Only the `d` and `oc` namespaces plus those referenced by the
/// instruction, the selected properties or the filter rules are declared.
/// The `<d:prop>` block is omitted when no property is selected.
///
/// Returns `Ok(None)` when there is neither a property nor a filter rule.
///
/// ## Errors
/// Returns an error if a filter rule value has no XML text form or XML
/// writing fails.
#[tracing::instrument(skip_all, fields(schema = %schema.name(), instruction = options.instruction))]
pub fn build_query(
    schema: &ResourceSchema,
    options: &QueryOptions<'_>,
) -> BuildResult<Option<Vec<u8>>> {
    let namespaces = schema.namespaces();
    let instruction = options.instruction.unwrap_or(DEFAULT_INSTRUCTION);

    let props: Vec<(String, String)> =
        selected_properties(schema, &options.fields, options.use_all_defaults)
            .into_iter()
            .filter(|(ns, key)| {
                let known = namespaces.contains(ns);
                if !known {
                    tracing::warn!(
                        namespace = %ns,
                        key = %key,
                        "Skipping property in unknown namespace"
                    );
                }
                known
            })
            .collect();

    let rules: Vec<(&str, &str, &Value)> = options
        .filter_rules
        .into_iter()
        .flat_map(NamespacedValues::iter)
        .filter(|(ns, key, _)| {
            let known = namespaces.contains(ns);
            if !known {
                tracing::warn!(
                    namespace = %ns,
                    key = %key,
                    "Skipping filter rule in unknown namespace"
                );
            }
            known
        })
        .collect();

    if props.is_empty() && rules.is_empty() {
        tracing::debug!("Nothing to query");
        return Ok(None);
    }

    let instruction_ns = instruction.split_once(':').map(|(ns, _)| ns);
    let declared = namespaces.iter().filter(|namespace| {
        let code = namespace.code();
        ALWAYS_DECLARED.contains(&code)
            || instruction_ns == Some(code)
            || props.iter().any(|(ns, _)| ns == code)
            || rules.iter().any(|(ns, _, _)| *ns == code)
    });

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    start_with_namespaces(&mut writer, instruction, declared)?;

    if !props.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
        for (ns, key) in &props {
            writer.write_event(Event::Empty(BytesStart::new(format!("{ns}:{key}"))))?;
        }
        writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
    }

    if !rules.is_empty() {
        writer.write_event(Event::Start(BytesStart::new(FILTER_RULES_ELEMENT)))?;
        for (ns, key, value) in &rules {
            write_value_element(&mut writer, &format!("{ns}:{key}"), value)?;
        }
        writer.write_event(Event::End(BytesEnd::new(FILTER_RULES_ELEMENT)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(instruction)))?;

    tracing::debug!(props = props.len(), rules = rules.len(), "Built query body");

    Ok(Some(writer.into_inner()))
}

/// Resolves a field selection to `(namespace code, xml name)` pairs.
fn selected_properties(
    schema: &ResourceSchema,
    fields: &FieldSelection,
    use_all_defaults: bool,
) -> Vec<(String, String)> {
    if fields.is_empty() {
        return schema
            .properties()
            .iter()
            .filter(|p| !p.is_disabled() && (use_all_defaults || p.is_required()))
            .map(|p| (p.namespace().to_string(), p.xml_key().to_string()))
            .collect();
    }

    match fields {
        FieldSelection::Namespaced(groups) => groups
            .iter()
            .flat_map(|(ns, keys)| keys.iter().map(move |key| (ns.clone(), key.clone())))
            .collect(),
        FieldSelection::Names(names) => {
            for name in names {
                if schema.property(name).is_none() {
                    tracing::warn!(
                        schema = %schema.name(),
                        field = %name,
                        "Unknown field in selection"
                    );
                }
            }
            schema
                .properties()
                .iter()
                .filter(|p| !p.is_disabled() && names.iter().any(|n| n == p.field_name()))
                .map(|p| (p.namespace().to_string(), p.xml_key().to_string()))
                .collect()
        }
        FieldSelection::Default => Vec::new(),
    }
}
