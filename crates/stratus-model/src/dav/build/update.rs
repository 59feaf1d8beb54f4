//! PROPPATCH request bodies.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::{BuildResult, start_with_namespaces, write_value_element};
use crate::dav::core::{NamespaceMap, NamespacedValues};

/// ## Summary
/// Builds a `d:propertyupdate` body setting every given value.
///
/// All namespaces of the map are declared. Values in unknown namespaces
/// are skipped; when none remain the `d:set` block is omitted.
///
/// ## Errors
/// Returns an error if a value has no XML text form or XML writing fails.
#[tracing::instrument(skip_all)]
pub fn build_update(namespaces: &NamespaceMap, values: &NamespacedValues) -> BuildResult<Vec<u8>> {
    let entries: Vec<_> = values
        .iter()
        .filter(|(ns, key, _)| {
            let known = namespaces.contains(ns);
            if !known {
                tracing::warn!(namespace = %ns, key = %key, "Skipping value in unknown namespace");
            }
            known
        })
        .collect();

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    start_with_namespaces(&mut writer, "d:propertyupdate", namespaces)?;

    if !entries.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("d:set")))?;
        writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
        for (ns, key, value) in &entries {
            write_value_element(&mut writer, &format!("{ns}:{key}"), value)?;
        }
        writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
        writer.write_event(Event::End(BytesEnd::new("d:set")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("d:propertyupdate")))?;

    tracing::debug!(values = entries.len(), "Built property update body");

    Ok(writer.into_inner())
}
