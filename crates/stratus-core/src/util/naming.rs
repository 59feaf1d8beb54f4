//! Conversions between the three spellings of a resource field name.
//!
//! ## Summary
//! Server properties are spelled as hyphenated XML element names
//! (`owner-display-name`), camelCase JSON keys (`ownerDisplayName`) and the
//! snake_case field names used by resource objects (`owner_display_name`).
//! All conversions are pure and total.

/// Converts an XML element name to a field name (`-` becomes `_`).
#[must_use]
pub fn xml_to_field(xml_key: &str) -> String {
    xml_key.replace('-', "_")
}

/// Converts a field name to an XML element name (`_` becomes `-`).
#[must_use]
pub fn field_to_xml(field_name: &str) -> String {
    field_name.replace('_', "-")
}

/// Converts a snake_case or dotted field name to a camelCase JSON key.
///
/// Each `_` or `.` is dropped and the letter following it is uppercased.
///
/// Examples:
/// - "user_visible" -> "userVisible"
/// - "quota.used" -> "quotaUsed"
#[must_use]
pub fn field_to_json(field_name: &str) -> String {
    let mut json_key = String::with_capacity(field_name.len());
    let mut upper_next = false;

    for c in field_name.chars() {
        if c == '_' || c == '.' {
            upper_next = true;
        } else if upper_next {
            json_key.extend(c.to_uppercase());
            upper_next = false;
        } else {
            json_key.push(c);
        }
    }

    json_key
}
