//! System tags.

use crate::dav::core::{Property, Resource, SchemaDefinition, transform};

/// Schema name of system tags.
pub const TAG: &str = "Tag";

/// Name given to a tag created without one.
pub const DEFAULT_TAG_NAME: &str = "default_tag_name";

/// The `Tag` schema definition.
#[must_use]
pub fn tag_schema() -> SchemaDefinition {
    SchemaDefinition::new(TAG)
        .display(["href", "display_name"])
        .property(Property::oc().field("id").parse_value(transform::to_int).required())
        .property(
            Property::oc()
                .field("display_name")
                .json("name")
                .with_default(DEFAULT_TAG_NAME)
                .required(),
        )
        .property(Property::oc().field("user_visible").with_default(true))
        .property(Property::oc().field("can_assign").with_default(true))
        .property(Property::oc().field("user_assignable").with_default(true))
}

pub trait TagResource {
    fn tag_id(&self) -> Option<i64>;

    fn tag_name(&self) -> Option<&str>;
}

impl TagResource for Resource {
    fn tag_id(&self) -> Option<i64> {
        self.value("id").as_i64()
    }

    fn tag_name(&self) -> Option<&str> {
        self.value("display_name").as_str()
    }
}
