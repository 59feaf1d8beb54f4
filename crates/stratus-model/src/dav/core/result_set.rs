//! Result collections with explicit cardinality accessors.

use std::ops::{Add, AddAssign, Deref, DerefMut};

use serde::Serialize;
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

use super::resource::Resource;

/// Borrowed view of a [`ResultSet`] by element count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cardinality<'a> {
    Empty,
    Single(&'a Resource),
    Many(&'a [Resource]),
}

/// Zero or more resources of one type.
///
/// Dereferences to a slice for indexing, iteration, sorting and the
/// like. Single-resource access is explicit: [`only`](Self::only) returns
/// `None` and [`try_only`](Self::try_only) fails unless exactly one
/// resource is held.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    #[serde(skip)]
    resource_type: String,
    items: Vec<Resource>,
}

impl ResultSet {
    #[must_use]
    pub fn new(resource_type: impl Into<String>, items: Vec<Resource>) -> Self {
        Self {
            resource_type: resource_type.into(),
            items,
        }
    }

    #[must_use]
    pub fn empty(resource_type: impl Into<String>) -> Self {
        Self::new(resource_type, Vec::new())
    }

    /// Schema name of the contained resources.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    #[must_use]
    pub fn cardinality(&self) -> Cardinality<'_> {
        match self.items.as_slice() {
            [] => Cardinality::Empty,
            [single] => Cardinality::Single(single),
            many => Cardinality::Many(many),
        }
    }

    /// The sole resource, or `None` for zero or several.
    #[must_use]
    pub fn only(&self) -> Option<&Resource> {
        match self.cardinality() {
            Cardinality::Single(resource) => Some(resource),
            Cardinality::Empty | Cardinality::Many(_) => None,
        }
    }

    /// ## Summary
    /// The sole resource.
    ///
    /// ## Errors
    /// Returns `ModelError::Cardinality` unless exactly one resource is held.
    pub fn try_only(&self) -> ModelResult<&Resource> {
        self.only().ok_or(ModelError::Cardinality {
            expected: 1,
            found: self.items.len(),
        })
    }

    /// Consumes the set, yielding the sole resource.
    #[must_use]
    pub fn into_only(mut self) -> Option<Resource> {
        if self.items.len() == 1 {
            self.items.pop()
        } else {
            None
        }
    }

    #[must_use]
    pub fn all(&self) -> &[Resource] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Resource> {
        self.items
    }

    /// Field of the sole resource; `None` for zero or several resources.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.only().and_then(|resource| resource.get(name))
    }

    pub fn push(&mut self, resource: Resource) {
        self.items.push(resource);
    }

    pub fn insert(&mut self, index: usize, resource: Resource) {
        self.items.insert(index, resource);
    }

    pub fn pop(&mut self) -> Option<Resource> {
        self.items.pop()
    }

    pub fn remove(&mut self, index: usize) -> Resource {
        self.items.remove(index)
    }

    pub fn retain(&mut self, f: impl FnMut(&Resource) -> bool) {
        self.items.retain(f);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn append(&mut self, other: &mut ResultSet) {
        self.items.append(&mut other.items);
    }
}

impl Deref for ResultSet {
    type Target = [Resource];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl DerefMut for ResultSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl IntoIterator for ResultSet {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Extend<Resource> for ResultSet {
    fn extend<T: IntoIterator<Item = Resource>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl Add for ResultSet {
    type Output = ResultSet;

    fn add(mut self, mut rhs: ResultSet) -> Self::Output {
        self.append(&mut rhs);
        self
    }
}

impl AddAssign for ResultSet {
    fn add_assign(&mut self, mut rhs: ResultSet) {
        self.append(&mut rhs);
    }
}
