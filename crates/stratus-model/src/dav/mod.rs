//! `WebDAV` mapping layer.
//!
//! Schemas describe resources; `build` writes request bodies from them
//! and `parse` maps response bodies back onto resources.

pub mod build;
pub mod core;
pub mod parse;

#[cfg(test)]
mod tests;
