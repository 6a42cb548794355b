//! Document module.
//!
//! This module provides the update document model (fields, boosts and
//! atomic update modifiers), the read-only documents found in query results,
//! and converters that build update documents from files.

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;
pub mod modifier;
pub mod read_only;

// Re-export commonly used types
pub use document::{Document, DocumentBuilder};
pub use field_value::{Field, FieldValue};
pub use modifier::Modifier;
pub use read_only::ReadOnlyDocument;
