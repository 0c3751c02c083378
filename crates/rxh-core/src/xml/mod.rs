//! Namespaced XML tree and qualified-name lookups.

mod namespace;
mod node;
mod tree;

pub use namespace::{Component, Namespaces};
pub use node::Node;
pub use tree::{Document, Element};

use crate::error::ExtractionError;

/// Result type for XML operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
