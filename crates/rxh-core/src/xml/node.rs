//! Cursor over an element with its namespace context and lookup path.

use super::{Component, Element, Namespaces, Result};
use crate::error::ExtractionError;

/// An element paired with the document's namespaces.
///
/// Every lookup is a required one: a missing child or a child without text
/// fails with [`ExtractionError::MissingField`] naming the full path.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    element: &'a Element,
    namespaces: &'a Namespaces,
    path: String,
}

impl<'a> Node<'a> {
    /// Start a cursor at the document root.
    pub fn root(element: &'a Element, namespaces: &'a Namespaces) -> Self {
        Self {
            element,
            namespaces,
            path: element.name.clone(),
        }
    }

    /// Path from the root, written with conventional prefixes.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All direct children with the given qualified name.
    pub fn children(&self, component: Component, name: &'a str) -> impl Iterator<Item = Node<'a>> + '_ {
        let uri = self.namespaces.uri(component);
        let path = self.child_path(component, name);
        self.element
            .children
            .iter()
            .filter(move |child| child.is(uri, name))
            .map(move |child| Node {
                element: child,
                namespaces: self.namespaces,
                path: path.clone(),
            })
    }

    /// First direct child with the given qualified name.
    pub fn child(&self, component: Component, name: &'a str) -> Result<Node<'a>> {
        self.children(component, name)
            .next()
            .ok_or_else(|| ExtractionError::MissingField(self.child_path(component, name)))
    }

    /// Exact text of a required child.
    pub fn text(&self, component: Component, name: &'a str) -> Result<String> {
        let child = self.child(component, name)?;
        match &child.element.text {
            Some(text) if !text.is_empty() => Ok(text.clone()),
            _ => Err(ExtractionError::MissingField(child.path)),
        }
    }

    /// Text of a required child with surrounding whitespace removed.
    pub fn trimmed_text(&self, component: Component, name: &'a str) -> Result<String> {
        self.text(component, name).map(|text| text.trim().to_string())
    }

    fn child_path(&self, component: Component, name: &str) -> String {
        format!("{}/{}:{}", self.path, component.prefix(), name)
    }
}
