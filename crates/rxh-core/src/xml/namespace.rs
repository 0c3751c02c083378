//! Prefix map derived from the root element's namespace declarations.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Element, Result};
use crate::error::ExtractionError;
use crate::models::config::NamespaceConfig;

/// The two UBL component families used in qualified lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Common basic components (`cbc:`), the simple fields.
    Basic,
    /// Common aggregate components (`cac:`), the structured sub-elements.
    Aggregate,
}

impl Component {
    /// Conventional prefix for this family.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Basic => "cbc",
            Self::Aggregate => "cac",
        }
    }
}

/// Immutable namespace context for one document.
///
/// Built once from the root. The default (unprefixed) declaration never enters
/// the map; component URIs are resolved up front so lookups cannot fail on
/// namespace grounds later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    basic: String,
    aggregate: String,
}

impl Namespaces {
    /// Derive the namespace context from the root element.
    pub fn from_root(root: &Element, config: &NamespaceConfig) -> Result<Self> {
        let prefixes: BTreeMap<String, String> = root
            .declarations
            .iter()
            .filter_map(|(prefix, uri)| prefix.clone().map(|p| (p, uri.clone())))
            .collect();

        if prefixes.is_empty() {
            return Err(ExtractionError::MissingNamespace(format!(
                "<{}> declares no prefixed namespace",
                root.name
            )));
        }

        let basic = resolve(&prefixes, Component::Basic, &config.basic_components)?;
        let aggregate = resolve(&prefixes, Component::Aggregate, &config.aggregate_components)?;
        debug!(%basic, %aggregate, declared = prefixes.len(), "resolved UBL namespaces");

        Ok(Self {
            basic,
            aggregate,
        })
    }

    /// URI bound to a component family.
    pub fn uri(&self, component: Component) -> &str {
        match component {
            Component::Basic => &self.basic,
            Component::Aggregate => &self.aggregate,
        }
    }
}

/// Prefer whichever prefix is bound to the well-known URI; fall back to the
/// conventional prefix token with whatever URI the document gives it.
fn resolve(
    prefixes: &BTreeMap<String, String>,
    component: Component,
    well_known: &str,
) -> Result<String> {
    if prefixes.values().any(|uri| uri == well_known) {
        return Ok(well_known.to_string());
    }
    prefixes
        .get(component.prefix())
        .cloned()
        .ok_or_else(|| ExtractionError::MissingNamespace(component.prefix().to_string()))
}
