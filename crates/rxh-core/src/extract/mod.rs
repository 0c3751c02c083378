//! Document extraction: XML buffer in, [`InvoiceRecord`] out.
//!
//! One sub-extractor per invoice section, each a pure function over a
//! [`Node`]. Every referenced element is mandatory; the first missing one
//! aborts the whole extraction.

mod line;
mod parties;
mod totals;

pub use line::{invoice_line, line_tax};
pub use parties::{customer, party, supplier};
pub use totals::{monetary_total, tax_total};

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::InvoiceRecord;
use crate::xml::Component::{Aggregate, Basic};
use crate::xml::{Document, Namespaces, Node};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for document extractors.
pub trait DocumentExtractor {
    /// Extract an invoice record from a raw XML buffer.
    fn extract(&self, bytes: &[u8]) -> Result<InvoiceRecord>;
}

/// Extractor for SUNAT RxH documents.
#[derive(Debug, Clone, Default)]
pub struct RxhExtractor {
    config: ExtractionConfig,
}

impl RxhExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the given configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Assemble the record from the document root.
    fn invoice(&self, root: &Node<'_>) -> Result<InvoiceRecord> {
        let id = root.text(Basic, "ID")?;
        let issue_date = root.text(Basic, "IssueDate")?;
        let issue_time = root.text(Basic, "IssueTime")?;

        let supplier = supplier(&root.child(Aggregate, "AccountingSupplierParty")?)?;
        let customer = customer(&root.child(Aggregate, "AccountingCustomerParty")?)?;

        let line_count = root.children(Aggregate, "InvoiceLine").count();
        if line_count > 1 {
            debug!(id = %id, line_count, "document has several invoice lines, using the first");
        }
        let line = invoice_line(&root.child(Aggregate, "InvoiceLine")?)?;

        let tax = tax_total(&root.child(Aggregate, "TaxTotal")?)?;
        let legal_amount = monetary_total(&root.child(Aggregate, "LegalMonetaryTotal")?)?;

        Ok(InvoiceRecord {
            supplier,
            customer,
            id,
            issue_date,
            issue_time,
            line,
            tax,
            legal_amount,
        })
    }
}

impl DocumentExtractor for RxhExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<InvoiceRecord> {
        debug!(bytes = bytes.len(), "extracting RxH document");
        let document = Document::parse(bytes)?;
        let root = &document.root;

        if let Some(expected) = &self.config.expected_root {
            if &root.name != expected {
                return Err(ExtractionError::UnexpectedRoot {
                    expected: expected.clone(),
                    found: root.name.clone(),
                });
            }
        }

        let namespaces = Namespaces::from_root(root, &self.config.namespaces)?;
        let record = self.invoice(&Node::root(root, &namespaces))?;
        debug!(id = %record.id, supplier = %record.supplier.account_id, "extracted RxH document");

        Ok(record)
    }
}

/// Extract an invoice record using the default configuration.
pub fn extract(bytes: &[u8]) -> Result<InvoiceRecord> {
    RxhExtractor::new().extract(bytes)
}
