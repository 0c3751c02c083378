//! Core library for SUNAT RxH receipt extraction.
//!
//! This crate provides:
//! - A namespaced XML tree with qualified-name lookups (UBL `cbc`/`cac`)
//! - The document extractor producing an [`InvoiceRecord`]
//! - Supplier invoice drafts derived from extracted records

pub mod draft;
pub mod error;
pub mod extract;
pub mod models;
pub mod xml;

pub use draft::{build_draft, draft_from_xml, DraftOptions, InMemoryPartners, InvoiceDraft, PartnerDirectory};
pub use error::{DraftError, ErrorKind, ExtractionError, Result, RxhError};
pub use extract::{extract, DocumentExtractor, RxhExtractor};
pub use models::config::{ExtractionConfig, RxhConfig};
pub use models::record::{
    CustomerInfo, InvoiceLine, InvoiceRecord, MonetaryTotal, Party, SupplierInfo, TaxDetail,
    TaxTotal,
};
