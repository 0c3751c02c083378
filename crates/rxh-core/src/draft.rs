//! Supplier invoice drafts built from extracted records.
//!
//! The mapping mirrors what an accounting system does when importing a
//! receipt: resolve the supplier by tax ID (optionally proposing a new
//! partner) and create a single-line purchase invoice for the payable amount.
//! Nothing here persists; the draft is handed back to the caller.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DraftError;
use crate::extract::DocumentExtractor;
use crate::models::record::InvoiceRecord;

/// A partner already known to the hosting system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    /// Identifier in the hosting system.
    pub id: String,

    /// Tax identification number.
    pub vat: String,

    pub name: String,
}

/// Lookup of existing suppliers by tax ID.
pub trait PartnerDirectory {
    fn find_supplier(&self, vat: &str) -> Option<SupplierRef>;
}

/// Vec-backed partner directory, typically loaded from a JSON list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryPartners {
    partners: Vec<SupplierRef>,
}

impl InMemoryPartners {
    pub fn new(partners: Vec<SupplierRef>) -> Self {
        Self { partners }
    }

    /// Load partners from a JSON array file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }
}

impl PartnerDirectory for InMemoryPartners {
    fn find_supplier(&self, vat: &str) -> Option<SupplierRef> {
        self.partners.iter().find(|p| p.vat == vat).cloned()
    }
}

/// How to build the draft.
#[derive(Debug, Clone, Default)]
pub struct DraftOptions {
    /// Propose a new supplier when the tax ID is unknown.
    pub create_supplier: bool,

    /// Account for the invoice line.
    pub account: String,
}

/// Supplier resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DraftSupplier {
    /// Supplier already exists.
    Existing(SupplierRef),
    /// Supplier must be created from the receipt data.
    New(NewSupplier),
}

/// Partner data proposed for creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub vat: String,
    pub street: String,
    pub phone: String,
}

/// Kind of accounting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    /// Vendor bill.
    InInvoice,
}

/// A purchase invoice ready to be created by the hosting system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub supplier: DraftSupplier,
    pub date_invoice: NaiveDate,
    pub kind: DraftKind,
    /// Receipt series and number, kept as reference.
    pub reference: String,
    pub lines: Vec<DraftLine>,
}

/// One invoice line of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub name: String,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub account: String,
}

/// Build an invoice draft for the given record.
pub fn build_draft(
    record: &InvoiceRecord,
    partners: &dyn PartnerDirectory,
    options: &DraftOptions,
) -> Result<InvoiceDraft, DraftError> {
    let vat = &record.supplier.account_id;
    let party = &record.supplier.party;

    let supplier = match partners.find_supplier(vat) {
        Some(existing) => DraftSupplier::Existing(existing),
        None if options.create_supplier => {
            debug!(%vat, "supplier not found, proposing a new one");
            DraftSupplier::New(NewSupplier {
                name: party.name.clone(),
                vat: vat.clone(),
                street: party.address.clone(),
                phone: party.phone.clone(),
            })
        }
        None => {
            return Err(DraftError::UnknownSupplier {
                account_id: vat.clone(),
                name: party.name.clone(),
            });
        }
    };

    let date_invoice = NaiveDate::parse_from_str(record.issue_date.trim(), "%Y-%m-%d")
        .map_err(|_| invalid("issue_date", &record.issue_date))?;
    let price_unit = Decimal::from_str(record.legal_amount.payable_amount.trim())
        .map_err(|_| invalid("legal_amount.payable_amount", &record.legal_amount.payable_amount))?;

    Ok(InvoiceDraft {
        supplier,
        date_invoice,
        kind: DraftKind::InInvoice,
        reference: record.id.clone(),
        lines: vec![DraftLine {
            name: record.line.description.clone(),
            quantity: Decimal::ONE,
            price_unit,
            account: options.account.clone(),
        }],
    })
}

/// Extract a document and build its draft in one step.
pub fn draft_from_xml(
    extractor: &dyn DocumentExtractor,
    bytes: &[u8],
    partners: &dyn PartnerDirectory,
    options: &DraftOptions,
) -> crate::Result<InvoiceDraft> {
    let record = extractor.extract(bytes)?;
    Ok(build_draft(&record, partners, options)?)
}

fn invalid(field: &str, value: &str) -> DraftError {
    DraftError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = include_str!("../tests/fixtures/rxh_sample.xml");

    fn record() -> InvoiceRecord {
        extract(SAMPLE.as_bytes()).unwrap()
    }

    fn options(create_supplier: bool) -> DraftOptions {
        DraftOptions {
            create_supplier,
            account: "632100".to_string(),
        }
    }

    #[test]
    fn test_existing_supplier() {
        let known = SupplierRef {
            id: "42".to_string(),
            vat: "20123456789".to_string(),
            name: "QUISPE MAMANI ROSA ELENA".to_string(),
        };
        let partners = InMemoryPartners::new(vec![known.clone()]);

        let draft = build_draft(&record(), &partners, &options(false)).unwrap();
        assert_eq!(draft.supplier, DraftSupplier::Existing(known));
        assert_eq!(draft.date_invoice, NaiveDate::from_ymd_opt(2021, 5, 1).unwrap());
        assert_eq!(draft.kind, DraftKind::InInvoice);
        assert_eq!(
            draft.lines,
            vec![DraftLine {
                name: "ASESORIA CONTABLE MES DE ABRIL".to_string(),
                quantity: Decimal::ONE,
                price_unit: Decimal::new(11800, 2),
                account: "632100".to_string(),
            }]
        );
    }

    #[test]
    fn test_new_supplier_when_allowed() {
        let draft = build_draft(&record(), &InMemoryPartners::default(), &options(true)).unwrap();
        match draft.supplier {
            DraftSupplier::New(new) => {
                assert_eq!(new.vat, "20123456789");
                assert_eq!(new.street, "AV. AREQUIPA 1234 DPTO. 501 LINCE LIMA");
                assert_eq!(new.phone, "014412233");
            }
            other => panic!("expected a new supplier, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_supplier() {
        let err = build_draft(&record(), &InMemoryPartners::default(), &options(false)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The supplier 20123456789 - QUISPE MAMANI ROSA ELENA doesn't exist"
        );
    }

    #[test]
    fn test_invalid_amount() {
        let mut record = record();
        record.legal_amount.payable_amount = "S/ 118".to_string();
        let err = build_draft(&record, &InMemoryPartners::default(), &options(true)).unwrap_err();
        assert_eq!(
            err,
            DraftError::InvalidValue {
                field: "legal_amount.payable_amount".to_string(),
                value: "S/ 118".to_string(),
            }
        );
    }

    #[test]
    fn test_draft_from_xml_reports_either_stage() {
        let extractor = crate::extract::RxhExtractor::new();
        let partners = InMemoryPartners::default();

        let draft = draft_from_xml(&extractor, SAMPLE.as_bytes(), &partners, &options(true)).unwrap();
        assert_eq!(draft.reference, "F001-123");

        let err = draft_from_xml(&extractor, b"<Invoice>", &partners, &options(true)).unwrap_err();
        assert!(matches!(err, crate::RxhError::Extraction(_)));

        let err = draft_from_xml(&extractor, SAMPLE.as_bytes(), &partners, &options(false)).unwrap_err();
        assert!(matches!(err, crate::RxhError::Draft(DraftError::UnknownSupplier { .. })));
    }

    #[test]
    fn test_partners_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partners.json");
        std::fs::write(
            &path,
            r#"[{"id": "7", "vat": "20123456789", "name": "ROSA"}]"#,
        )
        .unwrap();

        let partners = InMemoryPartners::from_file(&path).unwrap();
        assert_eq!(partners.find_supplier("20123456789").unwrap().id, "7");
        assert!(partners.find_supplier("10000000001").is_none());
    }
}
