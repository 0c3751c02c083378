//! Invoice record extracted from a SUNAT RxH (UBL) document.
//!
//! Every field is the text of a located XML element. Amounts, percentages and
//! codes stay as the literals found in the document so callers can pick their
//! own numeric representation.

use serde::{Deserialize, Serialize};

/// Legal identity of the supplier or the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Registered name (`cac:PartyName/cbc:Name`).
    pub name: String,

    /// Street line (`cac:PostalAddress/cbc:StreetName`).
    pub address: String,

    /// Contact phone (`cac:Contact/cbc:Telephone`).
    pub phone: String,
}

/// The issuer of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierInfo {
    /// Tax identification number (RUC), trimmed.
    pub account_id: String,

    pub party: Party,
}

/// The receiver of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Tax identification number, trimmed.
    pub account_id: String,

    /// Secondary identifier (document type code), trimmed.
    pub additional_account_id: String,

    pub party: Party,
}

/// Tax applied to the invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetail {
    pub amount: String,
    pub subtotal: String,
    pub percent: String,
    pub category: String,
}

/// The single line of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: String,
    pub note: String,
    pub quantity: String,
    pub description: String,
    pub tax: TaxDetail,
}

/// Document-level tax total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTotal {
    pub amount: String,
    pub taxable_amount: String,
    pub tax_amount: String,
    pub tax_category: String,
}

/// Legal monetary totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryTotal {
    pub line_extension_amount: String,
    pub tax_exclusive_amount: String,
    pub payable_amount: String,
}

/// A complete extracted receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub supplier: SupplierInfo,
    pub customer: CustomerInfo,

    /// Series and number, e.g. `E001-123`.
    pub id: String,

    pub issue_date: String,
    pub issue_time: String,

    /// First (and in practice only) invoice line.
    pub line: InvoiceLine,

    pub tax: TaxTotal,
    pub legal_amount: MonetaryTotal,
}
