//! Document-level tax and monetary totals.

use super::Result;
use crate::models::record::{MonetaryTotal, TaxTotal};
use crate::xml::Component::{Aggregate, Basic};
use crate::xml::Node;

/// Extract the document `cac:TaxTotal` node. Only the first subtotal is read.
pub fn tax_total(node: &Node<'_>) -> Result<TaxTotal> {
    let subtotal = node.child(Aggregate, "TaxSubtotal")?;
    Ok(TaxTotal {
        amount: node.text(Basic, "TaxAmount")?,
        taxable_amount: subtotal.text(Basic, "TaxableAmount")?,
        tax_amount: subtotal.text(Basic, "TaxAmount")?,
        tax_category: subtotal.child(Aggregate, "TaxCategory")?.text(Basic, "ID")?,
    })
}

/// Extract a `cac:LegalMonetaryTotal` node.
pub fn monetary_total(node: &Node<'_>) -> Result<MonetaryTotal> {
    Ok(MonetaryTotal {
        line_extension_amount: node.text(Basic, "LineExtensionAmount")?,
        tax_exclusive_amount: node.text(Basic, "TaxExclusiveAmount")?,
        payable_amount: node.text(Basic, "PayableAmount")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extract::tests::with_fragment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tax_total() {
        let xml = "<cac:TaxTotal>\
            <cbc:TaxAmount>0.00</cbc:TaxAmount>\
            <cac:TaxSubtotal>\
            <cbc:TaxableAmount>1500.00</cbc:TaxableAmount>\
            <cbc:TaxAmount>0.00</cbc:TaxAmount>\
            <cac:TaxCategory><cbc:ID>9998</cbc:ID></cac:TaxCategory>\
            </cac:TaxSubtotal>\
            <cac:TaxSubtotal>\
            <cbc:TaxableAmount>1.00</cbc:TaxableAmount>\
            <cbc:TaxAmount>1.00</cbc:TaxAmount>\
            <cac:TaxCategory><cbc:ID>1000</cbc:ID></cac:TaxCategory>\
            </cac:TaxSubtotal>\
            </cac:TaxTotal>";
        with_fragment(xml, |root| {
            let tax = tax_total(&root.child(Aggregate, "TaxTotal").unwrap()).unwrap();
            assert_eq!(
                tax,
                TaxTotal {
                    amount: "0.00".to_string(),
                    taxable_amount: "1500.00".to_string(),
                    tax_amount: "0.00".to_string(),
                    tax_category: "9998".to_string(),
                }
            );
        });
    }

    #[test]
    fn test_monetary_total() {
        let xml = "<cac:LegalMonetaryTotal>\
            <cbc:LineExtensionAmount>1500.00</cbc:LineExtensionAmount>\
            <cbc:TaxExclusiveAmount>120.00</cbc:TaxExclusiveAmount>\
            <cbc:PayableAmount>1380.00</cbc:PayableAmount>\
            </cac:LegalMonetaryTotal>";
        with_fragment(xml, |root| {
            let total = monetary_total(&root.child(Aggregate, "LegalMonetaryTotal").unwrap()).unwrap();
            assert_eq!(total.payable_amount, "1380.00");
            assert_eq!(total.tax_exclusive_amount, "120.00");
        });
    }

    #[test]
    fn test_monetary_total_without_payable_amount() {
        let xml = "<cac:LegalMonetaryTotal>\
            <cbc:LineExtensionAmount>1500.00</cbc:LineExtensionAmount>\
            <cbc:TaxExclusiveAmount>120.00</cbc:TaxExclusiveAmount>\
            </cac:LegalMonetaryTotal>";
        with_fragment(xml, |root| {
            let err = monetary_total(&root.child(Aggregate, "LegalMonetaryTotal").unwrap()).unwrap_err();
            assert_eq!(
                err,
                ExtractionError::MissingField(
                    "Invoice/cac:LegalMonetaryTotal/cbc:PayableAmount".to_string()
                )
            );
        });
    }
}
