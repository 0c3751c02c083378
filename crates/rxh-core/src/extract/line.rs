//! Invoice line section.

use super::Result;
use crate::models::record::{InvoiceLine, TaxDetail};
use crate::xml::Component::{Aggregate, Basic};
use crate::xml::Node;

/// Extract a `cac:InvoiceLine` node.
pub fn invoice_line(node: &Node<'_>) -> Result<InvoiceLine> {
    Ok(InvoiceLine {
        id: node.text(Basic, "ID")?,
        note: node.text(Basic, "Note")?,
        quantity: node.text(Basic, "InvoicedQuantity")?,
        description: node.child(Aggregate, "Item")?.text(Basic, "Description")?,
        tax: line_tax(&node.child(Aggregate, "TaxTotal")?)?,
    })
}

/// Extract the `cac:TaxTotal` of an invoice line. Only the first subtotal is read.
pub fn line_tax(node: &Node<'_>) -> Result<TaxDetail> {
    let subtotal = node.child(Aggregate, "TaxSubtotal")?;
    Ok(TaxDetail {
        amount: node.text(Basic, "TaxAmount")?,
        subtotal: subtotal.text(Basic, "TaxAmount")?,
        percent: subtotal.text(Basic, "Percent")?,
        category: subtotal.child(Aggregate, "TaxCategory")?.text(Basic, "ID")?,
    })
}
