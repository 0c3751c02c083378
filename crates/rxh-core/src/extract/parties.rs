//! Supplier and customer sections.

use super::Result;
use crate::models::record::{CustomerInfo, Party, SupplierInfo};
use crate::xml::Component::{Aggregate, Basic};
use crate::xml::Node;

/// Extract a `cac:Party` node.
pub fn party(node: &Node<'_>) -> Result<Party> {
    Ok(Party {
        name: node.child(Aggregate, "PartyName")?.text(Basic, "Name")?,
        address: node.child(Aggregate, "PostalAddress")?.text(Basic, "StreetName")?,
        phone: node.child(Aggregate, "Contact")?.text(Basic, "Telephone")?,
    })
}

/// Extract a `cac:AccountingSupplierParty` node.
pub fn supplier(node: &Node<'_>) -> Result<SupplierInfo> {
    Ok(SupplierInfo {
        account_id: node.trimmed_text(Basic, "CustomerAssignedAccountID")?,
        party: party(&node.child(Aggregate, "Party")?)?,
    })
}

/// Extract a `cac:AccountingCustomerParty` node.
pub fn customer(node: &Node<'_>) -> Result<CustomerInfo> {
    Ok(CustomerInfo {
        account_id: node.trimmed_text(Basic, "CustomerAssignedAccountID")?,
        additional_account_id: node.trimmed_text(Basic, "AdditionalAccountID")?,
        party: party(&node.child(Aggregate, "Party")?)?,
    })
}
