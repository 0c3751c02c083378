//! Rendering of extracted records.

use rxh_core::InvoiceRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &InvoiceRecord, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

const CSV_HEADER: [&str; 10] = [
    "id",
    "issue_date",
    "issue_time",
    "supplier_account_id",
    "supplier_name",
    "customer_account_id",
    "customer_name",
    "description",
    "tax_amount",
    "payable_amount",
];

fn csv_row(record: &InvoiceRecord) -> [&str; 10] {
    [
        &record.id,
        &record.issue_date,
        &record.issue_time,
        &record.supplier.account_id,
        &record.supplier.party.name,
        &record.customer.account_id,
        &record.customer.party.name,
        &record.line.description,
        &record.tax.amount,
        &record.legal_amount.payable_amount,
    ]
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipt: {}\n", record.id));
    output.push_str(&format!("Issued: {} {}\n", record.issue_date, record.issue_time));
    output.push('\n');

    output.push_str("Supplier:\n");
    output.push_str(&format!("  {}\n", record.supplier.party.name));
    output.push_str(&format!("  RUC: {}\n", record.supplier.account_id));
    output.push_str(&format!("  {}\n", record.supplier.party.address));
    output.push_str(&format!("  Tel: {}\n", record.supplier.party.phone));
    output.push('\n');

    output.push_str("Customer:\n");
    output.push_str(&format!("  {}\n", record.customer.party.name));
    output.push_str(&format!(
        "  ID: {} (type {})\n",
        record.customer.account_id, record.customer.additional_account_id
    ));
    output.push('\n');

    output.push_str("Service:\n");
    output.push_str(&format!("  {} x {}\n", record.line.quantity, record.line.description));
    output.push_str(&format!(
        "  Tax {}: {}% = {}\n",
        record.line.tax.category, record.line.tax.percent, record.line.tax.subtotal
    ));
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Gross:   {}\n", record.legal_amount.line_extension_amount));
    output.push_str(&format!("  Tax:     {}\n", record.tax.amount));
    output.push_str(&format!("  Payable: {}\n", record.legal_amount.payable_amount));

    output
}

/// Header row for batch summaries.
pub fn summary_header() -> Vec<&'static str> {
    let mut header = vec!["filename", "status"];
    header.extend(CSV_HEADER);
    header.extend(["error_kind", "error"]);
    header
}

/// Summary row for a successfully extracted file.
pub fn summary_row<'a>(filename: &'a str, record: &'a InvoiceRecord) -> Vec<&'a str> {
    let mut row = vec![filename, "success"];
    row.extend(csv_row(record));
    row.extend(["", ""]);
    row
}

/// Summary row for a failed file.
pub fn summary_error_row<'a>(filename: &'a str, kind: &'a str, error: &'a str) -> Vec<&'a str> {
    let mut row = vec![filename, "error"];
    row.extend([""; CSV_HEADER.len()]);
    row.extend([kind, error]);
    row
}
