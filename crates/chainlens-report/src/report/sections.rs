//! Deterministic report sections

use chainlens_core::model::{FinancialRecord, QuarterlyDataset, RelatedCompany, SupplyChainAnalysis};
use std::fmt::{self, Write};

pub const MAX_VERTICAL_ENTRIES: usize = 8;
pub const MAX_HORIZONTAL_ENTRIES: usize = 6;

pub const NO_CUSTOMERS: &str = "*No customer data available.*";
pub const NO_SUPPLIERS: &str = "*No supplier data available.*";
pub const NO_COMPETITORS: &str = "*No competitor data available.*";
pub const NO_PARTNERS: &str = "*No partner data available.*";

/// Latest earnings period shown in the report header
///
/// The record gives `{fiscal_year} Q{quarter}` (default `2025 Q4`); the
/// detailed dataset's `latest_quarter` overrides whichever parts it carries.
pub fn latest_period(record: Option<&FinancialRecord>, dataset: Option<&QuarterlyDataset>) -> String {
    let year = record
        .and_then(|r| r.fiscal_year.as_deref())
        .unwrap_or("2025");
    let quarter = record.and_then(FinancialRecord::quarter_number).unwrap_or("4");

    match dataset.and_then(|d| d.latest_quarter.as_ref()) {
        Some(latest) => {
            let year = latest.fiscal_year.as_deref().unwrap_or(year);
            match latest.fiscal_quarter.as_deref() {
                Some(fiscal_quarter) => format!("{year} {fiscal_quarter}"),
                None => format!("{year} Q{quarter}"),
            }
        }
        None => format!("{year} Q{quarter}"),
    }
}

/// Summary, vertical and horizontal analysis of the supply chain
pub fn supply_chain_section(analysis: Option<&SupplyChainAnalysis>) -> Result<String, fmt::Error> {
    let mut out = String::new();

    let summary = analysis
        .map(|a| a.summary.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or("*No summary available.*");
    write!(out, "**<1. Summary target company status>**\n\n{summary}\n\n")?;

    let (customers, suppliers, competitors, partners) = match analysis {
        Some(a) => (
            a.related.customers.as_slice(),
            a.related.suppliers.as_slice(),
            a.related.competitors.as_slice(),
            a.related.partners.as_slice(),
        ),
        None => (&[][..], &[][..], &[][..], &[][..]),
    };

    out.push_str("**<2. Supply chain analysis - vertical>**\n\n");
    out.push_str("*Analysis of upstream suppliers and downstream customers in the value chain.*\n\n");
    push_group(&mut out, "**Key Customers (Downstream):**", customers, MAX_VERTICAL_ENTRIES, NO_CUSTOMERS)?;
    push_group(&mut out, "**Key Suppliers (Upstream):**", suppliers, MAX_VERTICAL_ENTRIES, NO_SUPPLIERS)?;

    out.push_str("**<3. Supply chain analysis - horizontal>**\n\n");
    out.push_str("*Analysis of competitors and partners in the same industry segment.*\n\n");
    push_group(&mut out, "**Main Competitors:**", competitors, MAX_HORIZONTAL_ENTRIES, NO_COMPETITORS)?;
    push_group(&mut out, "**Strategic Partners:**", partners, MAX_HORIZONTAL_ENTRIES, NO_PARTNERS)?;

    Ok(out.trim_end().to_string())
}

fn push_group(
    out: &mut String,
    heading: &str,
    entries: &[RelatedCompany],
    cap: usize,
    empty_sentence: &str,
) -> fmt::Result {
    if entries.is_empty() {
        return write!(out, "{empty_sentence}\n\n");
    }

    write!(out, "{heading}\n\n")?;
    for entry in entries.iter().take(cap) {
        push_entry(out, entry)?;
    }
    out.push('\n');
    Ok(())
}

fn push_entry(out: &mut String, entry: &RelatedCompany) -> fmt::Result {
    let company = &entry.company;
    writeln!(out, "- **{}** ({}, {})", company.name, company.country, company.category)?;
    if !company.tags.is_empty() {
        writeln!(out, "  - *Tags:* {}", company.tags.join(", "))?;
    }
    if let Some(description) = &entry.relationship_description {
        writeln!(out, "  - {description}")?;
    }
    Ok(())
}
