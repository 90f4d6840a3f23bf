//! Rule-based supply-chain narrative
//!
//! Used whenever the generation backend cannot produce the narrative. The
//! output is a pure function of the company profile and its relations.

use chainlens_core::model::{CompanyNode, RelatedCompanies, RelatedCompany};
use comfy_table::{Table, presets};
use std::collections::BTreeSet;

/// Risk flags raised by the rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskFlag {
    /// Customers sit in at most two countries
    CustomerConcentration(Vec<String>),
    /// Suppliers in both the USA and the Netherlands
    EquipmentExportControl,
    /// Customers tagged AI or HPC, first three names kept
    AiHpcDependency(Vec<String>),
}

impl RiskFlag {
    fn render(&self) -> String {
        match self {
            Self::CustomerConcentration(countries) => format!(
                "- **客戶集中度風險：** 主要客戶集中於 {}，地緣政治風險需關注。",
                countries.join(", ")
            ),
            Self::EquipmentExportControl => {
                "- **設備供應風險：** 關鍵設備供應商位於美國與荷蘭，受出口管制政策影響。".to_string()
            }
            Self::AiHpcDependency(names) => format!(
                "- **AI/HPC 依賴：** {} 為主要 AI 晶片客戶，需求週期性波動風險。",
                names.join(", ")
            ),
        }
    }
}

/// Evaluate the rule set against a company's relations
pub fn assess_risks(related: &RelatedCompanies) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    let customer_countries = countries(&related.customers);
    if !related.customers.is_empty() && customer_countries.len() <= 2 {
        flags.push(RiskFlag::CustomerConcentration(
            customer_countries.into_iter().collect(),
        ));
    }

    let supplier_countries = countries(&related.suppliers);
    if supplier_countries.contains("USA") && supplier_countries.contains("Netherlands") {
        flags.push(RiskFlag::EquipmentExportControl);
    }

    let ai_customers: Vec<String> = related
        .customers
        .iter()
        .filter(|c| c.company.has_tag_containing("HPC") || c.company.has_tag_containing("AI"))
        .take(3)
        .map(|c| c.company.name.clone())
        .collect();
    if !ai_customers.is_empty() {
        flags.push(RiskFlag::AiHpcDependency(ai_customers));
    }

    flags
}

fn countries(list: &[RelatedCompany]) -> BTreeSet<String> {
    list.iter()
        .map(|r| r.company.country.clone())
        .filter(|country| !country.is_empty())
        .collect()
}

/// Markdown narrative with relation tables and risk flags
pub fn fallback_analysis(company: &CompanyNode, related: &RelatedCompanies) -> String {
    let mut summary = format!("## 供應鏈分析：{}\n\n", company.name);
    summary.push_str(&format!("**公司國別：** {}\n", company.country));
    summary.push_str(&format!("**產業類別：** {}\n", company.category));
    summary.push_str(&format!("**標籤：** {}\n\n", company.tags.join(", ")));

    for (heading, list) in [
        ("### 主要客戶 (Customers)", &related.customers),
        ("### 主要供應商 (Suppliers)", &related.suppliers),
        ("### 合作夥伴 (Partners)", &related.partners),
    ] {
        if list.is_empty() {
            continue;
        }
        let mut table = markdown_table(vec!["公司", "國家", "類別", "關係描述"]);
        for entry in list {
            table.add_row(vec![
                entry.company.name.as_str(),
                entry.company.country.as_str(),
                entry.company.category.as_str(),
                entry.relationship_description.as_deref().unwrap_or("N/A"),
            ]);
        }
        summary.push_str(&format!("{heading}\n\n{table}\n\n"));
    }

    if !related.competitors.is_empty() {
        let mut table = markdown_table(vec!["公司", "國家", "標籤"]);
        for entry in &related.competitors {
            table.add_row(vec![
                entry.company.name.clone(),
                entry.company.country.clone(),
                entry.company.tags.join(", "),
            ]);
        }
        summary.push_str(&format!("### 主要競爭者 (Competitors)\n\n{table}\n\n"));
    }

    summary.push_str("### 風險分析\n\n");
    for flag in assess_risks(related) {
        summary.push_str(&format!("{}\n", flag.render()));
    }

    summary.push_str("\n*資料來源：supply_chain_graph.json*\n");
    summary
}

fn markdown_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN);
    table.set_header(header);
    table
}
