use analysis_core::{CompanyInfo, CompanyType};
use serde::{Deserialize, Serialize};

/// Sector archetype a company's cycle is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorPattern {
    Banking,
    Fmcg,
    Manufacturing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorPatterns {
    pub pattern: SectorPattern,
    /// How closely the company's cycle tracks its sector (0.0 to 1.0)
    pub sector_alignment: f64,
    pub key_patterns: Vec<String>,
    pub description: String,
}

pub fn sector_patterns(company: &CompanyInfo) -> SectorPatterns {
    let (pattern, sector_alignment, key_patterns, description) =
        match (company.company_type, company.is_fmcg()) {
            (CompanyType::Finance, _) => (
                SectorPattern::Banking,
                0.80,
                ["credit_cycle", "interest_rate_sensitivity", "deposit_mobilisation"],
                "Credit growth and margins follow the interest rate cycle",
            ),
            (CompanyType::NonFinance, true) => (
                SectorPattern::Fmcg,
                0.85,
                ["defensive_demand", "rural_urban_consumption", "festive_seasonality"],
                "Staples demand is defensive with festive-quarter seasonality",
            ),
            (CompanyType::NonFinance, false) => (
                SectorPattern::Manufacturing,
                0.75,
                ["capex_cycle", "input_cost_sensitivity", "inventory_cycle"],
                "Volumes track the capex cycle, margins track input costs",
            ),
        };

    SectorPatterns {
        pattern,
        sector_alignment,
        key_patterns: key_patterns.iter().map(|s| s.to_string()).collect(),
        description: description.to_string(),
    }
}
