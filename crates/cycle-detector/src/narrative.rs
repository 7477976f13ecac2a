use analysis_core::CompanyInfo;
use serde::{Deserialize, Serialize};

use crate::types::{CyclePhase, PhaseStrength};

/// Phase-conditioned outlook text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleNarrative {
    pub outlook: String,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
}

pub fn build_narrative(
    phase: CyclePhase,
    strength: PhaseStrength,
    company: &CompanyInfo,
) -> CycleNarrative {
    let (outlook, risks, opportunities): (&str, Vec<&str>, Vec<&str>) = match (phase, strength) {
        (CyclePhase::Expansion, PhaseStrength::Strong) => (
            "Strong expansion with accelerating growth; momentum likely to persist",
            vec![
                "Capacity constraints as demand outpaces supply",
                "Valuation premium leaves little room for misses",
            ],
            vec![
                "Capacity expansion and market share gains",
                "Operating leverage lifting margins",
            ],
        ),
        (CyclePhase::Expansion, PhaseStrength::Moderate) => (
            "Healthy expansion with steady growth and stable margins",
            vec![
                "Input cost inflation could compress margins",
                "Growth may normalise as the base effect fades",
            ],
            vec!["Premiumisation of the product mix", "Selective capacity additions"],
        ),
        (CyclePhase::Expansion, PhaseStrength::Weak) => (
            "Early or fading expansion; growth is positive but not yet broad-based",
            vec![
                "Expansion may stall if demand softens",
                "Thin margin buffer against cost shocks",
            ],
            vec!["Cost efficiencies to support margins"],
        ),
        (CyclePhase::Contraction, _) => (
            "Contraction with declining growth; earnings pressure until demand recovers",
            vec![
                "Further revenue decline",
                "Margin compression from negative operating leverage",
                "Balance sheet stress",
            ],
            vec!["Cost restructuring", "Consolidation of weaker competitors"],
        ),
        (CyclePhase::Transition, _) => (
            "Transition phase with mixed signals; the next direction is not yet clear",
            vec![
                "Signals may resolve into a contraction",
                "Elevated uncertainty in earnings estimates",
            ],
            vec!["Positioning ahead of a recovery"],
        ),
        (CyclePhase::Stable, _) => (
            "Stable operations with limited cyclical movement",
            vec!["Growth stagnation"],
            vec!["Steady cash generation", "Dividend capacity"],
        ),
    };

    let mut risk_factors: Vec<String> = risks.iter().map(|s| s.to_string()).collect();
    let mut opportunities: Vec<String> = opportunities.iter().map(|s| s.to_string()).collect();

    if company.company_type.is_finance() {
        risk_factors.push("Asset quality deterioration late in the credit cycle".to_string());
    } else if company.is_fmcg() {
        opportunities.push("Rural demand recovery".to_string());
    }

    CycleNarrative {
        outlook: outlook.to_string(),
        risk_factors,
        opportunities,
    }
}
