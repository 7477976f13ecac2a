use serde::{Deserialize, Serialize};

/// Direction of a growth series, recent window against older periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrend {
    Accelerating,
    Stable,
    Declining,
}

/// Direction of operating margins, recent window against older periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTrend {
    Improving,
    Stable,
    Declining,
}

/// Business-cycle phase classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Revenue and margins growing together
    Expansion,

    /// Shrinking growth with deteriorating fundamentals
    Contraction,

    /// Weak composite, direction not yet established
    Transition,

    /// Steady state, neither expanding nor contracting
    Stable,
}

impl CyclePhase {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            CyclePhase::Expansion => "Expansion",
            CyclePhase::Contraction => "Contraction",
            CyclePhase::Transition => "Transition",
            CyclePhase::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStrength {
    Weak,
    Moderate,
    Strong,
}

impl PhaseStrength {
    pub fn name(&self) -> &'static str {
        match self {
            PhaseStrength::Weak => "Weak",
            PhaseStrength::Moderate => "Moderate",
            PhaseStrength::Strong => "Strong",
        }
    }
}

/// Bank-only sub-scores (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankIndicators {
    pub nim_score: f64,
    pub profitability_score: f64,
}

/// Normalized indicator scores derived from a history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleIndicators {
    /// 0-100
    pub growth_score: f64,
    pub revenue_growth_trend: GrowthTrend,
    pub profit_growth_trend: GrowthTrend,

    /// 0-100
    pub efficiency_score: f64,

    /// 0.0 to 1.0 (1.0 = perfectly stable margins)
    pub margin_stability: f64,
    pub margin_trend: MarginTrend,

    /// 0-100
    pub liquidity_score: f64,

    /// 0-100
    pub sector_specific_score: f64,

    pub bank_indicators: Option<BankIndicators>,
}

impl CycleIndicators {
    /// Scores used when the history is too short to say anything.
    pub fn neutral() -> Self {
        Self {
            growth_score: 30.0,
            revenue_growth_trend: GrowthTrend::Stable,
            profit_growth_trend: GrowthTrend::Stable,
            efficiency_score: 50.0,
            margin_stability: 0.5,
            margin_trend: MarginTrend::Stable,
            liquidity_score: 50.0,
            sector_specific_score: 50.0,
            bank_indicators: None,
        }
    }
}

/// The phase decision for one history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleClassification {
    pub current_phase: CyclePhase,
    pub phase_strength: PhaseStrength,
    /// 0.0 to 1.0
    pub confidence: f64,
    /// Periods covered by the window, capped at 3. Not a run-length count.
    pub duration_in_phase: usize,
    /// 0.0 to 1.0
    pub sustainability_score: f64,
    pub composite_score: f64,
    pub indicators: CycleIndicators,
}
