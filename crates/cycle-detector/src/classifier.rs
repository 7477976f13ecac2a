use analysis_core::{CompanyType, HistoricalDataPoint};

use crate::indicators::CycleIndicatorAnalyzer;
use crate::types::{CycleClassification, CycleIndicators, CyclePhase, GrowthTrend, PhaseStrength};

/// Upper bound reported for `duration_in_phase`
const MAX_REPORTED_DURATION: usize = 3;

/// Decides the current cycle phase from indicator scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclePhaseClassifier {
    analyzer: CycleIndicatorAnalyzer,
}

impl CyclePhaseClassifier {
    pub fn new() -> Self {
        Self {
            analyzer: CycleIndicatorAnalyzer::new(),
        }
    }

    pub fn classify(
        &self,
        data: &[HistoricalDataPoint],
        company_type: CompanyType,
    ) -> CycleClassification {
        let indicators = self.analyzer.analyze(data, company_type);
        self.classify_indicators(indicators, data.len())
    }

    /// Classify precomputed indicators for a history of `periods` points.
    pub fn classify_indicators(
        &self,
        indicators: CycleIndicators,
        periods: usize,
    ) -> CycleClassification {
        let composite = Self::composite_score(&indicators);
        let (current_phase, phase_strength, confidence) =
            Self::decide_phase(composite, indicators.revenue_growth_trend);

        // Window length, not a count of consecutive periods spent in the phase
        let duration_in_phase = periods.min(MAX_REPORTED_DURATION);
        let sustainability_score = Self::sustainability_score(&indicators);

        CycleClassification {
            current_phase,
            phase_strength,
            confidence,
            duration_in_phase,
            sustainability_score,
            composite_score: composite,
            indicators,
        }
    }

    pub fn composite_score(indicators: &CycleIndicators) -> f64 {
        0.4 * indicators.growth_score
            + 0.3 * indicators.efficiency_score
            + 0.3 * indicators.sector_specific_score
    }

    /// Ordered decision table, first match wins.
    pub fn decide_phase(composite: f64, trend: GrowthTrend) -> (CyclePhase, PhaseStrength, f64) {
        use CyclePhase::{Contraction, Expansion, Transition};
        use PhaseStrength::{Moderate, Strong, Weak};

        match (composite, trend) {
            (c, GrowthTrend::Accelerating) if c >= 75.0 => (Expansion, Strong, 0.90),
            (c, t) if c >= 65.0 && t != GrowthTrend::Declining => (Expansion, Moderate, 0.80),
            (c, _) if c >= 55.0 => (Expansion, Weak, 0.75),
            (c, GrowthTrend::Declining) if c < 35.0 => (Contraction, Moderate, 0.80),
            (c, _) if c < 45.0 => (Transition, Weak, 0.60),
            _ => (CyclePhase::Stable, Moderate, 0.70),
        }
    }

    fn sustainability_score(indicators: &CycleIndicators) -> f64 {
        let mut score: f64 = 0.6;

        if indicators.margin_stability > 0.8 {
            score += 0.2;
        }
        if indicators.growth_score > 70.0 {
            score += 0.1;
        }
        if indicators.efficiency_score > 70.0 {
            score += 0.1;
        }

        score.min(1.0)
    }
}
