use analysis_core::{AnalysisError, CompanyInfo, FinancialDataSource, HistoricalDataPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::CyclePhaseClassifier;
use crate::narrative::build_narrative;
use crate::patterns::{sector_patterns, SectorPatterns};
use crate::trends::{analyze_cycle_trends, CycleTrends};
use crate::types::{CycleIndicators, CyclePhase, PhaseStrength};

/// Everything needed to place one company in its cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleDetectionInput {
    /// Most recent first
    pub historical_data: Vec<HistoricalDataPoint>,
    pub company_info: CompanyInfo,
    pub current_quarter: String,
}

/// Cycle detection result with confidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleDetectionResult {
    pub company: String,
    pub current_quarter: String,
    pub current_phase: CyclePhase,
    pub phase_strength: PhaseStrength,
    pub confidence: f64,
    pub duration_in_phase: usize,
    pub sustainability_score: f64,
    /// 0.0 to 1.0
    pub data_quality: f64,
    pub indicators: CycleIndicators,
    pub sector_patterns: SectorPatterns,
    pub trends: CycleTrends,
    pub outlook: String,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Wires indicator analysis, phase classification and the narrative together.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleDetector {
    classifier: CyclePhaseClassifier,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self {
            classifier: CyclePhaseClassifier::new(),
        }
    }

    pub fn detect(&self, input: &CycleDetectionInput) -> CycleDetectionResult {
        let data = &input.historical_data;
        let company = &input.company_info;

        if data.len() < 2 {
            tracing::warn!(
                "{}: only {} period(s) of history, cycle phase falls back to neutral indicators",
                company.name,
                data.len()
            );
        }

        let classification = self.classifier.classify(data, company.company_type);
        let data_quality = Self::data_quality(data);
        let patterns = sector_patterns(company);
        let trends = analyze_cycle_trends(data, company.company_type, &self.classifier);
        let narrative = build_narrative(
            classification.current_phase,
            classification.phase_strength,
            company,
        );

        tracing::info!(
            "{} {}: {} ({}, confidence {:.2}, composite {:.1}, data quality {:.2})",
            company.name,
            input.current_quarter,
            classification.current_phase.name(),
            classification.phase_strength.name(),
            classification.confidence,
            classification.composite_score,
            data_quality
        );

        CycleDetectionResult {
            company: company.name.clone(),
            current_quarter: input.current_quarter.clone(),
            current_phase: classification.current_phase,
            phase_strength: classification.phase_strength,
            confidence: classification.confidence,
            duration_in_phase: classification.duration_in_phase,
            sustainability_score: classification.sustainability_score,
            data_quality,
            indicators: classification.indicators,
            sector_patterns: patterns,
            trends,
            outlook: narrative.outlook,
            risk_factors: narrative.risk_factors,
            opportunities: narrative.opportunities,
            analyzed_at: Utc::now(),
        }
    }

    /// Fetch history through `source`, then detect.
    pub async fn detect_for(
        &self,
        source: &dyn FinancialDataSource,
        company_id: &str,
        company_info: CompanyInfo,
        current_quarter: impl Into<String>,
    ) -> Result<CycleDetectionResult, AnalysisError> {
        let historical_data = source.fetch_history(company_id).await?;

        Ok(self.detect(&CycleDetectionInput {
            historical_data,
            company_info,
            current_quarter: current_quarter.into(),
        }))
    }

    /// How much the history can be trusted, independent of the phase decision.
    pub fn data_quality(data: &[HistoricalDataPoint]) -> f64 {
        let mut quality: f64 = 0.7;

        if data.len() >= 5 {
            quality += 0.1;
        }
        if data.len() >= 8 {
            quality += 0.1;
        }
        if !data.is_empty() && data.iter().all(|d| d.revenue > 0.0) {
            quality += 0.1;
        }

        quality.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{CompanyType, InMemoryDataSource};

    fn emami_input() -> CycleDetectionInput {
        CycleDetectionInput {
            historical_data: vec![
                HistoricalDataPoint::new("Q2FY25", 891.0, 23.0, 0.062),
                HistoricalDataPoint::new("Q1FY25", 865.0, 23.0, 0.058),
                HistoricalDataPoint::new("Q4FY24", 838.0, 23.0, 0.064),
            ],
            company_info: CompanyInfo::new("Emami", "FMCG", CompanyType::NonFinance),
            current_quarter: "Q2FY25".to_string(),
        }
    }

    #[test]
    fn test_emami_detection_agrees_with_classifier() {
        let input = emami_input();
        let result = CycleDetector::new().detect(&input);
        let company_type = input.company_info.company_type;
        let classification =
            CyclePhaseClassifier::new().classify(&input.historical_data, company_type);

        assert_eq!(result.current_phase, CyclePhase::Expansion);
        assert_eq!(result.current_phase, classification.current_phase);
        assert!(result.confidence > 0.75);
        assert_eq!(result.company, "Emami");
        assert_eq!(result.sector_patterns.pattern, crate::SectorPattern::Fmcg);
        assert!(!result.outlook.is_empty());
        assert!(result.opportunities.iter().any(|o| o.contains("Rural")));
    }

    #[test]
    fn test_data_quality_tiers() {
        let points = |n: usize, revenue: f64| -> Vec<HistoricalDataPoint> {
            (0..n)
                .map(|i| HistoricalDataPoint::new(format!("P{}", i), revenue, 20.0, 0.05))
                .collect()
        };

        assert!((CycleDetector::data_quality(&points(3, 100.0)) - 0.8).abs() < 1e-9);
        assert!((CycleDetector::data_quality(&points(5, 100.0)) - 0.9).abs() < 1e-9);
        assert!((CycleDetector::data_quality(&points(8, 100.0)) - 1.0).abs() < 1e-9);
        assert!((CycleDetector::data_quality(&points(8, 0.0)) - 0.9).abs() < 1e-9);
        assert!((CycleDetector::data_quality(&[]) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_never_fails() {
        let input = CycleDetectionInput {
            historical_data: vec![],
            company_info: CompanyInfo::new("New Listing", "Chemicals", CompanyType::NonFinance),
            current_quarter: "Q1FY26".to_string(),
        };
        let result = CycleDetector::new().detect(&input);

        assert_eq!(result.current_phase, CyclePhase::Transition);
        assert_eq!(result.indicators, CycleIndicators::neutral());
        assert!(result.trends.phase_transitions.is_empty());
    }

    #[tokio::test]
    async fn test_detect_for_uses_injected_source() {
        let mut source = InMemoryDataSource::new();
        source.insert("emami", emami_input().historical_data);
        let detector = CycleDetector::new();

        let result = detector
            .detect_for(&source, "emami", emami_input().company_info, "Q2FY25")
            .await
            .unwrap();
        assert_eq!(result.current_phase, CyclePhase::Expansion);

        let missing = detector
            .detect_for(&source, "dabur", emami_input().company_info, "Q2FY25")
            .await;
        assert!(matches!(missing, Err(AnalysisError::NotFound(_))));
    }
}
