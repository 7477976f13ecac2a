use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::framework::ValidationFramework;

const ACCURACY_WEIGHT: f64 = 0.5;
const PERFORMANCE_WEIGHT: f64 = 0.3;
const RELIABILITY_WEIGHT: f64 = 0.2;

/// Points deducted from reliability per unresolved critical error
const CRITICAL_PENALTY: f64 = 10.0;
const RELIABILITY_FLOOR: f64 = 50.0;

/// Report thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Accuracy (0.0 to 1.0) below which a recommendation is raised
    pub target_accuracy: f64,
    /// Minimum number of validated companies for adequate coverage
    pub min_companies: usize,
    /// Mean per-target validation time considered full performance
    pub performance_budget_ms: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            target_accuracy: 0.95,
            min_companies: 3,
            performance_budget_ms: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    pub overall_accuracy: f64,
    pub failed_validations: usize,
    pub critical_errors: usize,
    pub self_check: bool,
}

/// Aggregate validation scorecard (scores 0-100)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub overall_score: f64,
    pub accuracy_score: f64,
    pub performance_score: f64,
    pub reliability_score: f64,
    pub companies_validated: usize,
    pub critical_failures: usize,
    pub company_summaries: Vec<CompanySummary>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

pub fn create_validation_report(
    framework: &ValidationFramework,
    settings: &ReportSettings,
) -> ValidationReport {
    let results = framework.results();

    let overall_accuracy = framework.overall_accuracy();
    let accuracy_score = overall_accuracy * 100.0;

    let durations: Vec<f64> = results.iter().map(|r| r.duration_ms).collect();
    let mean_duration = analysis_core::stats::mean(&durations);
    let budget = settings.performance_budget_ms;
    let performance_score = if !budget.is_finite() || budget <= 0.0 {
        // No usable budget means no performance credit
        0.0
    } else if mean_duration <= 0.0 {
        100.0
    } else {
        f64::clamp(100.0 * budget / mean_duration, 0.0, 100.0)
    };

    let critical_failures: usize = results.iter().map(|r| r.result.critical_errors.len()).sum();
    let reliability_score = f64::max(
        RELIABILITY_FLOOR,
        100.0 - CRITICAL_PENALTY * critical_failures as f64,
    );

    let overall_score = accuracy_score * ACCURACY_WEIGHT
        + performance_score * PERFORMANCE_WEIGHT
        + reliability_score * RELIABILITY_WEIGHT;

    let company_summaries: Vec<CompanySummary> = results
        .iter()
        .map(|r| CompanySummary {
            name: r.name.clone(),
            overall_accuracy: r.result.overall_accuracy,
            failed_validations: r.result.failed_validations.len(),
            critical_errors: r.result.critical_errors.len(),
            self_check: r.self_check,
        })
        .collect();

    let mut recommendations = Vec::new();

    if overall_accuracy < settings.target_accuracy {
        let weakest: Vec<&str> = company_summaries
            .iter()
            .filter(|c| c.overall_accuracy < settings.target_accuracy)
            .map(|c| c.name.as_str())
            .collect();
        let mut message = format!(
            "Overall accuracy {:.1}% is below the {:.0}% target",
            accuracy_score,
            settings.target_accuracy * 100.0
        );
        if !weakest.is_empty() {
            message.push_str(&format!("; review failed metrics for {}", weakest.join(", ")));
        }
        recommendations.push(message);
    }

    if critical_failures > 0 {
        recommendations.push(format!(
            "Resolve {} critical validation failure(s) before relying on these calculations",
            critical_failures
        ));
    }

    if results.len() < settings.min_companies {
        recommendations.push(format!(
            "Validate at least {} companies for adequate sector coverage (currently {})",
            settings.min_companies,
            results.len()
        ));
    }

    tracing::info!(
        "Validation report: score {:.1} (accuracy {:.1}, performance {:.1}, reliability {:.1})",
        overall_score,
        accuracy_score,
        performance_score,
        reliability_score
    );

    ValidationReport {
        overall_score,
        accuracy_score,
        performance_score,
        reliability_score,
        companies_validated: results.len(),
        critical_failures,
        company_summaries,
        recommendations,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::accuracy::Tolerances;
    use crate::framework::ValidationTarget;

    fn ratios(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn checked(expected: BTreeMap<String, f64>, actual: BTreeMap<String, f64>) -> ValidationTarget {
        ValidationTarget::new(expected, Tolerances::default()).with_actual(actual)
    }

    fn generous() -> ReportSettings {
        ReportSettings {
            performance_budget_ms: 60_000.0,
            ..ReportSettings::default()
        }
    }

    #[test]
    fn test_empty_framework_report() {
        let framework = ValidationFramework::new();
        let report = create_validation_report(&framework, &ReportSettings::default());

        assert_eq!(report.accuracy_score, 0.0);
        assert_eq!(report.performance_score, 100.0);
        assert_eq!(report.reliability_score, 100.0);
        assert!((report.overall_score - 50.0).abs() < 1e-9);
        assert_eq!(report.recommendations.len(), 2);
        assert!(report.recommendations[1].contains("at least 3 companies"));
    }

    #[tokio::test]
    async fn test_perfect_coverage_has_no_recommendations() {
        let mut framework = ValidationFramework::new();
        for name in ["Emami", "HDFC Bank", "Tata Steel"] {
            let expected = ratios(&[("roe", 0.2), ("currentRatio", 1.5)]);
            framework.add_validation_target(name, checked(expected.clone(), expected));
        }
        framework.run_all_validations().await;

        let report = create_validation_report(&framework, &generous());

        assert_eq!(report.accuracy_score, 100.0);
        assert_eq!(report.performance_score, 100.0);
        assert!((report.overall_score - 100.0).abs() < 1e-9);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.company_summaries.len(), 3);
    }

    #[tokio::test]
    async fn test_critical_failures_reduce_reliability_with_floor() {
        let mut framework = ValidationFramework::new();
        let uniform = |value: f64| -> BTreeMap<String, f64> {
            (0..7).map(|i| (format!("ratio{}", i), value)).collect()
        };
        framework.add_validation_target("Broken", checked(uniform(1.0), uniform(2.0)));
        framework.run_all_validations().await;

        let report = create_validation_report(&framework, &generous());

        assert_eq!(report.critical_failures, 7);
        assert_eq!(report.reliability_score, 50.0);
        assert_eq!(report.accuracy_score, 0.0);
        assert!(report.recommendations.iter().any(|r| r.contains("below the 95% target")));
        assert!(report.recommendations.iter().any(|r| r.contains("7 critical")));
    }

    #[tokio::test]
    async fn test_scores_stay_in_range_for_unusable_budget() {
        let mut framework = ValidationFramework::new();
        let expected = ratios(&[("roe", 0.2)]);
        framework.add_validation_target("Emami", checked(expected.clone(), expected));
        framework.run_all_validations().await;

        for budget in [-5.0, 0.0, f64::NAN, f64::INFINITY] {
            let settings = ReportSettings {
                performance_budget_ms: budget,
                ..ReportSettings::default()
            };
            let report = create_validation_report(&framework, &settings);

            assert_eq!(report.performance_score, 0.0);
            assert!((0.0..=100.0).contains(&report.overall_score));
        }
    }
}
