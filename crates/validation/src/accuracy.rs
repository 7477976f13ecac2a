use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metrics held to the strict tolerance tier (camelCase and snake_case spellings)
const STRICT_METRICS: [&str; 5] = [
    "roe",
    "netProfitMargin",
    "operatingProfitMargin",
    "net_profit_margin",
    "operating_profit_margin",
];

/// Deviations at or below this are never flagged, whatever the tier
const NEAR_EXACT_DEVIATION: f64 = 0.01;

/// Deviation beyond which a value is treated as structurally wrong
const CRITICAL_DEVIATION: f64 = 0.5;

/// Relative deviation thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub strict: f64,
    pub normal: f64,
    pub loose: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            strict: 0.01,
            normal: 0.05,
            loose: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalErrorType {
    MissingMetric,
    ImpossibleRatioValue,
}

/// Structural problem with a metric, independent of tolerance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalError {
    pub metric: String,
    pub error_type: CriticalErrorType,
    pub value: Option<f64>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedValidation {
    pub metric: String,
    pub expected: f64,
    pub actual: f64,
    pub deviation: f64,
    pub tolerance: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedError {
    pub metric: String,
    pub expected: f64,
    pub actual: f64,
    pub deviation: f64,
    pub deviation_percent: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyResult {
    /// Share of validated metrics within their effective tolerance
    pub overall_accuracy: f64,
    /// Share of validated metrics within the strict tolerance
    pub strict_tolerance_passed: f64,
    /// Share of validated metrics within the loose tolerance
    pub loose_tolerance_passed: f64,
    pub average_deviation: f64,
    pub total_validated: usize,
    pub failed_validations: Vec<FailedValidation>,
    pub critical_errors: Vec<CriticalError>,
    pub detailed_errors: Vec<DetailedError>,
}

/// Compares computed ratios against reference values under tiered tolerances.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyValidator {
    tolerances: Tolerances,
}

impl AccuracyValidator {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn validate(
        &self,
        actual: &BTreeMap<String, f64>,
        expected: &BTreeMap<String, f64>,
    ) -> AccuracyResult {
        let mut failed_validations = Vec::new();
        let mut critical_errors = Vec::new();
        let mut detailed_errors = Vec::new();
        let mut deviations = Vec::new();
        let mut strict_passed = 0usize;
        let mut loose_passed = 0usize;

        for (metric, &expected_value) in expected {
            if !expected_value.is_finite() {
                critical_errors.push(CriticalError {
                    metric: metric.clone(),
                    error_type: CriticalErrorType::MissingMetric,
                    value: None,
                    message: format!("{} has no usable reference value", metric),
                });
                continue;
            }

            let actual_value = match actual.get(metric) {
                Some(&v) if v.is_finite() => v,
                _ => {
                    critical_errors.push(CriticalError {
                        metric: metric.clone(),
                        error_type: CriticalErrorType::MissingMetric,
                        value: None,
                        message: format!("{} is missing from the calculated ratios", metric),
                    });
                    continue;
                }
            };

            let deviation = Self::deviation(actual_value, expected_value);
            deviations.push(deviation);

            if deviation <= self.tolerances.strict {
                strict_passed += 1;
            }
            if deviation <= self.tolerances.loose {
                loose_passed += 1;
            }

            let strict_metric = Self::is_strict_metric(metric);
            let mut tolerance = if strict_metric {
                self.tolerances.strict
            } else {
                self.tolerances.normal
            };
            if deviation <= NEAR_EXACT_DEVIATION {
                tolerance = tolerance.max(NEAR_EXACT_DEVIATION);
            }

            critical_errors.extend(Self::impossible_value_checks(metric, actual_value, deviation));

            if deviation > tolerance {
                failed_validations.push(FailedValidation {
                    metric: metric.clone(),
                    expected: expected_value,
                    actual: actual_value,
                    deviation,
                    tolerance,
                    severity: if strict_metric { Severity::High } else { Severity::Medium },
                });
                detailed_errors.push(DetailedError {
                    metric: metric.clone(),
                    expected: expected_value,
                    actual: actual_value,
                    deviation,
                    deviation_percent: deviation * 100.0,
                    recommendation: Self::recommendation(metric, deviation),
                });
            }
        }

        let total_validated = deviations.len();
        let ratio = |count: usize| {
            if total_validated == 0 {
                0.0
            } else {
                count as f64 / total_validated as f64
            }
        };

        let overall_accuracy = ratio(total_validated - failed_validations.len());
        let strict_tolerance_passed = ratio(strict_passed);
        let loose_tolerance_passed = ratio(loose_passed);
        let average_deviation = analysis_core::stats::mean(&deviations);

        tracing::debug!(
            "Validated {} metrics: accuracy {:.3}, {} failed, {} critical",
            total_validated,
            overall_accuracy,
            failed_validations.len(),
            critical_errors.len()
        );

        AccuracyResult {
            overall_accuracy,
            strict_tolerance_passed,
            loose_tolerance_passed,
            average_deviation,
            total_validated,
            failed_validations,
            critical_errors,
            detailed_errors,
        }
    }

    /// Relative deviation, or absolute difference when the reference is zero.
    fn deviation(actual: f64, expected: f64) -> f64 {
        let absolute_difference = (actual - expected).abs();
        if expected == 0.0 {
            absolute_difference
        } else {
            absolute_difference / expected.abs()
        }
    }

    fn is_strict_metric(metric: &str) -> bool {
        STRICT_METRICS.contains(&metric)
    }

    fn impossible_value_checks(metric: &str, value: f64, deviation: f64) -> Vec<CriticalError> {
        let lower = metric.to_ascii_lowercase();
        let mut errors = Vec::new();
        let mut flag = |message: String| {
            errors.push(CriticalError {
                metric: metric.to_string(),
                error_type: CriticalErrorType::ImpossibleRatioValue,
                value: Some(value),
                message,
            });
        };

        if lower.contains("margin") && value < -0.5 {
            flag(format!("{} of {:.4} implies losses above half of revenue", metric, value));
        }
        if lower == "roe" && !(-0.5..=1.0).contains(&value) {
            flag(format!("ROE of {:.4} is outside the plausible range [-0.5, 1.0]", value));
        }
        if !(-1.0..=10.0).contains(&value) {
            flag(format!(
                "{} of {:.4} is outside the plausible ratio range [-1, 10]",
                metric, value
            ));
        }
        if deviation > CRITICAL_DEVIATION {
            flag(format!("{} deviates {:.1}% from the reference value", metric, deviation * 100.0));
        }

        errors
    }

    fn recommendation(metric: &str, deviation: f64) -> String {
        let pct = deviation * 100.0;
        if deviation > 0.5 {
            format!(
                "Critical: {} is off by {:.1}%. Check inputs and formula for unit or sign errors",
                metric, pct
            )
        } else if deviation > 0.1 {
            format!(
                "Significant: {} is off by {:.1}%. Review the method and period alignment",
                metric, pct
            )
        } else if deviation > 0.05 {
            format!(
                "Moderate: {} is off by {:.1}%. Check rounding and balance sheet averaging",
                metric, pct
            )
        } else {
            format!("Minor: {} is off by {:.1}%. Likely a rounding difference", metric, pct)
        }
    }
}

/// Validate `actual` ratios against `expected` reference ratios.
pub async fn validate_calculation_accuracy(
    actual: &BTreeMap<String, f64>,
    expected: &BTreeMap<String, f64>,
    tolerances: Tolerances,
) -> AccuracyResult {
    AccuracyValidator::new(tolerances).validate(actual, expected)
}
