use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::accuracy::{validate_calculation_accuracy, AccuracyResult, Tolerances};

/// Reference ratios for one company, with optional calculated values to check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationTarget {
    pub expected_ratios: BTreeMap<String, f64>,
    /// When absent the target is validated against itself
    #[serde(default)]
    pub actual_ratios: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub tolerances: Tolerances,
}

impl ValidationTarget {
    pub fn new(expected_ratios: BTreeMap<String, f64>, tolerances: Tolerances) -> Self {
        Self {
            expected_ratios,
            actual_ratios: None,
            tolerances,
        }
    }

    pub fn with_actual(mut self, actual_ratios: BTreeMap<String, f64>) -> Self {
        self.actual_ratios = Some(actual_ratios);
        self
    }
}

/// Outcome of validating one registered target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetValidation {
    pub name: String,
    pub result: AccuracyResult,
    /// True when no calculated ratios were supplied
    pub self_check: bool,
    pub duration_ms: f64,
}

/// Registry of validation targets and their latest results.
///
/// Not synchronized: share across tasks only behind a lock.
#[derive(Debug, Clone, Default)]
pub struct ValidationFramework {
    targets: Vec<(String, ValidationTarget)>,
    results: Vec<TargetValidation>,
}

impl ValidationFramework {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validation_target(&mut self, name: impl Into<String>, target: ValidationTarget) {
        self.targets.push((name.into(), target));
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Validate every registered target, replacing any earlier results.
    pub async fn run_all_validations(&mut self) -> &[TargetValidation] {
        let mut results = Vec::with_capacity(self.targets.len());

        for (name, target) in &self.targets {
            let started = Instant::now();

            let (actual, self_check) = match &target.actual_ratios {
                Some(actual) => (actual, false),
                None => {
                    tracing::warn!(
                        "{}: no calculated ratios supplied, \
                         validating expected ratios against themselves",
                        name
                    );
                    (&target.expected_ratios, true)
                }
            };

            let result =
                validate_calculation_accuracy(actual, &target.expected_ratios, target.tolerances)
                    .await;
            let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

            results.push(TargetValidation {
                name: name.clone(),
                result,
                self_check,
                duration_ms,
            });
        }

        tracing::info!(
            "Validated {} targets, overall accuracy {:.3}",
            results.len(),
            Self::mean_accuracy(&results)
        );

        self.results = results;
        &self.results
    }

    pub fn results(&self) -> &[TargetValidation] {
        &self.results
    }

    /// Mean of per-target accuracy, 0.0 before any run.
    pub fn overall_accuracy(&self) -> f64 {
        Self::mean_accuracy(&self.results)
    }

    fn mean_accuracy(results: &[TargetValidation]) -> f64 {
        let accuracies: Vec<f64> = results.iter().map(|r| r.result.overall_accuracy).collect();
        analysis_core::stats::mean(&accuracies)
    }
}
