use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use validation::{ReportSettings, Tolerances};

const BUNDLED_FIXTURE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/sample_companies.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub fixture_path: PathBuf,

    // Accuracy tolerances (relative deviation)
    pub strict_tolerance: f64,             // 0.01
    pub normal_tolerance: f64,             // 0.05
    pub loose_tolerance: f64,              // 0.10

    // Report thresholds
    pub target_accuracy: f64,              // 0.95
    pub min_companies: usize,              // 3
    pub performance_budget_ms: f64,        // 50ms per company

    pub pretty_output: bool,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            fixture_path: env::var("CYCLE_FIXTURE_PATH")
                .unwrap_or_else(|_| BUNDLED_FIXTURE.to_string())
                .into(),

            strict_tolerance: env::var("STRICT_TOLERANCE")
                .unwrap_or_else(|_| "0.01".to_string())
                .parse()
                .context("STRICT_TOLERANCE must be a number")?,
            normal_tolerance: env::var("NORMAL_TOLERANCE")
                .unwrap_or_else(|_| "0.05".to_string())
                .parse()
                .context("NORMAL_TOLERANCE must be a number")?,
            loose_tolerance: env::var("LOOSE_TOLERANCE")
                .unwrap_or_else(|_| "0.10".to_string())
                .parse()
                .context("LOOSE_TOLERANCE must be a number")?,

            target_accuracy: env::var("TARGET_ACCURACY")
                .unwrap_or_else(|_| "0.95".to_string())
                .parse()?,
            min_companies: env::var("MIN_COMPANIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            performance_budget_ms: env::var("PERFORMANCE_BUDGET_MS")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,

            pretty_output: env::var("PRETTY_OUTPUT")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let tiers = [self.strict_tolerance, self.normal_tolerance, self.loose_tolerance];
        if tiers.iter().any(|t| !t.is_finite() || *t < 0.0) {
            anyhow::bail!("Tolerances must be non-negative, got {:?}", tiers);
        }
        if !(0.0..=1.0).contains(&self.target_accuracy) {
            anyhow::bail!("TARGET_ACCURACY must be within 0..=1, got {}", self.target_accuracy);
        }
        if !self.performance_budget_ms.is_finite() || self.performance_budget_ms <= 0.0 {
            anyhow::bail!(
                "PERFORMANCE_BUDGET_MS must be a positive number, got {}",
                self.performance_budget_ms
            );
        }
        Ok(())
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            strict: self.strict_tolerance,
            normal: self.normal_tolerance,
            loose: self.loose_tolerance,
        }
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            target_accuracy: self.target_accuracy,
            min_companies: self.min_companies,
            performance_budget_ms: self.performance_budget_ms,
        }
    }
}
