use std::collections::{BTreeMap, BTreeSet};

use analysis_core::stats;
use serde::{Deserialize, Serialize};

/// Relative gap under which two sources agree regardless of spread
const AGREEMENT_RELATIVE_GAP: f64 = 0.05;

/// Outlier distance and agreement band, in standard deviations
const SIGMA_BAND: f64 = 2.0;

/// Spreads at or below this are treated as constant (no outliers)
const MIN_OUTLIER_STD_DEV: f64 = 0.01;

const MAX_CONFIDENCE: f64 = 0.99;

/// Ratios for one company as reported by one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationSource {
    pub source: String,
    pub company: String,
    pub ratios: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSource {
    pub source: String,
    pub metric: String,
    pub value: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Cross-source statistics for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConsensus {
    pub metric: String,
    pub mean: f64,
    pub std_dev: f64,
    pub source_count: usize,
    pub agreeing_pairs: usize,
    pub total_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationResult {
    /// Agreeing source pairs over all compared pairs (0.0 to 1.0)
    pub source_agreement: f64,
    pub outliers: Vec<OutlierSource>,
    /// 0.0 to 0.99
    pub confidence: f64,
    pub metric_consensus: Vec<MetricConsensus>,
    pub sources_compared: usize,
}

impl CrossValidationResult {
    fn empty(sources_compared: usize) -> Self {
        Self {
            source_agreement: 0.0,
            outliers: Vec::new(),
            confidence: 0.0,
            metric_consensus: Vec::new(),
            sources_compared,
        }
    }
}

/// Measure how well independent sources agree on the same ratios.
pub fn validate_cross_data_sources(sources: &[CrossValidationSource]) -> CrossValidationResult {
    if sources.len() < 2 {
        tracing::debug!("Cross-source check needs at least 2 sources, got {}", sources.len());
        return CrossValidationResult::empty(sources.len());
    }

    let metrics: BTreeSet<&String> = sources.iter().flat_map(|s| s.ratios.keys()).collect();

    let mut outliers = Vec::new();
    let mut metric_consensus = Vec::new();
    let mut agreeing_pairs = 0usize;
    let mut total_pairs = 0usize;

    for metric in metrics {
        let reported: Vec<(&str, f64)> = sources
            .iter()
            .filter_map(|s| s.ratios.get(metric).map(|&v| (s.source.as_str(), v)))
            .filter(|(_, v)| v.is_finite())
            .collect();

        if reported.len() < 2 {
            continue;
        }

        let values: Vec<f64> = reported.iter().map(|(_, v)| *v).collect();
        let mean = stats::mean(&values);
        let std_dev = stats::population_std_dev(&values);

        let mut metric_agreeing = 0usize;
        let mut metric_pairs = 0usize;
        for i in 0..values.len() {
            for j in (i + 1)..values.len() {
                metric_pairs += 1;
                let gap = (values[i] - values[j]).abs();
                let relative_gap = if mean == 0.0 { gap } else { gap / mean.abs() };
                if gap <= SIGMA_BAND * std_dev || relative_gap <= AGREEMENT_RELATIVE_GAP {
                    metric_agreeing += 1;
                }
            }
        }

        if std_dev > MIN_OUTLIER_STD_DEV {
            for (source, value) in &reported {
                if (value - mean).abs() > SIGMA_BAND * std_dev {
                    outliers.push(OutlierSource {
                        source: source.to_string(),
                        metric: metric.clone(),
                        value: *value,
                        mean,
                        std_dev,
                    });
                }
            }
        }

        agreeing_pairs += metric_agreeing;
        total_pairs += metric_pairs;
        metric_consensus.push(MetricConsensus {
            metric: metric.clone(),
            mean,
            std_dev,
            source_count: values.len(),
            agreeing_pairs: metric_agreeing,
            total_pairs: metric_pairs,
        });
    }

    let source_agreement = if total_pairs == 0 {
        0.0
    } else {
        agreeing_pairs as f64 / total_pairs as f64
    };

    let n = sources.len() as f64;
    let outlier_sources: BTreeSet<&str> = outliers.iter().map(|o| o.source.as_str()).collect();
    let outlier_share = outlier_sources.len() as f64 / n;
    let confidence = f64::clamp(
        source_agreement * (n / 3.0) * (1.0 - outlier_share),
        0.0,
        MAX_CONFIDENCE,
    );

    if !outliers.is_empty() {
        tracing::warn!(
            "{} outlier value(s) across {} source(s)",
            outliers.len(),
            outlier_sources.len()
        );
    }

    CrossValidationResult {
        source_agreement,
        outliers,
        confidence,
        metric_consensus,
        sources_compared: sources.len(),
    }
}
