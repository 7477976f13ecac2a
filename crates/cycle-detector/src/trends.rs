use analysis_core::stats;
use analysis_core::{CompanyType, HistoricalDataPoint};
use serde::{Deserialize, Serialize};

use crate::classifier::CyclePhaseClassifier;
use crate::types::CyclePhase;

/// Longest trailing window classified when tracking phase changes
const TRANSITION_WINDOW: usize = 6;

/// A window needs an older segment beyond the three recent periods,
/// otherwise its trends are always stable
const MIN_TRANSITION_WINDOW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTrend {
    Upward,
    Downward,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// A change of phase between two consecutive rolling windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Latest period of the window in which the new phase first appears
    pub period: String,
    pub from: CyclePhase,
    pub to: CyclePhase,
}

/// Long-run statistics computed from the raw history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTrends {
    pub overall_trend: OverallTrend,
    /// Standard deviation of revenue growth rates
    pub volatility: f64,
    pub risk_level: RiskLevel,
    /// 0.3 to 1.0
    pub predictability: f64,
    /// Oldest first
    pub phase_transitions: Vec<PhaseTransition>,
    /// Mean number of windows spent in a phase
    pub average_phase_duration: f64,
}

pub fn analyze_cycle_trends(
    data: &[HistoricalDataPoint],
    company_type: CompanyType,
    classifier: &CyclePhaseClassifier,
) -> CycleTrends {
    let overall_trend = overall_trend(data);

    let growth_rates: Vec<f64> = data.iter().map(|d| d.revenue_growth).collect();
    let volatility = stats::population_std_dev(&growth_rates);

    let risk_level = match overall_trend {
        _ if volatility > 0.10 => RiskLevel::High,
        OverallTrend::Downward if volatility > 0.05 => RiskLevel::High,
        OverallTrend::Downward => RiskLevel::Moderate,
        _ if volatility > 0.05 => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    };

    let predictability = f64::clamp(1.0 - 2.0 * volatility, 0.3, 1.0);

    let (phase_transitions, windows) = phase_transitions(data, company_type, classifier);
    let average_phase_duration = if windows == 0 {
        0.0
    } else {
        windows as f64 / (phase_transitions.len() + 1) as f64
    };

    CycleTrends {
        overall_trend,
        volatility,
        risk_level,
        predictability,
        phase_transitions,
        average_phase_duration,
    }
}

/// Recent half of the revenue series against the older half.
fn overall_trend(data: &[HistoricalDataPoint]) -> OverallTrend {
    if data.len() < 2 {
        return OverallTrend::Stable;
    }

    let revenues: Vec<f64> = data.iter().map(|d| d.revenue).collect();
    let (recent, older) = revenues.split_at(revenues.len() / 2);
    let recent_avg = stats::mean(recent);
    let older_avg = stats::mean(older);

    if older_avg <= 0.0 {
        return OverallTrend::Stable;
    }

    if recent_avg > older_avg * 1.1 {
        OverallTrend::Upward
    } else if recent_avg < older_avg * 0.9 {
        OverallTrend::Downward
    } else {
        OverallTrend::Stable
    }
}

/// Classify each trailing window (a period plus up to five before it, at
/// least four in total) and report every change between consecutive
/// windows, oldest first. Also returns the number of windows classified.
fn phase_transitions(
    data: &[HistoricalDataPoint],
    company_type: CompanyType,
    classifier: &CyclePhaseClassifier,
) -> (Vec<PhaseTransition>, usize) {
    if data.len() < MIN_TRANSITION_WINDOW {
        return (Vec::new(), 0);
    }

    let mut transitions = Vec::new();
    let mut previous: Option<CyclePhase> = None;
    let starts = 0..=data.len() - MIN_TRANSITION_WINDOW;
    let windows = starts.clone().count();

    for start in starts.rev() {
        let end = (start + TRANSITION_WINDOW).min(data.len());
        let phase = classifier.classify(&data[start..end], company_type).current_phase;

        if let Some(from) = previous {
            if from != phase {
                transitions.push(PhaseTransition {
                    period: data[start].period.clone(),
                    from,
                    to: phase,
                });
            }
        }
        previous = Some(phase);
    }

    (transitions, windows)
}
