//! Business-cycle phase detection
//!
//! Scores a short most-recent-first history of growth and margin figures,
//! classifies the company's current cycle phase with an ordered decision
//! table, and annotates the result with sector patterns, long-run trends and
//! a phase-conditioned outlook.

pub mod classifier;
pub mod detector;
pub mod indicators;
pub mod narrative;
pub mod patterns;
pub mod trends;
pub mod types;

pub use classifier::CyclePhaseClassifier;
pub use detector::{CycleDetectionInput, CycleDetectionResult, CycleDetector};
pub use indicators::CycleIndicatorAnalyzer;
pub use narrative::{build_narrative, CycleNarrative};
pub use patterns::{sector_patterns, SectorPattern, SectorPatterns};
pub use trends::{analyze_cycle_trends, CycleTrends, OverallTrend, PhaseTransition, RiskLevel};
pub use types::{
    BankIndicators, CycleClassification, CycleIndicators, CyclePhase, GrowthTrend, MarginTrend,
    PhaseStrength,
};
