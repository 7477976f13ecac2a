//! Accuracy checks for calculated financial ratios.
//!
//! Ratios are compared against reference values (`accuracy`), tracked per
//! company (`framework`), rolled up into a scorecard (`report`) and
//! reconciled across independent data providers (`cross_source`).

pub mod accuracy;
pub mod cross_source;
pub mod framework;
pub mod report;

pub use accuracy::{
    validate_calculation_accuracy, AccuracyResult, AccuracyValidator, CriticalError,
    CriticalErrorType, DetailedError, FailedValidation, Severity, Tolerances,
};
pub use cross_source::{
    validate_cross_data_sources, CrossValidationResult, CrossValidationSource, MetricConsensus,
    OutlierSource,
};
pub use framework::{TargetValidation, ValidationFramework, ValidationTarget};
pub use report::{create_validation_report, CompanySummary, ReportSettings, ValidationReport};
