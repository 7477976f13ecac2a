use anyhow::{Context, Result};
use analysis_core::InMemoryDataSource;
use cycle_detector::{CycleDetectionResult, CycleDetector};
use serde::Serialize;
use validation::{
    create_validation_report, validate_cross_data_sources, CrossValidationResult,
    ValidationFramework, ValidationReport, ValidationTarget,
};

mod config;
mod fixture;

use config::ReportConfig;
use fixture::ReportFixture;

/// Cross-source reconciliation for one company
#[derive(Debug, Serialize)]
struct CompanyReconciliation {
    company: String,
    #[serde(flatten)]
    result: CrossValidationResult,
}

#[derive(Debug, Serialize)]
struct CycleReport {
    detections: Vec<CycleDetectionResult>,
    reconciliations: Vec<CompanyReconciliation>,
    validation: ValidationReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // Logs go to stderr so stdout carries only the report
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    // 2. Configuration
    let config = ReportConfig::from_env()?;
    tracing::info!("Loading companies from {}", config.fixture_path.display());

    let fixture = ReportFixture::load(&config.fixture_path)?;

    // 3. Detect, validate, reconcile
    let report = run(&config, fixture).await?;

    let output = if config.pretty_output {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{}", output);

    Ok(())
}

async fn run(config: &ReportConfig, fixture: ReportFixture) -> Result<CycleReport> {
    let mut source = InMemoryDataSource::new();
    for company in &fixture.companies {
        source.insert(company.company_id.clone(), company.historical_data.clone());
    }
    tracing::info!("Analyzing {} companies", source.len());

    let detector = CycleDetector::new();
    let mut framework = ValidationFramework::new();
    let mut detections = Vec::with_capacity(fixture.companies.len());
    let mut reconciliations = Vec::new();

    for company in &fixture.companies {
        let detection = detector
            .detect_for(
                &source,
                &company.company_id,
                company.company_info.clone(),
                company.current_quarter.clone(),
            )
            .await
            .with_context(|| format!("Cycle detection failed for {}", company.company_id))?;
        detections.push(detection);

        let mut target =
            ValidationTarget::new(company.expected_ratios.clone(), config.tolerances());
        if let Some(actual) = company.calculated_ratios() {
            target = target.with_actual(actual);
        }
        framework.add_validation_target(company.company_info.name.clone(), target);

        let sources = company.cross_sources();
        if !sources.is_empty() {
            reconciliations.push(CompanyReconciliation {
                company: company.company_info.name.clone(),
                result: validate_cross_data_sources(&sources),
            });
        }
    }

    framework.run_all_validations().await;
    let validation = create_validation_report(&framework, &config.report_settings());

    Ok(CycleReport {
        detections,
        reconciliations,
        validation,
    })
}
