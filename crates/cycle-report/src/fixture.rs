use std::collections::BTreeMap;
use std::path::Path;

use analysis_core::{CompanyInfo, HistoricalDataPoint, SectorMetrics};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use validation::CrossValidationSource;

/// Companies to analyze in one report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFixture {
    pub companies: Vec<CompanyFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyFixture {
    pub company_id: String,
    pub company_info: CompanyInfo,
    pub current_quarter: String,
    /// Most recent first
    pub historical_data: Vec<HistoricalDataPoint>,
    /// Published reference ratios
    pub expected_ratios: BTreeMap<String, f64>,
    /// Overrides the ratios derived from the latest period
    #[serde(default)]
    pub actual_ratios: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub sources: Vec<SourceFixture>,
}

/// One provider's view of the company's ratios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFixture {
    pub source: String,
    pub ratios: BTreeMap<String, f64>,
}

impl ReportFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl CompanyFixture {
    /// Ratios to validate: explicit overrides, else whatever the latest period supports.
    pub fn calculated_ratios(&self) -> Option<BTreeMap<String, f64>> {
        if let Some(actual) = &self.actual_ratios {
            return Some(actual.clone());
        }
        let latest = self.historical_data.first()?;
        let ratios = ratios_from_period(latest);
        (!ratios.is_empty()).then_some(ratios)
    }

    pub fn cross_sources(&self) -> Vec<CrossValidationSource> {
        self.sources
            .iter()
            .map(|s| CrossValidationSource {
                source: s.source.clone(),
                company: self.company_info.name.clone(),
                ratios: s.ratios.clone(),
            })
            .collect()
    }
}

fn ratios_from_period(point: &HistoricalDataPoint) -> BTreeMap<String, f64> {
    let mut ratios = BTreeMap::new();

    if point.revenue > 0.0 {
        ratios.insert("operatingProfitMargin".to_string(), point.operating_profit / point.revenue);
        if let Some(net_profit) = point.net_profit {
            ratios.insert("netProfitMargin".to_string(), net_profit / point.revenue);
        }
    }
    if let Some(roe) = point.roe {
        ratios.insert("roe".to_string(), roe);
    }

    match &point.sector_metrics {
        SectorMetrics::Finance(bank) => {
            if let Some(nim) = bank.nim {
                ratios.insert("nim".to_string(), nim);
            }
            if let Some(casa) = bank.casa_ratio {
                ratios.insert("casaRatio".to_string(), casa);
            }
        }
        SectorMetrics::NonFinance(ops) => {
            if let Some(current_ratio) = ops.current_ratio {
                ratios.insert("currentRatio".to_string(), current_ratio);
            }
            if let Some(debt_to_equity) = ops.debt_to_equity {
                ratios.insert("debtToEquity".to_string(), debt_to_equity);
            }
        }
    }

    ratios
}
