use serde::{Deserialize, Serialize};

/// Broad accounting family of a company. Banks and NBFCs report a different
/// set of health metrics from operating businesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    Finance,
    NonFinance,
}

impl CompanyType {
    pub fn is_finance(&self) -> bool {
        matches!(self, CompanyType::Finance)
    }
}

/// Company metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub sector: String,
    pub company_type: CompanyType,
}

impl CompanyInfo {
    pub fn new(
        name: impl Into<String>,
        sector: impl Into<String>,
        company_type: CompanyType,
    ) -> Self {
        Self {
            name: name.into(),
            sector: sector.into(),
            company_type,
        }
    }

    /// FMCG / consumer staples companies follow a tighter, defensive cycle.
    pub fn is_fmcg(&self) -> bool {
        let sector = self.sector.to_ascii_lowercase();
        sector.contains("fmcg") || sector.contains("consumer")
    }
}

/// Bank-only balance sheet metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankMetrics {
    /// Net interest margin, in percent (e.g. 3.6)
    #[serde(default)]
    pub nim: Option<f64>,
    /// Current + savings deposits as a fraction of total deposits
    #[serde(default)]
    pub casa_ratio: Option<f64>,
}

/// Working-capital metrics reported by operating (non-finance) companies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingMetrics {
    #[serde(default)]
    pub current_ratio: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    /// Days
    #[serde(default)]
    pub cash_conversion_cycle: Option<f64>,
}

/// Sector-dependent part of a period snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectorMetrics {
    Finance(BankMetrics),
    NonFinance(OperatingMetrics),
}

impl Default for SectorMetrics {
    fn default() -> Self {
        SectorMetrics::NonFinance(OperatingMetrics::default())
    }
}

/// One period's financial snapshot. Series are ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    /// Period label, e.g. "Q2FY25"
    pub period: String,
    pub revenue: f64,
    pub operating_profit: f64,
    #[serde(default)]
    pub net_profit: Option<f64>,
    /// Operating margin in percent (23.0 = 23%)
    pub operating_margin: f64,
    #[serde(default)]
    pub net_margin: Option<f64>,
    /// Return on equity as a fraction
    #[serde(default)]
    pub roe: Option<f64>,
    /// Period-over-period revenue growth as a fraction (0.06 = 6%)
    pub revenue_growth: f64,
    #[serde(default)]
    pub profit_growth: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub sector_metrics: SectorMetrics,
}

impl HistoricalDataPoint {
    /// Snapshot with the required figures; operating profit is derived from the margin.
    pub fn new(
        period: impl Into<String>,
        revenue: f64,
        operating_margin: f64,
        revenue_growth: f64,
    ) -> Self {
        Self {
            period: period.into(),
            revenue,
            operating_profit: revenue * operating_margin / 100.0,
            net_profit: None,
            operating_margin,
            net_margin: None,
            roe: None,
            revenue_growth,
            profit_growth: None,
            market_cap: None,
            sector_metrics: SectorMetrics::default(),
        }
    }

    pub fn with_sector_metrics(mut self, sector_metrics: SectorMetrics) -> Self {
        self.sector_metrics = sector_metrics;
        self
    }

    pub fn with_roe(mut self, roe: f64) -> Self {
        self.roe = Some(roe);
        self
    }

    pub fn with_profit_growth(mut self, profit_growth: f64) -> Self {
        self.profit_growth = Some(profit_growth);
        self
    }

    /// Required figures are all finite numbers.
    pub fn is_finite(&self) -> bool {
        self.revenue.is_finite()
            && self.operating_profit.is_finite()
            && self.operating_margin.is_finite()
            && self.revenue_growth.is_finite()
    }

    pub fn nim(&self) -> Option<f64> {
        match &self.sector_metrics {
            SectorMetrics::Finance(bank) => bank.nim,
            SectorMetrics::NonFinance(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmcg_detection_is_case_insensitive() {
        let emami = CompanyInfo::new("Emami", "FMCG", CompanyType::NonFinance);
        let dabur = CompanyInfo::new("Dabur", "Consumer Staples", CompanyType::NonFinance);
        let tata = CompanyInfo::new("Tata Steel", "Metals", CompanyType::NonFinance);

        assert!(emami.is_fmcg());
        assert!(dabur.is_fmcg());
        assert!(!tata.is_fmcg());
    }

    #[test]
    fn test_sector_metrics_tagged_json() {
        let json = r#"{
            "period": "Q1FY25",
            "revenue": 1000.0,
            "operating_profit": 40.0,
            "operating_margin": 4.0,
            "revenue_growth": 0.14,
            "sector_metrics": { "kind": "finance", "nim": 3.6 }
        }"#;

        let point: HistoricalDataPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.nim(), Some(3.6));
        assert_eq!(point.roe, None);
    }

    #[test]
    fn test_sector_metrics_default_to_non_finance() {
        let json = r#"{
            "period": "Q1FY25",
            "revenue": 900.0,
            "operating_profit": 207.0,
            "operating_margin": 23.0,
            "revenue_growth": 0.06
        }"#;

        let point: HistoricalDataPoint = serde_json::from_str(json).unwrap();
        assert!(matches!(point.sector_metrics, SectorMetrics::NonFinance(_)));
        assert_eq!(point.nim(), None);
    }
}
