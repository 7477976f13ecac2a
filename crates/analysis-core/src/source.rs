use std::collections::HashMap;

use async_trait::async_trait;

use crate::{AnalysisError, FinancialDataSource, HistoricalDataPoint};

/// Data source backed by a map of preloaded histories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    histories: HashMap<String, Vec<HistoricalDataPoint>>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, company_id: impl Into<String>, history: Vec<HistoricalDataPoint>) {
        self.histories.insert(company_id.into(), history);
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

#[async_trait]
impl FinancialDataSource for InMemoryDataSource {
    async fn fetch_history(
        &self,
        company_id: &str,
    ) -> Result<Vec<HistoricalDataPoint>, AnalysisError> {
        let history = self.histories.get(company_id).ok_or_else(|| {
            AnalysisError::NotFound(format!("no history for company {}", company_id))
        })?;

        if let Some(bad) = history.iter().find(|d| !d.is_finite()) {
            return Err(AnalysisError::InvalidData(format!(
                "{} period {} has non-finite figures",
                company_id, bad.period
            )));
        }

        tracing::debug!("Loaded {} periods for {}", history.len(), company_id);
        Ok(history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_known_company() {
        let mut source = InMemoryDataSource::new();
        source.insert("emami", vec![HistoricalDataPoint::new("Q2FY25", 950.0, 23.0, 0.06)]);

        let history = source.fetch_history("emami").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].period, "Q2FY25");
    }

    #[tokio::test]
    async fn test_fetch_unknown_company_is_not_found() {
        let source = InMemoryDataSource::new();
        let err = source.fetch_history("missing").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_non_finite_history_is_rejected() {
        let mut source = InMemoryDataSource::new();
        source.insert(
            "broken",
            vec![
                HistoricalDataPoint::new("Q2FY25", 950.0, 23.0, 0.06),
                HistoricalDataPoint::new("Q1FY25", f64::NAN, 23.0, 0.05),
            ],
        );

        let err = source.fetch_history("broken").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidData(ref msg) if msg.contains("Q1FY25")));
    }
}
