use async_trait::async_trait;
use crate::{AnalysisError, HistoricalDataPoint};

/// Supplier of per-period financial history for a company.
///
/// Implementations return points most-recent-first.
#[async_trait]
pub trait FinancialDataSource: Send + Sync {
    async fn fetch_history(
        &self,
        company_id: &str,
    ) -> Result<Vec<HistoricalDataPoint>, AnalysisError>;
}
