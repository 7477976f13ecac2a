use analysis_core::stats;
use analysis_core::{CompanyType, HistoricalDataPoint, SectorMetrics};

use crate::types::{BankIndicators, CycleIndicators, GrowthTrend, MarginTrend};

/// Periods treated as the "recent" window when judging trend direction
const RECENT_WINDOW: usize = 3;

/// Hysteresis band for growth trends (fractional growth)
const GROWTH_TREND_BAND: f64 = 0.002;

/// Hysteresis band for margin trends (percentage points)
const MARGIN_TREND_BAND: f64 = 0.5;

/// Converts a most-recent-first history into normalized indicator scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleIndicatorAnalyzer;

impl CycleIndicatorAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(
        &self,
        data: &[HistoricalDataPoint],
        company_type: CompanyType,
    ) -> CycleIndicators {
        if data.len() < 2 {
            tracing::debug!("Only {} period(s) of history, using neutral indicators", data.len());
            return CycleIndicators::neutral();
        }

        let growth_rates: Vec<f64> = data.iter().map(|d| d.revenue_growth).collect();
        let avg_growth = stats::mean(&growth_rates);
        let revenue_growth_trend = Self::growth_trend(&growth_rates);

        let profit_rates: Vec<f64> = data.iter().filter_map(|d| d.profit_growth).collect();
        let profit_growth_trend = if profit_rates.len() < 2 {
            GrowthTrend::Stable
        } else {
            Self::growth_trend(&profit_rates)
        };

        let margins: Vec<f64> = data.iter().map(|d| d.operating_margin).collect();
        let margin_stability = Self::margin_stability(&margins);
        let margin_trend = Self::margin_trend(&margins);

        let growth_score = Self::growth_score(avg_growth, revenue_growth_trend);
        let efficiency_score = Self::efficiency_score(margin_stability, margin_trend);
        let liquidity_score = Self::liquidity_score(&data[0]);
        let sector_specific_score =
            Self::sector_specific_score(company_type, avg_growth, margin_stability);

        let bank_indicators = match company_type {
            CompanyType::Finance => Some(Self::bank_indicators(data)),
            CompanyType::NonFinance => None,
        };

        tracing::debug!(
            "Indicators: growth {:.1} ({:?}), efficiency {:.1}, stability {:.3}, \
             liquidity {:.1}, sector {:.1}",
            growth_score,
            revenue_growth_trend,
            efficiency_score,
            margin_stability,
            liquidity_score,
            sector_specific_score
        );

        CycleIndicators {
            growth_score,
            revenue_growth_trend,
            profit_growth_trend,
            efficiency_score,
            margin_stability,
            margin_trend,
            liquidity_score,
            sector_specific_score,
            bank_indicators,
        }
    }

    fn growth_trend(rates: &[f64]) -> GrowthTrend {
        match stats::recent_vs_older(rates, RECENT_WINDOW) {
            (recent, Some(older)) if recent > older + GROWTH_TREND_BAND => {
                GrowthTrend::Accelerating
            }
            (recent, Some(older)) if recent < older - GROWTH_TREND_BAND => GrowthTrend::Declining,
            _ => GrowthTrend::Stable,
        }
    }

    fn margin_trend(margins: &[f64]) -> MarginTrend {
        match stats::recent_vs_older(margins, RECENT_WINDOW) {
            (recent, Some(older)) if recent > older + MARGIN_TREND_BAND => MarginTrend::Improving,
            (recent, Some(older)) if recent < older - MARGIN_TREND_BAND => MarginTrend::Declining,
            _ => MarginTrend::Stable,
        }
    }

    /// `1 - variance / mean^2`, floored at 0.
    fn margin_stability(margins: &[f64]) -> f64 {
        let mean = stats::mean(margins);
        if mean == 0.0 {
            return 0.0;
        }
        let variance = stats::population_variance(margins);
        (1.0 - variance / (mean * mean)).clamp(0.0, 1.0)
    }

    fn growth_score(avg_growth: f64, trend: GrowthTrend) -> f64 {
        let mut score = 50.0;

        if avg_growth > 0.08 {
            score += 30.0;
        } else if avg_growth > 0.05 {
            score += 20.0;
        } else if avg_growth > 0.02 {
            score += 10.0;
        }

        match trend {
            GrowthTrend::Accelerating => score += 10.0,
            GrowthTrend::Declining => score -= 10.0,
            GrowthTrend::Stable => {}
        }

        f64::clamp(score, 0.0, 100.0)
    }

    fn efficiency_score(stability: f64, trend: MarginTrend) -> f64 {
        let mut score = 60.0;

        if stability > 0.8 {
            score += 20.0;
        } else if stability > 0.6 {
            score += 10.0;
        }

        match trend {
            MarginTrend::Improving => score += 10.0,
            MarginTrend::Declining => score -= 15.0,
            MarginTrend::Stable => {}
        }

        f64::clamp(score, 0.0, 100.0)
    }

    /// Balance-sheet health from the most recent period.
    fn liquidity_score(latest: &HistoricalDataPoint) -> f64 {
        let mut score = 50.0;

        match &latest.sector_metrics {
            SectorMetrics::NonFinance(ops) => {
                if let Some(current_ratio) = ops.current_ratio {
                    if current_ratio > 2.0 {
                        score += 20.0;
                    } else if current_ratio > 1.5 {
                        score += 10.0;
                    } else if current_ratio < 1.0 {
                        score -= 20.0;
                    }
                }

                if let Some(d2e) = ops.debt_to_equity {
                    if d2e < 0.5 {
                        score += 15.0;
                    } else if d2e > 2.0 {
                        score -= 20.0;
                    } else if d2e > 1.0 {
                        score -= 10.0;
                    }
                }

                if let Some(ccc) = ops.cash_conversion_cycle {
                    if ccc < 30.0 {
                        score += 10.0;
                    } else if ccc > 90.0 {
                        score -= 10.0;
                    }
                }
            }
            SectorMetrics::Finance(bank) => {
                if let Some(nim) = bank.nim {
                    if nim > 3.5 {
                        score += 20.0;
                    } else if nim > 2.5 {
                        score += 10.0;
                    } else if nim < 2.0 {
                        score -= 15.0;
                    }
                }

                if let Some(casa) = bank.casa_ratio {
                    if casa > 0.4 {
                        score += 10.0;
                    }
                }
            }
        }

        f64::clamp(score, 0.0, 100.0)
    }

    fn sector_specific_score(company_type: CompanyType, avg_growth: f64, stability: f64) -> f64 {
        let mut score = 70.0;

        match company_type {
            // Banks run at structurally higher growth than operating companies
            CompanyType::Finance => {
                if avg_growth > 0.12 {
                    score += 20.0;
                } else if avg_growth > 0.08 {
                    score += 10.0;
                }
            }
            CompanyType::NonFinance => {
                if avg_growth > 0.06 && stability > 0.7 {
                    score += 15.0;
                }
            }
        }

        f64::clamp(score, 0.0, 100.0)
    }

    fn bank_indicators(data: &[HistoricalDataPoint]) -> BankIndicators {
        let nims: Vec<f64> = data.iter().filter_map(|d| d.nim()).collect();
        let roes: Vec<f64> = data.iter().filter_map(|d| d.roe).collect();

        let nim_score = if nims.is_empty() {
            50.0
        } else {
            match stats::mean(&nims) {
                n if n > 4.0 => 90.0,
                n if n > 3.0 => 75.0,
                n if n > 2.0 => 60.0,
                _ => 40.0,
            }
        };

        let profitability_score = if roes.is_empty() {
            50.0
        } else {
            match stats::mean(&roes) {
                r if r > 0.15 => 85.0,
                r if r > 0.12 => 70.0,
                r if r > 0.08 => 55.0,
                _ => 40.0,
            }
        };

        BankIndicators {
            nim_score,
            profitability_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{BankMetrics, OperatingMetrics};

    fn series(growth: &[f64], margins: &[f64]) -> Vec<HistoricalDataPoint> {
        growth
            .iter()
            .zip(margins)
            .enumerate()
            .map(|(i, (&g, &m))| {
                HistoricalDataPoint::new(format!("P{}", i), 1000.0 - i as f64 * 50.0, m, g)
            })
            .collect()
    }

    fn assert_in_range(ind: &CycleIndicators) {
        let scores = [
            ind.growth_score,
            ind.efficiency_score,
            ind.liquidity_score,
            ind.sector_specific_score,
        ];
        for score in scores {
            assert!((0.0..=100.0).contains(&score), "score out of range: {}", score);
        }
        assert!((0.0..=1.0).contains(&ind.margin_stability));
    }

    #[test]
    fn test_short_history_returns_neutral_defaults() {
        let analyzer = CycleIndicatorAnalyzer::new();

        for data in [vec![], series(&[0.2], &[30.0])] {
            let ind = analyzer.analyze(&data, CompanyType::NonFinance);
            assert_eq!(ind.growth_score, 30.0);
            assert_eq!(ind.efficiency_score, 50.0);
            assert_eq!(ind.liquidity_score, 50.0);
            assert_eq!(ind.sector_specific_score, 50.0);
            assert_eq!(ind.revenue_growth_trend, GrowthTrend::Stable);
            assert_eq!(ind.profit_growth_trend, GrowthTrend::Stable);
            assert_eq!(ind.margin_trend, MarginTrend::Stable);
        }
    }

    #[test]
    fn test_accelerating_growth() {
        let data = series(&[0.12, 0.11, 0.10, 0.05, 0.04], &[20.0; 5]);
        let ind = CycleIndicatorAnalyzer::new().analyze(&data, CompanyType::NonFinance);

        assert_eq!(ind.revenue_growth_trend, GrowthTrend::Accelerating);
        assert_eq!(ind.growth_score, 90.0);
        assert_eq!(ind.margin_stability, 1.0);
        assert_eq!(ind.efficiency_score, 80.0);
        assert_in_range(&ind);
    }

    #[test]
    fn test_declining_growth_and_margins() {
        let data = series(&[0.01, 0.00, -0.01, 0.06, 0.07], &[15.0, 14.0, 13.0, 20.0, 21.0]);
        let ind = CycleIndicatorAnalyzer::new().analyze(&data, CompanyType::NonFinance);

        assert_eq!(ind.revenue_growth_trend, GrowthTrend::Declining);
        assert_eq!(ind.margin_trend, MarginTrend::Declining);
        assert_eq!(ind.growth_score, 50.0);
        assert!(ind.margin_stability > 0.8);
        assert_eq!(ind.efficiency_score, 65.0);
    }

    #[test]
    fn test_three_periods_have_no_older_window() {
        let data = series(&[0.20, 0.01, -0.05], &[30.0, 10.0, 5.0]);
        let ind = CycleIndicatorAnalyzer::new().analyze(&data, CompanyType::NonFinance);

        assert_eq!(ind.revenue_growth_trend, GrowthTrend::Stable);
        assert_eq!(ind.margin_trend, MarginTrend::Stable);
    }

    #[test]
    fn test_profit_growth_trend_uses_available_points() {
        let data: Vec<HistoricalDataPoint> = series(&[0.05; 4], &[20.0; 4])
            .into_iter()
            .zip([0.20, 0.18, 0.16, 0.02])
            .map(|(p, g)| p.with_profit_growth(g))
            .collect();
        let ind = CycleIndicatorAnalyzer::new().analyze(&data, CompanyType::NonFinance);

        assert_eq!(ind.profit_growth_trend, GrowthTrend::Accelerating);
        assert_eq!(ind.revenue_growth_trend, GrowthTrend::Stable);
    }

    #[test]
    fn test_margin_stability_floored_at_zero() {
        let data = series(&[0.03, 0.03], &[-10.0, 12.0]);
        let ind = CycleIndicatorAnalyzer::new().analyze(&data, CompanyType::NonFinance);

        assert_eq!(ind.margin_stability, 0.0);
        assert_in_range(&ind);
    }

    #[test]
    fn test_finance_sector_bonus_and_bank_indicators() {
        let data: Vec<HistoricalDataPoint> = series(&[0.15, 0.14, 0.13], &[35.0, 34.5, 35.5])
            .into_iter()
            .map(|p| {
                p.with_roe(0.16).with_sector_metrics(SectorMetrics::Finance(BankMetrics {
                    nim: Some(3.6),
                    casa_ratio: Some(0.45),
                }))
            })
            .collect();
        let ind = CycleIndicatorAnalyzer::new().analyze(&data, CompanyType::Finance);

        assert_eq!(ind.sector_specific_score, 90.0);
        assert_eq!(ind.liquidity_score, 80.0);
        let bank = ind.bank_indicators.expect("finance companies carry bank indicators");
        assert_eq!(bank.nim_score, 75.0);
        assert_eq!(bank.profitability_score, 85.0);
    }

    #[test]
    fn test_non_finance_bonus_needs_growth_and_stability() {
        let analyzer = CycleIndicatorAnalyzer::new();

        let steady = series(&[0.07, 0.07, 0.07], &[20.0, 20.0, 20.0]);
        assert_eq!(analyzer.analyze(&steady, CompanyType::NonFinance).sector_specific_score, 85.0);

        let erratic = series(&[0.07, 0.07, 0.07], &[10.0, 30.0, 5.0]);
        let ind = analyzer.analyze(&erratic, CompanyType::NonFinance);
        assert!(ind.margin_stability < 0.6);
        assert_eq!(ind.sector_specific_score, 70.0);
        assert!(ind.bank_indicators.is_none());
    }

    #[test]
    fn test_liquidity_uses_latest_operating_metrics() {
        let analyzer = CycleIndicatorAnalyzer::new();
        let with_ops = |ops: OperatingMetrics| -> Vec<HistoricalDataPoint> {
            series(&[0.05, 0.05], &[20.0, 20.0])
                .into_iter()
                .map(|p| p.with_sector_metrics(SectorMetrics::NonFinance(ops.clone())))
                .collect()
        };

        let healthy = with_ops(OperatingMetrics {
            current_ratio: Some(2.5),
            debt_to_equity: Some(0.3),
            cash_conversion_cycle: Some(20.0),
        });
        assert_eq!(analyzer.analyze(&healthy, CompanyType::NonFinance).liquidity_score, 95.0);

        let stressed = with_ops(OperatingMetrics {
            current_ratio: Some(0.8),
            debt_to_equity: Some(2.5),
            cash_conversion_cycle: Some(120.0),
        });
        assert_eq!(analyzer.analyze(&stressed, CompanyType::NonFinance).liquidity_score, 0.0);
    }

    #[test]
    fn test_extreme_inputs_stay_bounded() {
        let data = series(&[5.0, -3.0, 12.0, -0.9], &[80.0, -40.0, 0.5, 200.0]);
        for company_type in [CompanyType::Finance, CompanyType::NonFinance] {
            let ind = CycleIndicatorAnalyzer::new().analyze(&data, company_type);
            assert_in_range(&ind);
        }
    }

    #[test]
    fn test_repeated_analysis_is_identical() {
        let data = series(&[0.09, 0.07, 0.06, 0.05], &[22.0, 21.5, 21.0, 20.0]);
        let analyzer = CycleIndicatorAnalyzer::new();
        assert_eq!(
            analyzer.analyze(&data, CompanyType::NonFinance),
            analyzer.analyze(&data, CompanyType::NonFinance)
        );
    }
}
