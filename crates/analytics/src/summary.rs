use chrono::{DateTime, Utc};
use core_types::{Job, JobId, ProfitabilityStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many jobs landed in one status bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: ProfitabilityStatus,
    pub count: usize,
    /// Share of all jobs, 0-100. `None` when there are no jobs.
    pub share_pct: Option<Decimal>,
}

/// One point of the net margin chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginPoint {
    pub job_id: JobId,
    pub job_name: String,
    pub created_at: DateTime<Utc>,
    pub net_margin_pct: Decimal,
    pub target_net_profit_pct: Decimal,
}

/// Aggregate view over a job history: the data behind the status chart and the
/// net margin trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_jobs: usize,
    pub status_counts: Vec<StatusCount>,
    pub total_retail_dollars: Decimal,
    pub total_gross_profit_dollars: Decimal,
    pub total_net_profit_dollars: Decimal,
    pub total_shortfall_dollars: Decimal,
    /// Revenue-weighted net margin across all jobs. `None` without revenue.
    pub overall_net_margin_pct: Option<Decimal>,
    /// Plain mean of the per-job net margins. `None` when there are no jobs.
    pub average_net_margin_pct: Option<Decimal>,
    /// Net margin per job, oldest first.
    pub net_margin_series: Vec<MarginPoint>,
}

impl HistorySummary {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let total_jobs = jobs.len();

        let mut total_retail_dollars = Decimal::ZERO;
        let mut total_gross_profit_dollars = Decimal::ZERO;
        let mut total_net_profit_dollars = Decimal::ZERO;
        let mut total_shortfall_dollars = Decimal::ZERO;
        let mut margin_sum = Decimal::ZERO;

        for job in jobs {
            total_retail_dollars = total_retail_dollars.saturating_add(job.inputs.retail_price);
            total_gross_profit_dollars =
                total_gross_profit_dollars.saturating_add(job.metrics.gross_profit_dollars);
            total_net_profit_dollars =
                total_net_profit_dollars.saturating_add(job.metrics.net_profit_dollars);
            total_shortfall_dollars =
                total_shortfall_dollars.saturating_add(job.metrics.profit_shortfall_dollars);
            margin_sum = margin_sum.saturating_add(job.metrics.actual_net_margin_pct);
        }

        let status_counts = ProfitabilityStatus::ALL
            .iter()
            .map(|&status| {
                let count = jobs.iter().filter(|j| j.status() == status).count();
                let share_pct = (total_jobs > 0).then(|| {
                    Decimal::from(count) / Decimal::from(total_jobs) * Decimal::ONE_HUNDRED
                });
                StatusCount { status, count, share_pct }
            })
            .collect();

        let overall_net_margin_pct = (total_retail_dollars > Decimal::ZERO)
            .then(|| total_net_profit_dollars.checked_div(total_retail_dollars))
            .flatten()
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

        let average_net_margin_pct =
            (total_jobs > 0).then(|| margin_sum / Decimal::from(total_jobs));

        let mut ordered: Vec<&Job> = jobs.iter().collect();
        ordered.sort_by_key(|j| (j.created_at, j.id));
        let net_margin_series = ordered
            .into_iter()
            .map(|j| MarginPoint {
                job_id: j.id,
                job_name: j.job_name.clone(),
                created_at: j.created_at,
                net_margin_pct: j.metrics.actual_net_margin_pct,
                target_net_profit_pct: j.inputs.target_net_profit_pct,
            })
            .collect();

        Self {
            total_jobs,
            status_counts,
            total_retail_dollars,
            total_gross_profit_dollars,
            total_net_profit_dollars,
            total_shortfall_dollars,
            overall_net_margin_pct,
            average_net_margin_pct,
            net_margin_series,
        }
    }

    pub fn count_for(&self, status: ProfitabilityStatus) -> usize {
        self.status_counts
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_from_figures;
    use chrono::TimeZone;
    use core_types::JobFigures;
    use rust_decimal_macros::dec;

    fn job(id: i64, retail: Decimal, cost: Decimal, overhead: Decimal) -> Job {
        let inputs = JobFigures {
            retail_price: retail,
            job_cost: cost,
            division_overhead_pct: overhead,
            company_overhead_pct: Decimal::ZERO,
            royalty_pct: Decimal::ZERO,
            target_net_profit_pct: dec!(20),
        };
        Job::new(
            JobId::new(id),
            Utc.timestamp_millis_opt(id).unwrap(),
            format!("job-{}", id),
            None,
            inputs,
            compute_from_figures(&inputs),
        )
    }

    #[test]
    fn empty_history_has_no_averages() {
        let summary = HistorySummary::from_jobs(&[]);
        assert_eq!(summary.total_jobs, 0);
        assert_eq!(summary.average_net_margin_pct, None);
        assert_eq!(summary.overall_net_margin_pct, None);
        assert!(summary.status_counts.iter().all(|c| c.count == 0 && c.share_pct.is_none()));
        assert!(summary.net_margin_series.is_empty());
    }

    #[test]
    fn aggregates_totals_and_statuses() {
        let jobs = vec![
            // 50% gross, 10% overhead -> 40% net: jackpot
            job(3, dec!(1000), dec!(500), dec!(10)),
            // 20% gross, 10% overhead -> 10% net: warning
            job(1, dec!(1000), dec!(800), dec!(10)),
            // 10% gross, 30% overhead -> -20% net: thin
            job(2, dec!(2000), dec!(1800), dec!(30)),
        ];

        let summary = HistorySummary::from_jobs(&jobs);

        assert_eq!(summary.total_jobs, 3);
        assert_eq!(summary.count_for(ProfitabilityStatus::Jackpot), 1);
        assert_eq!(summary.count_for(ProfitabilityStatus::Warning), 1);
        assert_eq!(summary.count_for(ProfitabilityStatus::Thin), 1);
        assert_eq!(summary.count_for(ProfitabilityStatus::NoBueno), 0);
        assert_eq!(summary.total_retail_dollars, dec!(4000));
        assert_eq!(summary.total_gross_profit_dollars, dec!(900));
        // 400 + 100 - 400
        assert_eq!(summary.total_net_profit_dollars, dec!(100));
        assert_eq!(summary.overall_net_margin_pct, Some(dec!(2.5)));
        assert_eq!(summary.average_net_margin_pct, Some(dec!(10)));
    }

    #[test]
    fn series_is_oldest_first() {
        let jobs = vec![
            job(30, dec!(100), dec!(50), Decimal::ZERO),
            job(10, dec!(100), dec!(80), Decimal::ZERO),
            job(20, dec!(100), dec!(90), Decimal::ZERO),
        ];
        let summary = HistorySummary::from_jobs(&jobs);

        let ids: Vec<i64> = summary.net_margin_series.iter().map(|p| p.job_id.value()).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(summary.net_margin_series[0].net_margin_pct, dec!(20));
    }
}
