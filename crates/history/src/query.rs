use core_types::{CoreError, Job, ProfitabilityStatus};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The field a job listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    JobName,
    RetailPrice,
    JobCost,
    GrossMargin,
    NetMargin,
    NetProfit,
    Shortfall,
    Status,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created",
            SortKey::JobName => "name",
            SortKey::RetailPrice => "retail",
            SortKey::JobCost => "cost",
            SortKey::GrossMargin => "gross-margin",
            SortKey::NetMargin => "net-margin",
            SortKey::NetProfit => "net-profit",
            SortKey::Shortfall => "shortfall",
            SortKey::Status => "status",
        }
    }

    fn compare(&self, a: &Job, b: &Job) -> Ordering {
        match self {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::JobName => a.job_name.to_lowercase().cmp(&b.job_name.to_lowercase()),
            SortKey::RetailPrice => a.inputs.retail_price.cmp(&b.inputs.retail_price),
            SortKey::JobCost => a.inputs.job_cost.cmp(&b.inputs.job_cost),
            SortKey::GrossMargin => a
                .metrics
                .actual_gross_margin_pct
                .cmp(&b.metrics.actual_gross_margin_pct),
            SortKey::NetMargin => a
                .metrics
                .actual_net_margin_pct
                .cmp(&b.metrics.actual_net_margin_pct),
            SortKey::NetProfit => a.metrics.net_profit_dollars.cmp(&b.metrics.net_profit_dollars),
            SortKey::Shortfall => a
                .metrics
                .profit_shortfall_dollars
                .cmp(&b.metrics.profit_shortfall_dollars),
            SortKey::Status => a.status().rank().cmp(&b.status().rank()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "created" | "created-at" | "date" => Ok(SortKey::CreatedAt),
            "name" | "job-name" => Ok(SortKey::JobName),
            "retail" | "retail-price" | "price" => Ok(SortKey::RetailPrice),
            "cost" | "job-cost" => Ok(SortKey::JobCost),
            "gross-margin" => Ok(SortKey::GrossMargin),
            "net-margin" | "margin" => Ok(SortKey::NetMargin),
            "net-profit" | "profit" => Ok(SortKey::NetProfit),
            "shortfall" => Ok(SortKey::Shortfall),
            "status" => Ok(SortKey::Status),
            other => Err(CoreError::InvalidInput(
                "sort key".to_string(),
                format!("unknown sort key '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    /// Newest, biggest or healthiest first.
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(CoreError::InvalidInput(
                "sort direction".to_string(),
                format!("unknown direction '{}'", other),
            )),
        }
    }
}

/// Filters and ordering for a job listing.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub status: Option<ProfitabilityStatus>,
    /// Case-insensitive substring matched against job name and carrier.
    pub search: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ProfitabilityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sorted_by(mut self, sort: SortKey, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(status) = self.status {
            if job.status() != status {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                job.job_name.to_lowercase().contains(&needle)
                    || job
                        .carrier
                        .as_deref()
                        .is_some_and(|carrier| carrier.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    /// Applies the filters, then sorts. Ties fall back to id order.
    pub fn apply(&self, jobs: Vec<Job>) -> Vec<Job> {
        let mut selected: Vec<Job> = jobs.into_iter().filter(|job| self.matches(job)).collect();

        // Status ranks run healthiest-first, so "descending" status means
        // healthiest first as well.
        let key_reversed = self.sort == SortKey::Status;
        selected.sort_by(|a, b| {
            let ordering = self.sort.compare(a, b).then_with(|| a.id.cmp(&b.id));
            match (self.direction, key_reversed) {
                (SortDirection::Ascending, false) | (SortDirection::Descending, true) => ordering,
                (SortDirection::Descending, false) | (SortDirection::Ascending, true) => {
                    ordering.reverse()
                }
            }
        });
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::compute_from_figures;
    use chrono::{TimeZone, Utc};
    use core_types::{JobFigures, JobId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn job(id: i64, name: &str, carrier: Option<&str>, retail: Decimal, cost: Decimal) -> Job {
        let inputs = JobFigures {
            retail_price: retail,
            job_cost: cost,
            division_overhead_pct: dec!(10),
            company_overhead_pct: dec!(10),
            royalty_pct: Decimal::ZERO,
            target_net_profit_pct: dec!(20),
        };
        Job::new(
            JobId::new(id),
            Utc.timestamp_millis_opt(id).unwrap(),
            name,
            carrier.map(str::to_string),
            inputs,
            compute_from_figures(&inputs),
        )
    }

    fn sample() -> Vec<Job> {
        vec![
            // 50% gross -> 30% net: jackpot
            job(1, "Roof", Some("Allstate"), dec!(10000), dec!(5000)),
            // 30% gross -> 10% net: warning
            job(2, "siding", Some("State Farm"), dec!(5000), dec!(3500)),
            // 10% gross -> -10% net: thin
            job(3, "Gutters", None, dec!(2000), dec!(1800)),
        ]
    }

    fn ids(jobs: &[Job]) -> Vec<i64> {
        jobs.iter().map(|j| j.id.value()).collect()
    }

    #[test]
    fn default_query_is_newest_first() {
        assert_eq!(ids(&JobQuery::new().apply(sample())), vec![3, 2, 1]);
    }

    #[test]
    fn filters_by_status() {
        let query = JobQuery::new().with_status(ProfitabilityStatus::Warning);
        assert_eq!(ids(&query.apply(sample())), vec![2]);
    }

    #[test]
    fn search_matches_name_or_carrier_case_insensitively() {
        assert_eq!(ids(&JobQuery::new().with_search("ROOF").apply(sample())), vec![1]);
        assert_eq!(ids(&JobQuery::new().with_search("farm").apply(sample())), vec![2]);
        assert_eq!(ids(&JobQuery::new().with_search("   ").apply(sample())).len(), 3);
        assert!(JobQuery::new().with_search("deck").apply(sample()).is_empty());
    }

    #[test]
    fn sorts_by_money_and_name() {
        let by_retail = JobQuery::new().sorted_by(SortKey::RetailPrice, SortDirection::Ascending);
        assert_eq!(ids(&by_retail.apply(sample())), vec![3, 2, 1]);

        let by_margin = JobQuery::new().sorted_by(SortKey::NetMargin, SortDirection::Descending);
        assert_eq!(ids(&by_margin.apply(sample())), vec![1, 2, 3]);

        let by_name = JobQuery::new().sorted_by(SortKey::JobName, SortDirection::Ascending);
        assert_eq!(ids(&by_name.apply(sample())), vec![3, 1, 2]);
    }

    #[test]
    fn status_descending_is_healthiest_first() {
        let query = JobQuery::new().sorted_by(SortKey::Status, SortDirection::Descending);
        assert_eq!(ids(&query.apply(sample())), vec![1, 2, 3]);

        let query = JobQuery::new().sorted_by(SortKey::Status, SortDirection::Ascending);
        assert_eq!(ids(&query.apply(sample())), vec![3, 2, 1]);
    }

    #[test]
    fn parses_sort_options() {
        assert_eq!("net_margin".parse::<SortKey>().unwrap(), SortKey::NetMargin);
        assert_eq!("Created-At".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        assert!("colour".parse::<SortKey>().is_err());
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
