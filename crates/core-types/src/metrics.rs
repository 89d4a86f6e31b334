use crate::status::ProfitabilityStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every metric derived from a job's inputs.
///
/// This struct is the output of the metrics engine and the data transfer object
/// for results throughout the system: it is what the history stores, what the
/// CLI renders and what the exporters write. Values are unrounded; rounding is
/// a display concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    // I. Overhead
    pub overhead_cost_dollars: Decimal,
    pub covers_overhead: bool,

    // II. Margins & Markups (percent, 0-100 scale)
    pub actual_gross_margin_pct: Decimal,
    pub actual_net_margin_pct: Decimal,
    pub actual_markup_pct: Decimal,

    // III. Profit in dollars
    pub gross_profit_dollars: Decimal,
    pub net_profit_dollars: Decimal,

    // IV. Pricing needed to hit the target
    pub required_price_dollars: Decimal,
    pub required_markup_pct: Decimal,
    pub profit_shortfall_dollars: Decimal,
    pub revenue_needed_at_10pct_margin: Decimal,
    pub revenue_needed_at_current_margin: Decimal,

    pub profitability_status: ProfitabilityStatus,
}

impl Metrics {
    /// Creates a zeroed-out set of metrics with a neutral status.
    pub fn new() -> Self {
        Self {
            overhead_cost_dollars: Decimal::ZERO,
            covers_overhead: true,
            actual_gross_margin_pct: Decimal::ZERO,
            actual_net_margin_pct: Decimal::ZERO,
            actual_markup_pct: Decimal::ZERO,
            gross_profit_dollars: Decimal::ZERO,
            net_profit_dollars: Decimal::ZERO,
            required_price_dollars: Decimal::ZERO,
            required_markup_pct: Decimal::ZERO,
            profit_shortfall_dollars: Decimal::ZERO,
            revenue_needed_at_10pct_margin: Decimal::ZERO,
            revenue_needed_at_current_margin: Decimal::ZERO,
            profitability_status: ProfitabilityStatus::Neutral,
        }
    }

    pub fn has_shortfall(&self) -> bool {
        self.profit_shortfall_dollars > Decimal::ZERO
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
