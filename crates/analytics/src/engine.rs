use crate::classifier::{classify_status, covers_overhead};
use core_types::{Job, JobFigures, JobInput, Metrics};
use rust_decimal::Decimal;

/// The net margin used for the "revenue needed at 10%" figure.
const BENCHMARK_MARGIN: Decimal = Decimal::from_parts(10, 0, 0, false, 2); // 0.10

/// A stateless calculator for deriving profitability metrics from a job's inputs.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes metrics using the input's own target net profit.
    pub fn calculate(&self, input: &JobInput) -> Metrics {
        compute_from_figures(&input.figures())
    }

    /// Returns `true` when the metrics stored on `job` are exactly what its
    /// stored inputs produce.
    pub fn verify(&self, job: &Job) -> bool {
        compute_from_figures(&job.inputs) == job.metrics
    }
}

/// The main entry point for calculating metrics.
///
/// Missing or non-numeric fields count as zero, so this is safe to call on
/// half-filled forms. `target_net_profit_pct` overrides whatever target the
/// input carries.
pub fn compute_metrics(input: &JobInput, target_net_profit_pct: Decimal) -> Metrics {
    let figures = JobFigures {
        target_net_profit_pct,
        ..input.figures()
    };
    compute_from_figures(&figures)
}

/// Computes every metric from fully numeric inputs.
///
/// Total over its domain: degenerate inputs (zero price, zero cost, a target of
/// 100% or more) fall back to zero rather than failing, and values beyond the
/// `Decimal` range clamp to its bounds with their true sign.
pub fn compute_from_figures(figures: &JobFigures) -> Metrics {
    let retail = figures.retail_price;
    let cost = figures.job_cost;
    let target = figures.target_net_profit_pct;

    let overhead_cost_dollars = percent_of(retail, figures.total_overhead_pct());
    let gross_profit_dollars = sub(retail, cost);
    let net_profit_dollars = sub(gross_profit_dollars, overhead_cost_dollars);

    let (actual_gross_margin_pct, actual_net_margin_pct) = if retail > Decimal::ZERO {
        (
            ratio_pct(gross_profit_dollars, retail),
            ratio_pct(net_profit_dollars, retail),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let actual_markup_pct = if cost > Decimal::ZERO {
        ratio_pct(gross_profit_dollars, cost)
    } else {
        Decimal::ZERO
    };

    let required_price_dollars = required_price(cost, overhead_cost_dollars, target);

    let required_markup_pct = if cost > Decimal::ZERO {
        ratio_pct(sub(required_price_dollars, cost), cost)
    } else {
        Decimal::ZERO
    };

    let profit_shortfall_dollars =
        if actual_net_margin_pct < target && required_price_dollars > retail {
            sub(required_price_dollars, retail)
        } else {
            Decimal::ZERO
        };

    let revenue_needed_at_10pct_margin = if profit_shortfall_dollars > Decimal::ZERO {
        div(profit_shortfall_dollars, BENCHMARK_MARGIN)
    } else {
        Decimal::ZERO
    };

    // Undefined for a zero or negative margin; reported as zero.
    let revenue_needed_at_current_margin =
        if profit_shortfall_dollars > Decimal::ZERO && actual_net_margin_pct > Decimal::ZERO {
            div(
                profit_shortfall_dollars,
                div(actual_net_margin_pct, Decimal::ONE_HUNDRED),
            )
        } else {
            Decimal::ZERO
        };

    let covers = covers_overhead(overhead_cost_dollars, net_profit_dollars);
    let profitability_status = classify_status(actual_net_margin_pct, target, covers, retail);

    Metrics {
        overhead_cost_dollars,
        covers_overhead: covers,
        actual_gross_margin_pct,
        actual_net_margin_pct,
        actual_markup_pct,
        gross_profit_dollars,
        net_profit_dollars,
        required_price_dollars,
        required_markup_pct,
        profit_shortfall_dollars,
        revenue_needed_at_10pct_margin,
        revenue_needed_at_current_margin,
        profitability_status,
    }
}

/// The price at which cost plus overhead leaves exactly the target net margin.
/// Zero when there is nothing to cover or the target is 100% or more.
fn required_price(cost: Decimal, overhead: Decimal, target_pct: Decimal) -> Decimal {
    let base = add(cost, overhead);
    if base <= Decimal::ZERO || target_pct >= Decimal::ONE_HUNDRED {
        return Decimal::ZERO;
    }
    let keep = sub(Decimal::ONE, div(target_pct, Decimal::ONE_HUNDRED));
    div(base, keep)
}

fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    mul(amount, div(pct, Decimal::ONE_HUNDRED))
}

fn ratio_pct(part: Decimal, whole: Decimal) -> Decimal {
    mul(div(part, whole), Decimal::ONE_HUNDRED)
}

// Saturating arithmetic. Overflow clamps to `Decimal::MAX` or `Decimal::MIN`
// according to the sign of the exact result; a zero divisor yields zero.

fn add(a: Decimal, b: Decimal) -> Decimal {
    a.saturating_add(b)
}

fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.saturating_sub(b)
}

fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| clamp(a.is_sign_negative() != b.is_sign_negative()))
}

fn div(a: Decimal, b: Decimal) -> Decimal {
    if b.is_zero() {
        return Decimal::ZERO;
    }
    a.checked_div(b)
        .unwrap_or_else(|| clamp(a.is_sign_negative() != b.is_sign_negative()))
}

fn clamp(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}
