use crate::format::NumberFormat;
use chrono::SecondsFormat;
use core_types::{Job, Metrics, ProfitabilityStatus};

const LABEL_WIDTH: usize = 34;

/// Renders a plain-text report of one saved job, suitable for printing.
pub fn render_job_report(job: &Job, fmt: &NumberFormat) -> String {
    let mut out = String::new();
    let title = format!("Job #{}: {}", job.id, job.job_name);
    line(&mut out, &title);
    line(&mut out, &"=".repeat(title.chars().count()));
    row(&mut out, "Carrier", job.carrier.as_deref().unwrap_or("-"));
    row(
        &mut out,
        "Created",
        &job.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    out.push('\n');

    line(&mut out, "Inputs");
    row(&mut out, "Retail price", &fmt.currency(job.inputs.retail_price));
    row(&mut out, "Job cost", &fmt.currency(job.inputs.job_cost));
    row(&mut out, "Division overhead", &fmt.percent(job.inputs.division_overhead_pct));
    row(&mut out, "Company overhead", &fmt.percent(job.inputs.company_overhead_pct));
    row(&mut out, "Royalty", &fmt.percent(job.inputs.royalty_pct));
    row(&mut out, "Target net profit", &fmt.percent(job.inputs.target_net_profit_pct));
    out.push('\n');

    out.push_str(&render_metrics(&job.metrics, fmt));
    out
}

/// The results block on its own; also what a live preview prints.
pub fn render_metrics(metrics: &Metrics, fmt: &NumberFormat) -> String {
    let mut out = String::new();
    let status = metrics.profitability_status;
    line(&mut out, &format!("Status: {}", status.label()));
    line(&mut out, status.description());
    out.push('\n');

    line(&mut out, "Results");
    row(&mut out, "Gross profit", &fmt.currency(metrics.gross_profit_dollars));
    row(&mut out, "Gross margin", &fmt.percent(metrics.actual_gross_margin_pct));
    row(&mut out, "Markup", &fmt.percent(metrics.actual_markup_pct));
    row(&mut out, "Overhead cost", &fmt.currency(metrics.overhead_cost_dollars));
    row(
        &mut out,
        "Covers overhead",
        if metrics.covers_overhead { "yes" } else { "no" },
    );
    row(&mut out, "Net profit", &fmt.currency(metrics.net_profit_dollars));
    row(&mut out, "Net margin", &fmt.percent(metrics.actual_net_margin_pct));

    if status != ProfitabilityStatus::Neutral {
        out.push('\n');
        line(&mut out, "Pricing");
        row(&mut out, "Required price for target", &fmt.currency(metrics.required_price_dollars));
        row(&mut out, "Required markup for target", &fmt.percent(metrics.required_markup_pct));
        row(&mut out, "Profit shortfall", &fmt.currency(metrics.profit_shortfall_dollars));
        if metrics.has_shortfall() {
            row(
                &mut out,
                "Revenue to recover at 10% margin",
                &fmt.currency(metrics.revenue_needed_at_10pct_margin),
            );
            row(
                &mut out,
                "Revenue to recover at this margin",
                &fmt.currency(metrics.revenue_needed_at_current_margin),
            );
        }
    }
    out
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn row(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("  {:<width$}{}\n", label, value, width = LABEL_WIDTH));
}
