use analytics::HistorySummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::{Job, ProfitabilityStatus};
use export::NumberFormat;

fn status_color(status: ProfitabilityStatus) -> Color {
    match status {
        ProfitabilityStatus::Jackpot => Color::Green,
        ProfitabilityStatus::Warning => Color::Yellow,
        ProfitabilityStatus::Thin => Color::Red,
        ProfitabilityStatus::NoBueno => Color::Magenta,
        ProfitabilityStatus::Neutral => Color::Grey,
    }
}

fn status_cell(status: ProfitabilityStatus) -> Cell {
    Cell::new(status.label()).fg(status_color(status))
}

fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// The history list.
pub fn jobs_table(jobs: &[Job], fmt: &NumberFormat) -> Table {
    let mut table = new_table(vec![
        "ID", "Created", "Job", "Carrier", "Retail", "Cost", "Gross %", "Net %", "Net Profit",
        "Shortfall", "Status",
    ]);

    for job in jobs {
        table.add_row(vec![
            Cell::new(job.id),
            Cell::new(job.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&job.job_name),
            Cell::new(job.carrier.as_deref().unwrap_or("-")),
            number_cell(fmt.currency(job.inputs.retail_price)),
            number_cell(fmt.currency(job.inputs.job_cost)),
            number_cell(fmt.percent(job.metrics.actual_gross_margin_pct)),
            number_cell(fmt.percent(job.metrics.actual_net_margin_pct)),
            number_cell(fmt.currency(job.metrics.net_profit_dollars)),
            number_cell(fmt.currency(job.metrics.profit_shortfall_dollars)),
            status_cell(job.status()),
        ]);
    }
    table
}

/// Job count and share per status: the data behind the status chart.
pub fn status_table(summary: &HistorySummary, fmt: &NumberFormat) -> Table {
    let mut table = new_table(vec!["Status", "Jobs", "Share"]);
    for entry in &summary.status_counts {
        table.add_row(vec![
            status_cell(entry.status),
            number_cell(entry.count.to_string()),
            number_cell(entry.share_pct.map(|pct| fmt.percent(pct)).unwrap_or_else(|| "-".to_string())),
        ]);
    }
    table
}

/// Net margin per job against its target, oldest first.
pub fn margin_series_table(summary: &HistorySummary, fmt: &NumberFormat) -> Table {
    let mut table = new_table(vec!["ID", "Created", "Job", "Net %", "Target %"]);
    for point in &summary.net_margin_series {
        table.add_row(vec![
            Cell::new(point.job_id),
            Cell::new(point.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&point.job_name),
            number_cell(fmt.percent(point.net_margin_pct)),
            number_cell(fmt.percent(point.target_net_profit_pct)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::compute_from_figures;
    use chrono::{TimeZone, Utc};
    use core_types::{JobFigures, JobId};
    use rust_decimal_macros::dec;

    fn job() -> Job {
        let inputs = JobFigures {
            retail_price: dec!(10000),
            job_cost: dec!(6000),
            division_overhead_pct: dec!(12),
            company_overhead_pct: dec!(15),
            royalty_pct: dec!(5),
            target_net_profit_pct: dec!(20),
        };
        Job::new(
            JobId::new(1),
            Utc.timestamp_millis_opt(0).unwrap(),
            "Roof",
            Some("Allstate".to_string()),
            inputs,
            compute_from_figures(&inputs),
        )
    }

    #[test]
    fn jobs_table_has_a_row_per_job() {
        let table = jobs_table(&[job(), job()], &NumberFormat::default());
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("$10,000.00"));
        assert!(rendered.contains("Warning"));
    }

    #[test]
    fn status_table_lists_every_status() {
        let summary = HistorySummary::from_jobs(&[job()]);
        let table = status_table(&summary, &NumberFormat::default());
        assert_eq!(table.row_iter().count(), ProfitabilityStatus::ALL.len());
    }
}
