use crate::error::ExportError;
use crate::format::NumberFormat;
use chrono::SecondsFormat;
use core_types::Job;
use rust_decimal::Decimal;
use std::io::Write;

/// Column names, in output order.
pub const HEADER: [&str; 23] = [
    "id",
    "created_at",
    "job_name",
    "carrier",
    "status",
    "retail_price",
    "job_cost",
    "division_overhead_pct",
    "company_overhead_pct",
    "royalty_pct",
    "target_net_profit_pct",
    "overhead_cost_dollars",
    "covers_overhead",
    "gross_profit_dollars",
    "net_profit_dollars",
    "actual_gross_margin_pct",
    "actual_net_margin_pct",
    "actual_markup_pct",
    "required_price_dollars",
    "required_markup_pct",
    "profit_shortfall_dollars",
    "revenue_needed_at_10pct_margin",
    "revenue_needed_at_current_margin",
];

const LINE_END: &str = "\r\n";

/// Writes the header row and one row per job.
pub fn write_csv<W: Write>(jobs: &[Job], fmt: &NumberFormat, mut writer: W) -> Result<(), ExportError> {
    writer.write_all(join_row(HEADER.iter().map(|h| escape(h))).as_bytes())?;
    for job in jobs {
        writer.write_all(join_row(job_row(job, fmt)).as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(jobs: &[Job], fmt: &NumberFormat) -> String {
    let mut out = join_row(HEADER.iter().map(|h| escape(h)));
    for job in jobs {
        out.push_str(&join_row(job_row(job, fmt)));
    }
    out
}

fn join_row(cells: impl IntoIterator<Item = String>) -> String {
    let mut line = cells.into_iter().collect::<Vec<_>>().join(",");
    line.push_str(LINE_END);
    line
}

fn job_row(job: &Job, fmt: &NumberFormat) -> Vec<String> {
    let number = |value: Decimal| fmt.fixed(value);
    let m = &job.metrics;
    let i = &job.inputs;

    vec![
        job.id.to_string(),
        job.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        text_cell(&job.job_name),
        text_cell(job.carrier.as_deref().unwrap_or("")),
        job.status().as_str().to_string(),
        number(i.retail_price),
        number(i.job_cost),
        number(i.division_overhead_pct),
        number(i.company_overhead_pct),
        number(i.royalty_pct),
        number(i.target_net_profit_pct),
        number(m.overhead_cost_dollars),
        m.covers_overhead.to_string(),
        number(m.gross_profit_dollars),
        number(m.net_profit_dollars),
        number(m.actual_gross_margin_pct),
        number(m.actual_net_margin_pct),
        number(m.actual_markup_pct),
        number(m.required_price_dollars),
        number(m.required_markup_pct),
        number(m.profit_shortfall_dollars),
        number(m.revenue_needed_at_10pct_margin),
        number(m.revenue_needed_at_current_margin),
    ]
}

/// A user-typed cell: formula-neutralized, then quoted.
fn text_cell(value: &str) -> String {
    escape(&neutralize_formula(value))
}

/// Spreadsheets evaluate cells starting with these characters.
fn is_formula(value: &str) -> bool {
    let trimmed = value.trim_start();
    matches!(trimmed.chars().next(), Some('=' | '+' | '-' | '@'))
}

fn neutralize_formula(value: &str) -> String {
    if is_formula(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

/// RFC 4180 quoting.
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::compute_from_figures;
    use chrono::{TimeZone, Utc};
    use core_types::{JobFigures, JobId};
    use rust_decimal_macros::dec;

    fn job(name: &str, carrier: Option<&str>) -> Job {
        let inputs = JobFigures {
            retail_price: dec!(10000),
            job_cost: dec!(6000),
            division_overhead_pct: dec!(12),
            company_overhead_pct: dec!(15),
            royalty_pct: dec!(5),
            target_net_profit_pct: dec!(20),
        };
        Job::new(
            JobId::new(1_700_000_000_000),
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            name,
            carrier.map(str::to_string),
            inputs,
            compute_from_figures(&inputs),
        )
    }

    #[test]
    fn empty_export_is_just_the_header() {
        let csv = to_csv_string(&[], &NumberFormat::default());
        assert_eq!(csv, format!("{}\r\n", HEADER.join(",")));
    }

    #[test]
    fn row_is_rounded_and_aligned_with_header() {
        let csv = to_csv_string(&[job("Roof", Some("Allstate"))], &NumberFormat::default());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);

        let cells: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(cells.len(), HEADER.len());
        assert_eq!(cells[0], "1700000000000");
        assert_eq!(cells[1], "2023-11-14T22:13:20.000Z");
        assert_eq!(cells[2], "Roof");
        assert_eq!(cells[4], "warning");
        assert_eq!(cells[5], "10000.00");
        assert_eq!(cells[12], "true");
        assert_eq!(cells[14], "800.00");
        // 4000 / 6000
        assert_eq!(cells[17], "66.67");
    }

    #[test]
    fn quotes_separators_and_doubles_quotes() {
        let csv = to_csv_string(&[job("Smith, \"Big\" roof", None)], &NumberFormat::default());
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",\"Smith, \"\"Big\"\" roof\",,warning,"));
    }

    #[test]
    fn neutralizes_formulas_in_text_cells_only() {
        assert_eq!(text_cell("=SUM(A1:A9)"), "'=SUM(A1:A9)");
        assert_eq!(text_cell("  @cmd"), "'  @cmd");
        assert_eq!(text_cell("-1+1"), "'-1+1");
        assert_eq!(text_cell("Roof"), "Roof");

        let csv = to_csv_string(&[job("Gutters", Some("+Carrier"))], &NumberFormat::default());
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",Gutters,'+Carrier,"));
    }

    #[test]
    fn negative_numbers_are_not_neutralized() {
        let mut thin = job("Siding", None);
        thin.metrics.net_profit_dollars = dec!(-1120);
        let csv = to_csv_string(&[thin], &NumberFormat::default());
        let cells: Vec<String> = csv.lines().nth(1).unwrap().split(',').map(String::from).collect();
        assert_eq!(cells[14], "-1120.00");
    }

    #[test]
    fn writer_and_string_agree() {
        let jobs = [job("Roof", None), job("Deck", Some("Geico"))];
        let mut buffer = Vec::new();
        write_csv(&jobs, &NumberFormat::default(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), to_csv_string(&jobs, &NumberFormat::default()));
    }
}
