use crate::error::ExportError;
use core_types::Job;
use std::io::Write;

/// Writes the jobs as a pretty-printed JSON array.
pub fn write_json<W: Write>(jobs: &[Job], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, jobs)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn to_json_string(jobs: &[Job]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(jobs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::compute_from_figures;
    use chrono::{TimeZone, Utc};
    use core_types::{JobFigures, JobId};
    use rust_decimal_macros::dec;

    #[test]
    fn jobs_survive_a_json_export() {
        let inputs = JobFigures {
            retail_price: dec!(10400),
            job_cost: dec!(8400),
            division_overhead_pct: dec!(15),
            company_overhead_pct: dec!(10),
            royalty_pct: dec!(5),
            target_net_profit_pct: dec!(30),
        };
        let job = Job::new(
            JobId::new(42),
            Utc.timestamp_millis_opt(42).unwrap(),
            "Siding",
            Some("Allstate".to_string()),
            inputs,
            compute_from_figures(&inputs),
        );

        let json = to_json_string(std::slice::from_ref(&job)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 42);
        assert_eq!(value[0]["job_name"], "Siding");
        assert_eq!(value[0]["profitability_status"], "thin");

        let parsed: Vec<Job> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![job]);
    }

    #[test]
    fn empty_list_is_an_empty_array() {
        let mut buffer = Vec::new();
        write_json(&[], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "[]\n");
    }
}
