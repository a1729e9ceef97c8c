use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

use crate::constants::REQUIRED_COLUMNS;
use crate::error::Result;
use crate::types::CleanTable;

/// Write the cleaned table as CSV with the canonical headers. Compute
/// values use the shortest exponent form that round-trips.
pub fn write_clean_csv<W: Write>(table: &CleanTable, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(REQUIRED_COLUMNS)?;

    for record in table {
        let date = record.publication_date.format("%Y-%m-%d").to_string();
        let compute = format!("{:e}", record.training_compute_flop);
        wtr.write_record([
            record.system.as_str(),
            date.as_str(),
            compute.as_str(),
            record.domain.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[instrument(skip(table), fields(path = %path.display(), rows = table.len()))]
pub fn export_clean_csv(table: &CleanTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(path)?;
    write_clean_csv(table, file)?;
    info!("Exported clean table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, Record};
    use chrono::NaiveDate;

    #[test]
    fn test_write_clean_csv() {
        let table = CleanTable::new(vec![
            Record {
                system: "Theseus".to_string(),
                publication_date: NaiveDate::from_ymd_opt(1950, 7, 2).unwrap(),
                training_compute_flop: 40.0,
                domain: Domain::Other,
            },
            Record {
                system: "GPT-3, 175B".to_string(),
                publication_date: NaiveDate::from_ymd_opt(2020, 5, 28).unwrap(),
                training_compute_flop: 3.14e23,
                domain: Domain::Language,
            },
        ]);

        let mut out = Vec::new();
        write_clean_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "system,publication_date,training_compute_flop,domain\n\
             Theseus,1950-07-02,4e1,Other\n\
             \"GPT-3, 175B\",2020-05-28,3.14e23,Language\n"
        );
    }
}
