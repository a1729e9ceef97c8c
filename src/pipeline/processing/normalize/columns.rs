use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::constants::{
    COL_DOMAIN, COL_PUBLICATION_DATE, COL_SYSTEM, COL_TRAINING_COMPUTE, REQUIRED_COLUMNS,
};
use crate::error::{ChartError, Result};
use crate::pipeline::ingestion::RawTable;
use crate::pipeline::processing::ProjectedRow;

static NON_ALPHANUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"));

/// Canonical lowercase snake form of a header:
/// `"Training compute (FLOP)"` -> `"training_compute_flop"`.
pub fn canonical_column_name(raw: &str) -> String {
    let lowered = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
    NON_ALPHANUMERIC_RUN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Renames headers to canonical form and projects the table onto the four
/// required columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnNormalizer;

impl ColumnNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Index of each required column, in `REQUIRED_COLUMNS` order.
    /// When two headers canonicalize to the same name the first one wins.
    pub fn resolve(&self, headers: &[String]) -> Result<[usize; 4]> {
        let canonical: Vec<String> = headers.iter().map(|h| canonical_column_name(h)).collect();

        let mut indices = [0usize; 4];
        let mut missing = Vec::new();
        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            match canonical.iter().position(|c| c == name) {
                Some(idx) => indices[slot] = idx,
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ChartError::Schema { missing });
        }
        Ok(indices)
    }

    /// Consume the raw table; extra columns are discarded.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn project(&self, table: RawTable) -> Result<Vec<ProjectedRow>> {
        let [system, date, compute, domain] = self.resolve(&table.headers)?;
        debug!(
            "Column mapping: {}={} {}={} {}={} {}={}",
            COL_SYSTEM, system, COL_PUBLICATION_DATE, date, COL_TRAINING_COMPUTE, compute, COL_DOMAIN, domain
        );

        let projected = table
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, mut cells)| ProjectedRow {
                row: i + 1,
                system: take_cell(&mut cells, system),
                publication_date: take_cell(&mut cells, date),
                training_compute_flop: take_cell(&mut cells, compute),
                domain: take_cell(&mut cells, domain),
            })
            .collect();

        Ok(projected)
    }
}

/// Trimmed cell contents, or `None` for an empty cell
fn take_cell(cells: &mut [String], idx: usize) -> Option<String> {
    let cell = std::mem::take(cells.get_mut(idx)?);
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == cell.len() {
        Some(cell)
    } else {
        Some(trimmed.to_string())
    }
}
