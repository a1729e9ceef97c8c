// Data preparation pipeline: load, normalize columns, coerce types, repair
// dates, map categories, filter incomplete rows. Stages run strictly in
// sequence, each consuming the previous stage's output.

pub mod ingestion;
pub mod processing;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::Result;
use crate::types::{CleanTable, Domain};
use ingestion::RawTable;
use processing::{
    CategoryMapper, ColumnNormalizer, DateNormalizer, DropReason, DroppedRow, RowFilter,
    TypeCoercer,
};

/// What happened to the rows of one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub reference_date: NaiveDate,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dates_corrected: usize,
    /// Labels outside the lookup table, folded into `Other`
    pub unknown_labels: BTreeMap<String, usize>,
    pub domain_counts: BTreeMap<Domain, usize>,
    pub dropped: Vec<DroppedRow>,
}

impl PipelineReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped.len()
    }

    /// How many dropped rows were missing each field. A row missing two
    /// fields counts under both.
    pub fn dropped_by_reason(&self) -> BTreeMap<DropReason, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.dropped {
            for reason in &row.reasons {
                *counts.entry(*reason).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: CleanTable,
    pub report: PipelineReport,
}

pub struct Pipeline {
    reference_date: NaiveDate,
    delimiter: u8,
}

impl Pipeline {
    /// Pipeline whose date normalizer compares against `reference_date`
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Run every stage over the file at `path`
    #[instrument(skip(self), fields(reference = %self.reference_date))]
    pub fn run(&self, path: &Path) -> Result<PipelineOutput> {
        let raw = ingestion::load_table(path, self.delimiter)?;
        self.run_table(raw)
    }

    /// Run every stage over delimited text from any reader
    pub fn run_reader<R: Read>(&self, reader: R) -> Result<PipelineOutput> {
        let raw = ingestion::read_table(reader, self.delimiter)?;
        self.run_table(raw)
    }

    /// Run the stages after loading
    pub fn run_table(&self, raw: RawTable) -> Result<PipelineOutput> {
        let rows_read = raw.len();

        // Step 1: canonical columns (fatal on schema mismatch)
        let projected = ColumnNormalizer::new().project(raw)?;

        // Step 2: text -> typed fields, failures marked missing
        let mut staged = TypeCoercer::new().coerce(projected);

        // Step 3: century repair of future dates
        let dates_corrected = DateNormalizer::new(self.reference_date).normalize(&mut staged);

        // Step 4: free-text labels -> fixed categories
        let unknown_labels = CategoryMapper::new().apply(&mut staged);

        // Step 5: drop incomplete rows
        let (table, dropped) = RowFilter::new().filter(staged);

        let report = PipelineReport {
            reference_date: self.reference_date,
            rows_read,
            rows_kept: table.len(),
            dates_corrected,
            unknown_labels,
            domain_counts: table.domain_counts(),
            dropped,
        };

        info!(
            rows_read = report.rows_read,
            rows_kept = report.rows_kept,
            rows_dropped = report.rows_dropped(),
            dates_corrected = report.dates_corrected,
            "Pipeline finished"
        );

        Ok(PipelineOutput { table, report })
    }
}
