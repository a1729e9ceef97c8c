use serde::Serialize;
use std::fmt;
use tracing::{info, instrument};

use crate::pipeline::processing::StagedRecord;
use crate::types::{CleanTable, Record};

/// Why a row did not make it into the clean table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DropReason {
    MissingSystem,
    MissingPublicationDate,
    MissingTrainingCompute,
    MissingDomain,
}

impl DropReason {
    pub fn field(self) -> &'static str {
        match self {
            DropReason::MissingSystem => "system",
            DropReason::MissingPublicationDate => "publication_date",
            DropReason::MissingTrainingCompute => "training_compute_flop",
            DropReason::MissingDomain => "domain",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing {}", self.field())
    }
}

/// A source row excluded by the filter, with every missing field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    pub row: usize,
    pub system: Option<String>,
    pub reasons: Vec<DropReason>,
}

/// Removes every record with any missing field. This is the only stage that
/// changes the row count.
#[derive(Debug, Default, Clone, Copy)]
pub struct RowFilter;

impl RowFilter {
    pub fn new() -> Self {
        Self
    }

    /// Complete record, or every reason it is incomplete
    pub fn check(&self, record: StagedRecord) -> std::result::Result<Record, DroppedRow> {
        match (
            record.system,
            record.publication_date,
            record.training_compute_flop,
            record.domain,
        ) {
            (Some(system), Some(publication_date), Some(training_compute_flop), Some(domain)) => {
                Ok(Record {
                    system,
                    publication_date,
                    training_compute_flop,
                    domain,
                })
            }
            (system, date, compute, domain) => {
                let mut reasons = Vec::new();
                if system.is_none() {
                    reasons.push(DropReason::MissingSystem);
                }
                if date.is_none() {
                    reasons.push(DropReason::MissingPublicationDate);
                }
                if compute.is_none() {
                    reasons.push(DropReason::MissingTrainingCompute);
                }
                if domain.is_none() {
                    reasons.push(DropReason::MissingDomain);
                }
                Err(DroppedRow {
                    row: record.row,
                    system,
                    reasons,
                })
            }
        }
    }

    #[instrument(skip_all, fields(rows = records.len()))]
    pub fn filter(&self, records: Vec<StagedRecord>) -> (CleanTable, Vec<DroppedRow>) {
        let mut kept = Vec::with_capacity(records.len());
        let mut dropped = Vec::new();

        for record in records {
            match self.check(record) {
                Ok(record) => kept.push(record),
                Err(row) => dropped.push(row),
            }
        }

        info!(kept = kept.len(), dropped = dropped.len(), "Filtered incomplete rows");
        (CleanTable::new(kept), dropped)
    }
}
