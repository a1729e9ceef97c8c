// Pipeline processing: column normalization, type coercion, date repair,
// category mapping, and row filtering

pub mod category;
pub mod coerce;
pub mod filter;
pub mod normalize;

use chrono::NaiveDate;

use crate::types::Domain;

/// One source row projected onto the four canonical columns, still as text.
/// Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedRow {
    /// 1-based data row number in the source file (header excluded)
    pub row: usize,
    pub system: Option<String>,
    pub publication_date: Option<String>,
    pub training_compute_flop: Option<String>,
    pub domain: Option<String>,
}

/// A record between coercion and filtering. A `None` field is "missing":
/// either absent in the source or failed to parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedRecord {
    pub row: usize,
    pub system: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub training_compute_flop: Option<f64>,
    /// Raw label as it appeared in the source
    pub domain_label: Option<String>,
    /// Set by the category mapper
    pub domain: Option<Domain>,
}

pub use category::CategoryMapper;
pub use coerce::TypeCoercer;
pub use filter::{DropReason, DroppedRow, RowFilter};
pub use normalize::columns::ColumnNormalizer;
pub use normalize::dates::{CenturyCorrection, DateNormalizer, HundredYearShift};
