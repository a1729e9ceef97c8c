use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info, instrument};

use crate::pipeline::processing::{ProjectedRow, StagedRecord};

/// Date-only formats, tried in order. Every four-digit-year format has a
/// two-digit-year twin placed ahead of it, because `%Y` also accepts two
/// digits and would read "58" as the year 58.
const DATE_FORMATS: &[&str] = &[
    "%y-%m-%d",
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%y/%m/%d",
    "%Y/%m/%d",
    "%d %B %y",
    "%d %B %Y",
    "%d %b %y",
    "%d %b %Y",
    "%B %d, %y",
    "%B %d, %Y",
    "%b %d, %y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a training-compute value. Anything that is not a finite,
/// non-negative number is a failure.
pub fn parse_compute(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Generic date parse over the accepted formats. A bare four-digit year
/// maps to January 1 of that year.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    None
}

/// Converts text fields to their semantic types. A value that fails to
/// parse becomes missing; no row is removed here.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeCoercer;

impl TypeCoercer {
    pub fn new() -> Self {
        Self
    }

    pub fn coerce_row(&self, row: ProjectedRow) -> StagedRecord {
        let publication_date = row.publication_date.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                debug!(row = row.row, value = raw, "Unparsable publication date");
            }
            parsed
        });

        let training_compute_flop = row.training_compute_flop.as_deref().and_then(|raw| {
            let parsed = parse_compute(raw);
            if parsed.is_none() {
                debug!(row = row.row, value = raw, "Unparsable training compute");
            }
            parsed
        });

        StagedRecord {
            row: row.row,
            system: row.system,
            publication_date,
            training_compute_flop,
            domain_label: row.domain,
            domain: None,
        }
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn coerce(&self, rows: Vec<ProjectedRow>) -> Vec<StagedRecord> {
        let staged: Vec<StagedRecord> = rows.into_iter().map(|row| self.coerce_row(row)).collect();

        let bad_dates = staged.iter().filter(|r| r.publication_date.is_none()).count();
        let bad_compute = staged.iter().filter(|r| r.training_compute_flop.is_none()).count();
        info!(
            missing_dates = bad_dates,
            missing_compute = bad_compute,
            "Coerced field types"
        );

        staged
    }
}
