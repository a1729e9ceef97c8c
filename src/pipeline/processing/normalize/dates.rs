use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, instrument};

use crate::constants::CENTURY_SHIFT_YEARS;
use crate::pipeline::processing::StagedRecord;

/// Repairs a date that parsed into the future.
///
/// Two-digit years are resolved by the date parser into a fixed window, so
/// "58" can come back as 2058. A policy decides what a future date really
/// was; the normalizer only decides *when* to ask.
pub trait CenturyCorrection {
    /// Corrected value for a date known to be after the reference date
    fn correct(&self, future: NaiveDate) -> NaiveDate;
}

/// Assumes every future date is exactly one century too late.
///
/// Dates more than a century off are not recoverable by this policy; the
/// shifted date is still in the future in that case.
#[derive(Debug, Clone, Copy)]
pub struct HundredYearShift {
    years: i32,
}

impl Default for HundredYearShift {
    fn default() -> Self {
        Self {
            years: CENTURY_SHIFT_YEARS,
        }
    }
}

impl CenturyCorrection for HundredYearShift {
    fn correct(&self, future: NaiveDate) -> NaiveDate {
        let target_year = future.year() - self.years;
        future.with_year(target_year).unwrap_or_else(|| {
            // Feb 29 with no leap day in the target year
            NaiveDate::from_ymd_opt(target_year, future.month(), 28).unwrap_or(future)
        })
    }
}

/// Rewrites strictly-future publication dates in place.
pub struct DateNormalizer<P: CenturyCorrection = HundredYearShift> {
    reference: NaiveDate,
    policy: P,
}

impl DateNormalizer<HundredYearShift> {
    /// Normalizer comparing against `reference`, usually the run date
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            reference,
            policy: HundredYearShift::default(),
        }
    }
}

impl<P: CenturyCorrection> DateNormalizer<P> {
    pub fn with_policy(reference: NaiveDate, policy: P) -> Self {
        Self { reference, policy }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Corrected date if `date` is after the reference, otherwise `None`.
    /// A date equal to the reference is left alone.
    pub fn corrected(&self, date: NaiveDate) -> Option<NaiveDate> {
        (date > self.reference).then(|| self.policy.correct(date))
    }

    /// Returns how many records were rewritten. Missing dates are skipped.
    ///
    /// A date the policy cannot bring back to or before the reference is
    /// marked missing, so no future date survives normalization.
    #[instrument(skip_all, fields(reference = %self.reference, rows = records.len()))]
    pub fn normalize(&self, records: &mut [StagedRecord]) -> usize {
        let mut corrected = 0;
        let mut unrecoverable = 0;

        for record in records.iter_mut() {
            let Some(date) = record.publication_date else {
                continue;
            };
            let Some(fixed) = self.corrected(date) else {
                continue;
            };

            if fixed <= self.reference {
                debug!(row = record.row, from = %date, to = %fixed, "Shifted future date back");
                record.publication_date = Some(fixed);
                corrected += 1;
            } else {
                debug!(row = record.row, value = %date, "Future date not recoverable");
                record.publication_date = None;
                unrecoverable += 1;
            }
        }

        info!(corrected, unrecoverable, "Normalized publication dates");
        corrected
    }
}
