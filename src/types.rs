use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical application domain of an AI system.
///
/// Variant order is the category order. It drives legend and color
/// assignment in the chart, so `Ord` is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Vision,
    Games,
    Drawing,
    Language,
    Other,
}

impl Domain {
    /// Every category, in category order
    pub const ALL: [Domain; 5] = [
        Domain::Vision,
        Domain::Games,
        Domain::Drawing,
        Domain::Language,
        Domain::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Vision => "Vision",
            Domain::Games => "Games",
            Domain::Drawing => "Drawing",
            Domain::Language => "Language",
            Domain::Other => "Other",
        }
    }

    /// Position in the category order
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed AI system with every field populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub system: String,
    pub publication_date: NaiveDate,
    pub training_compute_flop: f64,
    pub domain: Domain,
}

impl Record {
    /// Publication date as a fractional year, e.g. 1958-07-02 -> ~1958.5
    pub fn fractional_year(&self) -> f64 {
        let date = self.publication_date;
        let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
        date.year() as f64 + f64::from(date.ordinal0()) / days_in_year
    }
}

/// The cleaned table handed to rendering and export.
///
/// Only the row filter builds one; afterwards it is read-only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanTable {
    records: Vec<Record>,
}

impl CleanTable {
    pub(crate) fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records grouped per domain, in category order. Empty domains are kept
    /// so that legend and color positions never shift.
    pub fn by_domain(&self) -> Vec<(Domain, Vec<&Record>)> {
        Domain::ALL
            .iter()
            .map(|domain| {
                let members = self.records.iter().filter(|r| r.domain == *domain).collect();
                (*domain, members)
            })
            .collect()
    }

    pub fn domain_counts(&self) -> BTreeMap<Domain, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.domain).or_insert(0) += 1;
        }
        counts
    }

    /// First record whose system name matches exactly
    pub fn find_system(&self, system: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.system == system)
    }
}

impl<'a> IntoIterator for &'a CleanTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(system: &str, date: (i32, u32, u32), domain: Domain) -> Record {
        Record {
            system: system.to_string(),
            publication_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            training_compute_flop: 1.0e20,
            domain,
        }
    }

    #[test]
    fn test_domain_order_follows_category_order() {
        let mut shuffled = vec![Domain::Other, Domain::Language, Domain::Vision, Domain::Drawing, Domain::Games];
        shuffled.sort();
        assert_eq!(shuffled, Domain::ALL.to_vec());
        assert_eq!(Domain::Drawing.index(), 2);
    }

    #[test]
    fn test_fractional_year() {
        let r = record("Perceptron", (1958, 1, 1), Domain::Vision);
        assert_eq!(r.fractional_year(), 1958.0);

        let mid = record("Mid", (2020, 7, 2), Domain::Vision);
        let frac = mid.fractional_year() - 2020.0;
        assert!((frac - 0.5).abs() < 0.01, "got {}", frac);
    }

    #[test]
    fn test_by_domain_keeps_empty_groups_in_order() {
        let table = CleanTable::new(vec![
            record("GPT-3", (2020, 5, 28), Domain::Language),
            record("AlexNet", (2012, 9, 30), Domain::Vision),
        ]);

        let groups = table.by_domain();
        let domains: Vec<Domain> = groups.iter().map(|(d, _)| *d).collect();
        assert_eq!(domains, Domain::ALL.to_vec());
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].1.len(), 0);
        assert_eq!(groups[3].1[0].system, "GPT-3");
    }

    #[test]
    fn test_find_system() {
        let table = CleanTable::new(vec![record("AlphaGo Zero", (2017, 10, 18), Domain::Games)]);
        assert!(table.find_system("AlphaGo Zero").is_some());
        assert!(table.find_system("AlphaGo").is_none());
    }
}
