use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use crate::pipeline::processing::StagedRecord;
use crate::types::Domain;

/// Raw source labels with a canonical category. Matching is exact after
/// trimming; everything else is `Other`.
const LABEL_TABLE: &[(&str, Domain)] = &[
    ("Vision", Domain::Vision),
    ("Games", Domain::Games),
    ("Drawing", Domain::Drawing),
    ("Language", Domain::Language),
    ("Speech", Domain::Language),
];

/// Lookup of a label in the fixed table
pub fn lookup(label: &str) -> Option<Domain> {
    let label = label.trim();
    LABEL_TABLE
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, domain)| *domain)
}

impl Domain {
    /// Total mapping from a raw label to a category. Labels outside the
    /// table land in `Other`.
    pub fn from_label(label: &str) -> Domain {
        match lookup(label) {
            Some(domain) => domain,
            None => Domain::Other,
        }
    }
}

/// Maps free-text domain labels onto the fixed category set.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryMapper;

impl CategoryMapper {
    pub fn new() -> Self {
        Self
    }

    /// Sets `domain` for every record that has a label. Records without a
    /// label keep `domain = None`.
    ///
    /// Returns the labels that were not in the table, with how often each
    /// one was folded into `Other`.
    #[instrument(skip_all, fields(rows = records.len()))]
    pub fn apply(&self, records: &mut [StagedRecord]) -> BTreeMap<String, usize> {
        let mut unknown: BTreeMap<String, usize> = BTreeMap::new();

        for record in records.iter_mut() {
            let row = record.row;
            let mapped = record.domain_label.as_deref().map(|label| {
                if lookup(label).is_none() {
                    debug!(row, label, "Unknown domain label mapped to Other");
                    *unknown.entry(label.trim().to_string()).or_insert(0) += 1;
                }
                Domain::from_label(label)
            });
            record.domain = mapped;
        }

        info!(unknown_labels = unknown.len(), "Mapped domain labels");
        unknown
    }
}
