//! src/report.rs
use crate::aggregator::Aggregator;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub value: String,
    pub count: u64,
}

impl ReportEntry {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

pub struct ReportBuilder;

impl ReportBuilder {
    /// Snapshots the counts, most frequent first. Equal counts are ordered by
    /// value so that the output does not depend on scheduling.
    pub fn build(statistics: &Aggregator) -> Vec<ReportEntry> {
        let mut entries: Vec<ReportEntry> = statistics
            .entries()
            .map(|(value, count)| ReportEntry { value, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        entries
    }
}
