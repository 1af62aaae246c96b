//! src/aggregator.rs
use dashmap::DashMap;

/// Shared value → count table filled by every worker of a run.
///
/// Readers must wait until the run has finished; the worker pool only hands
/// the aggregator out once all of its workers have been joined.
#[derive(Debug, Default)]
pub struct Aggregator {
    counts: DashMap<String, u64>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` with a count of 1, or bumps its existing count.
    pub fn increment(&self, value: &str) {
        if let Some(mut count) = self.counts.get_mut(value) {
            *count += 1;
            return;
        }
        *self.counts.entry(value.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, value: &str) -> Option<u64> {
        self.counts.get(value).map(|count| *count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
    }
}
