//! Counting maps with explicit increment-or-insert semantics

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::Hash;

/// A typed counter keyed by `K`.
///
/// Missing keys count as zero. Iteration follows first-insertion order, which
/// also breaks ties in [`Tally::most_common`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Hash + Eq> {
    counts: IndexMap<K, u64>,
}

impl<K: Hash + Eq> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Tally<K> {
    /// Create an empty tally
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `key`, inserting it at zero first if absent. Returns the new count.
    pub fn increment(&mut self, key: K) -> u64 {
        self.add(key, 1)
    }

    /// Add `amount` to `key`. Returns the new count.
    pub fn add(&mut self, key: K, amount: u64) -> u64 {
        let slot = self.counts.entry(key).or_insert(0);
        *slot += amount;
        *slot
    }

    /// Count for `key`, zero when never seen
    #[must_use]
    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing has been counted yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate keys and counts in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }

    /// The `n` highest counts, ties kept in first-insertion order
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(&K, u64)> {
        let mut entries: Vec<(&K, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: Self) {
        for (key, count) in other.counts {
            self.add(key, count);
        }
    }
}

impl<K: Hash + Eq> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.increment(key);
        }
        tally
    }
}

impl<K: Hash + Eq> Extend<K> for Tally<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.increment(key);
        }
    }
}

#[derive(Serialize)]
struct EntryRef<'a, K> {
    key: &'a K,
    count: u64,
}

#[derive(Deserialize)]
struct Entry<K> {
    key: K,
    count: u64,
}

// Composite keys are not valid JSON object keys, so tallies travel as entry lists.
impl<K: Hash + Eq + Serialize> Serialize for Tally<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.counts
                .iter()
                .map(|(key, count)| EntryRef { key, count: *count }),
        )
    }
}

impl<'de, K: Hash + Eq + Deserialize<'de>> Deserialize<'de> for Tally<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Entry<K>>::deserialize(deserializer)?;
        let mut tally = Self::new();
        for entry in entries {
            tally.add(entry.key, entry.count);
        }
        Ok(tally)
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_increment_inserts_missing_keys() {
        let mut tally = Tally::new();
        assert_eq!(tally.get(&"SPD"), 0);

        assert_eq!(tally.increment("SPD"), 1);
        assert_eq!(tally.increment("SPD"), 2);
        assert_eq!(tally.increment("AfD"), 1);

        assert_eq!(tally.get(&"SPD"), 2);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_most_common_orders_by_count_then_insertion() {
        let tally: Tally<&str> = ["FDP", "SPD", "AfD", "SPD", "AfD", "BSW"].into_iter().collect();

        let top = tally.most_common(3);
        assert_eq!(top, vec![(&"SPD", 2), (&"AfD", 2), (&"FDP", 1)]);
    }

    #[test]
    fn test_most_common_with_large_n() {
        let tally: Tally<&str> = ["x"].into_iter().collect();
        assert_eq!(tally.most_common(10).len(), 1);
        assert!(Tally::<&str>::new().most_common(5).is_empty());
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut left: Tally<&str> = ["SPD", "SPD"].into_iter().collect();
        let right: Tally<&str> = ["SPD", "GRÜNE"].into_iter().collect();

        left.merge(right);
        assert_eq!(left.get(&"SPD"), 3);
        assert_eq!(left.get(&"GRÜNE"), 1);
    }

    #[test]
    fn test_serialization_as_entry_list() {
        let mut tally = Tally::new();
        tally.add(("Anna", "SPD"), 4);

        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"[{"key":["Anna","SPD"],"count":4}]"#);

        let back: Tally<(String, String)> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&("Anna".to_string(), "SPD".to_string())), 4);
    }

    proptest! {
        #[test]
        fn prop_total_equals_number_of_increments(keys in prop::collection::vec(0u8..8, 0..64)) {
            let tally: Tally<u8> = keys.iter().copied().collect();
            prop_assert_eq!(tally.total(), keys.len() as u64);
        }
    }
}
