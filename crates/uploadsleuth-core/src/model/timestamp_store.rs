/// Timestamp store: object key → last-modified instant.
///
/// Built fresh for every scan and mutated only by [`TimestampStore::merge_page`]
/// while pages arrive. Once the scan completes the store is handed to the
/// snapshot writer as a whole and treated as read-only from then on.
///
/// Backed by a `BTreeMap` so iteration (and therefore the snapshot file) is
/// ordered by key, which keeps snapshots diff-friendly between runs.
use super::object_key::ObjectKey;
use chrono::{DateTime, FixedOffset};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// An instant with its original timezone offset preserved.
pub type Timestamp = DateTime<FixedOffset>;

/// One `(key, last-modified)` pair as returned by a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub key: ObjectKey,
    pub last_modified: Timestamp,
}

impl ObjectRecord {
    pub fn new(key: impl Into<ObjectKey>, last_modified: Timestamp) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampStore {
    entries: BTreeMap<ObjectKey, Timestamp>,
}

impl TimestampStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single entry. A later insert for the same key wins.
    pub fn insert(&mut self, key: ObjectKey, last_modified: Timestamp) -> Option<Timestamp> {
        self.entries.insert(key, last_modified)
    }

    /// Merge one listing page into the store.
    ///
    /// Records are applied in page order, so if a key repeats (within the
    /// page or across pages) the value merged last overwrites earlier ones.
    /// Returns the number of records applied.
    pub fn merge_page<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ObjectRecord>,
    {
        let mut applied = 0;
        for record in records {
            self.entries.insert(record.key, record.last_modified);
            applied += 1;
        }
        applied
    }

    pub fn get(&self, key: &ObjectKey) -> Option<&Timestamp> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, ObjectKey, Timestamp> {
        self.entries.iter()
    }

    /// Iterate the instants only, in key order.
    pub fn timestamps(&self) -> impl Iterator<Item = &Timestamp> + '_ {
        self.entries.values()
    }

    /// Earliest and latest instant in the store, or `None` when empty.
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        let mut values = self.entries.values();
        let first = *values.next()?;
        Some(values.fold((first, first), |(lo, hi), ts| (lo.min(*ts), hi.max(*ts))))
    }
}

impl<'a> IntoIterator for &'a TimestampStore {
    type Item = (&'a ObjectKey, &'a Timestamp);
    type IntoIter = btree_map::Iter<'a, ObjectKey, Timestamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ObjectRecord> for TimestampStore {
    fn from_iter<I: IntoIterator<Item = ObjectRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        store.merge_page(iter);
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    /// Merging several pages yields the union of their records.
    #[test]
    fn merge_is_union_of_pages() {
        let mut store = TimestampStore::new();
        store.merge_page(vec![
            ObjectRecord::new("a.txt", ts("2024-01-01T00:00:00Z")),
            ObjectRecord::new("b.txt", ts("2024-01-01T00:01:00Z")),
        ]);
        store.merge_page(vec![ObjectRecord::new("c.txt", ts("2024-01-01T00:02:00Z"))]);

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(&ObjectKey::new("c.txt")),
            Some(&ts("2024-01-01T00:02:00Z"))
        );
    }

    /// A key repeated on a later page takes the later page's value.
    #[test]
    fn later_page_wins_on_duplicate_key() {
        let mut store = TimestampStore::new();
        store.merge_page(vec![ObjectRecord::new("a.txt", ts("2024-01-01T00:00:00Z"))]);
        store.merge_page(vec![ObjectRecord::new("a.txt", ts("2024-02-01T00:00:00Z"))]);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&ObjectKey::new("a.txt")),
            Some(&ts("2024-02-01T00:00:00Z"))
        );
    }

    #[test]
    fn empty_page_is_a_no_op() {
        let mut store: TimestampStore =
            vec![ObjectRecord::new("a.txt", ts("2024-01-01T00:00:00Z"))]
                .into_iter()
                .collect();
        let before = store.clone();

        let applied = store.merge_page(Vec::new());

        assert_eq!(applied, 0);
        assert_eq!(store, before);
    }

    #[test]
    fn time_span_covers_min_and_max() {
        let store: TimestampStore = vec![
            ObjectRecord::new("b", ts("2024-01-01T00:10:00Z")),
            ObjectRecord::new("a", ts("2024-01-01T00:00:00Z")),
            ObjectRecord::new("c", ts("2024-01-01T00:05:00+02:00")),
        ]
        .into_iter()
        .collect();

        let (lo, hi) = store.time_span().unwrap();
        // 00:05+02:00 is 22:05Z the previous day.
        assert_eq!(lo, ts("2023-12-31T22:05:00Z"));
        assert_eq!(hi, ts("2024-01-01T00:10:00Z"));
        assert!(TimestampStore::new().time_span().is_none());
    }
}
