/// Frequency series: the dense, ordered output of aggregation.
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// One fixed-width interval and the number of objects that landed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Inclusive start of the interval (UTC, aligned to the bucket width).
    pub start: DateTime<Utc>,
    pub count: u64,
}

/// Contiguous, zero-filled sequence of buckets.
///
/// Every interval between the first and last bucket appears exactly once,
/// in ascending order, including intervals with a zero count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySeries {
    bucket_width: TimeDelta,
    buckets: Vec<Bucket>,
}

impl FrequencySeries {
    pub(crate) fn new(bucket_width: TimeDelta, buckets: Vec<Bucket>) -> Self {
        debug_assert!(
            buckets
                .windows(2)
                .all(|w| w[1].start - w[0].start == bucket_width),
            "series buckets must be contiguous"
        );
        Self {
            bucket_width,
            buckets,
        }
    }

    pub fn empty(bucket_width: TimeDelta) -> Self {
        Self {
            bucket_width,
            buckets: Vec::new(),
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket_width(&self) -> TimeDelta {
        self.bucket_width
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// The bucket with the highest count (earliest wins on ties).
    pub fn peak(&self) -> Option<&Bucket> {
        self.buckets
            .iter()
            .reduce(|best, b| if b.count > best.count { b } else { best })
    }

    /// Start of the first and end (exclusive) of the last interval.
    pub fn range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.buckets.first()?;
        let last = self.buckets.last()?;
        Some((first.start, last.start + self.bucket_width))
    }
}

impl<'a> IntoIterator for &'a FrequencySeries {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}
