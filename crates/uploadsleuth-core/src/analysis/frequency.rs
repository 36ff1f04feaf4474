/// Upload frequency aggregation: recency filter plus fixed-width bucketing.
///
/// Bucket boundaries are aligned to the Unix epoch: an instant `t` falls in
/// the interval starting at `floor(t / width) * width` (UTC, millisecond
/// resolution). Alignment therefore never depends on which timestamps are
/// present, and aggregating a superset of the data cannot shift the
/// boundaries seen by the shared part.
use crate::config::{FrequencyParams, MAX_BUCKETS};
use crate::error::{Error, Result};
use crate::model::{Bucket, FrequencySeries, TimestampStore};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// Instants strictly after `now - window` are retained.
pub fn cutoff(now: DateTime<Utc>, window: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// All instants in `store` strictly newer than `cutoff`, normalised to UTC.
///
/// An instant exactly equal to the cutoff is excluded.
pub fn retain_recent(store: &TimestampStore, cutoff: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    store
        .timestamps()
        .map(|ts| ts.with_timezone(&Utc))
        .filter(|ts| *ts > cutoff)
        .collect()
}

/// Epoch-aligned interval index of `ts` for a width of `width_ms` milliseconds.
fn bucket_index(ts: &DateTime<Utc>, width_ms: i64) -> i64 {
    ts.timestamp_millis().div_euclid(width_ms)
}

fn index_start(index: i64, width_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(index * width_ms).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Start of the epoch-aligned interval containing `ts`.
pub fn bucket_start(ts: DateTime<Utc>, bucket_width: TimeDelta) -> DateTime<Utc> {
    let width_ms = bucket_width.num_milliseconds().max(1);
    index_start(bucket_index(&ts, width_ms), width_ms)
}

/// Count `instants` per interval, zero-filling every interval between the
/// earliest and latest one. Input order does not matter.
///
/// Fails when the span would need more than [`MAX_BUCKETS`] intervals, which
/// can happen despite a bounded window when instants lie in the future.
pub fn bucketize(instants: &[DateTime<Utc>], bucket_width: TimeDelta) -> Result<FrequencySeries> {
    let width_ms = bucket_width.num_milliseconds().max(1);
    let bucket_width = TimeDelta::milliseconds(width_ms);

    let mut indices = instants.iter().map(|ts| bucket_index(ts, width_ms));
    let Some(first) = indices.next() else {
        return Ok(FrequencySeries::empty(bucket_width));
    };
    let (lo, hi) = indices.fold((first, first), |(lo, hi), i| (lo.min(i), hi.max(i)));

    let span = hi.abs_diff(lo) + 1;
    if span > MAX_BUCKETS {
        return Err(Error::TooManyBuckets {
            buckets: span,
            limit: MAX_BUCKETS,
        });
    }
    let mut counts = vec![0u64; span as usize];
    for ts in instants {
        counts[(bucket_index(ts, width_ms) - lo) as usize] += 1;
    }

    let buckets = counts
        .into_iter()
        .enumerate()
        .map(|(offset, count)| Bucket {
            start: index_start(lo + offset as i64, width_ms),
            count,
        })
        .collect();
    Ok(FrequencySeries::new(bucket_width, buckets))
}

/// Filter `store` to the recency window ending at `now`, then bucket it.
pub fn aggregate_at(
    store: &TimestampStore,
    params: &FrequencyParams,
    now: DateTime<Utc>,
) -> Result<FrequencySeries> {
    let cutoff = cutoff(now, params.window());
    let recent = retain_recent(store, cutoff);
    debug!(
        total = store.len(),
        retained = recent.len(),
        %cutoff,
        "applied recency window"
    );
    bucketize(&recent, params.bucket_width())
}

/// [`aggregate_at`] with the current wall-clock time.
pub fn aggregate(store: &TimestampStore, params: &FrequencyParams) -> Result<FrequencySeries> {
    aggregate_at(store, params, Utc::now())
}
