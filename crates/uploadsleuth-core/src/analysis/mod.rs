/// Analysis modules: post-scan aggregation of the timestamp store.

pub mod frequency;

pub use frequency::{aggregate, aggregate_at, bucket_start, bucketize, cutoff, retain_recent};
