/// Data model for UploadSleuth.
///
/// Re-exports the timestamp store that the scanner fills and the frequency
/// series that the aggregator produces.
pub mod object_key;
pub mod series;
pub mod timestamp_store;

pub use object_key::ObjectKey;
pub use series::{Bucket, FrequencySeries};
pub use timestamp_store::{ObjectRecord, Timestamp, TimestampStore};
