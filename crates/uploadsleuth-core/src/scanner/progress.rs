/// Scan progress reporting: lightweight messages emitted by [`super::scan`]
/// as listing pages are consumed.
///
/// Observers only see counters; the store itself is returned when the scan
/// finishes. Dropping every message changes nothing about the result.
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    /// Emitted after each page has been merged.
    Page {
        /// Pages consumed so far, including empty ones.
        pages: u64,
        /// Records merged so far.
        records: u64,
        /// Records on this page (0 for an empty page).
        page_records: u64,
    },
    /// Listing exhausted; the store is complete.
    Complete {
        pages: u64,
        records: u64,
        /// Distinct keys in the resulting store.
        unique_keys: u64,
        duration: Duration,
    },
}
