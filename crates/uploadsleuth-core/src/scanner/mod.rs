/// Scanner module: turns a paginated listing API into a [`TimestampStore`].
///
/// The scan is a single sequential pass: one page request outstanding at a
/// time, pages merged in arrival order, no retries. Any listing failure
/// aborts the scan and is returned to the caller as-is; a partially filled
/// store is never returned.
pub mod progress;
pub mod s3;

use crate::error::Result;
use crate::model::{ObjectRecord, TimestampStore};
use progress::ScanProgress;
use std::time::Instant;
use tracing::{debug, info};

pub use s3::S3Listing;

/// One page of a listing response.
///
/// A page that carries no contents (e.g. a prefix holding only a directory
/// marker) is `Empty` rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPage {
    Records(Vec<ObjectRecord>),
    Empty,
}

impl ListingPage {
    /// Build a page from raw records, collapsing an empty list to `Empty`.
    pub fn from_records(records: Vec<ObjectRecord>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Records(records)
        }
    }
}

/// A paginated source of object records.
///
/// Implementations own their continuation state; `next_page` returns
/// `Ok(None)` once the listing is exhausted.
pub trait ListingSource {
    /// Human-readable description of what is being listed, for logs.
    fn describe(&self) -> String;

    fn next_page(&mut self) -> Result<Option<ListingPage>>;
}

/// Drain `source` into a fresh store, reporting progress to `observer`.
pub fn scan<S, F>(source: &mut S, mut observer: F) -> Result<TimestampStore>
where
    S: ListingSource + ?Sized,
    F: FnMut(ScanProgress),
{
    let start = Instant::now();
    info!("Scanning {}", source.describe());

    let mut store = TimestampStore::new();
    let mut pages: u64 = 0;
    let mut records: u64 = 0;

    while let Some(page) = source.next_page()? {
        pages += 1;
        let page_records = match page {
            ListingPage::Records(batch) => store.merge_page(batch) as u64,
            ListingPage::Empty => {
                debug!(page = pages, "listing page carried no contents");
                0
            }
        };
        records += page_records;
        observer(ScanProgress::Page {
            pages,
            records,
            page_records,
        });
    }

    let duration = start.elapsed();
    info!(
        pages,
        records,
        unique_keys = store.len(),
        "Scan complete in {duration:.2?}"
    );
    observer(ScanProgress::Complete {
        pages,
        records,
        unique_keys: store.len() as u64,
        duration,
    });
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{ObjectKey, Timestamp};
    use std::collections::VecDeque;

    /// In-memory listing that replays a fixed sequence of page results.
    struct ScriptedListing {
        pages: VecDeque<Result<ListingPage>>,
    }

    impl ScriptedListing {
        fn new(pages: Vec<Result<ListingPage>>) -> Self {
            Self {
                pages: pages.into(),
            }
        }
    }

    impl ListingSource for ScriptedListing {
        fn describe(&self) -> String {
            "scripted listing".into()
        }

        fn next_page(&mut self) -> Result<Option<ListingPage>> {
            self.pages.pop_front().transpose()
        }
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_from_rfc3339(s).unwrap()
    }

    fn page(records: &[(&str, &str)]) -> Result<ListingPage> {
        Ok(ListingPage::from_records(
            records
                .iter()
                .map(|(k, t)| ObjectRecord::new(*k, ts(t)))
                .collect(),
        ))
    }

    #[test]
    fn store_is_union_of_all_pages_later_wins() {
        let mut source = ScriptedListing::new(vec![
            page(&[("a", "2024-01-01T00:00:00Z"), ("b", "2024-01-01T00:01:00Z")]),
            page(&[("c", "2024-01-01T00:02:00Z")]),
            page(&[("a", "2024-01-01T00:03:00Z")]),
        ]);

        let store = scan(&mut source, |_| {}).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(&ObjectKey::new("a")),
            Some(&ts("2024-01-01T00:03:00Z"))
        );
    }

    #[test]
    fn empty_pages_are_tolerated() {
        let mut source = ScriptedListing::new(vec![
            Ok(ListingPage::Empty),
            page(&[("a", "2024-01-01T00:00:00Z")]),
            Ok(ListingPage::Empty),
        ]);

        let store = scan(&mut source, |_| {}).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn listing_with_no_pages_yields_empty_store() {
        let mut source = ScriptedListing::new(Vec::new());
        let store = scan(&mut source, |_| {}).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn transport_failure_aborts_the_scan() {
        let mut source = ScriptedListing::new(vec![
            page(&[("a", "2024-01-01T00:00:00Z")]),
            Err(Error::Transport {
                root: "s3://b/".into(),
                message: "connection reset".into(),
            }),
            page(&[("b", "2024-01-01T00:00:00Z")]),
        ]);

        let err = scan(&mut source, |_| {}).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }

    #[test]
    fn progress_counts_pages_and_records() {
        let mut source = ScriptedListing::new(vec![
            page(&[("a", "2024-01-01T00:00:00Z"), ("b", "2024-01-01T00:01:00Z")]),
            Ok(ListingPage::Empty),
            page(&[("a", "2024-01-01T00:02:00Z")]),
        ]);

        let mut events = Vec::new();
        scan(&mut source, |p| events.push(p)).unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1],
            ScanProgress::Page {
                pages: 2,
                records: 2,
                page_records: 0
            }
        );
        match events.last().unwrap() {
            ScanProgress::Complete {
                pages,
                records,
                unique_keys,
                ..
            } => {
                assert_eq!(*pages, 3);
                assert_eq!(*records, 3);
                assert_eq!(*unique_keys, 2);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn from_records_collapses_empty_vec() {
        assert_eq!(ListingPage::from_records(Vec::new()), ListingPage::Empty);
    }
}
