/// End-to-end pipeline integration tests.
///
/// These tests drive the real scanner, cache gate, snapshot writer and
/// aggregator together against a temporary directory. The remote listing
/// API is replaced by an in-memory `ListingSource` that replays pages, so
/// no network access or credentials are needed.
use chrono::{DateTime, TimeDelta, Utc};
use std::cell::Cell;
use std::collections::VecDeque;
use tempfile::TempDir;
use uploadsleuth_core::analysis::aggregate_at;
use uploadsleuth_core::cache::{load_or_scan, CacheDecision};
use uploadsleuth_core::config::{FrequencyParams, OutputLabel};
use uploadsleuth_core::model::{ObjectRecord, Timestamp};
use uploadsleuth_core::scanner::progress::ScanProgress;
use uploadsleuth_core::scanner::{scan, ListingPage, ListingSource};
use uploadsleuth_core::{snapshot, Error, Result, Stage};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Replays a fixed list of pages, then reports exhaustion.
struct FakeListing {
    pages: VecDeque<ListingPage>,
    fail_after: Option<usize>,
    served: usize,
}

impl FakeListing {
    fn new(pages: Vec<ListingPage>) -> Self {
        Self {
            pages: pages.into(),
            fail_after: None,
            served: 0,
        }
    }

    fn failing_after(pages: Vec<ListingPage>, n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new(pages)
        }
    }
}

impl ListingSource for FakeListing {
    fn describe(&self) -> String {
        "s3://fake-bucket/uploads/".into()
    }

    fn next_page(&mut self) -> Result<Option<ListingPage>> {
        if self.fail_after == Some(self.served) {
            return Err(Error::Transport {
                root: self.describe(),
                message: "throttled".into(),
            });
        }
        self.served += 1;
        Ok(self.pages.pop_front())
    }
}

fn ts(s: &str) -> Timestamp {
    Timestamp::parse_from_rfc3339(s).unwrap()
}

fn utc(s: &str) -> DateTime<Utc> {
    ts(s).with_timezone(&Utc)
}

fn records(entries: &[(&str, &str)]) -> ListingPage {
    ListingPage::from_records(
        entries
            .iter()
            .map(|(k, t)| ObjectRecord::new(*k, ts(t)))
            .collect(),
    )
}

/// Three-page listing matching the documented worked example, with an
/// empty directory-marker page in the middle.
fn example_listing() -> FakeListing {
    FakeListing::new(vec![
        records(&[("uploads/a.txt", "2024-01-01T00:00:00Z")]),
        ListingPage::Empty,
        records(&[
            ("uploads/b.txt", "2024-01-01T00:04:30Z"),
            ("uploads/c.txt", "2024-01-01T00:10:00Z"),
        ]),
    ])
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Scan → persist → aggregate produces the dense worked-example series.
#[test]
fn fresh_scan_persists_snapshot_and_aggregates() {
    let tmp = TempDir::new().unwrap();
    let label = OutputLabel::new("acme").unwrap();
    let path = tmp.path().join(label.snapshot_file_name());

    let mut pages_seen = 0;
    let (store, decision) = load_or_scan(&path, false, || {
        let mut listing = example_listing();
        scan(&mut listing, |p| {
            if let ScanProgress::Page { .. } = p {
                pages_seen += 1;
            }
        })
    })
    .unwrap();

    assert_eq!(decision, CacheDecision::Rescan);
    assert_eq!(pages_seen, 3);
    assert_eq!(store.len(), 3);
    assert!(path.is_file(), "snapshot must be written after a scan");

    let params = FrequencyParams::new(TimeDelta::days(30), TimeDelta::minutes(5)).unwrap();
    let series = aggregate_at(&store, &params, utc("2024-01-15T00:00:00Z")).unwrap();
    let counts: Vec<u64> = series.buckets().iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 0, 1]);
    assert_eq!(series.buckets()[0].start, utc("2024-01-01T00:00:00Z"));
}

/// A second run without override reuses the snapshot and never lists.
#[test]
fn second_run_hits_cache() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("acme-list-objects-out.json");

    let (first, _) = load_or_scan(&path, false, || scan(&mut example_listing(), |_| {})).unwrap();

    let scans = Cell::new(0);
    let (second, decision) = load_or_scan(&path, false, || {
        scans.set(scans.get() + 1);
        scan(&mut example_listing(), |_| {})
    })
    .unwrap();

    assert_eq!(decision, CacheDecision::Reuse);
    assert_eq!(scans.get(), 0);
    assert_eq!(first, second);
}

/// A listing failure mid-scan surfaces as a scan-stage error and no
/// snapshot file appears.
#[test]
fn transport_failure_leaves_no_snapshot() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("acme-list-objects-out.json");

    let err = load_or_scan(&path, false, || {
        let mut listing = FakeListing::failing_after(
            vec![records(&[("a", "2024-01-01T00:00:00Z")]), ListingPage::Empty],
            1,
        );
        scan(&mut listing, |_| {})
    })
    .unwrap_err();

    assert_eq!(err.stage(), Stage::Scan);
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

/// Persisted snapshots round-trip through the visualize-only path.
#[test]
fn snapshot_round_trips_into_identical_series() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snap.json");
    let store = scan(&mut example_listing(), |_| {}).unwrap();
    snapshot::save(&store, &path).unwrap();

    let reloaded = snapshot::load(&path).unwrap();
    let params = FrequencyParams::new(TimeDelta::days(30), TimeDelta::minutes(5)).unwrap();
    let now = utc("2024-01-10T00:00:00Z");

    assert_eq!(reloaded, store);
    assert_eq!(
        aggregate_at(&reloaded, &params, now).unwrap(),
        aggregate_at(&store, &params, now).unwrap()
    );
}
