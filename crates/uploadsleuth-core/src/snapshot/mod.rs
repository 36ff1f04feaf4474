/// Snapshot persistence: the durable JSON form of a [`TimestampStore`].
///
/// The file is a flat JSON object mapping each key to an RFC 3339 instant,
/// e.g. `{"a.txt": "2024-01-01T00:00:00+00:00"}`. Offsets are preserved.
///
/// Writes are all-or-nothing: the JSON is produced into a temp file next to
/// the destination and renamed into place only after it is fully flushed.
/// Reads decode in two typed steps (JSON object of strings, then one parse
/// per value); the first bad value fails the whole load.
use crate::error::{Error, Result};
use crate::model::{ObjectKey, Timestamp, TimestampStore};
use chrono::SecondsFormat;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Canonical text form of one instant.
pub fn encode_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse the canonical text form back into an offset-aware instant.
pub fn decode_timestamp(text: &str) -> std::result::Result<Timestamp, chrono::ParseError> {
    Timestamp::parse_from_rfc3339(text)
}

/// Encode the whole store into an ordered key → string map.
pub fn encode_store(store: &TimestampStore) -> BTreeMap<&ObjectKey, String> {
    store
        .iter()
        .map(|(key, ts)| (key, encode_timestamp(ts)))
        .collect()
}

/// Decode a key → string map into a store, naming the first bad entry.
pub fn decode_store(raw: BTreeMap<ObjectKey, String>) -> std::result::Result<TimestampStore, String> {
    let mut store = TimestampStore::new();
    for (key, text) in raw {
        let ts = decode_timestamp(&text)
            .map_err(|e| format!("entry \"{key}\" has unparsable timestamp {text:?}: {e}"))?;
        store.insert(key, ts);
    }
    Ok(store)
}

/// Atomically write `store` to `path`, replacing any previous snapshot.
pub fn save(store: &TimestampStore, path: &Path) -> Result<()> {
    let write_err = |source: std::io::Error| Error::SnapshotWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, &encode_store(store)).map_err(|source| {
            Error::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!(entries = store.len(), "Snapshot written to {}", path.display());
    Ok(())
}

/// Load a snapshot written by [`save`] (or by any tool producing the same shape).
pub fn load(path: &Path) -> Result<TimestampStore> {
    let file = File::open(path).map_err(|source| Error::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;
    let malformed = |reason: String| Error::MalformedSnapshot {
        path: path.to_path_buf(),
        reason,
    };

    let raw: BTreeMap<ObjectKey, String> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| malformed(e.to_string()))?;
    let store = decode_store(raw).map_err(malformed)?;

    info!(entries = store.len(), "Snapshot loaded from {}", path.display());
    Ok(store)
}
