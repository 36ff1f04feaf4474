/// Object key: the identifier of one object under the scanned prefix.
///
/// Keys are opaque: only equality matters to the pipeline. They are kept in
/// a `CompactString` so the many short keys typical of upload prefixes stay
/// inline without a heap allocation each.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(CompactString);

impl ObjectKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(CompactString::new(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ObjectKey {
    fn from(key: String) -> Self {
        Self(CompactString::from(key))
    }
}
