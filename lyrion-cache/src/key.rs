//! Cache key derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical namespaces of cached results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePrefix {
    /// Rendered lyrics documents
    Lyrics,
    /// Single annotation records
    Annotation,
    /// Song details
    Song,
    /// Artist details
    Artist,
}

impl CachePrefix {
    /// Prefix as it appears in keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            CachePrefix::Lyrics => "lyrics",
            CachePrefix::Annotation => "annotation",
            CachePrefix::Song => "song",
            CachePrefix::Artist => "artist",
        }
    }
}

impl fmt::Display for CachePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds `prefix::arg1:arg2:...`.
///
/// The arguments are used verbatim. Two requests share an entry only if
/// the caller normalized them the same way first (see [`normalize_key_arg`]).
pub fn cache_key(prefix: CachePrefix, args: &[&str]) -> String {
    format!("{}::{}", prefix, args.join(":"))
}

/// Trims and lower-cases one key argument.
pub fn normalize_key_arg(arg: &str) -> String {
    arg.trim().to_lowercase()
}
