//! The `Database` façade: resolves `CURRENT`, replays the manifest, and routes `Get` through the
//! level search, one candidate table at a time.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::table::GetResult as TableGetResult;
use crate::table_cache::TableCache;
use crate::version::Manifest;
use crate::Options;

/// The outcome of [`Database::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetResult {
    /// No live candidate table contained the key.
    NotFound,
    /// The most recent record for the key is a value.
    Found(Vec<u8>),
    /// The most recent record for the key is a tombstone: the key is logically absent, distinct
    /// from `NotFound` (a shallower level shadowed a value at a deeper one).
    Deleted,
}

/// An opened, read-only view of a LevelDB database directory.
///
/// Once opened, the manifest's version state is immutable for the lifetime of this value;
/// [`Database::get`] only ever performs read-only file I/O and pure decoding, and is safe to call
/// concurrently from multiple threads on the same `Database`.
pub struct Database {
    dir:         PathBuf,
    manifest:    Manifest,
    table_cache: TableCache,
}

impl Database {
    /// Opens `dir` with [`Options::default()`].
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(dir, Options::default())
    }

    /// Opens `dir`: resolves `CURRENT`, replays the named manifest, and validates its comparator.
    pub fn open_with_options(dir: impl AsRef<Path>, options: Options) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tracing::debug!(dir = %dir.display(), "opening database");

        let manifest = Manifest::open(&dir, options.verify_checksums)?;
        let live_file_count = manifest.live_file_numbers().count();

        let table_cache = TableCache::new(
            &dir,
            *manifest.comparator(),
            options.verify_checksums,
            options.table_reader_cache_capacity,
            live_file_count,
        );

        Ok(Self { dir, manifest, table_cache })
    }

    /// Tries each candidate table in the order the manifest's lookup planning yields them, and
    /// returns the first `Found`/`Deleted` result. A corruption encountered on any candidate is
    /// surfaced immediately rather than skipped, since skipping it could let a stale value from
    /// a deeper level shadow a tombstone or a newer value.
    pub fn get(&self, user_key: &[u8]) -> Result<GetResult> {
        if user_key.is_empty() {
            return Err(Error::InvalidArgument("key must not be empty".to_owned()));
        }

        let _span = tracing::trace_span!("get", key_len = user_key.len()).entered();

        for file_number in self.manifest.candidates_for(user_key) {
            match self.table_cache.get(file_number, user_key)? {
                TableGetResult::NotFound => continue,
                TableGetResult::Found(value) => return Ok(GetResult::Found(value)),
                TableGetResult::Deleted => return Ok(GetResult::Deleted),
            }
        }

        Ok(GetResult::NotFound)
    }

    /// Releases this database's cached table readers. Dropping the `Database` does the same; this
    /// method exists so callers can release file descriptors deterministically without relying on
    /// drop order.
    pub fn close(self) {
        drop(self);
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }
}
