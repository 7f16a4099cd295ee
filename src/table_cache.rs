//! Caches open [`TableReader`]s keyed by `file_number`, never by reader pointer, so the manifest
//! and the table-reader cache can't form a reference cycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quick_cache::sync::Cache;

use crate::comparator::{BytewiseComparator, InternalKeyComparator};
use crate::database_files::LevelDBFileName;
use crate::error::Error;
use crate::table::{GetResult, TableReader};

type Reader = TableReader<std::fs::File, BytewiseComparator>;

/// Opens and caches table readers on demand, evicting the least-recently-used reader once a
/// finite capacity (if configured) is exceeded. A reader already handed out via `Arc` is never
/// invalidated out from under its holder by an eviction.
pub struct TableCache {
    dir:              PathBuf,
    comparator:        InternalKeyComparator<BytewiseComparator>,
    verify_checksums:  bool,
    cache:             Cache<u64, Arc<Reader>>,
}

impl TableCache {
    /// `capacity` bounds the number of open readers; `None` sizes the cache to `live_file_count`
    /// so that, in practice, nothing is ever evicted.
    #[must_use]
    pub fn new(
        dir:                &Path,
        comparator:         InternalKeyComparator<BytewiseComparator>,
        verify_checksums:   bool,
        capacity:           Option<u64>,
        live_file_count:    usize,
    ) -> Self {
        let capacity = capacity.map_or(live_file_count.max(1) as u64, |cap| cap.max(1));
        Self {
            dir: dir.to_path_buf(),
            comparator,
            verify_checksums,
            cache: Cache::new(capacity as usize),
        }
    }

    pub fn get(&self, file_number: u64, user_key: &[u8]) -> Result<GetResult, Error> {
        let reader = self.reader_for(file_number)?;
        reader.get(user_key)
    }

    fn reader_for(&self, file_number: u64) -> Result<Arc<Reader>, Error> {
        if let Some(reader) = self.cache.get(&file_number) {
            return Ok(reader);
        }

        let path = self.table_path(file_number)?;
        let file = std::fs::File::open(&path)?;
        let file_size = std::fs::metadata(&path)?.len();

        let reader = Arc::new(Reader::open(file, file_size, self.comparator, self.verify_checksums)?);
        tracing::debug!(file_number, "constructed table reader");
        self.cache.insert(file_number, Arc::clone(&reader));
        Ok(reader)
    }

    /// A live file may be stored under either extension; try the current `.ldb` name first and
    /// fall back to the legacy `.sst` name before giving up.
    fn table_path(&self, file_number: u64) -> Result<PathBuf, Error> {
        let ldb_path = self.dir.join(LevelDBFileName::Table(file_number).file_name());
        if ldb_path.exists() {
            return Ok(ldb_path);
        }

        let sst_path = self
            .dir
            .join(LevelDBFileName::TableLegacyExtension(file_number).file_name());
        if sst_path.exists() {
            return Ok(sst_path);
        }

        Ok(ldb_path)
    }
}
