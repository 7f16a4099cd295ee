//! A read-only reimplementation of the LevelDB on-disk format: given a quiesced database
//! directory (a `CURRENT` file, `MANIFEST-*` descriptor log, and `*.ldb` sorted-string tables),
//! answers point lookups without replaying any write-ahead log or touching a memtable.
//!
//! See [`Database::open`] and [`Database::get`].

mod checksum;
mod comparator;
mod config_constants;
mod database_files;
mod db;
mod error;
mod format;
mod io_file;
mod options;
mod span;
mod table;
mod table_cache;
mod version;
mod write_log;

pub use self::db::{Database, GetResult};
pub use self::error::{Corruption, Error, Result};
pub use self::options::Options;
