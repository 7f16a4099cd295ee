//! The small configuration surface accepted by [`crate::Database::open_with_options`].

/// Options controlling how a [`crate::Database`] is opened.
///
/// `Options::default()` verifies every checksum, and gives every live table a reader that is
/// cached for the database's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// When `false`, block and log-record checksums are decoded but not compared against the
    /// recomputed CRC. Exists so a caller can trade integrity checking for throughput on data it
    /// has already verified by other means; mirrors the read-option LevelDB itself exposes.
    pub verify_checksums: bool,

    /// Bounds the number of table readers kept open at once. `None` (the default) pins a reader
    /// for every live file for the database's lifetime. `Some(capacity)` evicts the
    /// least-recently-used reader once `capacity` is exceeded; a reader in active use is never
    /// evicted out from under its caller, since callers hold their own `Arc` to it.
    pub table_reader_cache_capacity: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verify_checksums:            true,
            table_reader_cache_capacity: None,
        }
    }
}
