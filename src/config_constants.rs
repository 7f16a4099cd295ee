//! Constants fixed by the on-disk format, not by runtime configuration.

/// Number of levels in the LSM tree. Fixed by the on-disk format: a `Level` tag decoded from a
/// MANIFEST record greater than this is corruption, not merely "a level this reader doesn't keep
/// table files for".
pub const NUM_LEVELS: u8 = 7;

pub const NUM_LEVELS_USIZE: usize = NUM_LEVELS as usize;

/// Size of a block in the write-ahead/MANIFEST log framing (not to be confused with a table
/// block, which has no fixed size).
pub const WRITE_LOG_BLOCK_SIZE: usize = 1 << 15;

/// Size of a log record header: 4-byte masked CRC, 2-byte length, 1-byte record type.
pub const LOG_HEADER_SIZE: usize = 4 + 2 + 1;
