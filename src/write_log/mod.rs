//! The block-framed record log used for both the MANIFEST descriptor log and (ignored by this
//! read-only engine) the per-database write-ahead log.

mod reader;

pub use self::reader::LogReader;
