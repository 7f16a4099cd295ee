//! The crate-wide error type and its `Corruption` sub-kinds.
//!
//! Sub-kinds of [`Corruption`] are informational only: every one of them is recoverable at the
//! API boundary by simply failing the call that triggered it. They exist so that tests and
//! diagnostics can distinguish "the checksum was wrong" from "the comparator name is unknown"
//! without parsing a message string.

use std::io::Error as IoError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("corruption: {0}")]
    Corruption(#[from] Corruption),

    #[error("unsupported comparator {name:?}; only \"leveldb.BytewiseComparator\" is supported")]
    UnsupportedComparator { name: String },

    #[error("unsupported block compression type {0}")]
    UnsupportedCompression(u8),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A structural violation of the on-disk format: a bad checksum, malformed framing, an unknown
/// tag, and so on. Every variant here is detected by a decoder that could otherwise keep reading
/// garbage; once returned, the read that triggered it fails, but the database as a whole is not
/// necessarily unusable (a corrupt table at a deep level does not prevent lookups into tables
/// above it, except where doing so would be unsound — see the log replay rules in `version`).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    #[error("span ended before the expected field")]
    Truncated,
    #[error("malformed varint")]
    BadVarint,

    #[error("bad log record header")]
    BadLogHeader,
    #[error("log record checksum mismatch")]
    BadLogChecksum,
    #[error("unknown log record type {0}")]
    BadLogRecordType(u8),
    #[error("log record was truncated mid-fragment")]
    TruncatedLogRecord,
    #[error("a First/Middle/Last log record sequence was malformed")]
    UnexpectedContinuation,

    #[error("unknown version-edit tag {0}")]
    BadVersionEditTag(u32),
    #[error("a level tag in a version edit exceeded the number of levels")]
    BadLevel,

    #[error("table footer magic number did not match")]
    BadTableMagic,
    #[error("table block checksum mismatch")]
    BadBlockChecksum,
    #[error("table block trailer was malformed")]
    BadBlockTrailer,
    #[error("table block was truncated")]
    TruncatedBlock,
    #[error("table block restart array was malformed")]
    BadRestart,

    #[error("CURRENT file did not name a MANIFEST file")]
    BadCurrentFile,
    #[error("internal key was too short to contain a trailer")]
    BadInternalKey,
    #[error("unknown value-type tag {0}")]
    BadEntryType(u8),
}
