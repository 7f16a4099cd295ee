//! Recognizing and naming the files that make up a LevelDB database directory.

use std::path::{Path, PathBuf};

/// The kind of a file found inside a LevelDB database directory, along with the data needed to
/// name or recognize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDBFileName {
    /// `NNNNNN.log` — a write-ahead log; ignored by this read-only engine.
    Log(u64),
    /// `LOCK`; ignored by this read-only engine.
    Lockfile,
    /// `NNNNNN.ldb` — a sorted-string table file.
    Table(u64),
    /// `NNNNNN.sst` — a legacy alias for a table file.
    TableLegacyExtension(u64),
    /// `MANIFEST-NNNNNN` — a descriptor log.
    Manifest(u64),
    /// `CURRENT`.
    Current,
    /// `LOG`; ignored by this read-only engine.
    InfoLog,
    /// `LOG.old`; ignored by this read-only engine.
    OldInfoLog,
}

impl LevelDBFileName {
    /// Recognizes a file name (not a full path) as one of the LevelDB database file kinds.
    /// Returns `None` for anything this engine doesn't recognize (and thus ignores).
    #[must_use]
    pub fn parse(file_name: &Path) -> Option<Self> {
        let file_name = file_name.to_str()?;

        if file_name == "CURRENT" {
            return Some(Self::Current);
        }
        if file_name == "LOCK" {
            return Some(Self::Lockfile);
        }
        if file_name == "LOG" {
            return Some(Self::InfoLog);
        }
        if file_name == "LOG.old" {
            return Some(Self::OldInfoLog);
        }

        if let Some(number) = file_name.strip_prefix("MANIFEST-") {
            return parse_file_number(number).map(Self::Manifest);
        }

        if let Some(number) = file_name.strip_suffix(".log") {
            return parse_file_number(number).map(Self::Log);
        }
        if let Some(number) = file_name.strip_suffix(".ldb") {
            return parse_file_number(number).map(Self::Table);
        }
        if let Some(number) = file_name.strip_suffix(".sst") {
            return parse_file_number(number).map(Self::TableLegacyExtension);
        }

        None
    }

    #[must_use]
    pub fn file_name(self) -> PathBuf {
        match self {
            Self::Log(number)                  => format!("{number:06}.log").into(),
            Self::Lockfile                      => "LOCK".into(),
            Self::Table(number)                 => format!("{number:06}.ldb").into(),
            Self::TableLegacyExtension(number)  => format!("{number:06}.sst").into(),
            Self::Manifest(number)              => format!("MANIFEST-{number:06}").into(),
            Self::Current                       => "CURRENT".into(),
            Self::InfoLog                       => "LOG".into(),
            Self::OldInfoLog                    => "LOG.old".into(),
        }
    }
}

/// A file number is a run of ASCII digits with no leading `+` sign. Leading zeroes are
/// permitted (and expected, since file names are zero-padded to six digits).
fn parse_file_number(digits: &str) -> Option<u64> {
    if digits.is_empty() || digits.starts_with('+') {
        return None;
    }
    digits.parse().ok()
}
