//! Resolving `CURRENT`, replaying the named `MANIFEST-NNNNNN`, and planning which table files a
//! `Get` should try, in order.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::path::Path;

use crate::comparator::{BytewiseComparator, InternalKeyComparator, BYTEWISE_COMPARATOR_NAME};
use crate::config_constants::NUM_LEVELS_USIZE;
use crate::database_files::LevelDBFileName;
use crate::error::{Corruption, Error};
use crate::write_log::LogReader;

use super::edit::VersionEdit;
use super::file_metadata::FileMetadata;
use super::level::Level;

/// The cumulative, immutable state built by replaying a manifest: which table files are live at
/// each level, and their key ranges.
///
/// Level 0 is kept sorted in descending file-number order (most recent first), since its ranges
/// may overlap. Levels 1 and up are kept sorted in ascending order of their smallest internal
/// key, and are disjoint, so that order also holds for their largest keys.
#[derive(Debug)]
pub struct Manifest {
    comparator:       InternalKeyComparator<BytewiseComparator>,
    levels:           Vec<Vec<FileMetadata>>,
    #[expect(dead_code, reason = "retained for parity with the replayed state; not yet read")]
    last_sequence:    u64,
}

impl Manifest {
    /// Resolves `CURRENT`, opens the named manifest, and replays its version edits.
    pub fn open(dir: &Path, verify_checksums: bool) -> Result<Self, Error> {
        let manifest_path = resolve_current(dir)?;
        let file = File::open(&manifest_path)?;
        let mut reader = LogReader::new(file, verify_checksums);

        let mut comparator_name: Option<String> = None;
        let mut last_sequence: u64 = 0;
        let mut deleted_files: std::collections::BTreeSet<(Level, u64)> = Default::default();
        let mut new_files: Vec<(Level, FileMetadata)> = Vec::new();

        loop {
            let record = match reader.read_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(corruption) => {
                    // Mirrors the reference implementation's recovery behavior: a manifest that
                    // was not closed cleanly simply ends at the last well-formed record.
                    tracing::warn!(?corruption, "stopping manifest replay at a corrupt record");
                    break;
                }
            };

            let edit = VersionEdit::decode(&record)?;

            if let Some(name) = edit.comparator_name {
                comparator_name = Some(name);
            }
            if let Some(seq) = edit.last_sequence {
                last_sequence = seq;
            }
            deleted_files.extend(edit.deleted_files);
            new_files.extend(edit.new_files);
        }

        let comparator_name = comparator_name.unwrap_or_default();
        if comparator_name != BYTEWISE_COMPARATOR_NAME {
            return Err(Error::UnsupportedComparator { name: comparator_name });
        }

        let mut levels: Vec<Vec<FileMetadata>> =
            (0..NUM_LEVELS_USIZE).map(|_| Vec::new()).collect();
        for (level, metadata) in new_files {
            if deleted_files.contains(&(level, metadata.file_number())) {
                continue;
            }
            levels[level.as_usize()].push(metadata);
        }

        let comparator = InternalKeyComparator::new(BytewiseComparator);
        levels[0].sort_unstable_by(|a, b| b.file_number().cmp(&a.file_number()));
        for level_files in levels.iter_mut().skip(1) {
            level_files.sort_unstable_by(|a, b| {
                comparator.compare_user_keys(a.smallest_user_key().0, b.smallest_user_key().0)
            });
        }

        Ok(Self { comparator, levels, last_sequence })
    }

    #[must_use]
    pub const fn comparator(&self) -> &InternalKeyComparator<BytewiseComparator> {
        &self.comparator
    }

    /// Every table file number referenced by the live version, across all levels.
    pub fn live_file_numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.levels.iter().flatten().map(FileMetadata::file_number)
    }

    /// The ordered sequence of table files that may contain `user_key`, most recent first.
    #[must_use]
    pub fn candidates_for(&self, user_key: &[u8]) -> Vec<u64> {
        let mut candidates = Vec::new();

        for file in &self.levels[0] {
            if self.range_covers(file, user_key) {
                candidates.push(file.file_number());
            }
        }

        for level_files in self.levels.iter().skip(1) {
            if level_files.is_empty() {
                continue;
            }
            let index = level_files.partition_point(|file| {
                self.comparator.compare_user_keys(file.largest_user_key().0, user_key)
                    == Ordering::Less
            });
            if let Some(file) = level_files.get(index) {
                if self.range_covers(file, user_key) {
                    candidates.push(file.file_number());
                }
            }
        }

        candidates
    }

    fn range_covers(&self, file: &FileMetadata, user_key: &[u8]) -> bool {
        self.comparator.compare_user_keys(file.smallest_user_key().0, user_key) != Ordering::Greater
            && self.comparator.compare_user_keys(user_key, file.largest_user_key().0)
                != Ordering::Greater
    }
}

/// Reads `CURRENT` and resolves it to the full path of the manifest it names.
fn resolve_current(dir: &Path) -> Result<std::path::PathBuf, Error> {
    let contents = fs::read_to_string(dir.join("CURRENT"))?;
    let name = contents.trim_end_matches('\n').trim();

    match LevelDBFileName::parse(Path::new(name)) {
        Some(LevelDBFileName::Manifest(_)) => Ok(dir.join(name)),
        _ => Err(Corruption::BadCurrentFile.into()),
    }
}
