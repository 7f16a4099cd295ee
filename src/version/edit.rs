//! Decoding one manifest log record's tagged fields.

use std::collections::BTreeSet;

use bijective_enum_map::injective_enum_map;

use crate::error::Corruption;
use crate::format::InternalKey;
use crate::span::SpanReader;

use super::file_metadata::FileMetadata;
use super::level::Level;

/// The tag a version-edit field is prefixed with in its encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTag {
    Comparator,
    LogNumber,
    NextFileNumber,
    LastSequence,
    CompactPointer,
    DeletedFile,
    NewFile,
    /// No longer written by a modern manifest, but a reader must still recognize it.
    PrevLogNumber,
}

injective_enum_map! {
    EditTag, u32,
    Comparator     <=> 1,
    LogNumber      <=> 2,
    NextFileNumber <=> 3,
    LastSequence   <=> 4,
    CompactPointer <=> 5,
    DeletedFile    <=> 6,
    NewFile        <=> 7,
    // Tag 8 is intentionally unused.
    PrevLogNumber  <=> 9,
}

/// One decoded manifest log record: a sparse set of updates to the cumulative version state.
///
/// Single-valued fields overwrite whatever an earlier edit set; `deleted_files`/`new_files`
/// accumulate across edits (the accumulated removal happens once, after every edit in the
/// manifest has been folded in — see [`super::manifest::Manifest::open`]).
#[derive(Debug, Default)]
pub struct VersionEdit {
    pub comparator_name:  Option<String>,
    pub log_number:       Option<u64>,
    pub prev_log_number:  Option<u64>,
    pub next_file_number: Option<u64>,
    pub last_sequence:    Option<u64>,
    pub compact_pointers: Vec<(Level, Vec<u8>)>,
    pub deleted_files:    BTreeSet<(Level, u64)>,
    pub new_files:        Vec<(Level, FileMetadata)>,
}

impl VersionEdit {
    pub fn decode(payload: &[u8]) -> Result<Self, Corruption> {
        let mut edit = Self::default();
        let mut reader = SpanReader::new(payload);

        while !reader.eof() {
            let tag = reader.read_varint_u64()?;
            let raw_tag = u32::try_from(tag).unwrap_or(u32::MAX);
            let tag = EditTag::try_from(raw_tag).map_err(|_| Corruption::BadVersionEditTag(raw_tag))?;

            match tag {
                EditTag::Comparator => {
                    edit.comparator_name = Some(reader.read_length_prefixed_string()?.to_owned());
                }
                EditTag::LogNumber => {
                    edit.log_number = Some(reader.read_varint_u64()?);
                }
                EditTag::PrevLogNumber => {
                    edit.prev_log_number = Some(reader.read_varint_u64()?);
                }
                EditTag::NextFileNumber => {
                    edit.next_file_number = Some(reader.read_varint_u64()?);
                }
                EditTag::LastSequence => {
                    edit.last_sequence = Some(reader.read_varint_u64()?);
                }
                EditTag::CompactPointer => {
                    let level = read_level(&mut reader)?;
                    let key = reader.read_length_prefixed_bytes()?.to_vec();
                    edit.compact_pointers.push((level, key));
                }
                EditTag::DeletedFile => {
                    let level = read_level(&mut reader)?;
                    let file_number = reader.read_varint_u64()?;
                    edit.deleted_files.insert((level, file_number));
                }
                EditTag::NewFile => {
                    let level = read_level(&mut reader)?;
                    let file_number = reader.read_varint_u64()?;
                    let file_size = reader.read_varint_u64()?;
                    let smallest = reader.read_length_prefixed_bytes()?;
                    let smallest = InternalKey::decode(smallest)?;
                    let largest = reader.read_length_prefixed_bytes()?;
                    let largest = InternalKey::decode(largest)?;

                    let metadata = FileMetadata::new(file_number, file_size, smallest, largest);
                    edit.new_files.push((level, metadata));
                }
            }
        }

        Ok(edit)
    }
}

fn read_level(reader: &mut SpanReader<'_>) -> Result<Level, Corruption> {
    let level = reader.read_varint_u64()?;
    let level = u32::try_from(level).map_err(|_| Corruption::BadLevel)?;
    Level::try_from(level)
}
