//! Per-file bookkeeping retained from the manifest: a file's number, size, and key range.

use crate::format::{InternalKey, SequenceNumber, UserKey};

/// The manifest's record of one live table file.
///
/// The smallest and largest user keys are stored concatenated in a single buffer rather than as
/// two separate `Vec<u8>`s: user keys are usually short compared to a block-sized allocation, so
/// one allocation per file instead of two roughly halves the allocator traffic of holding a
/// version's full file list in memory.
#[derive(Debug)]
pub struct FileMetadata {
    file_number:           u64,
    file_size:             u64,
    user_key_buffer:       Vec<u8>,
    smallest_user_key_len: usize,
    smallest_seq:          SequenceNumber,
    smallest_entry_type:   u8,
    largest_seq:           SequenceNumber,
    largest_entry_type:    u8,
}

impl FileMetadata {
    #[must_use]
    pub fn new(
        file_number:  u64,
        file_size:    u64,
        smallest_key: InternalKey<'_>,
        largest_key:  InternalKey<'_>,
    ) -> Self {
        let smallest_user_key_len = smallest_key.user_key.0.len();

        let mut user_key_buffer =
            Vec::with_capacity(smallest_user_key_len + largest_key.user_key.0.len());
        user_key_buffer.extend(smallest_key.user_key.0);
        user_key_buffer.extend(largest_key.user_key.0);

        Self {
            file_number,
            file_size,
            user_key_buffer,
            smallest_user_key_len,
            smallest_seq:        smallest_key.sequence_number,
            smallest_entry_type: smallest_key.entry_type_tag,
            largest_seq:         largest_key.sequence_number,
            largest_entry_type:  largest_key.entry_type_tag,
        }
    }

    #[must_use]
    pub const fn file_number(&self) -> u64 {
        self.file_number
    }

    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    #[must_use]
    pub fn smallest_user_key(&self) -> UserKey<'_> {
        UserKey(&self.user_key_buffer[..self.smallest_user_key_len])
    }

    #[must_use]
    pub fn largest_user_key(&self) -> UserKey<'_> {
        UserKey(&self.user_key_buffer[self.smallest_user_key_len..])
    }

    #[must_use]
    pub fn smallest_key(&self) -> InternalKey<'_> {
        InternalKey {
            user_key:        self.smallest_user_key(),
            sequence_number: self.smallest_seq,
            entry_type_tag:  self.smallest_entry_type,
        }
    }

    #[must_use]
    pub fn largest_key(&self) -> InternalKey<'_> {
        InternalKey {
            user_key:        self.largest_user_key(),
            sequence_number: self.largest_seq,
            entry_type_tag:  self.largest_entry_type,
        }
    }

}
