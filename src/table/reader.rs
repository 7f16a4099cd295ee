//! `TableReader::get`, wiring together the footer, index block, and data block lookups into a
//! single point lookup.

use std::cmp::Ordering;

use crate::comparator::{Comparator, InternalKeyComparator};
use crate::error::Error;
use crate::format::{encode_probe_key, EntryType, InternalKey};
use crate::io_file::RandomAccessFile;

use super::block::read_block;
use super::block_iter::BlockIter;
use super::footer::{BlockHandle, TableFooter, FOOTER_ENCODED_LENGTH};

/// The outcome of a point lookup in a single table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetResult {
    NotFound,
    Found(Vec<u8>),
    Deleted,
}

/// An open `.ldb` file: its footer has been parsed and its index block loaded, so a `Get` only
/// needs to read (at most) one more data block.
pub struct TableReader<File, Cmp> {
    file:             File,
    index_block:      Vec<u8>,
    comparator:       InternalKeyComparator<Cmp>,
    verify_checksums: bool,
}

impl<File: RandomAccessFile, Cmp: Comparator> TableReader<File, Cmp> {
    pub fn open(
        file:             File,
        file_size:        u64,
        comparator:       InternalKeyComparator<Cmp>,
        verify_checksums: bool,
    ) -> Result<Self, Error> {
        let footer_len = FOOTER_ENCODED_LENGTH as u64;
        if file_size < footer_len {
            return Err(crate::error::Corruption::TruncatedBlock.into());
        }

        let mut footer_bytes = [0_u8; FOOTER_ENCODED_LENGTH];
        file.read_exact_at(file_size - footer_len, &mut footer_bytes)?;
        let footer = TableFooter::decode_from(&footer_bytes)?;

        let index_block = read_block(&file, footer.index_handle, verify_checksums)?;

        Ok(Self { file, index_block, comparator, verify_checksums })
    }

    /// Locates the candidate data block via the index, then binary-searches and linearly scans
    /// within it for the most recent record matching `user_key`.
    pub fn get(&self, user_key: &[u8]) -> Result<GetResult, Error> {
        let probe = encode_probe_key(user_key);

        let mut index_iter = BlockIter::new(&self.index_block)?;
        index_iter.seek(&self.comparator, &probe)?;
        if !index_iter.valid() {
            return Ok(GetResult::NotFound);
        }

        let (handle, _) = BlockHandle::decode_from(index_iter.value())?;
        let data_block = read_block(&self.file, handle, self.verify_checksums)?;

        let mut data_iter = BlockIter::new(&data_block)?;
        data_iter.seek(&self.comparator, &probe)?;
        if !data_iter.valid() {
            return Ok(GetResult::NotFound);
        }

        let found = InternalKey::decode(data_iter.key())?;
        if self.comparator.compare_user_keys(found.user_key.0, user_key) != Ordering::Equal {
            return Ok(GetResult::NotFound);
        }

        match EntryType::try_from(found.entry_type_tag)? {
            EntryType::Value => Ok(GetResult::Found(data_iter.value().to_vec())),
            EntryType::Deletion => Ok(GetResult::Deleted),
        }
    }
}
