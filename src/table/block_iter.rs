//! Binary-search-then-linear-scan lookup within a single table block.
//!
//! The same algorithm serves both the index block (whose "values" are encoded
//! [`super::footer::BlockHandle`]s) and a data block (whose values are the user's bytes): find
//! the restart point that brackets the target key via binary search over the restart array,
//! then linearly scan forward, reconstructing each key via prefix-compression, until an entry
//! whose key is not less than the target is found.

use std::cmp::Ordering;

use integer_encoding::VarInt as _;

use crate::comparator::{Comparator, InternalKeyComparator};
use crate::error::Corruption;

/// Size of a restart-point offset, and of the trailing restart count: both are `u32` LE.
const U32_LEN: usize = 4;

/// A cursor over one table block's entries, reconstructing keys via prefix compression as it
/// advances.
pub struct BlockIter<'a> {
    block:           &'a [u8],
    restarts_offset: usize,
    num_restarts:    usize,
    /// Byte offset within `block` of the next entry to decode.
    next_offset:     usize,
    key:             Vec<u8>,
    value_start:     usize,
    value_len:       usize,
    valid:           bool,
}

impl<'a> BlockIter<'a> {
    pub fn new(block: &'a [u8]) -> Result<Self, Corruption> {
        if block.len() < U32_LEN {
            return Err(Corruption::BadRestart);
        }
        let num_restarts = u32::from_le_bytes(
            block[block.len() - U32_LEN..].try_into().expect("4 bytes"),
        ) as usize;

        let restarts_offset = block
            .len()
            .checked_sub(U32_LEN * (1 + num_restarts))
            .ok_or(Corruption::BadRestart)?;

        Ok(Self {
            block,
            restarts_offset,
            num_restarts,
            next_offset: 0,
            key: Vec::new(),
            value_start: 0,
            value_len: 0,
            valid: false,
        })
    }

    #[must_use]
    pub fn valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &'a [u8] {
        &self.block[self.value_start..self.value_start + self.value_len]
    }

    fn restart_point_offset(&self, index: usize) -> Result<usize, Corruption> {
        let at = self.restarts_offset + U32_LEN * index;
        let bytes: [u8; 4] = self.block[at..at + U32_LEN].try_into().expect("4 bytes");
        let offset = u32::from_le_bytes(bytes) as usize;
        if offset >= self.restarts_offset {
            return Err(Corruption::BadRestart);
        }
        Ok(offset)
    }

    fn seek_to_restart(&mut self, index: usize) -> Result<(), Corruption> {
        self.next_offset = self.restart_point_offset(index)?;
        self.key.clear();
        self.advance()?;
        Ok(())
    }

    /// Decodes the entry at `self.next_offset`, updating `self.key`/value and advancing
    /// `self.next_offset` past it. Sets `self.valid = false` once the restart array is reached.
    fn advance(&mut self) -> Result<(), Corruption> {
        if self.next_offset >= self.restarts_offset {
            self.valid = false;
            return Ok(());
        }

        let entry = &self.block[self.next_offset..self.restarts_offset];
        let (shared, n1) = usize::decode_var(entry).ok_or(Corruption::BadRestart)?;
        let (non_shared, n2) = usize::decode_var(&entry[n1..]).ok_or(Corruption::BadRestart)?;
        let (value_len, n3) = usize::decode_var(&entry[n1 + n2..]).ok_or(Corruption::BadRestart)?;

        if shared > self.key.len() {
            return Err(Corruption::BadRestart);
        }

        let key_delta_start = self.next_offset + n1 + n2 + n3;
        let key_delta_end = key_delta_start
            .checked_add(non_shared)
            .ok_or(Corruption::BadRestart)?;
        let value_end = key_delta_end
            .checked_add(value_len)
            .ok_or(Corruption::BadRestart)?;
        if value_end > self.restarts_offset {
            return Err(Corruption::BadRestart);
        }

        self.key.truncate(shared);
        self.key.extend_from_slice(&self.block[key_delta_start..key_delta_end]);
        self.value_start = key_delta_end;
        self.value_len = value_len;
        self.next_offset = value_end;
        self.valid = true;
        Ok(())
    }

    /// Positions the cursor at the first entry whose key is not less than `target`, per the
    /// comparator `cmp`. If no such entry exists, `self.valid()` is `false` afterwards.
    pub fn seek<Cmp: Comparator>(
        &mut self,
        cmp:    &InternalKeyComparator<Cmp>,
        target: &[u8],
    ) -> Result<(), Corruption> {
        if self.num_restarts == 0 {
            self.valid = false;
            return Ok(());
        }

        let mut left = 0_usize;
        let mut right = self.num_restarts - 1;
        while left < right {
            let mid = left + (right - left).div_ceil(2);
            self.seek_to_restart(mid)?;
            if cmp.compare(&self.key, target)? == Ordering::Less {
                left = mid;
            } else {
                right = mid - 1;
            }
        }

        self.seek_to_restart(left)?;
        while self.valid && cmp.compare(&self.key, target)? == Ordering::Less {
            self.advance()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use integer_encoding::VarIntWriter as _;

    use crate::comparator::BytewiseComparator;

    use super::*;

    /// Builds a block with a restart point before every entry (the simplest, and most common,
    /// restart interval of 1), for a sorted list of `(key, value)` pairs.
    fn build_block(entries: &[(&[u8], &[u8])]) -> Vec<u8> {
        let mut block = Vec::new();
        let mut restarts = Vec::new();

        for &(key, value) in entries {
            restarts.push(block.len() as u32);
            block.write_varint(0_usize).unwrap(); // shared
            block.write_varint(key.len()).unwrap(); // non_shared
            block.write_varint(value.len()).unwrap();
            block.extend_from_slice(key);
            block.extend_from_slice(value);
        }

        for restart in &restarts {
            block.extend_from_slice(&restart.to_le_bytes());
        }
        block.extend_from_slice(&(restarts.len() as u32).to_le_bytes());
        block
    }

    #[test]
    fn seek_finds_exact_and_nearest_successor() {
        let entries: &[(&[u8], &[u8])] = &[
            (b"apple", b"1"),
            (b"banana", b"2"),
            (b"cherry", b"3"),
        ];
        let block = build_block(entries);
        let cmp = InternalKeyComparator::new(BytewiseComparator);

        let mut iter = BlockIter::new(&block).unwrap();
        iter.seek(&cmp, b"banana").unwrap();
        assert!(iter.valid());
        assert_eq!(iter.key(), b"banana");
        assert_eq!(iter.value(), b"2");

        let mut iter = BlockIter::new(&block).unwrap();
        iter.seek(&cmp, b"b").unwrap();
        assert!(iter.valid());
        assert_eq!(iter.key(), b"banana");

        let mut iter = BlockIter::new(&block).unwrap();
        iter.seek(&cmp, b"zzz").unwrap();
        assert!(!iter.valid());
    }

    #[test]
    fn prefix_compression_round_trip() {
        // Encoding then decoding a sorted sequence of keys via shared/non-shared prefix coding
        // (with restart interval 1, the simplest case) must reproduce the input.
        let entries: &[(&[u8], &[u8])] = &[
            (b"key1", b"v1"),
            (b"key2", b"v2"),
            (b"key3333", b"v3"),
        ];
        let block = build_block(entries);

        let mut iter = BlockIter::new(&block).unwrap();
        iter.seek_to_restart(0).unwrap();
        for &(key, value) in entries {
            assert!(iter.valid());
            assert_eq!(iter.key(), key);
            assert_eq!(iter.value(), value);
            iter.advance().unwrap();
        }
        assert!(!iter.valid());
    }
}
