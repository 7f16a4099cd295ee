//! Reassembles user records from the 32 KiB-block framed log format.
//!
//! Unlike the reference implementation this reader is grounded on, records are reassembled into
//! an owned buffer rather than borrowed in place; a read-only point-lookup engine replays the
//! MANIFEST once at open and never revisits it, so the extra copy is immaterial, and it avoids
//! the `unsafe` lifetime-extension tricks the in-place version needs.

use std::io::Read;

use crate::checksum;
use crate::config_constants::{LOG_HEADER_SIZE, WRITE_LOG_BLOCK_SIZE};
use crate::error::Corruption;

const RECORD_TYPE_ZERO:   u8 = 0;
const RECORD_TYPE_FULL:   u8 = 1;
const RECORD_TYPE_FIRST:  u8 = 2;
const RECORD_TYPE_MIDDLE: u8 = 3;
const RECORD_TYPE_LAST:   u8 = 4;

/// Reads successive user records out of a block-framed log stream.
pub struct LogReader<R> {
    source:           R,
    verify_checksums: bool,
    block:            Vec<u8>,
    /// Valid bytes currently held in `block` (may be less than a full block, at EOF).
    block_len:        usize,
    /// Cursor into `block`.
    block_pos:        usize,
    /// Whether the underlying source has been exhausted.
    source_exhausted: bool,
}

impl<R: Read> LogReader<R> {
    #[must_use]
    pub fn new(source: R, verify_checksums: bool) -> Self {
        Self {
            source,
            verify_checksums,
            block: vec![0; WRITE_LOG_BLOCK_SIZE],
            block_len: 0,
            block_pos: 0,
            source_exhausted: false,
        }
    }

    /// Reads the next user record, reassembling `First`/`Middle`/`Last` fragments as needed.
    /// Returns `Ok(None)` at a clean end of stream (no fragment left dangling).
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>, Corruption> {
        let mut in_progress: Option<Vec<u8>> = None;

        loop {
            if self.block_pos + LOG_HEADER_SIZE > self.block_len {
                // Not enough left in the buffered block for another header: the rest, if any,
                // is zero padding. Refill and retry.
                if !self.refill_block()? {
                    return if in_progress.is_some() {
                        Err(Corruption::TruncatedLogRecord)
                    } else {
                        Ok(None)
                    };
                }
                continue;
            }

            let header_start = self.block_pos;
            let masked_crc = u32::from_le_bytes(
                self.block[header_start..header_start + 4].try_into().expect("4 bytes"),
            );
            let length = u16::from_le_bytes(
                self.block[header_start + 4..header_start + 6].try_into().expect("2 bytes"),
            ) as usize;
            let record_type = self.block[header_start + 6];

            let payload_start = header_start + LOG_HEADER_SIZE;
            let payload_end = payload_start + length;

            if record_type == RECORD_TYPE_ZERO && length == 0 {
                // Padding marker; the remainder of the block is padding too.
                self.block_pos = self.block_len;
                continue;
            }

            if payload_end > self.block_len {
                return Err(Corruption::BadLogHeader);
            }

            let payload = &self.block[payload_start..payload_end];

            if self.verify_checksums {
                let computed = checksum::crc32c_extend(checksum::crc32c(&[record_type]), payload);
                if checksum::unmask_checksum(masked_crc) != computed {
                    return Err(Corruption::BadLogChecksum);
                }
            }

            self.block_pos = payload_end;

            match record_type {
                RECORD_TYPE_FULL => {
                    if in_progress.is_some() {
                        return Err(Corruption::UnexpectedContinuation);
                    }
                    return Ok(Some(payload.to_vec()));
                }
                RECORD_TYPE_FIRST => {
                    if in_progress.is_some() {
                        return Err(Corruption::UnexpectedContinuation);
                    }
                    in_progress = Some(payload.to_vec());
                }
                RECORD_TYPE_MIDDLE => {
                    let Some(buffer) = in_progress.as_mut() else {
                        return Err(Corruption::UnexpectedContinuation);
                    };
                    buffer.extend_from_slice(payload);
                }
                RECORD_TYPE_LAST => {
                    let Some(mut buffer) = in_progress.take() else {
                        return Err(Corruption::UnexpectedContinuation);
                    };
                    buffer.extend_from_slice(payload);
                    return Ok(Some(buffer));
                }
                other => return Err(Corruption::BadLogRecordType(other)),
            }
        }
    }

    /// Loads the next 32 KiB block (or the final, possibly short, block) from the source.
    /// Returns `Ok(false)` if there was nothing left to read.
    fn refill_block(&mut self) -> Result<bool, Corruption> {
        if self.source_exhausted {
            return Ok(false);
        }

        let mut filled = 0;
        while filled < self.block.len() {
            match self.source.read(&mut self.block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return Err(Corruption::TruncatedLogRecord),
            }
        }

        self.block_len = filled;
        self.block_pos = 0;
        if filled < self.block.len() {
            self.source_exhausted = true;
        }
        Ok(filled > 0)
    }
}
