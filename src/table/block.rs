//! Reading a single table block off disk and verifying its trailer.

use crate::checksum;
use crate::error::{Corruption, Error};
use crate::io_file::RandomAccessFile;

use super::footer::BlockHandle;

/// Length of the trailer appended to every block on disk: 1-byte compression type, 4-byte
/// masked CRC32C.
const BLOCK_TRAILER_LEN: usize = 5;

const COMPRESSION_NONE: u8 = 0;

/// Reads the block named by `handle`, verifies its checksum (unless disabled), and rejects any
/// compression type other than "none". Returns the decoded block contents (the restart-point
/// region plus the trailing restart array and count, i.e. everything except the 5-byte trailer).
pub fn read_block(
    file:             &impl RandomAccessFile,
    handle:           BlockHandle,
    verify_checksums: bool,
) -> Result<Vec<u8>, Error> {
    let size = usize::try_from(handle.size).map_err(|_| Corruption::TruncatedBlock)?;
    let mut buf = vec![0_u8; size + BLOCK_TRAILER_LEN];
    file.read_exact_at(handle.offset, &mut buf)?;

    let compression_type = buf[size];
    let masked_crc = u32::from_le_bytes(
        buf[size + 1..size + BLOCK_TRAILER_LEN].try_into().expect("4 bytes"),
    );

    if verify_checksums {
        let computed = checksum::crc32c_extend(checksum::crc32c(&buf[..size]), &[compression_type]);
        if checksum::unmask_checksum(masked_crc) != computed {
            return Err(Corruption::BadBlockChecksum.into());
        }
    }

    if compression_type != COMPRESSION_NONE {
        return Err(Error::UnsupportedCompression(compression_type));
    }

    buf.truncate(size);
    Ok(buf)
}
