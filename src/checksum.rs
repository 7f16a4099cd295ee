//! CRC32C (Castagnoli) checksums with LevelDB's masking.
//!
//! LevelDB never stores a raw CRC32C on disk. Instead, it "masks" the checksum so that a CRC of
//! data that happens to itself look like a CRC32C-framed record (e.g. when a log file is embedded
//! inside another log file) doesn't produce a false positive. The mask is reversible.

/// `((c >> 15) | (c << 17)) + 0xa282ead8`, wrapping.
const CHECKSUM_MASK_DELTA: u32 = 0xa282_ead8;

#[must_use]
pub fn mask_checksum(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(CHECKSUM_MASK_DELTA)
}

#[must_use]
pub fn unmask_checksum(masked_crc: u32) -> u32 {
    masked_crc.wrapping_sub(CHECKSUM_MASK_DELTA).rotate_left(15)
}

#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

#[must_use]
pub fn crc32c_extend(crc_so_far: u32, more_data: &[u8]) -> u32 {
    crc32c::crc32c_append(crc_so_far, more_data)
}
