//! The fixed 48-byte footer at the end of every table file.

use integer_encoding::VarInt as _;

use crate::error::Corruption;

/// Maximum varint-encoded length of a single `BlockHandle` (two varint64s).
const HANDLE_MAX_ENCODED_LENGTH: usize = 20;

/// Magic number stored in the last 8 bytes of a table file, little-endian.
pub const TABLE_MAGIC: u64 = 0xdb47_7524_8b80_fb57;

pub const FOOTER_ENCODED_LENGTH: usize = 2 * HANDLE_MAX_ENCODED_LENGTH + 8;

/// Names a contiguous byte range inside a table file: `(offset, size)`, excluding the 5-byte
/// block trailer that immediately follows `size` bytes of block contents on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle {
    pub offset: u64,
    pub size:   u64,
}

impl BlockHandle {
    pub(crate) fn decode_from(data: &[u8]) -> Result<(Self, usize), Corruption> {
        let (offset, offset_len) = u64::decode_var(data).ok_or(Corruption::BadVarint)?;
        let (size, size_len) = u64::decode_var(&data[offset_len..]).ok_or(Corruption::BadVarint)?;
        Ok((Self { offset, size }, offset_len + size_len))
    }
}

/// The two block handles and magic number stored in a table file's footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFooter {
    pub metaindex_handle: BlockHandle,
    pub index_handle:     BlockHandle,
}

impl TableFooter {
    /// Decodes a footer from the trailing [`FOOTER_ENCODED_LENGTH`] bytes of a table file.
    pub fn decode_from(footer_bytes: &[u8; FOOTER_ENCODED_LENGTH]) -> Result<Self, Corruption> {
        let magic_bytes: [u8; 8] = footer_bytes[FOOTER_ENCODED_LENGTH - 8..]
            .try_into()
            .expect("exactly 8 bytes");
        if u64::from_le_bytes(magic_bytes) != TABLE_MAGIC {
            return Err(Corruption::BadTableMagic);
        }

        let (metaindex_handle, consumed) = BlockHandle::decode_from(footer_bytes)?;
        let (index_handle, _) = BlockHandle::decode_from(&footer_bytes[consumed..])?;

        Ok(Self { metaindex_handle, index_handle })
    }
}
