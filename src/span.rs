//! A cursor over an immutable byte span, used to decode the various little-endian and
//! varint-encoded fields that appear throughout the on-disk format.

use integer_encoding::VarInt;

use crate::error::Corruption;

/// A read-only cursor into a borrowed byte slice.
///
/// All `read_*` methods advance the cursor and fail with [`Corruption::Truncated`] if the span
/// does not hold enough bytes for the requested field.
#[derive(Debug, Clone, Copy)]
pub struct SpanReader<'a> {
    data: &'a [u8],
    pos:  usize,
}

impl<'a> SpanReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub const fn eof(&self) -> bool {
        self.pos == self.data.len()
    }

    #[must_use]
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn skip(&mut self, n: usize) -> Result<(), Corruption> {
        if self.remaining() < n {
            return Err(Corruption::Truncated);
        }
        self.pos += n;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Corruption> {
        if self.remaining() < n {
            return Err(Corruption::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, Corruption> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32_le(&mut self) -> Result<i32, Corruption> {
        let bytes: [u8; 4] = self.take(4)?.try_into().expect("exactly 4 bytes");
        Ok(i32::from_le_bytes(bytes))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, Corruption> {
        let bytes: [u8; 4] = self.take(4)?.try_into().expect("exactly 4 bytes");
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, Corruption> {
        let bytes: [u8; 8] = self.take(8)?.try_into().expect("exactly 8 bytes");
        Ok(u64::from_le_bytes(bytes))
    }

    /// Decode an unsigned LEB128 varint, up to 10 bytes (the maximum needed for a u64).
    pub fn read_varint_u64(&mut self) -> Result<u64, Corruption> {
        // `decode_var` returns `None` if the varint never terminates within the slice, or if it
        // would need more than 10 bytes to represent a u64.
        let (value, bytes_read) = u64::decode_var(self.remaining_slice())
            .ok_or(Corruption::BadVarint)?;
        self.pos += bytes_read;
        Ok(value)
    }

    pub fn read_length_prefixed_bytes(&mut self) -> Result<&'a [u8], Corruption> {
        let len = self.read_varint_u64()?;
        let len = usize::try_from(len).map_err(|_| Corruption::BadVarint)?;
        self.take(len)
    }

    pub fn read_length_prefixed_string(&mut self) -> Result<&'a str, Corruption> {
        let bytes = self.read_length_prefixed_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| Corruption::BadVarint)
    }
}

#[cfg(test)]
mod tests {
    use integer_encoding::VarInt as _;

    use super::*;

    #[test]
    fn varint_round_trip() {
        // Every u64 must round-trip through write then read, using 1 to 10 bytes.
        let cases = [
            0_u64,
            1,
            127,
            128,
            16383,
            16384,
            u32::MAX as u64,
            u64::MAX - 1,
            u64::MAX,
        ];
        for &n in &cases {
            let mut buf = [0_u8; 10];
            let written = n.encode_var(&mut buf);
            assert!((1..=10).contains(&written));

            let mut reader = SpanReader::new(&buf[..written]);
            let decoded = reader.read_varint_u64().unwrap();
            assert_eq!(decoded, n);
            assert!(reader.eof());
        }
    }

    #[test]
    fn length_prefixed_bytes_round_trip() {
        let mut buf = Vec::new();
        let payload = b"hello, leveldb";
        let len = payload.len() as u64;
        let mut len_buf = [0_u8; 10];
        let len_bytes = len.encode_var(&mut len_buf);
        buf.extend_from_slice(&len_buf[..len_bytes]);
        buf.extend_from_slice(payload);

        let mut reader = SpanReader::new(&buf);
        assert_eq!(reader.read_length_prefixed_bytes().unwrap(), payload);
        assert!(reader.eof());
    }

    #[test]
    fn over_read_is_corruption() {
        let mut reader = SpanReader::new(&[1, 2]);
        assert!(reader.read_u32_le().is_err());
    }
}
