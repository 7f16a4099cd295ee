//! User keys, sequence numbers, value types, and the internal-key encoding that glues them
//! together.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};

use crate::error::Corruption;

/// An opaque, borrowed user key. Ordering is defined by whichever [`crate::comparator`] is in
/// use, not by this type itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserKey<'a>(pub &'a [u8]);

impl Debug for UserKey<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "UserKey({:?})", String::from_utf8_lossy(self.0))
    }
}

/// A 56-bit sequence number assigned by the (external) writer. Larger means more recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    pub const MAX: Self = Self((1 << 56) - 1);
    pub const ZERO: Self = Self(0);
}

/// Value-type tag stored in the low byte of an internal key's trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Deletion = 0,
    Value    = 1,
}

impl EntryType {
    pub const MAX_TYPE: u8 = 1;
}

impl TryFrom<u8> for EntryType {
    type Error = Corruption;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Deletion),
            1 => Ok(Self::Value),
            other => Err(Corruption::BadEntryType(other)),
        }
    }
}

impl From<EntryType> for u8 {
    fn from(entry_type: EntryType) -> Self {
        entry_type as u8
    }
}

/// Packs a sequence number and value type into the 8-byte little-endian trailer appended to every
/// user key to form an internal key: `(sequence << 8) | value_type`.
#[must_use]
pub fn trailer(sequence: SequenceNumber, entry_type: u8) -> u64 {
    (sequence.0 << 8) | u64::from(entry_type)
}

#[must_use]
pub fn split_trailer(trailer: u64) -> (SequenceNumber, u8) {
    (SequenceNumber(trailer >> 8), (trailer & 0xff) as u8)
}

/// The trailer value used to build a "probe" internal key for point lookups: all bits set, so
/// that under the inverted-trailer ordering (`4.E`) it sorts *before* every real internal key
/// sharing the same user key, no matter what sequence number or value type that real key carries.
pub const PROBE_TRAILER: u64 = u64::MAX;

/// `user_key ‖ u64_le((sequence << 8) | value_type)`.
#[must_use]
pub fn encode_internal_key(user_key: &[u8], sequence: SequenceNumber, entry_type: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(user_key.len() + 8);
    buf.extend_from_slice(user_key);
    buf.extend_from_slice(&trailer(sequence, entry_type).to_le_bytes());
    buf
}

/// Builds the probe internal key used to seek to the first entry for a user key.
#[must_use]
pub fn encode_probe_key(user_key: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(user_key.len() + 8);
    buf.extend_from_slice(user_key);
    buf.extend_from_slice(&PROBE_TRAILER.to_le_bytes());
    buf
}

/// A borrowed, decoded internal key: a user key plus its sequence number and value type.
#[derive(Clone, Copy)]
pub struct InternalKey<'a> {
    pub user_key:        UserKey<'a>,
    pub sequence_number: SequenceNumber,
    pub entry_type_tag:  u8,
}

impl<'a> InternalKey<'a> {
    /// Splits an encoded internal key (`user_key ‖ 8-byte trailer`) into its parts.
    pub fn decode(encoded: &'a [u8]) -> Result<Self, Corruption> {
        if encoded.len() < 8 {
            return Err(Corruption::BadInternalKey);
        }
        let split_at = encoded.len() - 8;
        let trailer_bytes: [u8; 8] = encoded[split_at..].try_into().expect("exactly 8 bytes");
        let (sequence_number, entry_type_tag) = split_trailer(u64::from_le_bytes(trailer_bytes));

        Ok(Self {
            user_key: UserKey(&encoded[..split_at]),
            sequence_number,
            entry_type_tag,
        })
    }
}

impl Debug for InternalKey<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalKey")
            .field("user_key", &self.user_key)
            .field("sequence_number", &self.sequence_number)
            .field("entry_type_tag", &self.entry_type_tag)
            .finish()
    }
}

/// `user_key_of(internal_key) = internal_key[0 .. len-8]`, without validating the trailer.
#[must_use]
pub fn user_key_of(encoded_internal_key: &[u8]) -> &[u8] {
    let len = encoded_internal_key.len();
    &encoded_internal_key[..len.saturating_sub(8)]
}

/// Compares the trailers of two encoded internal keys that share a user key. A *larger* trailer
/// sorts *first*, so this is the reverse of the trailers' natural `u64` order.
#[must_use]
pub fn compare_trailers(lhs: u64, rhs: u64) -> Ordering {
    rhs.cmp(&lhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailer_round_trip() {
        let cases = [
            (SequenceNumber::ZERO, 0_u8),
            (SequenceNumber(1), 1),
            (SequenceNumber::MAX, 1),
            (SequenceNumber(12345), 0),
        ];
        for (seq, ty) in cases {
            let (decoded_seq, decoded_ty) = split_trailer(trailer(seq, ty));
            assert_eq!(decoded_seq, seq);
            assert_eq!(decoded_ty, ty);
        }
    }

    #[test]
    fn internal_key_decode_round_trip() {
        let encoded = encode_internal_key(b"mykey", SequenceNumber(42), EntryType::Value.into());
        let decoded = InternalKey::decode(&encoded).unwrap();
        assert_eq!(decoded.user_key.0, b"mykey");
        assert_eq!(decoded.sequence_number, SequenceNumber(42));
        assert_eq!(decoded.entry_type_tag, u8::from(EntryType::Value));
    }

    #[test]
    fn probe_key_sorts_before_any_real_key_sharing_a_user_key() {
        // A probe trailer of all-ones must compare as "larger" than any real trailer, so that
        // under the inverted ordering, the probe key sorts first.
        let real = trailer(SequenceNumber::MAX, EntryType::Value.into());
        assert_eq!(compare_trailers(PROBE_TRAILER, real), Ordering::Less);
    }

    #[test]
    fn too_short_is_corruption() {
        assert!(InternalKey::decode(b"short").is_err());
    }
}
