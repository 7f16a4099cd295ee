use std::cmp::Ordering;

use crate::error::Corruption;
use crate::format::{compare_trailers, user_key_of};

use super::Comparator;

/// Orders *encoded* internal keys (`user_key ‖ 8-byte trailer`): user keys are compared with the
/// wrapped comparator, and ties are broken by trailer in descending order, so that a newer
/// sequence number sorts first.
#[derive(Debug, Clone, Copy)]
pub struct InternalKeyComparator<Cmp> {
    user_comparator: Cmp,
}

impl<Cmp: Comparator> InternalKeyComparator<Cmp> {
    #[must_use]
    pub const fn new(user_comparator: Cmp) -> Self {
        Self { user_comparator }
    }

    #[must_use]
    pub const fn user_comparator(&self) -> &Cmp {
        &self.user_comparator
    }

    /// Compares two user keys directly, without any trailer.
    #[must_use]
    pub fn compare_user_keys(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        self.user_comparator.compare(lhs, rhs)
    }

    /// Compares two encoded internal keys (`user_key ‖ 8-byte trailer`).
    pub fn compare(&self, lhs: &[u8], rhs: &[u8]) -> Result<Ordering, Corruption> {
        let lhs_user = user_key_of(lhs);
        let rhs_user = user_key_of(rhs);

        Ok(match self.user_comparator.compare(lhs_user, rhs_user) {
            Ordering::Equal => {
                let lhs_trailer = trailer_of(lhs)?;
                let rhs_trailer = trailer_of(rhs)?;
                compare_trailers(lhs_trailer, rhs_trailer)
            }
            other => other,
        })
    }
}

fn trailer_of(encoded_internal_key: &[u8]) -> Result<u64, Corruption> {
    let len = encoded_internal_key.len();
    let start = len.checked_sub(8).ok_or(Corruption::BadInternalKey)?;
    let bytes: [u8; 8] = encoded_internal_key[start..].try_into().expect("8 bytes");
    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use crate::comparator::BytewiseComparator;
    use crate::format::{encode_internal_key, EntryType, SequenceNumber};

    use super::*;

    #[test]
    fn internal_key_ordering() {
        // A higher sequence number must sort first among entries sharing a user key.
        let cmp = InternalKeyComparator::new(BytewiseComparator);

        let newer = encode_internal_key(b"k", SequenceNumber(10), EntryType::Value.into());
        let older = encode_internal_key(b"k", SequenceNumber(5), EntryType::Value.into());
        assert_eq!(cmp.compare(&newer, &older).unwrap(), Ordering::Less);

        let a = encode_internal_key(b"a", SequenceNumber(1), EntryType::Value.into());
        let b = encode_internal_key(b"b", SequenceNumber(1), EntryType::Value.into());
        assert_eq!(cmp.compare(&a, &b).unwrap(), Ordering::Less);
    }

    #[test]
    fn short_key_is_corruption_not_a_panic() {
        // Both inputs decode to the same (empty) user key under `user_key_of`'s saturating
        // length arithmetic, so the comparator falls through to `trailer_of`, which must reject
        // a key shorter than the 8-byte trailer instead of underflowing.
        let cmp = InternalKeyComparator::new(BytewiseComparator);
        let short = b"ab".to_vec();
        assert!(cmp.compare(&short, &short).is_err());
    }
}
