//! A validated level number, `0..NUM_LEVELS`.

use crate::config_constants::NUM_LEVELS;
use crate::error::Corruption;

/// Invariant: the inner value is strictly less than [`NUM_LEVELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Level {
    type Error = Corruption;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level < NUM_LEVELS {
            Ok(Self(level))
        } else {
            Err(Corruption::BadLevel)
        }
    }
}

impl TryFrom<u32> for Level {
    type Error = Corruption;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        let level = u8::try_from(level).map_err(|_| Corruption::BadLevel)?;
        Self::try_from(level)
    }
}
