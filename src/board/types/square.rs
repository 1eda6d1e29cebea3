//! Square indexing.

use std::fmt;

/// A board square, indexed 0..64 with a1 = 0, b1 = 1, ..., h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square(u8);

impl Square {
    /// Build from rank and file (both 0..8).
    #[inline]
    #[must_use]
    pub const fn new(rank: u8, file: u8) -> Self {
        Square(rank * 8 + file)
    }

    /// Build from a raw 0..64 index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Square(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    #[must_use]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Mirror vertically (a1 <-> a8). Used for color-relative table lookups.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// All 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}
