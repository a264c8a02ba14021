//! Board squares in little-endian rank-file numbering.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SquareError;

/// File letters in index order.
pub(crate) const FILE_NAMES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
/// Rank digits in index order.
pub(crate) const RANK_NAMES: [char; 8] = ['1', '2', '3', '4', '5', '6', '7', '8'];

/// Index of an algebraic file letter ('a' maps to 0).
pub(crate) const fn file_index(c: char) -> usize {
    c as usize - 'a' as usize
}

/// Index of an algebraic rank digit ('1' maps to 0).
pub(crate) const fn rank_index(c: char) -> usize {
    c as usize - '1' as usize
}

/// A board square, numbered a1 = 0, b1 = 1, ..., h8 = 63.
///
/// The low three bits hold the file and the high three bits the rank:
/// `square = file + 8 * rank`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// The square at the given file and rank, both 0-7. Out-of-range
    /// coordinates silently alias; use `try_from_coords` when the input
    /// is not already trusted.
    #[inline]
    #[must_use]
    pub const fn from_coords(file: usize, rank: usize) -> Self {
        Square((rank << 3 | file) as u8)
    }

    /// Bounds-checked companion of `from_coords`
    #[must_use]
    pub const fn try_from_coords(file: usize, rank: usize) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square::from_coords(file, rank))
        } else {
            None
        }
    }

    /// The square with the given index, 0-63
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Square(index as u8)
    }

    /// The square's index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File number, 0 for the a-file
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 & 7) as usize
    }

    /// Rank number, 0 for the first rank
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Same file, seen from the other side of the board (a1 <-> a8)
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Same rank, mirrored across the d/e boundary (a1 <-> h1)
    #[inline]
    #[must_use]
    pub const fn mirror_horizontal(self) -> Self {
        Square(self.0 ^ 7)
    }

    /// Step the index by `delta`, returning `None` past either board
    /// end. A sideways delta can wrap between ranks; callers stepping
    /// by files guard the file themselves.
    #[must_use]
    pub fn offset(self, delta: i32) -> Option<Self> {
        let index = i32::from(self.0) + delta;
        if (0..64).contains(&index) {
            Some(Square(index as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FILE_NAMES[self.file()], RANK_NAMES[self.rank()])
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Square::from_coords(
                (file - b'a') as usize,
                (rank - b'1') as usize,
            )),
            _ => Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            }),
        }
    }
}
