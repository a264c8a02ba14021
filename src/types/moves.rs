//! Move representation and the UCI codec.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MoveParseError;

use super::piece::Piece;
use super::square::Square;

/// A chess move.
///
/// Only `Normal` exists today; the enum is non-exhaustive so future
/// variants (drops, for instance) can be added without changing callers.
///
/// Castling is encoded as a `Normal` move of the king onto the rook's
/// origin square. `Position::normalize_move` also accepts the g-/c-file
/// encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Move {
    Normal {
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    },
}

impl Move {
    /// Create a normal move without promotion
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move::Normal {
            from,
            to,
            promotion: None,
        }
    }

    /// Create a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        Move::Normal {
            from,
            to,
            promotion: Some(piece),
        }
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        match self {
            Move::Normal { from, .. } => from,
        }
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        match self {
            Move::Normal { to, .. } => to,
        }
    }

    /// Get the promotion piece, if any
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            Move::Normal { promotion, .. } => promotion,
        }
    }

    /// Parse a move in UCI long algebraic notation (e.g. "e2e4", "h7h8q").
    ///
    /// Purely syntactic: the result is not checked for legality, and
    /// castling is not reinterpreted. Returns `None` on malformed input.
    #[must_use]
    pub fn from_uci(uci: &str) -> Option<Move> {
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return None;
        }
        let from = uci[0..2].parse::<Square>().ok()?;
        let to = uci[2..4].parse::<Square>().ok()?;
        let promotion = match uci.as_bytes().get(4) {
            None => None,
            Some(b'n') => Some(Piece::Knight),
            Some(b'b') => Some(Piece::Bishop),
            Some(b'r') => Some(Piece::Rook),
            Some(b'q') => Some(Piece::Queen),
            Some(_) => return None,
        };
        Some(Move::Normal {
            from,
            to,
            promotion,
        })
    }

    /// Format the move in UCI long algebraic notation
    #[must_use]
    pub fn uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                write!(f, "{from}{to}")?;
                if let Some(promo) = promotion {
                    write!(f, "{}", promo.lower_char())?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || s.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: s.len() });
        }
        if let Some(mv) = Move::from_uci(s) {
            return Ok(mv);
        }
        if s.is_ascii() && s[0..2].parse::<Square>().is_ok() && s[2..4].parse::<Square>().is_ok() {
            Err(MoveParseError::InvalidPromotion {
                char: s.chars().nth(4).unwrap_or('?'),
            })
        } else {
            Err(MoveParseError::InvalidSquare {
                notation: s.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_from_uci_basic() {
        let mv = Move::from_uci("e2e4").unwrap();
        assert_eq!(mv.from(), "e2".parse().unwrap());
        assert_eq!(mv.to(), "e4".parse().unwrap());
        assert_eq!(mv.promotion_piece(), None);
    }

    #[test]
    fn test_move_from_uci_promotion() {
        let mv = Move::from_uci("h7h8q").unwrap();
        assert_eq!(
            mv,
            Move::Normal {
                from: Square::from_index(55),
                to: Square::from_index(63),
                promotion: Some(Piece::Queen),
            }
        );
    }

    #[test]
    fn test_move_from_uci_rejects_garbage() {
        assert_eq!(Move::from_uci(""), None);
        assert_eq!(Move::from_uci("e2"), None);
        assert_eq!(Move::from_uci("e2e4x"), None);
        assert_eq!(Move::from_uci("z9z9"), None);
        assert_eq!(Move::from_uci("e2e4e5"), None);
        // Kings and pawns are not promotion targets
        assert_eq!(Move::from_uci("h7h8k"), None);
        assert_eq!(Move::from_uci("h7h8p"), None);
    }

    #[test]
    fn test_move_uci_round_trip() {
        for uci in ["a1a1n", "e2e4", "e7e8q", "g1f3", "a7a8r"] {
            let mv = Move::from_uci(uci).unwrap();
            assert_eq!(mv.uci(), uci);
            assert_eq!(Move::from_uci(&mv.uci()), Some(mv));
        }
    }

    #[test]
    fn test_move_uci_literal() {
        let mv = Move::Normal {
            from: Square::from_index(0),
            to: Square::from_index(0),
            promotion: Some(Piece::Knight),
        };
        assert_eq!(mv.uci(), "a1a1n");
    }

    #[test]
    fn test_move_from_str_errors() {
        assert!(matches!(
            "e2".parse::<Move>(),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            "z9z9".parse::<Move>(),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            "e7e8x".parse::<Move>(),
            Err(MoveParseError::InvalidPromotion { char: 'x' })
        ));
        assert_eq!("e2e4".parse::<Move>().unwrap(), Move::from_uci("e2e4").unwrap());
    }
}
