//! Piece placement: per-color and per-piece bitboards.

use std::fmt;

use crate::attacks;
use crate::types::{Bitboard, Color, Piece, Square};

/// Piece placement for both sides.
///
/// Maintains one bitboard per color, one per piece type, and the combined
/// occupancy. The color boards partition `occupied`, as do the six piece
/// boards. The type is a plain value: mutating operations return a new
/// `Board`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Board {
    by_piece: [Bitboard; 6],
    by_color: [Bitboard; 2],
    occupied: Bitboard,
}

impl Board {
    /// Create an empty board
    #[must_use]
    pub const fn empty() -> Self {
        Board {
            by_piece: [Bitboard::EMPTY; 6],
            by_color: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
        }
    }

    /// Create the standard starting position
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            board.put(Square::from_coords(file, 0), Color::White, *piece);
            board.put(Square::from_coords(file, 7), Color::Black, *piece);
            board.put(Square::from_coords(file, 1), Color::White, Piece::Pawn);
            board.put(Square::from_coords(file, 6), Color::Black, Piece::Pawn);
        }
        board
    }

    /// The combined occupancy
    #[inline]
    #[must_use]
    pub const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// All pieces of a color
    #[inline]
    #[must_use]
    pub const fn by_color(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// All pieces of a type, both colors
    #[inline]
    #[must_use]
    pub const fn by_piece(&self, piece: Piece) -> Bitboard {
        self.by_piece[piece.index()]
    }

    /// Pieces of a color and type
    #[inline]
    #[must_use]
    pub const fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.by_color[color.index()].and(self.by_piece[piece.index()])
    }

    /// Rooks and queens of both colors
    #[inline]
    #[must_use]
    pub const fn rooks_and_queens(&self) -> Bitboard {
        self.by_piece[Piece::Rook.index()].or(self.by_piece[Piece::Queen.index()])
    }

    /// Bishops and queens of both colors
    #[inline]
    #[must_use]
    pub const fn bishops_and_queens(&self) -> Bitboard {
        self.by_piece[Piece::Bishop.index()].or(self.by_piece[Piece::Queen.index()])
    }

    /// All sliding pieces of both colors
    #[inline]
    #[must_use]
    pub const fn sliders(&self) -> Bitboard {
        self.bishops_and_queens().or(self.by_piece[Piece::Rook.index()])
    }

    /// The piece on a square, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let color = self.color_at(sq)?;
        let piece = self.piece_type_at(sq)?;
        Some((color, piece))
    }

    /// The type of the piece on a square, if any
    #[must_use]
    pub fn piece_type_at(&self, sq: Square) -> Option<Piece> {
        if !self.occupied.contains(sq) {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|piece| self.by_piece[piece.index()].contains(sq))
    }

    /// The color of the piece on a square, if any
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.by_color[Color::White.index()].contains(sq) {
            Some(Color::White)
        } else if self.by_color[Color::Black.index()].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The square of a color's king, if present
    #[must_use]
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).single_square()
    }

    /// Piece counts of a color, indexed like `Piece::ALL`
    #[must_use]
    pub fn material_count(&self, color: Color) -> [u32; 6] {
        let mut counts = [0; 6];
        for piece in Piece::ALL {
            counts[piece.index()] = self.pieces(color, piece).popcount();
        }
        counts
    }

    /// Returns a copy with the piece placed on `sq`, replacing any
    /// previous occupant
    #[must_use]
    pub fn set_piece_at(&self, sq: Square, color: Color, piece: Piece) -> Board {
        let mut board = *self;
        board.put(sq, color, piece);
        board
    }

    /// Returns a copy with `sq` emptied
    #[must_use]
    pub fn remove_piece_at(&self, sq: Square) -> Board {
        let mut board = *self;
        board.discard(sq);
        board
    }

    pub(crate) fn put(&mut self, sq: Square, color: Color, piece: Piece) {
        self.discard(sq);
        let bb = Bitboard::from_square(sq);
        self.by_piece[piece.index()] |= bb;
        self.by_color[color.index()] |= bb;
        self.occupied |= bb;
    }

    /// Remove and return the occupant of `sq`
    pub(crate) fn take(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let occupant = self.piece_at(sq)?;
        self.discard(sq);
        Some(occupant)
    }

    pub(crate) fn discard(&mut self, sq: Square) {
        if let Some((color, piece)) = self.piece_at(sq) {
            let bb = Bitboard::from_square(sq);
            self.by_piece[piece.index()] ^= bb;
            self.by_color[color.index()] ^= bb;
            self.occupied ^= bb;
        }
    }

    /// Pieces of `attacker` that attack `sq`, judged against a
    /// caller-supplied occupancy.
    ///
    /// Passing a hypothetical occupancy answers "would this square be
    /// attacked if the board looked like that", which castling-path and
    /// en-passant legality checks rely on.
    #[must_use]
    pub fn attacks_to(&self, sq: Square, attacker: Color, occupied: Bitboard) -> Bitboard {
        self.by_color(attacker)
            & ((attacks::rook_attacks(sq, occupied) & self.rooks_and_queens())
                | (attacks::bishop_attacks(sq, occupied) & self.bishops_and_queens())
                | (attacks::knight_attacks(sq) & self.by_piece(Piece::Knight))
                | (attacks::king_attacks(sq) & self.by_piece(Piece::King))
                | (attacks::pawn_attacks(attacker.opposite(), sq) & self.by_piece(Piece::Pawn)))
    }

    /// Pieces of `attacker` that attack `sq` on the current board
    #[inline]
    #[must_use]
    pub fn attackers(&self, sq: Square, attacker: Color) -> Bitboard {
        self.attacks_to(sq, attacker, self.occupied)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    /// Renders an 8x8 diagram, rank 8 first, FEN piece letters, '.' for
    /// empty squares
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let c = match self.piece_at(Square::from_coords(file, rank)) {
                    Some((color, piece)) => piece.fen_char(color),
                    None => '.',
                };
                write!(f, "{c}")?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
