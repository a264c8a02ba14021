//! Legal chess position: validation, move application, terminal states.

#[cfg(feature = "logging")]
use log::debug;

use crate::attacks::{pawn_attacks, ray};
use crate::board::Board;
use crate::castles::Castles;
use crate::error::{PlayError, PositionError};
use crate::fen::make_fen;
use crate::setup::Setup;
use crate::types::{Bitboard, CastlingSide, Color, Move, Piece, Square};

/// Rule set tag. Standard chess is the only member today; variants slot
/// in as further cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Rules {
    #[default]
    Chess,
}

/// How strictly `Position::from_setup_with` validates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// All checks, including the impossible-check test
    Strict,
    /// Accept checker configurations that cannot arise from legal play
    IgnoreImpossibleCheck,
}

/// Game result: a winner, or a draw when `winner` is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Option<Color>,
}

/// A legal chess position.
///
/// Construction validates the underlying [`Setup`]; every mutation
/// returns a new value, so a `Position` can be shared freely.
///
/// ```
/// use chess_rules::{fen, Position};
///
/// let setup = fen::parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
/// let pos = Position::from_setup(&setup).unwrap();
/// assert_eq!(pos.legal_moves().len(), 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) castles: Castles,
    pub(crate) ep_square: Option<Square>,
    pub(crate) halfmoves: u32,
    pub(crate) fullmoves: u32,
    rules: Rules,
}

impl Position {
    /// The standard starting position
    #[must_use]
    pub fn new() -> Self {
        Position {
            board: Board::new(),
            turn: Color::White,
            castles: Castles::default(),
            ep_square: None,
            halfmoves: 0,
            fullmoves: 1,
            rules: Rules::Chess,
        }
    }

    /// Validate a setup and construct a position from it.
    pub fn from_setup(setup: &Setup) -> Result<Self, PositionError> {
        Self::from_setup_with(setup, ValidationMode::Strict)
    }

    /// Validate a setup under the given mode and construct a position.
    pub fn from_setup_with(setup: &Setup, mode: ValidationMode) -> Result<Self, PositionError> {
        let pos = Position {
            board: setup.board,
            turn: setup.turn,
            castles: Castles::from_setup(setup),
            ep_square: valid_ep_square(setup),
            halfmoves: setup.halfmoves,
            fullmoves: setup.fullmoves,
            rules: Rules::Chess,
        };
        pos.validate(mode)?;
        Ok(pos)
    }

    #[inline]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    #[must_use]
    pub const fn castles(&self) -> &Castles {
        &self.castles
    }

    /// The structurally valid en passant square, if any
    #[inline]
    #[must_use]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    #[inline]
    #[must_use]
    pub const fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    #[inline]
    #[must_use]
    pub const fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    #[inline]
    #[must_use]
    pub const fn rules(&self) -> Rules {
        self.rules
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), PositionError> {
        if self.board.occupied().is_empty() {
            return Err(PositionError::Empty);
        }
        if self.board.by_piece(Piece::King).popcount() != 2 {
            return Err(PositionError::Kings);
        }
        let our_king = self.board.king_of(self.turn).ok_or(PositionError::Kings)?;
        let their_king = self
            .board
            .king_of(self.turn.opposite())
            .ok_or(PositionError::Kings)?;
        if self.board.attackers(their_king, self.turn).any() {
            return Err(PositionError::OppositeCheck);
        }
        if self
            .board
            .by_piece(Piece::Pawn)
            .intersects(Bitboard::BACKRANKS)
        {
            return Err(PositionError::PawnsOnBackrank);
        }
        match mode {
            ValidationMode::IgnoreImpossibleCheck => Ok(()),
            ValidationMode::Strict => self.validate_checkers(our_king),
        }
    }

    /// Reject checker configurations that no legal move could have
    /// produced.
    fn validate_checkers(&self, our_king: Square) -> Result<(), PositionError> {
        let checkers = self.board.attackers(our_king, self.turn.opposite());
        if checkers.is_empty() {
            return Ok(());
        }
        if let Some(ep) = self.ep_square {
            // The last move was a double push, so the pushed pawn must be
            // the checker, or must have uncovered a single slider
            let pushed_to = Square::from_index(ep.index() ^ 8);
            let pushed_from = Square::from_index(ep.index() ^ 24);
            let undone = self
                .board
                .occupied()
                .without(pushed_to)
                .with(pushed_from);
            if checkers.more_than_one()
                || (checkers.first() != Some(pushed_to)
                    && self
                        .board
                        .attacks_to(our_king, self.turn.opposite(), undone)
                        .any())
            {
                return Err(PositionError::ImpossibleCheck);
            }
        } else {
            if checkers.popcount() > 2 {
                return Err(PositionError::ImpossibleCheck);
            }
            if checkers.popcount() == 2 {
                let (a, b) = (
                    checkers.first().expect("two checkers"),
                    checkers.last().expect("two checkers"),
                );
                if ray(a, b).contains(our_king) {
                    return Err(PositionError::ImpossibleCheck);
                }
            }
        }
        Ok(())
    }

    /// Pieces giving check to the side to move
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.board
            .king_of(self.turn)
            .map_or(Bitboard::EMPTY, |king| {
                self.board.attackers(king, self.turn.opposite())
            })
    }

    /// Whether the side to move is in check
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.checkers().any()
    }

    /// Whether the side to move is checkmated
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_some_legal_moves()
    }

    /// Whether the side to move is stalemated
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_some_legal_moves()
    }

    /// Whether `color` cannot possibly deliver mate.
    ///
    /// True when the side has neither pawns, rooks, nor queens, and
    /// either holds at most two knights against a bare king (plus queens),
    /// or only bishops all living on one color complex with no pawns or
    /// knights anywhere.
    #[must_use]
    pub fn has_insufficient_material(&self, color: Color) -> bool {
        let board = &self.board;
        let side = board.by_color(color);
        if side.intersects(board.by_piece(Piece::Pawn) | board.rooks_and_queens()) {
            return false;
        }
        if side.intersects(board.by_piece(Piece::Knight)) {
            return side.popcount() <= 2
                && (board.by_color(color.opposite())
                    - board.by_piece(Piece::King)
                    - board.by_piece(Piece::Queen))
                .is_empty();
        }
        if side.intersects(board.by_piece(Piece::Bishop)) {
            let same_complex = !board.by_piece(Piece::Bishop).intersects(Bitboard::DARK_SQUARES)
                || !board
                    .by_piece(Piece::Bishop)
                    .intersects(Bitboard::LIGHT_SQUARES);
            return same_complex
                && board.by_piece(Piece::Pawn).is_empty()
                && board.by_piece(Piece::Knight).is_empty();
        }
        true
    }

    /// Whether neither side can deliver mate
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        self.has_insufficient_material(Color::White)
            && self.has_insufficient_material(Color::Black)
    }

    /// The game result, if the position is terminal
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_checkmate() {
            Some(Outcome {
                winner: Some(self.turn.opposite()),
            })
        } else if self.is_stalemate() || self.is_insufficient_material() {
            Some(Outcome { winner: None })
        } else {
            None
        }
    }

    /// The castling side a move would trigger, if it is a castling move.
    ///
    /// Both encodings are recognized: the king landing on a friendly
    /// piece (the rook), and the king moving two files.
    #[must_use]
    pub fn castling_side(&self, m: &Move) -> Option<CastlingSide> {
        match *m {
            Move::Normal { from, to, .. } => {
                let delta = to.index() as i32 - from.index() as i32;
                if delta.abs() != 2 && !self.board.by_color(self.turn).contains(to) {
                    return None;
                }
                if !self.board.pieces(self.turn, Piece::King).contains(from) {
                    return None;
                }
                Some(CastlingSide::from_direction(from, to))
            }
        }
    }

    /// Rewrite g-/c-file castling encodings to the canonical
    /// king-takes-rook form. Non-castling moves pass through unchanged.
    #[must_use]
    pub fn normalize_move(&self, m: &Move) -> Move {
        match self.castling_side(m) {
            Some(side) => match self.castles.rook_of(self.turn, side) {
                Some(rook) => Move::new(m.from(), rook),
                None => *m,
            },
            None => *m,
        }
    }

    /// Validate and play a move, producing the successor position.
    pub fn play(&self, m: &Move) -> Result<Position, PlayError> {
        if self.is_legal(m) {
            Ok(self.play_unchecked(m))
        } else {
            Err(PlayError::IllegalMove { mv: *m })
        }
    }

    /// Play a move assumed to be legal, producing the successor position.
    ///
    /// Feeding an illegal move corrupts no memory but yields an
    /// unspecified position.
    #[must_use]
    pub fn play_unchecked(&self, m: &Move) -> Position {
        let mut pos = *self;
        let turn = pos.turn;
        let ep_square = pos.ep_square;
        let castling = self.castling_side(m);

        pos.ep_square = None;
        pos.halfmoves = pos.halfmoves.saturating_add(1);
        if turn == Color::Black {
            pos.fullmoves = pos.fullmoves.saturating_add(1);
        }
        pos.turn = turn.opposite();

        match *m {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                let Some((_, piece)) = pos.board.take(from) else {
                    return pos;
                };
                let mut ep_capture = None;

                match piece {
                    Piece::Pawn => {
                        pos.halfmoves = 0;
                        if Some(to) == ep_square {
                            let victim = Square::from_index(to.index() ^ 8);
                            ep_capture = pos.board.take(victim);
                        }
                        let (from_idx, to_idx) = (from.index(), to.index());
                        if from_idx.abs_diff(to_idx) == 16 && (8..56).contains(&from_idx) {
                            pos.ep_square = Some(Square::from_index((from_idx + to_idx) / 2));
                        }
                    }
                    Piece::Rook => pos.castles.discard_rook_at(from),
                    Piece::King => {
                        if let Some(side) = castling {
                            if let Some(rook_from) = pos.castles.rook_of(turn, side) {
                                let rook = pos.board.take(rook_from);
                                pos.board.put(side.king_to(turn), turn, Piece::King);
                                if rook.is_some() {
                                    pos.board.put(side.rook_to(turn), turn, Piece::Rook);
                                }
                            }
                        }
                        pos.castles.discard_color(turn);
                    }
                    _ => {}
                }

                if castling.is_none() {
                    let capture = pos.board.piece_at(to);
                    pos.board.put(to, turn, promotion.unwrap_or(piece));
                    if let Some((_, captured)) = capture.or(ep_capture) {
                        pos.halfmoves = 0;
                        if captured == Piece::Rook {
                            pos.castles.discard_rook_at(to);
                        }
                    }
                }
            }
        }

        pos
    }

    /// Parse a UCI move string against this position, returning the
    /// canonical legal move or `None`.
    #[must_use]
    pub fn uci_to_move(&self, uci: &str) -> Option<Move> {
        let m = Move::from_uci(uci)?;
        let m = self.normalize_move(&m);
        if self.is_legal(&m) {
            Some(m)
        } else {
            None
        }
    }

    /// The ep square, kept only if some pawn can legally capture onto it.
    fn legal_ep_square(&self) -> Option<Square> {
        let ep = self.ep_square?;
        let ctx = self.ctx();
        let candidates =
            self.board.pieces(self.turn, Piece::Pawn) & pawn_attacks(self.turn.opposite(), ep);
        for candidate in candidates {
            if self.dests_in(candidate, &ctx).contains(ep) {
                return Some(ep);
            }
        }
        None
    }

    /// Snapshot the position as a [`Setup`].
    ///
    /// The ep square is retained only when some pawn can actually take en
    /// passant, so emitted FENs never advertise a dead capture.
    #[must_use]
    pub fn to_setup(&self) -> Setup {
        Setup {
            board: self.board,
            turn: self.turn,
            unmoved_rooks: self.castles.unmoved_rooks(),
            ep_square: self.legal_ep_square(),
            remaining_checks: None,
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
        }
    }

    /// Emit the position as a FEN string
    #[must_use]
    pub fn fen(&self) -> String {
        make_fen(&self.to_setup())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

/// Reduce a setup's ep square to the structural precondition: right rank
/// for the side to move, empty square one step beyond, enemy pawn one
/// step behind. Anything else is dropped.
fn valid_ep_square(setup: &Setup) -> Option<Square> {
    let ep = setup.ep_square?;
    if ep.rank() != setup.turn.ep_rank() {
        #[cfg(feature = "logging")]
        debug!("dropping ep square {ep}: wrong rank for side to move");
        return None;
    }
    let forward = setup.turn.pawn_push();
    if let Some(beyond) = ep.offset(forward) {
        if setup.board.occupied().contains(beyond) {
            return None;
        }
    }
    let pawn = ep.offset(-forward)?;
    if !setup
        .board
        .pieces(setup.turn.opposite(), Piece::Pawn)
        .contains(pawn)
    {
        return None;
    }
    Some(ep)
}
