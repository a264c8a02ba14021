//! Legal move generation.
//!
//! Pseudo-legal attack sets are narrowed by the pin rays, check evasion
//! targets, and king safety captured in a per-call [`Context`].

use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, ray,
    rook_attacks,
};
use crate::position::Position;
use crate::types::{Bitboard, CastlingSide, Color, Move, Piece, Square, PROMOTION_PIECES};

/// Per-call move generation cache: the mover's king, the absolutely
/// pinned pieces, and the current checkers.
#[derive(Clone, Copy, Debug)]
pub struct Context {
    pub(crate) king: Option<Square>,
    pub(crate) blockers: Bitboard,
    pub(crate) checkers: Bitboard,
}

impl Position {
    /// Build the move generation context for the side to move.
    #[must_use]
    pub fn ctx(&self) -> Context {
        let Some(king) = self.board.king_of(self.turn) else {
            return Context {
                king: None,
                blockers: Bitboard::EMPTY,
                checkers: Bitboard::EMPTY,
            };
        };
        let them = self.board.by_color(self.turn.opposite());

        // Enemy sliders aiming at the king through any occupancy; a piece
        // alone on the open segment is pinned
        let snipers = ((rook_attacks(king, Bitboard::EMPTY) & self.board.rooks_and_queens())
            | (bishop_attacks(king, Bitboard::EMPTY) & self.board.bishops_and_queens()))
            & them;
        let mut blockers = Bitboard::EMPTY;
        for sniper in snipers {
            let blocking = between(king, sniper) & self.board.occupied();
            if !blocking.more_than_one() {
                blockers |= blocking;
            }
        }

        Context {
            king: Some(king),
            blockers,
            checkers: self.board.attackers(king, self.turn.opposite()),
        }
    }

    /// Legal destination squares for the piece on `from`.
    ///
    /// For the king this includes castling under both encodings: the
    /// rook's origin square and the conventional g-/c-file target.
    #[must_use]
    pub fn dests(&self, from: Square) -> Bitboard {
        self.dests_in(from, &self.ctx())
    }

    /// Legal destination squares for the piece on `from`, reusing a
    /// previously built context.
    #[must_use]
    pub fn dests_in(&self, from: Square, ctx: &Context) -> Bitboard {
        let Some((color, piece)) = self.board.piece_at(from) else {
            return Bitboard::EMPTY;
        };
        if color != self.turn {
            return Bitboard::EMPTY;
        }
        let occupied = self.board.occupied();

        let mut ep_dest = Bitboard::EMPTY;
        let mut pseudo = match piece {
            Piece::Pawn => {
                let mut pawn =
                    pawn_attacks(self.turn, from) & self.board.by_color(self.turn.opposite());
                let push = self.turn.pawn_push();
                if let Some(step) = from.offset(push) {
                    if !occupied.contains(step) {
                        pawn = pawn.with(step);
                        let can_double = match self.turn {
                            Color::White => from.index() < 16,
                            Color::Black => from.index() >= 48,
                        };
                        if can_double {
                            if let Some(double_step) = step.offset(push) {
                                if !occupied.contains(double_step) {
                                    pawn = pawn.with(double_step);
                                }
                            }
                        }
                    }
                }
                if let Some(ep) = self.ep_square {
                    if self.can_capture_ep(from, ctx) {
                        ep_dest = Bitboard::from_square(ep);
                    }
                }
                pawn
            }
            Piece::Knight => knight_attacks(from),
            Piece::Bishop => bishop_attacks(from, occupied),
            Piece::Rook => rook_attacks(from, occupied),
            Piece::Queen => queen_attacks(from, occupied),
            Piece::King => king_attacks(from),
        };
        pseudo = pseudo - self.board.by_color(self.turn);

        if let Some(king) = ctx.king {
            if piece == Piece::King {
                let mut dests = self.king_steps(from, pseudo);
                for side in CastlingSide::BOTH {
                    if let Some(rook) = self.castling_dest(side, ctx) {
                        dests = dests.with(rook).with(side.king_to(self.turn));
                    }
                }
                return dests;
            }

            if ctx.checkers.any() {
                let Some(checker) = ctx.checkers.single_square() else {
                    // Double check leaves only king moves
                    return Bitboard::EMPTY;
                };
                pseudo &= between(checker, king).with(checker);
            }

            if ctx.blockers.contains(from) {
                pseudo &= ray(from, king);
            }
        }

        pseudo | ep_dest
    }

    /// King step destinations that do not walk into an attack. The king
    /// is removed from the occupancy so sliders see through its current
    /// square.
    fn king_steps(&self, from: Square, pseudo: Bitboard) -> Bitboard {
        let occ = self.board.occupied().without(from);
        let mut steps = pseudo;
        for to in pseudo {
            if self
                .board
                .attacks_to(to, self.turn.opposite(), occ)
                .any()
            {
                steps = steps.without(to);
            }
        }
        steps
    }

    /// The castling rook's origin square, if castling to `side` is legal.
    fn castling_dest(&self, side: CastlingSide, ctx: &Context) -> Option<Square> {
        let king = ctx.king?;
        if ctx.checkers.any() {
            return None;
        }
        let rook = self.castles.rook_of(self.turn, side)?;
        if self
            .castles
            .path_of(self.turn, side)
            .intersects(self.board.occupied())
        {
            return None;
        }

        // The king's walk, origin exclusive and destination inclusive,
        // must be safe with the king lifted off the board
        let king_to = side.king_to(self.turn);
        let occ = self.board.occupied().without(king);
        for step in between(king, king_to).with(king_to) {
            if self
                .board
                .attacks_to(step, self.turn.opposite(), occ)
                .any()
            {
                return None;
            }
        }

        // And the destination must stay safe once the rook has landed
        let rook_to = side.rook_to(self.turn);
        let after = self
            .board
            .occupied()
            .toggled(king)
            .toggled(rook)
            .with(rook_to);
        if self
            .board
            .attacks_to(king_to, self.turn.opposite(), after)
            .any()
        {
            return None;
        }

        Some(rook)
    }

    /// Whether the pawn on `pawn_from` may capture en passant without
    /// exposing its own king: both pawns are lifted, the capturer is
    /// placed on the ep square, and the king must not be attacked in the
    /// resulting occupancy.
    fn can_capture_ep(&self, pawn_from: Square, ctx: &Context) -> bool {
        let Some(ep) = self.ep_square else {
            return false;
        };
        if !pawn_attacks(self.turn, pawn_from).contains(ep) {
            return false;
        }
        let Some(king) = ctx.king else {
            return true;
        };
        let captured = Square::from_index(ep.index() ^ 8);
        let occ = self
            .board
            .occupied()
            .toggled(pawn_from)
            .toggled(captured)
            .with(ep);
        self.board
            .attacks_to(king, self.turn.opposite(), occ)
            .without(captured)
            .is_empty()
    }

    /// Generate all legal moves.
    ///
    /// Castling appears once per legal right, encoded as the king moving
    /// to the rook's origin square.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        // Kiwipete tops the perft suite at 48 moves; 64 leaves headroom
        // so only contrived positions (the theoretical peak is 218) pay
        // for a regrow
        let mut moves = Vec::with_capacity(64);
        let ctx = self.ctx();

        for from in self.board.by_color(self.turn) {
            let Some(piece) = self.board.piece_type_at(from) else {
                continue;
            };
            match piece {
                Piece::King => {
                    let pseudo = king_attacks(from) - self.board.by_color(self.turn);
                    for to in self.king_steps(from, pseudo) {
                        moves.push(Move::new(from, to));
                    }
                    for side in CastlingSide::BOTH {
                        if let Some(rook) = self.castling_dest(side, &ctx) {
                            moves.push(Move::new(from, rook));
                        }
                    }
                }
                Piece::Pawn => {
                    for to in self.dests_in(from, &ctx) {
                        if Bitboard::BACKRANKS.contains(to) {
                            for promo in PROMOTION_PIECES {
                                moves.push(Move::promotion(from, to, promo));
                            }
                        } else {
                            moves.push(Move::new(from, to));
                        }
                    }
                }
                _ => {
                    for to in self.dests_in(from, &ctx) {
                        moves.push(Move::new(from, to));
                    }
                }
            }
        }

        moves
    }

    /// Whether the side to move has at least one legal move
    #[must_use]
    pub fn has_some_legal_moves(&self) -> bool {
        let ctx = self.ctx();
        self.board
            .by_color(self.turn)
            .iter()
            .any(|from| self.dests_in(from, &ctx).any())
    }

    /// Test a move for legality. Castling is accepted under either
    /// encoding.
    #[must_use]
    pub fn is_legal(&self, m: &Move) -> bool {
        match *m {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                if matches!(promotion, Some(Piece::Pawn | Piece::King)) {
                    return false;
                }
                let must_promote = self.board.pieces(self.turn, Piece::Pawn).contains(from)
                    && Bitboard::BACKRANKS.contains(to);
                if promotion.is_some() != must_promote {
                    return false;
                }
                let dests = self.dests(from);
                dests.contains(to) || dests.contains(self.normalize_move(m).to())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_fen;

    fn pos(fen: &str) -> Position {
        Position::from_setup(&parse_fen(fen).unwrap()).unwrap()
    }

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn dest_names(p: &Position, from: &str) -> Vec<String> {
        let mut names: Vec<String> = p.dests(sq(from)).iter().map(|s| s.to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let p = Position::new();
        assert_eq!(p.legal_moves().len(), 20);
        assert!(p.has_some_legal_moves());
    }

    #[test]
    fn test_pawn_single_and_double_push() {
        let p = Position::new();
        assert_eq!(dest_names(&p, "e2"), vec!["e3", "e4"]);
        // Blocked pawn cannot move at all
        let p = pos("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1");
        assert!(p.dests(sq("e2")).is_empty());
        // Intermediate square occupied blocks the double push
        let p = pos("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(p.dests(sq("e2")).is_empty());
        // Only the double-step square occupied: single push remains
        let p = pos("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(dest_names(&p, "e2"), vec!["e3"]);
    }

    #[test]
    fn test_pawn_no_double_push_off_start_rank() {
        let p = pos("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1");
        assert_eq!(dest_names(&p, "e3"), vec!["e4"]);
    }

    #[test]
    fn test_pawn_captures() {
        let p = pos("4k3/8/8/3p1p2/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(dest_names(&p, "e4"), vec!["d5", "e5", "f5"]);
    }

    #[test]
    fn test_pinned_piece_restricted_to_ray() {
        // Bishop d2 pinned by the b4 bishop against the e1 king
        let p = pos("4k3/8/8/8/1b6/8/3B4/4K3 w - - 0 1");
        assert_eq!(dest_names(&p, "d2"), vec!["b4", "c3"]);
    }

    #[test]
    fn test_pinned_knight_cannot_move() {
        let p = pos("4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1");
        assert!(p.dests(sq("d2")).is_empty());
    }

    #[test]
    fn test_check_forces_block_or_capture() {
        // Rook e8 checks the e1 king; the d2 knight may block on e4 or
        // nothing else
        let p = pos("4r3/8/8/8/8/k7/3N4/4K2R w - - 0 1");
        assert_eq!(dest_names(&p, "d2"), vec!["e4"]);
        // The h1 rook cannot help along the first rank
        assert!(p.dests(sq("h1")).is_empty());
    }

    #[test]
    fn test_double_check_only_king_moves() {
        // Knight f3 and rook e8 both give check
        let p = pos("4r3/8/8/8/8/k4n2/8/4K2R w - - 0 1");
        assert!(p.dests(sq("h1")).is_empty());
        assert!(!p.dests(sq("e1")).is_empty());
        for m in p.legal_moves().iter() {
            assert_eq!(m.from(), sq("e1"));
        }
    }

    #[test]
    fn test_king_cannot_retreat_along_checking_ray() {
        // Rook e8 checks along the e-file; e1 -> e2 stays on the ray and
        // the king's own square must not shadow the rook
        let p = pos("4r3/8/8/8/8/k7/8/4K3 w - - 0 1");
        let dests = p.dests(sq("e1"));
        assert!(!dests.contains(sq("e2")));
        assert!(dests.contains(sq("d1")));
        assert!(dests.contains(sq("f1")));
    }

    #[test]
    fn test_en_passant_generated() {
        let p = pos("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        assert!(p.dests(sq("e5")).contains(sq("f6")));
        assert!(p.legal_moves().contains(&Move::from_uci("e5f6").unwrap()));
    }

    #[test]
    fn test_en_passant_discovered_check_forbidden() {
        // Lifting both pawns exposes the b5 king to the h5 rook
        let p = pos("8/8/8/1K2Pp1r/8/8/8/4k3 w - f6 0 2");
        assert!(!p.dests(sq("e5")).contains(sq("f6")));
    }

    #[test]
    fn test_en_passant_while_in_check_capturing_the_pusher() {
        // The pushed pawn itself gives check; taking it en passant is the
        // evasion
        let p = pos("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1");
        assert!(p.dests(sq("e4")).contains(sq("d3")));
    }

    #[test]
    fn test_castling_dests_both_encodings() {
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(
            dest_names(&p, "e1"),
            vec!["a1", "c1", "d1", "d2", "e2", "f1", "f2", "g1", "h1"]
        );
    }

    #[test]
    fn test_castling_emitted_once_as_king_takes_rook() {
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = p.legal_moves();
        assert!(moves.contains(&Move::from_uci("e1h1").unwrap()));
        assert!(moves.contains(&Move::from_uci("e1a1").unwrap()));
        assert!(!moves.contains(&Move::from_uci("e1g1").unwrap()));
        assert!(!moves.contains(&Move::from_uci("e1c1").unwrap()));
        // 5 king steps + 2 castles + 2x9 rook moves... count the total
        assert_eq!(moves.len(), 26);
    }

    #[test]
    fn test_castling_blocked_by_piece_on_path() {
        let p = pos("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        let dests = p.dests(sq("e1"));
        assert!(!dests.contains(sq("a1")));
        assert!(!dests.contains(sq("c1")));
        assert!(dests.contains(sq("h1")));
    }

    #[test]
    fn test_castling_blocked_by_attacked_walk() {
        // Black rook on f8 covers f1, the kingside walk square
        let p = pos("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let dests = p.dests(sq("e1"));
        assert!(!dests.contains(sq("h1")));
        assert!(!dests.contains(sq("g1")));
        // Queenside walk (d1, c1) is clear
        assert!(dests.contains(sq("a1")));
    }

    #[test]
    fn test_castling_through_b1_attack_allowed() {
        // b1 is on the rook's path but not the king's walk
        let p = pos("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(p.dests(sq("e1")).contains(sq("a1")));
    }

    #[test]
    fn test_no_castling_while_in_check() {
        let p = pos("r3k2r/8/8/8/4r3/8/8/R3K2R w KQkq - 0 1");
        let dests = p.dests(sq("e1"));
        assert!(!dests.contains(sq("a1")));
        assert!(!dests.contains(sq("h1")));
    }

    #[test]
    fn test_no_castling_without_right() {
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert_eq!(dest_names(&p, "e1"), vec!["d1", "d2", "e2", "f1", "f2"]);
    }

    #[test]
    fn test_scenario_king_dests_with_pawn_cover() {
        let p = pos("r1bq1r2/3n2k1/p1p1pp2/3pP2P/8/PPNB2Q1/2P2P2/R3K3 b Q - 1 22");
        let dests = dest_names(&p, "g7");
        assert!(dests.contains(&"h8".to_string()));
        assert!(!dests.contains(&"g8".to_string()));
    }

    #[test]
    fn test_legal_moves_symmetry_with_is_legal() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        ];
        for fen in fens {
            let p = pos(fen);
            for m in p.legal_moves().iter() {
                assert!(p.is_legal(m), "{m} generated but not legal in {fen}");
            }
        }
    }

    #[test]
    fn test_is_legal_rejects_bad_promotions() {
        let p = pos("8/P7/8/8/8/8/k7/4K3 w - - 0 1");
        // Promotion flag required on the push to the back rank
        assert!(!p.is_legal(&Move::from_uci("a7a8").unwrap()));
        assert!(p.is_legal(&Move::from_uci("a7a8q").unwrap()));
        assert!(p.is_legal(&Move::from_uci("a7a8n").unwrap()));
        // No promotion flag on ordinary moves
        let p = Position::new();
        assert!(!p.is_legal(&Move::promotion(sq("e2"), sq("e4"), Piece::Queen)));
    }

    #[test]
    fn test_promotion_moves_generated() {
        let p = pos("8/P7/8/8/8/8/k7/4K3 w - - 0 1");
        let moves = p.legal_moves();
        let promos: Vec<Move> = moves
            .iter()
            .filter(|m| m.from() == sq("a7"))
            .copied()
            .collect();
        assert_eq!(promos.len(), 4);
        assert!(promos.iter().all(|m| m.promotion_piece().is_some()));
    }

    #[test]
    fn test_pawn_on_sixth_does_not_promote() {
        let p = pos("8/8/P7/8/8/8/k7/4K3 w - - 0 1");
        let moves = p.legal_moves();
        assert!(moves.contains(&Move::from_uci("a6a7").unwrap()));
        assert!(!moves
            .iter()
            .any(|m| m.from() == sq("a6") && m.promotion_piece().is_some()));
    }
}
