//! FEN parsing and emission.
//!
//! Parsing is lenient: fields may be separated by underscores or runs of
//! whitespace, trailing fields default to `w - - 0 1`, and a
//! remaining-checks field is accepted either before the halfmove clock or
//! after the fullmove number. Emission is canonical: single spaces,
//! counters clamped, remaining checks last.

use std::str::FromStr;

#[cfg(feature = "logging")]
use log::debug;

use crate::board::Board;
use crate::error::FenError;
use crate::setup::{RemainingChecks, Setup};
use crate::types::{file_index, Bitboard, Color, Piece, Square, FILE_NAMES};

pub const INITIAL_BOARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse the piece-placement field of a FEN string.
    pub fn from_board_fen(board_fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let ranks: Vec<&str> = board_fen.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidBoard);
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip == 9 {
                        return Err(FenError::InvalidBoard);
                    }
                    file += skip as usize;
                } else {
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidBoard)?;
                    if file >= 8 {
                        return Err(FenError::InvalidBoard);
                    }
                    board.put(Square::from_coords(file, rank), color, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidBoard);
            }
        }
        Ok(board)
    }

    /// Emit the piece-placement field of a FEN string.
    #[must_use]
    pub fn board_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_board_fen(s)
    }
}

/// Parse the castling field against a board, producing the set of rooks
/// that still carry castling rights.
///
/// `KQkq` select the outermost back-rank rook on the respective wing;
/// Shredder-FEN letters `A`-`H`/`a`-`h` select a rook by file. More than
/// two rights per back rank is rejected.
pub fn parse_castling_fen(board: &Board, castling_part: &str) -> Result<Bitboard, FenError> {
    let mut unmoved = Bitboard::EMPTY;
    if castling_part != "-" {
        for c in castling_part.chars() {
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let backrank = Bitboard::backrank(color);
            match c.to_ascii_lowercase() {
                file @ 'a'..='h' => {
                    unmoved = unmoved.with(Square::from_coords(file_index(file), color.back_rank()));
                }
                wing @ ('k' | 'q') => {
                    // Outermost rook on the wing; fall back to the corner
                    // square if the back rank holds no such rook
                    let rooks_and_kings = board.by_color(color)
                        & backrank
                        & (board.by_piece(Piece::Rook) | board.by_piece(Piece::King));
                    let candidate = if wing == 'k' {
                        rooks_and_kings.last()
                    } else {
                        rooks_and_kings.first()
                    };
                    let sq = match candidate {
                        Some(sq) if board.by_piece(Piece::Rook).contains(sq) => sq,
                        _ => Square::from_coords(if wing == 'k' { 7 } else { 0 }, color.back_rank()),
                    };
                    unmoved = unmoved.with(sq);
                }
                _ => {
                    return Err(FenError::InvalidCastling {
                        found: castling_part.to_string(),
                    })
                }
            }
        }
    }
    for color in Color::BOTH {
        if (unmoved & Bitboard::backrank(color)).popcount() > 2 {
            return Err(FenError::InvalidCastling {
                found: castling_part.to_string(),
            });
        }
    }
    Ok(unmoved)
}

/// Emit the castling field. Uses `KQkq` letters where the right's rook is
/// the outermost rook of its wing, Shredder-FEN file letters otherwise.
#[must_use]
pub fn make_castling_fen(board: &Board, unmoved_rooks: Bitboard) -> String {
    let mut fen = String::new();
    for color in Color::BOTH {
        let king = board.king_of(color);
        let backrank = Bitboard::backrank(color);
        let candidates = board.pieces(color, Piece::Rook) & backrank;
        for rook in (unmoved_rooks & backrank).iter().rev() {
            let symbol = if Some(rook) == candidates.first()
                && king.is_some_and(|king| rook < king)
            {
                'q'
            } else if Some(rook) == candidates.last() && king.is_some_and(|king| king < rook) {
                'k'
            } else {
                FILE_NAMES[rook.file()]
            };
            fen.push(if color == Color::White {
                symbol.to_ascii_uppercase()
            } else {
                symbol
            });
        }
    }
    if fen.is_empty() {
        fen.push('-');
    }
    fen
}

fn parse_small_uint(part: &str) -> Option<u32> {
    if part.len() > 4 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn parse_remaining_checks(part: &str) -> Result<RemainingChecks, FenError> {
    let err = || FenError::InvalidRemainingChecks {
        found: part.to_string(),
    };
    let fields: Vec<&str> = part.split('+').collect();
    match fields.as_slice() {
        // Lichess style "+2+1": checks already given, three to win
        ["", white, black] => {
            let white = parse_small_uint(white).filter(|n| *n <= 3).ok_or_else(err)?;
            let black = parse_small_uint(black).filter(|n| *n <= 3).ok_or_else(err)?;
            Ok(RemainingChecks {
                white: 3 - white,
                black: 3 - black,
            })
        }
        // Plain style "1+2": checks remaining
        [white, black] => {
            let white = parse_small_uint(white).filter(|n| *n <= 3).ok_or_else(err)?;
            let black = parse_small_uint(black).filter(|n| *n <= 3).ok_or_else(err)?;
            Ok(RemainingChecks { white, black })
        }
        _ => Err(err()),
    }
}

fn make_remaining_checks(checks: RemainingChecks) -> String {
    format!("{}+{}", checks.white, checks.black)
}

/// Parse a FEN string into an unvalidated [`Setup`].
pub fn parse_fen(fen: &str) -> Result<Setup, FenError> {
    let mut parts = fen
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty());

    let board_part = parts.next().ok_or(FenError::InvalidFen)?;
    let board = Board::from_board_fen(board_part)?;

    let turn = match parts.next() {
        None => Color::White,
        Some("w") => Color::White,
        Some("b") => Color::Black,
        Some(other) => {
            return Err(FenError::InvalidTurn {
                found: other.to_string(),
            })
        }
    };

    let unmoved_rooks = match parts.next() {
        None => Bitboard::EMPTY,
        Some(part) => parse_castling_fen(&board, part)?,
    };

    let ep_square = match parts.next() {
        None | Some("-") => None,
        Some(part) => Some(part.parse::<Square>().map_err(|_| FenError::InvalidEpSquare {
            found: part.to_string(),
        })?),
    };

    // A '+' in the halfmove slot means remaining checks came early
    let mut halfmoves_part = parts.next();
    let mut early_remaining_checks = None;
    if let Some(part) = halfmoves_part {
        if part.contains('+') {
            early_remaining_checks = Some(parse_remaining_checks(part)?);
            halfmoves_part = parts.next();
        }
    }

    let halfmoves = match halfmoves_part {
        None => 0,
        Some(part) => parse_small_uint(part).ok_or_else(|| FenError::InvalidHalfmoves {
            found: part.to_string(),
        })?,
    };

    let fullmoves = match parts.next() {
        None => 1,
        Some(part) => parse_small_uint(part)
            .ok_or_else(|| FenError::InvalidFullmoves {
                found: part.to_string(),
            })?
            .max(1),
    };

    let remaining_checks = match parts.next() {
        None => early_remaining_checks,
        Some(part) => {
            if early_remaining_checks.is_some() {
                return Err(FenError::InvalidRemainingChecks {
                    found: part.to_string(),
                });
            }
            Some(parse_remaining_checks(part)?)
        }
    };

    if parts.next().is_some() {
        return Err(FenError::InvalidFen);
    }

    #[cfg(feature = "logging")]
    if halfmoves_part.is_none() {
        debug!("FEN '{fen}' missing trailing fields, defaulted to 'w - - 0 1'");
    }

    Ok(Setup {
        board,
        turn,
        unmoved_rooks,
        ep_square,
        remaining_checks,
        halfmoves,
        fullmoves,
    })
}

/// Emit a canonical FEN string for a setup.
#[must_use]
pub fn make_fen(setup: &Setup) -> String {
    let mut fen = format!(
        "{} {} {} {} {} {}",
        setup.board.board_fen(),
        setup.turn.fen_char(),
        make_castling_fen(&setup.board, setup.unmoved_rooks),
        setup
            .ep_square
            .map_or_else(|| "-".to_string(), |sq| sq.to_string()),
        setup.halfmoves.min(9999),
        setup.fullmoves.clamp(1, 9999),
    );
    if let Some(checks) = setup.remaining_checks {
        fen.push(' ');
        fen.push_str(&make_remaining_checks(checks));
    }
    fen
}

impl FromStr for Setup {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_fen_round_trip() {
        let board = Board::new();
        assert_eq!(board.board_fen(), INITIAL_BOARD_FEN);
        assert_eq!(
            Board::from_board_fen(INITIAL_BOARD_FEN).unwrap(),
            board
        );
    }

    #[test]
    fn test_board_fen_errors() {
        assert_eq!(
            Board::from_board_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(FenError::InvalidBoard)
        );
        assert_eq!(
            Board::from_board_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::InvalidBoard)
        );
        assert_eq!(
            Board::from_board_fen("rnbqkbnr/pppppppp1/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::InvalidBoard)
        );
        assert_eq!(
            Board::from_board_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::InvalidBoard)
        );
        assert_eq!(
            Board::from_board_fen("rnbqkbnr/pppp0ppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::InvalidBoard)
        );
    }

    #[test]
    fn test_parse_fen_initial() {
        let setup = parse_fen(INITIAL_FEN).unwrap();
        assert_eq!(setup, Setup::default());
    }

    #[test]
    fn test_parse_fen_missing_fields_default() {
        let setup = parse_fen(INITIAL_BOARD_FEN).unwrap();
        assert_eq!(setup.turn, Color::White);
        assert_eq!(setup.unmoved_rooks, Bitboard::EMPTY);
        assert_eq!(setup.ep_square, None);
        assert_eq!(setup.halfmoves, 0);
        assert_eq!(setup.fullmoves, 1);
    }

    #[test]
    fn test_parse_fen_lenient_separators() {
        let setup = parse_fen("8/8/8/8/8/8/8/k6K_w_-_-_12_42").unwrap();
        assert_eq!(setup.halfmoves, 12);
        assert_eq!(setup.fullmoves, 42);

        let setup = parse_fen("8/8/8/8/8/8/8/k6K   w   -   -  3  7").unwrap();
        assert_eq!(setup.halfmoves, 3);
        assert_eq!(setup.fullmoves, 7);
    }

    #[test]
    fn test_parse_fen_errors() {
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K x - - 0 1"),
            Err(FenError::InvalidTurn { .. })
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K w X - 0 1"),
            Err(FenError::InvalidCastling { .. })
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K w - e9 0 1"),
            Err(FenError::InvalidEpSquare { .. })
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K w - - x 1"),
            Err(FenError::InvalidHalfmoves { .. })
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K w - - 0 x"),
            Err(FenError::InvalidFullmoves { .. })
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K w - - 0 1 junk"),
            Err(FenError::InvalidRemainingChecks { .. })
        ));
        assert!(matches!(
            parse_fen(""),
            Err(FenError::InvalidFen | FenError::InvalidBoard)
        ));
    }

    #[test]
    fn test_parse_fen_fullmoves_zero_clamped() {
        let setup = parse_fen("8/8/8/8/8/8/8/k6K w - - 0 0").unwrap();
        assert_eq!(setup.fullmoves, 1);
    }

    #[test]
    fn test_castling_fen_standard() {
        let board = Board::new();
        let unmoved = parse_castling_fen(&board, "KQkq").unwrap();
        assert_eq!(unmoved, Bitboard::CORNERS);
        assert_eq!(make_castling_fen(&board, unmoved), "KQkq");
        assert_eq!(make_castling_fen(&board, Bitboard::EMPTY), "-");
    }

    #[test]
    fn test_castling_fen_shredder_letters() {
        let board = Board::new();
        let unmoved = parse_castling_fen(&board, "AHah").unwrap();
        assert_eq!(unmoved, Bitboard::CORNERS);
        // Outermost rooks are emitted as KQkq
        assert_eq!(make_castling_fen(&board, unmoved), "KQkq");
    }

    #[test]
    fn test_castling_fen_inner_rook_emits_file_letter() {
        // White king e1, rooks b1 and h1; the b1 right is not outermost
        // on its wing once an a1 rook exists
        let board =
            Board::from_board_fen("4k3/8/8/8/8/8/8/RR2K2R").unwrap();
        let unmoved = parse_castling_fen(&board, "BHh").unwrap();
        let b1: Square = "b1".parse().unwrap();
        assert!(unmoved.contains(b1));
        let fen = make_castling_fen(&board, unmoved);
        assert!(fen.contains('B'));
        assert!(fen.contains('K'));
    }

    #[test]
    fn test_castling_fen_too_many_rooks_rejected() {
        let board =
            Board::from_board_fen("4k3/8/8/8/8/8/8/RR2K2R").unwrap();
        assert!(matches!(
            parse_castling_fen(&board, "ABH"),
            Err(FenError::InvalidCastling { .. })
        ));
    }

    #[test]
    fn test_remaining_checks_trailing() {
        let setup = parse_fen("8/8/8/8/8/8/8/k6K w - - 0 1 3+3").unwrap();
        assert_eq!(
            setup.remaining_checks,
            Some(RemainingChecks { white: 3, black: 3 })
        );
    }

    #[test]
    fn test_remaining_checks_early_ordering() {
        let setup = parse_fen("8/8/8/8/8/8/8/k6K w - - 1+2 0 1").unwrap();
        assert_eq!(
            setup.remaining_checks,
            Some(RemainingChecks { white: 1, black: 2 })
        );
        assert_eq!(setup.halfmoves, 0);
        assert_eq!(setup.fullmoves, 1);
    }

    #[test]
    fn test_remaining_checks_lichess_style() {
        let setup = parse_fen("8/8/8/8/8/8/8/k6K w - - +2+1 0 1").unwrap();
        assert_eq!(
            setup.remaining_checks,
            Some(RemainingChecks { white: 1, black: 2 })
        );
    }

    #[test]
    fn test_remaining_checks_in_both_slots_rejected() {
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/k6K w - - 1+1 0 1 2+2"),
            Err(FenError::InvalidRemainingChecks { .. })
        ));
    }

    #[test]
    fn test_make_fen_round_trip() {
        let fens = [
            INITIAL_FEN,
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "8/8/8/8/8/8/8/k6K b - - 13 99",
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
        ];
        for fen in fens {
            let setup = parse_fen(fen).unwrap();
            assert_eq!(make_fen(&setup), fen);
        }
    }

    #[test]
    fn test_make_fen_clamps_counters() {
        let setup = Setup {
            halfmoves: 123_456,
            fullmoves: 999_999,
            ..Setup::default()
        };
        let fen = make_fen(&setup);
        assert!(fen.ends_with("9999 9999"));
    }

    #[test]
    fn test_make_fen_emits_remaining_checks_last() {
        let setup = Setup {
            remaining_checks: Some(RemainingChecks { white: 2, black: 3 }),
            ..Setup::default()
        };
        assert!(make_fen(&setup).ends_with("0 1 2+3"));
    }

    #[test]
    fn test_setup_from_str() {
        let setup: Setup = INITIAL_FEN.parse().unwrap();
        assert_eq!(setup, Setup::default());
    }
}
