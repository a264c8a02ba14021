//! Standard Algebraic Notation (SAN) support.
//!
//! Emission disambiguates against other legal same-role moves (file
//! first, then rank, then both) and appends `+`/`#` from the played-out
//! position. Parsing strips annotations, resolves castling against the
//! actual rights, and returns `None` for anything ambiguous or illegal.

use crate::attacks;
use crate::position::Position;
use crate::types::{
    file_index, rank_index, Bitboard, CastlingSide, Color, Move, Piece, Square, FILE_NAMES,
    RANK_NAMES,
};

/// Format a move in SAN, without the check suffix.
fn san_without_suffix(pos: &Position, m: &Move) -> String {
    let Move::Normal {
        from,
        to,
        promotion,
    } = *m;
    let Some(role) = pos.board().piece_type_at(from) else {
        return "--".to_string();
    };

    if role == Piece::King
        && (pos.board().by_color(pos.turn()).contains(to)
            || from.index().abs_diff(to.index()) == 2)
    {
        return if to > from { "O-O" } else { "O-O-O" }.to_string();
    }

    let mut san = String::new();
    let capture = pos.board().occupied().contains(to)
        || (role == Piece::Pawn && from.file() != to.file());

    if role == Piece::Pawn {
        if capture {
            san.push(FILE_NAMES[from.file()]);
        }
    } else {
        san.push(role.upper_char());

        // Same-role candidates that also reach the destination
        let occupied = pos.board().occupied();
        let mut others = attacks::attacks(pos.turn().opposite(), role, to, occupied)
            & pos.board().pieces(pos.turn(), role);
        others = others.without(from);
        if others.any() {
            let ctx = pos.ctx();
            for candidate in others {
                if !pos.dests_in(candidate, &ctx).contains(to) {
                    others = others.without(candidate);
                }
            }
            if others.any() {
                let mut rank = false;
                let mut file = others.intersects(Bitboard::rank_mask(from.rank()));
                if others.intersects(Bitboard::file_mask(from.file())) {
                    rank = true;
                } else {
                    file = true;
                }
                if file {
                    san.push(FILE_NAMES[from.file()]);
                }
                if rank {
                    san.push(RANK_NAMES[from.rank()]);
                }
            }
        }
    }

    if capture {
        san.push('x');
    }
    san.push_str(&to.to_string());
    if let Some(promo) = promotion {
        san.push('=');
        san.push(promo.upper_char());
    }
    san
}

/// Format a move in SAN, with `+`/`#` judged from the successor position.
#[must_use]
pub fn make_san(pos: &Position, m: &Move) -> String {
    let mut san = san_without_suffix(pos, m);
    let after = pos.play_unchecked(m);
    if after.outcome().is_some_and(|o| o.winner.is_some()) {
        san.push('#');
    } else if after.is_check() {
        san.push('+');
    }
    san
}

/// Parse a SAN string against a position. Returns the unique legal move,
/// or `None` on ambiguity or illegality.
#[must_use]
pub fn parse_san(pos: &Position, san: &str) -> Option<Move> {
    let san = san.trim_end_matches(['!', '?', '+', '#']);
    let ctx = pos.ctx();

    if let Some(side) = match san {
        "O-O" | "0-0" => Some(CastlingSide::King),
        "O-O-O" | "0-0-0" => Some(CastlingSide::Queen),
        _ => None,
    } {
        let king = pos.board().king_of(pos.turn())?;
        let rook = pos.castles().rook_of(pos.turn(), side)?;
        if !pos.dests_in(king, &ctx).contains(rook) {
            return None;
        }
        return Some(Move::new(king, rook));
    }

    let (role, to, disambig_file, disambig_rank, promotion) = split_san(san)?;

    let must_promote = role == Piece::Pawn && Bitboard::BACKRANKS.contains(to);
    if promotion.is_some() != must_promote {
        return None;
    }
    if matches!(promotion, Some(Piece::Pawn | Piece::King)) {
        return None;
    }

    let mut candidates = pos.board().pieces(pos.turn(), role);
    if role == Piece::Pawn && disambig_file.is_none() {
        candidates &= Bitboard::file_mask(to.file());
    } else if let Some(file) = disambig_file {
        candidates &= Bitboard::file_mask(file);
    }
    if let Some(rank) = disambig_rank {
        candidates &= Bitboard::rank_mask(rank);
    }

    // Only pieces that could attack the destination (or pawns advancing
    // on its file) can be the mover
    let pawn_advance = if role == Piece::Pawn {
        Bitboard::file_mask(to.file())
    } else {
        Bitboard::EMPTY
    };
    candidates &= pawn_advance
        | attacks::attacks(pos.turn().opposite(), role, to, pos.board().occupied());

    if role == Piece::Pawn {
        // Several pawns on the file: take the one furthest behind the
        // destination
        let mut chosen = None;
        for candidate in candidates {
            if !pos.dests_in(candidate, &ctx).contains(to) {
                continue;
            }
            match pos.turn() {
                Color::White => chosen = Some(candidate),
                Color::Black => {
                    if chosen.is_none() {
                        chosen = Some(candidate);
                    }
                }
            }
        }
        chosen.map(|from| Move::Normal {
            from,
            to,
            promotion,
        })
    } else {
        let mut from = None;
        for candidate in candidates {
            if pos.dests_in(candidate, &ctx).contains(to) {
                if from.is_some() {
                    return None;
                }
                from = Some(candidate);
            }
        }
        from.map(|from| Move::Normal {
            from,
            to,
            promotion,
        })
    }
}

type SanParts = (Piece, Square, Option<usize>, Option<usize>, Option<Piece>);

/// Split a suffix-free SAN body into role, destination, disambiguation,
/// and promotion.
fn split_san(san: &str) -> Option<SanParts> {
    if !san.is_ascii() {
        return None;
    }
    let mut rest = san;

    let mut promotion = None;
    if let Some(eq) = rest.rfind('=') {
        let promo = &rest[eq + 1..];
        if promo.chars().count() != 1 {
            return None;
        }
        promotion = Some(Piece::from_char(promo.chars().next()?)?);
        rest = &rest[..eq];
    } else {
        // Bare promotion letter, as in "e8Q"
        let bytes = rest.as_bytes();
        if bytes.len() >= 3
            && bytes[bytes.len() - 2].is_ascii_digit()
            && (bytes[bytes.len() - 1] as char).is_ascii_alphabetic()
        {
            promotion = Some(Piece::from_char(bytes[bytes.len() - 1] as char)?);
            rest = &rest[..rest.len() - 1];
        }
    }

    if rest.len() < 2 {
        return None;
    }
    let to: Square = rest[rest.len() - 2..].parse().ok()?;
    let mut head = &rest[..rest.len() - 2];

    if head.ends_with('x') || head.ends_with('-') {
        head = &head[..head.len() - 1];
    }

    let mut chars = head.chars().peekable();
    let role = match chars.peek() {
        Some(c) if c.is_ascii_uppercase() => {
            let role = Piece::from_char(*c)?;
            chars.next();
            role
        }
        _ => Piece::Pawn,
    };

    let mut disambig_file = None;
    let mut disambig_rank = None;
    for c in chars {
        match c {
            'a'..='h' if disambig_file.is_none() && disambig_rank.is_none() => {
                disambig_file = Some(file_index(c));
            }
            '1'..='8' if disambig_rank.is_none() => {
                disambig_rank = Some(rank_index(c));
            }
            _ => return None,
        }
    }

    Some((role, to, disambig_file, disambig_rank, promotion))
}

impl Position {
    /// Format a move in SAN against this position
    #[must_use]
    pub fn to_san(&self, m: &Move) -> String {
        make_san(self, m)
    }

    /// Parse a SAN string against this position
    #[must_use]
    pub fn parse_san(&self, san: &str) -> Option<Move> {
        parse_san(self, san)
    }
}
