//! Precomputed attack tables and sliding-piece attack generation.
//!
//! Step pieces (king, knight, pawn) use tables initialized once at first
//! use. Sliders use hyperbola quintessence over per-square line masks:
//! `(o - 2r) ^ reverse(reverse(o) - 2 reverse(r))` restricted to the line,
//! with byte swapping as the reversal for files and diagonals and full bit
//! reversal for ranks.

use once_cell::sync::Lazy;

use crate::types::{Bitboard, Color, Piece, Square};

/// All squares on the file of `sq`, excluding `sq` itself
pub(crate) const FILE_RANGE: [u64; 64] = {
    let mut ranges = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        ranges[sq] = (0x0101010101010101u64 << (sq % 8)) & !(1u64 << sq);
        sq += 1;
    }
    ranges
};

/// All squares on the rank of `sq`, excluding `sq` itself
pub(crate) const RANK_RANGE: [u64; 64] = {
    let mut ranges = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        ranges[sq] = (0xFFu64 << (sq / 8 * 8)) & !(1u64 << sq);
        sq += 1;
    }
    ranges
};

const fn walk(sq: usize, dr: isize, df: isize) -> u64 {
    let mut mask = 0u64;
    let mut r = (sq / 8) as isize + dr;
    let mut f = (sq % 8) as isize + df;
    while r >= 0 && r < 8 && f >= 0 && f < 8 {
        mask |= 1u64 << (r * 8 + f);
        r += dr;
        f += df;
    }
    mask
}

/// All squares on the a1-h8 diagonal through `sq`, excluding `sq` itself
pub(crate) const DIAG_RANGE: [u64; 64] = {
    let mut ranges = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        ranges[sq] = walk(sq, 1, 1) | walk(sq, -1, -1);
        sq += 1;
    }
    ranges
};

/// All squares on the h1-a8 anti-diagonal through `sq`, excluding `sq` itself
pub(crate) const ANTI_DIAG_RANGE: [u64; 64] = {
    let mut ranges = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        ranges[sq] = walk(sq, 1, -1) | walk(sq, -1, 1);
        sq += 1;
    }
    ranges
};

static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut attacks = [0u64; 64];
    let deltas = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    for (sq, mask) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        for (dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                *mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            }
        }
    }
    attacks
});

static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut attacks = [0u64; 64];
    let deltas = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    for (sq, mask) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        for (dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                *mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            }
        }
    }
    attacks
});

static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    let mut attacks = [[0u64; 64]; 2];
    for sq in 0..64 {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        for (c, dr) in [(0, 1), (1, -1)] {
            let nr = r + dr;
            if (0..8).contains(&nr) {
                for df in [-1, 1] {
                    let nf = f + df;
                    if (0..8).contains(&nf) {
                        attacks[c][sq] |= 1u64 << ((nr as usize) * 8 + (nf as usize));
                    }
                }
            }
        }
    }
    attacks
});

/// Squares attacked by a king on `sq`
#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Squares attacked by a knight on `sq`
#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

/// Squares attacked by a pawn of `color` on `sq`
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}

fn hyperbola(bit: u64, range: u64, occupied: u64) -> u64 {
    let mut forward = occupied & range;
    let mut reverse = forward.swap_bytes();
    forward = forward.wrapping_sub(bit);
    reverse = reverse.wrapping_sub(bit.swap_bytes());
    (forward ^ reverse.swap_bytes()) & range
}

fn file_attacks(sq: usize, occupied: u64) -> u64 {
    hyperbola(1u64 << sq, FILE_RANGE[sq], occupied)
}

fn rank_attacks(sq: usize, occupied: u64) -> u64 {
    let range = RANK_RANGE[sq];
    let mut forward = occupied & range;
    let mut reverse = forward.reverse_bits();
    forward = forward.wrapping_sub(1u64 << sq);
    reverse = reverse.wrapping_sub(1u64 << (63 - sq));
    (forward ^ reverse.reverse_bits()) & range
}

/// Squares attacked by a bishop on `sq` with the given occupancy
#[must_use]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let idx = sq.index();
    let bit = 1u64 << idx;
    Bitboard(
        hyperbola(bit, DIAG_RANGE[idx], occupied.0)
            | hyperbola(bit, ANTI_DIAG_RANGE[idx], occupied.0),
    )
}

/// Squares attacked by a rook on `sq` with the given occupancy
#[must_use]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let idx = sq.index();
    Bitboard(file_attacks(idx, occupied.0) | rank_attacks(idx, occupied.0))
}

/// Squares attacked by a queen on `sq` with the given occupancy
#[must_use]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares attacked by a piece of the given color and type on `sq`
#[must_use]
pub fn attacks(color: Color, piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(color, sq),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}

/// The full line through `a` and `b` (both included) if they share a rank,
/// file, or diagonal; empty otherwise
#[must_use]
pub fn ray(a: Square, b: Square) -> Bitboard {
    let idx = a.index();
    let other = 1u64 << b.index();
    let bit = 1u64 << idx;
    if RANK_RANGE[idx] & other != 0 {
        Bitboard(RANK_RANGE[idx] | bit)
    } else if ANTI_DIAG_RANGE[idx] & other != 0 {
        Bitboard(ANTI_DIAG_RANGE[idx] | bit)
    } else if DIAG_RANGE[idx] & other != 0 {
        Bitboard(DIAG_RANGE[idx] | bit)
    } else if FILE_RANGE[idx] & other != 0 {
        Bitboard(FILE_RANGE[idx] | bit)
    } else {
        Bitboard::EMPTY
    }
}

/// The open segment strictly between `a` and `b` on their shared line;
/// empty if they are not aligned
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    let span = Bitboard::FULL.shl(a.index() as u32) ^ Bitboard::FULL.shl(b.index() as u32);
    (ray(a, b) & span).without_first()
}

/// Whether `a`, `b`, and `c` sit on a common rank, file, or diagonal
#[must_use]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    ray(a, b).contains(c)
}
