//! Reference sliding-attack algorithm: blocker subtraction.
//!
//! For a slider bit `s`, occupancy `o`, and directional line mask `m`, the
//! positive-direction ray is `(o ^ ((o & m) - 2s)) & m`. The negative
//! direction reverses `s`, `o`, and `m`, applies the same formula, and
//! reverses the result back. Exact to the bit, but too slow to call per node;
//! the magic tables in `super` are built from (and verified against) it.

use crate::board::types::{Bitboard, Square};

/// Full rank line through `sq`, including the square itself.
pub(crate) fn rank_mask(sq: Square) -> Bitboard {
    Bitboard(0xFFu64 << (sq.rank() * 8))
}

/// Full file line through `sq`, including the square itself.
pub(crate) fn file_mask(sq: Square) -> Bitboard {
    Bitboard(Bitboard::FILE_A.0 << sq.file())
}

/// Full a1-h8 direction diagonal through `sq`.
pub(crate) fn diagonal_mask(sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    let (rank, file) = (i16::from(sq.rank()), i16::from(sq.file()));
    for r in 0..8i16 {
        let f = file + (r - rank);
        if (0..8).contains(&f) {
            mask |= Bitboard(1u64 << (r * 8 + f));
        }
    }
    mask
}

/// Full a8-h1 direction anti-diagonal through `sq`.
pub(crate) fn antidiagonal_mask(sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    let (rank, file) = (i16::from(sq.rank()), i16::from(sq.file()));
    for r in 0..8i16 {
        let f = file - (r - rank);
        if (0..8).contains(&f) {
            mask |= Bitboard(1u64 << (r * 8 + f));
        }
    }
    mask
}

/// Attacks along one line mask, both directions, blockers included.
fn line_attacks(sq: Square, occupancy: Bitboard, mask: Bitboard) -> Bitboard {
    let slider = Bitboard::from_square(sq);

    // positive direction: (o ^ ((o & m) - 2s)) & m
    let blockers = occupancy & mask;
    let positive = (occupancy ^ blockers.wrapping_sub(slider.wrapping_mul(2))) & mask;

    // negative direction via full 64-bit reversal
    let occ_rev = occupancy.reverse();
    let mask_rev = mask.reverse();
    let slider_rev = slider.reverse();
    let blockers_rev = occ_rev & mask_rev;
    let negative =
        ((occ_rev ^ blockers_rev.wrapping_sub(slider_rev.wrapping_mul(2))) & mask_rev).reverse();

    positive | negative
}

/// Rook attacks by the reference algorithm (rank and file lines).
pub(crate) fn rook_ray_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    line_attacks(sq, occupancy, rank_mask(sq)) | line_attacks(sq, occupancy, file_mask(sq))
}

/// Bishop attacks by the reference algorithm (diagonal lines).
pub(crate) fn bishop_ray_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    line_attacks(sq, occupancy, diagonal_mask(sq))
        | line_attacks(sq, occupancy, antidiagonal_mask(sq))
}

/// Relevant blocker mask for a rook: its lines minus the board edge in each
/// direction and minus the square itself. Blockers on the edge cannot shorten
/// an attack, so they need not index the magic table.
pub(crate) fn rook_relevant_mask(sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    let (rank, file) = (sq.rank(), sq.file());
    for r in (rank + 1)..7 {
        mask |= Bitboard::from_square(Square::new(r, file));
    }
    for r in 1..rank {
        mask |= Bitboard::from_square(Square::new(r, file));
    }
    for f in (file + 1)..7 {
        mask |= Bitboard::from_square(Square::new(rank, f));
    }
    for f in 1..file {
        mask |= Bitboard::from_square(Square::new(rank, f));
    }
    mask
}

/// Relevant blocker mask for a bishop: diagonal interiors, edges excluded.
pub(crate) fn bishop_relevant_mask(sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    let (rank, file) = (i16::from(sq.rank()), i16::from(sq.file()));
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (rank + dr, file + df);
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= Bitboard(1u64 << (r * 8 + f));
            r += dr;
            f += df;
        }
    }
    mask
}
