//! Static lookup tables: precomputed non-slider attacks, magic bitboards for
//! sliders, piece-square tables, and Zobrist keys.
//!
//! Built once at startup, immutable afterwards, and safe to share between
//! concurrent searches. Components take `&Tables` explicitly; `Tables::global`
//! is a convenience instance for callers that do not manage their own.

mod pst;
pub(crate) mod rays;

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::zobrist::ZobristKeys;

use super::types::{Bitboard, Color, Square};

pub(crate) use pst::PST;

/// Per-square magic lookup data for one slider kind.
#[derive(Clone, Copy, Default)]
struct MagicEntry {
    /// Relevant blocker mask (line interiors, edges excluded).
    mask: Bitboard,
    /// Magic multiplier; injective over the mask's blocker subsets.
    magic: u64,
    /// Right shift, `64 - index_bits`.
    shift: u32,
    /// Start of this square's slice in the shared attack table.
    offset: usize,
}

/// The full static table bundle.
pub struct Tables {
    /// Single-square forward push per color and square (empty on last rank).
    pub(crate) pawn_pushes: [[Bitboard; 64]; 2],
    /// Two-square initial push target (empty unless on the start rank).
    pub(crate) pawn_double_pushes: [[Bitboard; 64]; 2],
    /// Diagonal capture targets per color and square.
    pub(crate) pawn_attacks: [[Bitboard; 64]; 2],
    pub(crate) knight_attacks: [Bitboard; 64],
    pub(crate) king_attacks: [Bitboard; 64],

    rook_magics: [MagicEntry; 64],
    bishop_magics: [MagicEntry; 64],
    rook_table: Vec<Bitboard>,
    bishop_table: Vec<Bitboard>,

    pub(crate) zobrist: ZobristKeys,
}

static TABLES: Lazy<Tables> = Lazy::new(Tables::new);

impl Default for Tables {
    fn default() -> Self {
        Tables::new()
    }
}

impl Tables {
    /// Process-wide shared instance.
    #[must_use]
    pub fn global() -> &'static Tables {
        &TABLES
    }

    /// Build every table. Deterministic; the magic search runs from a fixed
    /// seed so two processes always produce identical tables.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE_5EED_1234);
        let (rook_magics, rook_table) =
            build_magic_tables(&mut rng, rays::rook_relevant_mask, rays::rook_ray_attacks);
        let (bishop_magics, bishop_table) = build_magic_tables(
            &mut rng,
            rays::bishop_relevant_mask,
            rays::bishop_ray_attacks,
        );

        Tables {
            pawn_pushes: build_pawn_pushes(false),
            pawn_double_pushes: build_pawn_pushes(true),
            pawn_attacks: build_pawn_attacks(),
            knight_attacks: build_leaper(&[
                (2, 1),
                (2, -1),
                (-2, 1),
                (-2, -1),
                (1, 2),
                (1, -2),
                (-1, 2),
                (-1, -2),
            ]),
            king_attacks: build_leaper(&[
                (1, 0),
                (1, 1),
                (0, 1),
                (-1, 1),
                (-1, 0),
                (-1, -1),
                (0, -1),
                (1, -1),
            ]),
            rook_magics,
            bishop_magics,
            rook_table,
            bishop_table,
            zobrist: ZobristKeys::new(),
        }
    }

    /// Rook attacks for the given occupancy, O(1) magic lookup.
    #[inline]
    #[must_use]
    pub fn rook_attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let entry = &self.rook_magics[sq.index() as usize];
        self.rook_table[entry.offset + magic_index(entry, occupancy)]
    }

    /// Bishop attacks for the given occupancy, O(1) magic lookup.
    #[inline]
    #[must_use]
    pub fn bishop_attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let entry = &self.bishop_magics[sq.index() as usize];
        self.bishop_table[entry.offset + magic_index(entry, occupancy)]
    }

    /// Queen attacks: rook union bishop.
    #[inline]
    #[must_use]
    pub fn queen_attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupancy) | self.bishop_attacks(sq, occupancy)
    }

    /// Pawn single-push target square, before any blocker gating.
    #[inline]
    pub(crate) fn pawn_push(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_pushes[color.index()][sq.index() as usize]
    }

    #[inline]
    pub(crate) fn pawn_double_push(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_double_pushes[color.index()][sq.index() as usize]
    }

    #[inline]
    pub(crate) fn pawn_attack(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_attacks[color.index()][sq.index() as usize]
    }
}

#[inline]
fn magic_index(entry: &MagicEntry, occupancy: Bitboard) -> usize {
    let blockers = occupancy & entry.mask;
    (blockers.wrapping_mul(entry.magic).0 >> entry.shift) as usize
}

/// Enumerate every subset of `mask` (carry-rippler), including the empty set.
fn blocker_subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut subsets = Vec::with_capacity(1 << mask.popcount());
    let mut subset = Bitboard::EMPTY;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset.is_empty() {
            break;
        }
    }
    subsets
}

/// Search for a magic multiplier for one square and fill its table slice.
///
/// A candidate is accepted when the index map is injective over the square's
/// reachable blocker subsets: two subsets may share an index only if their
/// true attack sets are identical.
fn find_magic(
    rng: &mut StdRng,
    sq: Square,
    mask: Bitboard,
    ray_attacks: impl Fn(Square, Bitboard) -> Bitboard,
) -> (u64, Vec<Bitboard>) {
    let bits = mask.popcount();
    let shift = 64 - bits;
    let size = 1usize << bits;
    let subsets = blocker_subsets(mask);
    let attacks: Vec<Bitboard> = subsets.iter().map(|&occ| ray_attacks(sq, occ)).collect();

    loop {
        // sparse candidates converge far faster than uniform ones
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic).0 >> 56).count_ones() < 6 {
            continue;
        }

        let mut table = vec![Bitboard::EMPTY; size];
        let mut used = vec![false; size];
        let mut ok = true;
        for (&subset, &attack) in subsets.iter().zip(&attacks) {
            let index = (subset.wrapping_mul(magic).0 >> shift) as usize;
            if used[index] && table[index] != attack {
                ok = false;
                break;
            }
            table[index] = attack;
            used[index] = true;
        }
        if ok {
            return (magic, table);
        }
    }
}

fn build_magic_tables(
    rng: &mut StdRng,
    relevant_mask: impl Fn(Square) -> Bitboard,
    ray_attacks: impl Fn(Square, Bitboard) -> Bitboard + Copy,
) -> ([MagicEntry; 64], Vec<Bitboard>) {
    let mut entries = [MagicEntry::default(); 64];
    let mut table = Vec::new();
    for sq in Square::all() {
        let mask = relevant_mask(sq);
        let (magic, square_table) = find_magic(rng, sq, mask, ray_attacks);
        entries[sq.index() as usize] = MagicEntry {
            mask,
            magic,
            shift: 64 - mask.popcount(),
            offset: table.len(),
        };
        table.extend_from_slice(&square_table);
    }
    (entries, table)
}

fn build_pawn_pushes(double: bool) -> [[Bitboard; 64]; 2] {
    let mut tables = [[Bitboard::EMPTY; 64]; 2];
    for color in [Color::White, Color::Black] {
        let start_rank = if color == Color::White { 1 } else { 6 };
        for sq in Square::all() {
            let target_rank = i16::from(sq.rank())
                + i16::from(color.forward()) * if double { 2 } else { 1 };
            if double && sq.rank() != start_rank {
                continue;
            }
            if (0..8).contains(&target_rank) {
                tables[color.index()][sq.index() as usize] =
                    Bitboard::from_square(Square::new(target_rank as u8, sq.file()));
            }
        }
    }
    tables
}

fn build_pawn_attacks() -> [[Bitboard; 64]; 2] {
    let mut tables = [[Bitboard::EMPTY; 64]; 2];
    for color in [Color::White, Color::Black] {
        for sq in Square::all() {
            let mut attacks = Bitboard::EMPTY;
            let target_rank = i16::from(sq.rank()) + i16::from(color.forward());
            for df in [-1i16, 1] {
                let target_file = i16::from(sq.file()) + df;
                if (0..8).contains(&target_rank) && (0..8).contains(&target_file) {
                    attacks |=
                        Bitboard::from_square(Square::new(target_rank as u8, target_file as u8));
                }
            }
            tables[color.index()][sq.index() as usize] = attacks;
        }
    }
    tables
}

fn build_leaper(offsets: &[(i16, i16)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in Square::all() {
        let mut attacks = Bitboard::EMPTY;
        for &(dr, df) in offsets {
            let r = i16::from(sq.rank()) + dr;
            let f = i16::from(sq.file()) + df;
            if (0..8).contains(&r) && (0..8).contains(&f) {
                attacks |= Bitboard::from_square(Square::new(r as u8, f as u8));
            }
        }
        table[sq.index() as usize] = attacks;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_matches_rays_on_empty_and_full_boards() {
        let tables = Tables::global();
        for sq in Square::all() {
            for occ in [Bitboard::EMPTY, Bitboard::ALL, Bitboard(0x00FF_00FF_00FF_00FF)] {
                assert_eq!(
                    tables.rook_attacks(sq, occ),
                    rays::rook_ray_attacks(sq, occ),
                    "rook mismatch on {sq}"
                );
                assert_eq!(
                    tables.bishop_attacks(sq, occ),
                    rays::bishop_ray_attacks(sq, occ),
                    "bishop mismatch on {sq}"
                );
            }
        }
    }

    #[test]
    fn knight_attacks_center_and_corner() {
        let tables = Tables::global();
        // knight on b1 attacks a3, c3, d2
        let b1 = Square::new(0, 1);
        let expected = Bitboard::from_square(Square::new(2, 0))
            | Bitboard::from_square(Square::new(2, 2))
            | Bitboard::from_square(Square::new(1, 3));
        assert_eq!(tables.knight_attacks[b1.index() as usize], expected);
        // knight in the middle has 8 targets
        let e4 = Square::new(3, 4);
        assert_eq!(tables.knight_attacks[e4.index() as usize].popcount(), 8);
    }

    #[test]
    fn king_attack_counts() {
        let tables = Tables::global();
        assert_eq!(tables.king_attacks[0].popcount(), 3); // a1
        assert_eq!(
            tables.king_attacks[Square::new(3, 4).index() as usize].popcount(),
            8
        );
    }

    #[test]
    fn pawn_tables_respect_color_and_rank() {
        let tables = Tables::global();
        let e2 = Square::new(1, 4);
        assert_eq!(
            tables.pawn_push(Color::White, e2),
            Bitboard::from_square(Square::new(2, 4))
        );
        assert_eq!(
            tables.pawn_double_push(Color::White, e2),
            Bitboard::from_square(Square::new(3, 4))
        );
        // no double push off the start rank
        assert!(tables
            .pawn_double_push(Color::White, Square::new(2, 4))
            .is_empty());
        // black moves down the board
        let e7 = Square::new(6, 4);
        assert_eq!(
            tables.pawn_push(Color::Black, e7),
            Bitboard::from_square(Square::new(5, 4))
        );
        // captures from the edge stay on the board
        assert_eq!(tables.pawn_attack(Color::White, Square::new(1, 0)).popcount(), 1);
        assert_eq!(tables.pawn_attack(Color::White, e2).popcount(), 2);
    }
}
