//! Attack and threat analysis: the set of squares a color attacks, plus the
//! check/pin bookkeeping the legal move generator needs.
//!
//! This generalizes the square-by-square attacker test in
//! [`crate::moves::square_control`] into the bulk computation the generator
//! actually wants: one pass over the defending king's eight rays yields both
//! the pin set and the squares available to resolve a check, instead of
//! generating pseudo-legal moves and rejecting the illegal ones after the
//! fact.

use once_cell::sync::OnceCell;

use crate::board::{Board, Color, Piece};
use crate::moves::king::king_attacks;
use crate::moves::knight::knight_attacks;
use crate::moves::magic::MagicTables;
use crate::moves::pawn::pawn_attacks;
use crate::square::Square;

/// Step deltas (d_rank, d_file) for the four orthogonal directions followed
/// by the four diagonal directions.
const ORTHOGONAL_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Attacker-color attack information relative to a position.
#[derive(Debug, Clone, Copy)]
pub struct Attacks {
    /// Every square the attacker color attacks, with sliding attacks
    /// extended through the defending king along any checking ray.
    pub attacks: u64,
    /// Number of distinct pieces giving check (0, 1, or 2).
    pub checks: u32,
    /// Squares a defending piece may move to or capture on to resolve a
    /// single check. All-ones when `checks == 0`.
    pub check_rays: u64,
    /// Squares occupied by a defending piece pinned to its own king.
    pub pins: u64,
}

fn step_squares(from: Square, dr: i32, df: i32) -> impl Iterator<Item = Square> {
    let mut rank = from.rank() as i32;
    let mut file = from.file() as i32;
    std::iter::from_fn(move || {
        rank += dr;
        file += df;
        if !(0..8).contains(&rank) || !(0..8).contains(&file) {
            return None;
        }
        Some(Square::from_file_rank(file as u8, rank as u8))
    })
}

fn is_orthogonal_slider(piece: Piece) -> bool {
    matches!(piece, Piece::Rook | Piece::Queen)
}

fn is_diagonal_slider(piece: Piece) -> bool {
    matches!(piece, Piece::Bishop | Piece::Queen)
}

/// Computes every square `attacker` attacks, plus pin/check bookkeeping for
/// the *other* color's king.
pub fn compute_attacks(board: &Board, attacker: Color, tables: &MagicTables) -> Attacks {
    let defender = attacker.opposite();
    let king_sq = board.king_square(defender);

    // Blockers exclude the defending king so a sliding attack reaches
    // through it onto the squares the king could otherwise retreat to.
    let blockers_excluding_king = board.occupied() & !king_sq.bit();

    let mut attacks = 0u64;

    attacks |= king_attacks(board.king_square(attacker).index() as usize);

    let mut knights = board.bb(attacker, Piece::Knight);
    while knights != 0 {
        let sq = knights.trailing_zeros() as usize;
        attacks |= knight_attacks(sq);
        knights &= knights - 1;
    }

    let mut pawns = board.bb(attacker, Piece::Pawn);
    while pawns != 0 {
        let sq = pawns.trailing_zeros() as usize;
        attacks |= pawn_attacks(sq, attacker);
        pawns &= pawns - 1;
    }

    let mut rooks_queens = board.bb(attacker, Piece::Rook) | board.bb(attacker, Piece::Queen);
    while rooks_queens != 0 {
        let sq = rooks_queens.trailing_zeros() as usize;
        attacks |= tables.rook.get_attacks(sq, blockers_excluding_king);
        rooks_queens &= rooks_queens - 1;
    }

    let mut bishops_queens = board.bb(attacker, Piece::Bishop) | board.bb(attacker, Piece::Queen);
    while bishops_queens != 0 {
        let sq = bishops_queens.trailing_zeros() as usize;
        attacks |= tables.bishop.get_attacks(sq, blockers_excluding_king);
        bishops_queens &= bishops_queens - 1;
    }

    let mut checks = 0u32;
    let mut check_rays = 0u64;
    let mut pins = 0u64;

    for &(dr, df) in ORTHOGONAL_DIRS.iter().chain(DIAGONAL_DIRS.iter()) {
        let orthogonal = ORTHOGONAL_DIRS.contains(&(dr, df));
        let mut ray_mask = 0u64;
        let mut blocker: Option<Color> = None;

        for sq in step_squares(king_sq, dr, df) {
            ray_mask |= sq.bit();
            let Some((color, piece)) = board.piece_at(sq) else {
                continue;
            };

            let compatible = color == attacker
                && if orthogonal {
                    is_orthogonal_slider(piece)
                } else {
                    is_diagonal_slider(piece)
                };

            if compatible {
                match blocker {
                    None => {
                        checks += 1;
                        check_rays |= ray_mask;
                    }
                    Some(blocker_color) if blocker_color == defender => {
                        pins |= ray_mask;
                    }
                    _ => {}
                }
                break;
            } else if blocker.is_none() {
                blocker = Some(color);
            } else {
                break;
            }
        }
    }

    let mut knight_checkers = board.bb(attacker, Piece::Knight) & knight_attacks(king_sq.index() as usize);
    while knight_checkers != 0 {
        let sq = knight_checkers.trailing_zeros() as usize;
        checks += 1;
        check_rays |= 1u64 << sq;
        knight_checkers &= knight_checkers - 1;
    }

    let mut pawn_checkers = board.bb(attacker, Piece::Pawn) & pawn_attacks(king_sq.index() as usize, defender);
    while pawn_checkers != 0 {
        let sq = pawn_checkers.trailing_zeros() as usize;
        checks += 1;
        check_rays |= 1u64 << sq;
        pawn_checkers &= pawn_checkers - 1;
    }

    if checks == 0 {
        check_rays = u64::MAX;
    }

    Attacks {
        attacks,
        checks,
        check_rays,
        pins,
    }
}

fn build_aligned_along() -> Vec<u64> {
    let mut table = vec![0u64; 64 * 64];
    for a in 0..64u8 {
        let sq_a = Square::from_index(a);
        for &(dr, df) in ORTHOGONAL_DIRS.iter().chain(DIAGONAL_DIRS.iter()) {
            let mut line = sq_a.bit();
            for sq in step_squares(sq_a, dr, df) {
                line |= sq.bit();
            }
            // second pass records, for every square on this line, the full line
            let mut bits = line;
            while bits != 0 {
                let b = bits.trailing_zeros() as usize;
                table[a as usize * 64 + b] |= line;
                bits &= bits - 1;
            }
        }
    }
    table
}

/// The bitboard of the full rank/file/diagonal line through `a` and `b`, or
/// 0 if the two squares are not collinear.
pub fn aligned_along(a: Square, b: Square) -> u64 {
    static TABLE: OnceCell<Vec<u64>> = OnceCell::new();
    let table = TABLE.get_or_init(build_aligned_along);
    table[a.index() as usize * 64 + b.index() as usize]
}
