//! Const-evaluated leaper and ray tables.

/// (file delta, rank delta) steps.
type Steps<const N: usize> = [(i8, i8); N];

const KNIGHT_STEPS: Steps<8> = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_STEPS: Steps<8> = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const WHITE_PAWN_STEPS: Steps<2> = [(-1, 1), (1, 1)];
const BLACK_PAWN_STEPS: Steps<2> = [(-1, -1), (1, -1)];

/// Ray directions. The first four increase the square index, the last four
/// decrease it, which decides whether the nearest blocker is the lowest or
/// the highest set bit.
pub(crate) const DIRECTIONS: Steps<8> = [(0, 1), (1, 0), (1, 1), (-1, 1), (0, -1), (-1, 0), (-1, -1), (1, -1)];

pub(crate) const NORTH: usize = 0;
pub(crate) const EAST: usize = 1;
pub(crate) const NORTH_EAST: usize = 2;
pub(crate) const NORTH_WEST: usize = 3;
pub(crate) const SOUTH: usize = 4;
pub(crate) const WEST: usize = 5;
pub(crate) const SOUTH_WEST: usize = 6;
pub(crate) const SOUTH_EAST: usize = 7;

const fn on_board(file: i8, rank: i8) -> bool {
    file >= 0 && file < 8 && rank >= 0 && rank < 8
}

const fn leaper_table<const N: usize>(steps: Steps<N>) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        let (file, rank) = ((sq % 8) as i8, (sq / 8) as i8);
        let mut i = 0;
        while i < N {
            let (f, r) = (file + steps[i].0, rank + steps[i].1);
            if on_board(f, r) {
                table[sq] |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        sq += 1;
    }
    table
}

/// Every square reachable from each origin along each direction on an empty board.
const fn ray_table() -> [[u64; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = DIRECTIONS[dir];
        let mut sq = 0;
        while sq < 64 {
            let (mut f, mut r) = ((sq % 8) as i8 + df, (sq / 8) as i8 + dr);
            while on_board(f, r) {
                table[dir][sq] |= 1u64 << (r * 8 + f);
                f += df;
                r += dr;
            }
            sq += 1;
        }
        dir += 1;
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: [u64; 64] = leaper_table(KNIGHT_STEPS);
pub(crate) static KING_ATTACKS: [u64; 64] = leaper_table(KING_STEPS);
pub(crate) static PAWN_ATTACKS: [[u64; 64]; 2] = [leaper_table(WHITE_PAWN_STEPS), leaper_table(BLACK_PAWN_STEPS)];
pub(crate) static RAYS: [[u64; 64]; 8] = ray_table();
