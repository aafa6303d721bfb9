//! Piece-square tables with material folded in.
//!
//! Officer and king tables cover the queen-side half of the board from
//! White's point of view (`[rank][file 0..4]`) and are mirrored across the
//! centre files. Pawn tables are full width. Black reads everything flipped.

use pallas_core::{Color, PieceKind, Square};

use crate::eval::score::{S, Score};

pub const PAWN_VALUE: Score = S(166, 207);
pub const KNIGHT_VALUE: Score = S(841, 749);
pub const BISHOP_VALUE: Score = S(758, 740);
pub const ROOK_VALUE: Score = S(1090, 1192);
pub const QUEEN_VALUE: Score = S(2363, 2339);

/// Material by [`PieceKind::index`]. The king has no material value.
pub const MATERIAL: [Score; PieceKind::COUNT] = [
    PAWN_VALUE,
    KNIGHT_VALUE,
    BISHOP_VALUE,
    ROOK_VALUE,
    QUEEN_VALUE,
    Score::ZERO,
];

type HalfBoard = [[Score; 4]; 8];

#[rustfmt::skip]
const KNIGHT: HalfBoard = [
    [S(-125, -44), S(-27, -89), S(-77, -60), S(-25, -42)],
    [S(-43, -99),  S(-59, -62), S(-30, -55), S(-11, -40)],
    [S(-44, -71),  S(-9, -57),  S(-10, -34), S(-5, -4)],
    [S(-29, -48),  S(30, -43),  S(21, 1),    S(23, 7)],
    [S(1, -59),    S(17, -31),  S(32, 4),    S(65, 5)],
    [S(-45, -91),  S(44, -75),  S(3, -2),    S(60, -8)],
    [S(-109, -89), S(-67, -40), S(94, -88),  S(1, -34)],
    [S(-299, -119),S(-74, -132),S(-149, -67),S(0, -90)],
];

#[rustfmt::skip]
const BISHOP: HalfBoard = [
    [S(-21, -25), S(7, -9),   S(8, -16),   S(6, -8)],
    [S(-1, -47),  S(63, -54), S(44, -33),  S(6, -12)],
    [S(16, -35),  S(43, -22), S(43, -6),   S(20, 8)],
    [S(0, -37),   S(9, -28),  S(14, -2),   S(50, 2)],
    [S(-29, -24), S(1, -25),  S(16, -6),   S(42, 5)],
    [S(-82, -5),  S(-4, -28), S(0, -7),    S(-17, -16)],
    [S(-94, -11), S(31, -20), S(-17, 0),   S(3, -22)],
    [S(-9, -43),  S(-39, -37),S(-96, -31), S(-91, -21)],
];

#[rustfmt::skip]
const ROOK: HalfBoard = [
    [S(-16, -35), S(-32, -14), S(2, -21),  S(18, -32)],
    [S(-81, 0),   S(-12, -31), S(-23, -18),S(0, -23)],
    [S(-68, -12), S(-26, -15), S(-21, -23),S(-17, -24)],
    [S(-66, 3),   S(-19, -3),  S(-26, 3),  S(-16, -5)],
    [S(-50, 11),  S(-34, 3),   S(17, 11),  S(4, -2)],
    [S(-26, 4),   S(38, 1),    S(39, -5),  S(20, -1)],
    [S(32, 11),   S(12, 25),   S(82, 3),   S(99, -10)],
    [S(6, 18),    S(12, 13),   S(-36, 29), S(24, 18)],
];

#[rustfmt::skip]
const QUEEN: HalfBoard = [
    [S(-10, -102), S(2, -107),  S(10, -102), S(45, -129)],
    [S(-8, -100),  S(-2, -79),  S(49, -108), S(37, -75)],
    [S(0, -34),    S(30, -55),  S(0, 7),     S(0, -4)],
    [S(0, -28),    S(-19, 38),  S(-6, 36),   S(-27, 83)],
    [S(-8, 0),     S(-42, 50),  S(-20, 42),  S(-51, 106)],
    [S(45, -45),   S(10, -11),  S(16, 21),   S(0, 81)],
    [S(1, -43),    S(-81, 31),  S(0, 18),    S(-30, 86)],
    [S(4, -40),    S(0, -3),    S(28, 9),    S(26, 23)],
];

#[rustfmt::skip]
const KING: HalfBoard = [
    [S(356, -34), S(347, 23),  S(208, 98),  S(223, 76)],
    [S(313, 41),  S(254, 78),  S(123, 136), S(70, 157)],
    [S(140, 83),  S(137, 112), S(68, 145),  S(2, 171)],
    [S(7, 94),    S(86, 111),  S(4, 166),   S(-11, 176)],
    [S(5, 121),   S(123, 151), S(103, 171), S(9, 180)],
    [S(119, 135), S(206, 166), S(178, 189), S(13, 166)],
    [S(64, 131),  S(34, 181),  S(39, 205),  S(29, 179)],
    [S(46, 1),    S(23, 99),   S(5, 138),   S(0, 100)],
];

/// Ranks 2 to 7; the first and last ranks never hold a pawn.
#[rustfmt::skip]
const PAWN: [[Score; 8]; 8] = [
    [S(0, 0); 8],
    [S(-13, -6), S(32, -11), S(2, 11),   S(26, 0),   S(20, 8),   S(2, 14),   S(36, -5), S(-21, -5)],
    [S(-7, -24), S(-14, -11),S(6, -5),   S(9, -10),  S(-3, 4),   S(7, -7),   S(-18, -14),S(-7, -20)],
    [S(-30, -5), S(-12, -8), S(14, -15), S(34, -18), S(22, -10), S(18, -13), S(-9, -8), S(-24, -3)],
    [S(-3, 19),  S(40, -5),  S(27, -15), S(57, -22), S(54, -33), S(13, -2),  S(40, -3), S(-8, 20)],
    [S(9, 67),   S(30, 55),  S(71, 14),  S(69, 6),   S(74, -1),  S(107, 22), S(12, 57), S(13, 74)],
    [S(-1, 117), S(6, 113),  S(0, 59),   S(0, 72),   S(41, 79),  S(-19, 78), S(0, 82),  S(-120, 136)],
    [S(0, 0); 8],
];

const fn plus(a: Score, b: Score) -> Score {
    S(a.mg() + b.mg(), a.eg() + b.eg())
}

const fn half_board(kind: usize) -> &'static HalfBoard {
    match kind {
        1 => &KNIGHT,
        2 => &BISHOP,
        3 => &ROOK,
        4 => &QUEEN,
        _ => &KING,
    }
}

/// White's table for one kind, material included, in LERF order.
const fn white_table(kind: usize) -> [Score; 64] {
    let mut table = [Score::ZERO; 64];
    let mut sq = 0;
    while sq < 64 {
        let (rank, file) = (sq / 8, sq % 8);
        let positional = if kind == 0 {
            PAWN[rank][file]
        } else {
            let mirrored = if file < 4 { file } else { 7 - file };
            half_board(kind)[rank][mirrored]
        };
        table[sq] = plus(MATERIAL[kind], positional);
        sq += 1;
    }
    table
}

/// Black's tables are White's seen from the other side. Pawns are also
/// flipped across files, as the pawn table is not file-symmetric.
const fn build() -> [[[Score; 64]; 6]; 2] {
    let mut tables = [[[Score::ZERO; 64]; 6]; 2];
    let mut kind = 0;
    while kind < 6 {
        let white = white_table(kind);
        let mut sq = 0;
        while sq < 64 {
            tables[0][kind][sq] = white[sq];
            let flipped = if kind == 0 { 63 - sq } else { sq ^ 56 };
            tables[1][kind][flipped] = white[sq];
            sq += 1;
        }
        kind += 1;
    }
    tables
}

static TABLES: [[[Score; 64]; 6]; 2] = build();

/// Material plus placement bonus for a `color` piece of `kind` on `sq`.
#[inline]
pub fn pst_value(color: Color, kind: PieceKind, sq: Square) -> Score {
    TABLES[color.index()][kind.index()][sq.index()]
}
