//! Perft: leaf counts of the legal move tree, for verifying the generator.

use crate::board::Board;
use crate::chess_move::{Move, MoveList};

/// Number of leaf nodes `depth` plies below `board`. Depth 0 counts the
/// position itself.
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    board.generate_pseudo_legal(&mut moves);

    let mut child = *board;
    let mut nodes = 0;
    for &mv in &moves {
        if board.make_move_into(mv, &mut child) {
            nodes += if depth == 1 { 1 } else { perft(&child, depth - 1) };
        }
    }
    nodes
}

/// Per-move breakdown of [`perft`], sorted by UCI text.
pub fn divide(board: &Board, depth: usize) -> Vec<(Move, u64)> {
    let mut child = *board;
    let mut results: Vec<(Move, u64)> = board
        .generate_all_legal_moves()
        .into_iter()
        .filter_map(|em| {
            board
                .make_move_into(em.mv, &mut child)
                .then(|| (em.mv, perft(&child, depth.saturating_sub(1))))
        })
        .collect();
    results.sort_by_key(|(mv, _)| mv.to_string());
    results
}
