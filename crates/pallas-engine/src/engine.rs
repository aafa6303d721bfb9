//! The engine: shared tables, played-position history and the search entry
//! point.

use std::collections::HashMap;

use pallas_core::{Board, Move};
use tracing::{debug, info};

use crate::config::{ConfigError, EngineConfig};
use crate::eval::evaluate;
use crate::search::breadcrumbs::Breadcrumbs;
use crate::search::control::SearchControl;
use crate::search::ordering::{MoveOrdering, sort_moves};
use crate::search::pool::Orchestrator;
use crate::search::tt::TranspositionTable;
use crate::search::{DRAW, SearchInfo, SearchResult, loss_in};

/// Owns everything that outlives a single search. The played-position
/// history only changes through `&mut self`, so it is frozen while a search
/// borrows the engine.
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    crumbs: Breadcrumbs,
    played: HashMap<u64, u32>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Engine, ConfigError> {
        config.validate()?;
        Ok(Engine {
            config,
            tt: TranspositionTable::new(config.hash_mb),
            crumbs: Breadcrumbs::new(),
            played: HashMap::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_threads(&mut self, threads: usize) -> Result<(), ConfigError> {
        let config = EngineConfig { threads, ..self.config };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Reallocate the transposition table. Its contents are lost.
    pub fn resize_hash(&mut self, hash_mb: usize) -> Result<(), ConfigError> {
        let config = EngineConfig { hash_mb, ..self.config };
        config.validate()?;
        self.config = config;
        self.tt = TranspositionTable::new(hash_mb);
        debug!(hash_mb, slots = self.tt.capacity(), "transposition table resized");
        Ok(())
    }

    /// Forget everything learned in the current game.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.crumbs.clear();
        self.played.clear();
    }

    /// Count one occurrence of a position reached in the game.
    pub fn record_position(&mut self, key: u64) {
        *self.played.entry(key).or_insert(0) += 1;
    }

    pub fn clear_history(&mut self) {
        self.played.clear();
    }

    /// Find the best move in `board`. Positions with zero or one legal move
    /// return without searching. If the search is stopped before any depth
    /// completes, the best-ordered root move is returned.
    pub fn search<F>(&self, board: &Board, control: &SearchControl, on_info: F) -> SearchResult
    where
        F: FnMut(&SearchInfo<'_>),
    {
        self.tt.new_generation();
        self.crumbs.clear();

        let mut moves = board.generate_all_legal_moves();
        match moves.as_slice() {
            [] => {
                let score = if board.is_in_check() { loss_in(0) } else { DRAW };
                info!(score, "no legal moves");
                return SearchResult {
                    best_move: Move::NONE,
                    ponder_move: None,
                    score,
                    depth: 0,
                    nodes: 0,
                    pv: Vec::new(),
                };
            }
            [only] => {
                info!(best = %only.mv, "single legal move");
                return SearchResult {
                    best_move: only.mv,
                    ponder_move: None,
                    score: evaluate(board),
                    depth: 0,
                    nodes: 0,
                    pv: vec![only.mv],
                };
            }
            _ => {}
        }

        let hash_move = self.tt.get(board.hash(), 0).map_or(Move::NONE, |e| e.mv);
        MoveOrdering::new().score_root_moves(board, &mut moves, hash_move);
        sort_moves(&mut moves);
        let fallback = moves[0].mv;

        info!(threads = self.config.threads, moves = moves.len(), "search started");
        let orchestrator = Orchestrator {
            threads: self.config.threads,
            tt: &self.tt,
            crumbs: &self.crumbs,
            played: &self.played,
            control,
        };
        let best = orchestrator.run(board, &moves, on_info);

        let result = match best {
            Some(iteration) => SearchResult {
                best_move: iteration.mv,
                ponder_move: iteration.pv.get(1).copied(),
                score: iteration.value,
                depth: iteration.depth,
                nodes: control.nodes(),
                pv: iteration.pv,
            },
            None => {
                debug!(best = %fallback, "stopped before the first depth, using ordering fallback");
                SearchResult {
                    best_move: fallback,
                    ponder_move: None,
                    score: evaluate(board),
                    depth: 0,
                    nodes: control.nodes(),
                    pv: vec![fallback],
                }
            }
        };
        info!(
            best = %result.best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            elapsed_ms = control.elapsed().as_millis() as u64,
            "search finished"
        );
        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            config: EngineConfig::default(),
            tt: TranspositionTable::new(EngineConfig::default().hash_mb),
            crumbs: Breadcrumbs::new(),
            played: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("tt_slots", &self.tt.capacity())
            .field("played", &self.played.len())
            .finish()
    }
}
