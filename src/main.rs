use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pallas_core::{Board, STARTING_FEN};
use pallas_engine::{
    Engine, EngineConfig, SearchControl, SearchInfo, SearchLimits, VALUE_WIN, depth_to_mate, limits_from_clock,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Depth searched when no other limit is given.
const DEFAULT_DEPTH: i32 = 8;

#[derive(Parser, Debug)]
#[command(version, about = "Search one chess position and print the best move")]
struct Args {
    /// Position to search.
    #[arg(long, default_value = STARTING_FEN)]
    fen: String,

    /// Moves in UCI notation played from the FEN before searching.
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,

    /// Stop after this depth. Defaults to 8 when no other limit is given.
    #[arg(long)]
    depth: Option<i32>,

    /// Node budget.
    #[arg(long)]
    nodes: Option<u64>,

    /// Exact time to spend, in milliseconds.
    #[arg(long, conflicts_with = "time")]
    movetime: Option<u64>,

    /// Remaining clock time for the side to move, in milliseconds.
    #[arg(long)]
    time: Option<u64>,

    /// Increment per move, in milliseconds.
    #[arg(long, default_value_t = 0, requires = "time")]
    inc: u64,

    /// Moves until the next time control.
    #[arg(long, requires = "time")]
    movestogo: Option<u32>,

    /// Search workers.
    #[arg(long, default_value_t = EngineConfig::default().threads)]
    threads: usize,

    /// Transposition table size in megabytes.
    #[arg(long, default_value_t = EngineConfig::default().hash_mb)]
    hash: usize,
}

impl Args {
    fn limits(&self, board: &Board) -> SearchLimits {
        let mut limits = match (self.movetime, self.time) {
            (Some(ms), _) => SearchLimits::movetime(Duration::from_millis(ms)),
            (None, Some(ms)) => limits_from_clock(
                Duration::from_millis(ms),
                Duration::from_millis(self.inc),
                self.movestogo,
                board,
            ),
            (None, None) => SearchLimits::infinite(),
        };
        limits.nodes = self.nodes;
        limits.depth = self.depth.map(|d| d.max(1));
        if limits == SearchLimits::infinite() {
            limits.depth = Some(DEFAULT_DEPTH);
        }
        limits
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = EngineConfig {
        threads: args.threads,
        hash_mb: args.hash,
    };
    let mut engine = Engine::new(config).context("invalid engine configuration")?;

    let mut board: Board = args
        .fen
        .parse()
        .with_context(|| format!("invalid FEN \"{}\"", args.fen))?;
    engine.record_position(board.hash());
    for uci in &args.moves {
        let Some(mv) = board.find_move(uci) else {
            bail!("unknown or illegal move \"{uci}\" in position {board}");
        };
        let mut next = board;
        if !board.make_move_into(mv, &mut next) {
            bail!("move \"{uci}\" leaves the king in check in position {board}");
        }
        board = next;
        engine.record_position(board.hash());
    }

    let limits = args.limits(&board);
    info!(fen = %board, ?limits, threads = config.threads, "searching");

    let control = SearchControl::new(Arc::new(AtomicBool::new(false)), limits);
    let result = engine.search(&board, &control, |report| {
        println!("{}", info_line(report, control.elapsed()));
    });

    match result.ponder_move {
        Some(ponder) => println!("bestmove {} ponder {}", result.best_move, ponder),
        None => println!("bestmove {}", result.best_move),
    }
    Ok(())
}

fn info_line(report: &SearchInfo<'_>, elapsed: Duration) -> String {
    let ms = elapsed.as_millis().max(1);
    let nps = u128::from(report.nodes) * 1000 / ms;
    let pv = report.pv.iter().map(|mv| mv.to_uci()).collect::<Vec<_>>().join(" ");
    format!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        report.depth,
        format_score(report.score),
        report.nodes,
        nps,
        ms,
        pv
    )
}

/// `cp N`, or `mate N` in full moves, negative when being mated.
fn format_score(score: i32) -> String {
    if score.abs() < VALUE_WIN {
        return format!("cp {score}");
    }
    let plies = depth_to_mate(score);
    let moves = if plies > 0 { (plies + 1) / 2 } else { plies / 2 };
    format!("mate {moves}")
}

#[cfg(test)]
mod tests {
    use pallas_engine::MATE;

    use super::*;

    #[test]
    fn scores_in_uci_units() {
        assert_eq!(format_score(35), "cp 35");
        assert_eq!(format_score(-120), "cp -120");
        assert_eq!(format_score(MATE - 1), "mate 1");
        assert_eq!(format_score(MATE - 3), "mate 2");
        assert_eq!(format_score(-MATE + 2), "mate -1");
    }

    #[test]
    fn limits_default_to_fixed_depth() {
        let board = Board::starting_position();
        let args = Args::parse_from(["pallas"]);
        assert_eq!(args.limits(&board), SearchLimits::depth(DEFAULT_DEPTH));

        let args = Args::parse_from(["pallas", "--nodes", "5000"]);
        assert_eq!(args.limits(&board), SearchLimits::nodes(5000));

        let args = Args::parse_from(["pallas", "--movetime", "250", "--depth", "4"]);
        let limits = args.limits(&board);
        assert_eq!(limits.hard_time, Some(Duration::from_millis(250)));
        assert_eq!(limits.depth, Some(4));
    }

    #[test]
    fn moves_are_space_separated() {
        let args = Args::parse_from(["pallas", "--moves", "e2e4 e7e5", "--threads", "2"]);
        assert_eq!(args.moves, vec!["e2e4", "e7e5"]);
        assert_eq!(args.threads, 2);
    }
}
