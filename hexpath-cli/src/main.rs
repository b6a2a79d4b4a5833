//! HEXPATH CLI - Command-line interface
//!
//! Commands:
//! - reach: List every hex a unit can reach within its MP budget
//! - path: Find the cheapest (or greedy) path to a destination hex

use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;

use hexpath_core::{
    Board, Hex, HexInfo, MoveMode, MovePath, MoveProfile, PathFinder, TerrainKind,
};

#[derive(Parser)]
#[command(name = "hexpath")]
#[command(about = "HEXPATH hex-grid movement planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every hex reachable within the MP budget
    Reach {
        /// Board JSON file; omit for a flat clear board
        #[arg(long)]
        board: Option<String>,
        #[arg(long, default_value = "16")]
        cols: i16,
        #[arg(long, default_value = "16")]
        rows: i16,
        /// Start hex as "q,r"
        #[arg(long)]
        start: String,
        /// Start facing 0-5; omit for an omnidirectional unit
        #[arg(long)]
        facing: Option<u8>,
        #[arg(long, default_value = "biped")]
        mode: String,
        #[arg(long, default_value = "6")]
        mp: u32,
        /// Search jump movement instead of ground movement
        #[arg(long)]
        jump: bool,
        /// Start velocity for flight modes
        #[arg(long, default_value = "1")]
        velocity: i16,
    },
    /// Find a path to a destination hex
    Path {
        /// Board JSON file; omit for a flat clear board
        #[arg(long)]
        board: Option<String>,
        #[arg(long, default_value = "16")]
        cols: i16,
        #[arg(long, default_value = "16")]
        rows: i16,
        /// Start hex as "q,r"
        #[arg(long)]
        start: String,
        /// Destination hex as "q,r"
        #[arg(long)]
        dest: String,
        #[arg(long)]
        facing: Option<u8>,
        #[arg(long, default_value = "biped")]
        mode: String,
        #[arg(long, default_value = "6")]
        mp: u32,
        /// Use the fast non-optimal greedy search
        #[arg(long)]
        greedy: bool,
    },
}

// ============================================================================
// BOARD FILE FORMAT
// ============================================================================

#[derive(Serialize, Deserialize)]
struct BoardHex {
    q: i16,
    r: i16,
    #[serde(default)]
    level: i8,
    #[serde(default = "default_terrain")]
    terrain: TerrainKind,
    #[serde(default)]
    building: Option<u8>,
    #[serde(default)]
    bridge: Option<i8>,
}

#[derive(Serialize, Deserialize)]
struct BoardFile {
    hexes: Vec<BoardHex>,
}

fn default_terrain() -> TerrainKind {
    TerrainKind::Clear
}

fn load_board(path: Option<&str>, cols: i16, rows: i16) -> anyhow::Result<Board> {
    match path {
        None => Ok(Board::flat(cols, rows)),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading board file {path}"))?;
            let file: BoardFile = serde_json::from_str(&raw)
                .with_context(|| format!("parsing board file {path}"))?;
            Ok(Board::from_entries(file.hexes.into_iter().map(|h| {
                (
                    Hex::new(h.q, h.r),
                    HexInfo {
                        level: h.level,
                        terrain: h.terrain,
                        building: h.building,
                        bridge: h.bridge,
                    },
                )
            })))
        }
    }
}

// ============================================================================
// ARGUMENT PARSING
// ============================================================================

fn parse_hex(s: &str) -> anyhow::Result<Hex> {
    let (q, r) = s
        .split_once(',')
        .with_context(|| format!("hex must be \"q,r\", got {s:?}"))?;
    Ok(Hex::new(
        q.trim().parse().context("parsing q")?,
        r.trim().parse().context("parsing r")?,
    ))
}

fn parse_mode(s: &str) -> anyhow::Result<MoveMode> {
    Ok(match s {
        "biped" => MoveMode::Biped,
        "tracked" => MoveMode::Tracked,
        "wheeled" => MoveMode::Wheeled,
        "hover" => MoveMode::Hover,
        "foot" => MoveMode::Foot,
        "aerodyne" => MoveMode::Aerodyne,
        "spheroid" => MoveMode::Spheroid,
        _ => bail!("unknown movement mode {s:?}"),
    })
}

/// Destination-directed search covers ground movement only; flight has no
/// admissible remaining-cost estimate and is served by `reach`.
fn parse_ground_mode(s: &str) -> anyhow::Result<MoveMode> {
    let mode = parse_mode(s)?;
    if mode.is_aero() {
        bail!("mode {s:?} is a flight mode; `path` supports ground modes only, use `reach` instead");
    }
    Ok(mode)
}

// ============================================================================
// COMMANDS
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_reach(
    board: Option<String>,
    cols: i16,
    rows: i16,
    start: String,
    facing: Option<u8>,
    mode: String,
    mp: u32,
    jump: bool,
    velocity: i16,
) -> anyhow::Result<()> {
    let board = Arc::new(load_board(board.as_deref(), cols, rows)?);
    let start = parse_hex(&start)?;
    let mode = parse_mode(&mode)?;

    let (mut finder, seed) = if mode.is_aero() {
        let profile = Arc::new(match mode {
            MoveMode::Spheroid => MoveProfile::spheroid(mp),
            _ => MoveProfile::aerodyne(mp),
        });
        let seed = MovePath::new_aero(profile, start, facing, velocity);
        let finder = match mode {
            MoveMode::Spheroid => PathFinder::spheroid_reachable(Arc::clone(&board)),
            _ => PathFinder::aero_reachable(Arc::clone(&board)),
        };
        (finder, seed)
    } else if jump {
        let profile = Arc::new(MoveProfile::ground(mode, 0).with_jump(mp));
        let seed = MovePath::new(profile, start, facing, 0).start_jumping();
        (PathFinder::jump_reachable(Arc::clone(&board), mp), seed)
    } else {
        let profile = Arc::new(MoveProfile::ground(mode, mp));
        let seed = MovePath::new(profile, start, facing, 0);
        (PathFinder::reachable(Arc::clone(&board), mp), seed)
    };

    finder.run([seed])?;
    let mut reach: Vec<_> = finder.all_best_paths().into_iter().collect();
    reach.sort_by_key(|(hex, _)| *hex);
    info!(hexes = reach.len(), "reachability search finished");

    for (hex, path) in reach {
        println!("({}, {})  mp={}  hexes={}", hex.q, hex.r, path.mp_used(), path.hexes_moved());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_path(
    board: Option<String>,
    cols: i16,
    rows: i16,
    start: String,
    dest: String,
    facing: Option<u8>,
    mode: String,
    mp: u32,
    greedy: bool,
) -> anyhow::Result<()> {
    let board = Arc::new(load_board(board.as_deref(), cols, rows)?);
    let start = parse_hex(&start)?;
    let dest = parse_hex(&dest)?;
    let mode = parse_ground_mode(&mode)?;

    let profile = Arc::new(MoveProfile::ground(mode, mp));
    let seed = MovePath::new(profile, start, facing, 0);
    let mut finder = if greedy {
        PathFinder::greedy_to(Arc::clone(&board), dest)
    } else {
        PathFinder::shortest_to(Arc::clone(&board), dest)
    };
    finder.run([seed])?;

    match finder.best_path_to(dest) {
        None => {
            println!("({}, {}) is unreachable", dest.q, dest.r);
        }
        Some(path) => {
            println!(
                "{} steps, {} mp, {} hexes moved",
                path.len(),
                path.mp_used(),
                path.hexes_moved()
            );
            for (i, step) in path.steps().iter().enumerate() {
                let facing = step
                    .facing
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:>2}. {:?} -> ({}, {})  facing {}  +{} mp",
                    i + 1,
                    step.kind,
                    step.pos.q,
                    step.pos.r,
                    facing,
                    step.mp
                );
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reach {
            board,
            cols,
            rows,
            start,
            facing,
            mode,
            mp,
            jump,
            velocity,
        } => cmd_reach(board, cols, rows, start, facing, mode, mp, jump, velocity),
        Commands::Path {
            board,
            cols,
            rows,
            start,
            dest,
            facing,
            mode,
            mp,
            greedy,
        } => cmd_path(board, cols, rows, start, dest, facing, mode, mp, greedy),
    }
}
