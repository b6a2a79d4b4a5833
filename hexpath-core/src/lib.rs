//! HEXPATH Core - Hex-grid movement path search
//!
//! This crate provides the movement planning engine for HEXPATH:
//! - Board geometry (hex grid with axial coordinates)
//! - Terrain, elevation, and movement-mode entry costs
//! - Immutable movement paths with single-step expansion
//! - Pluggable search strategies (rankers, relaxers, filters, stops)
//! - A generic best-first engine covering Dijkstra, A*, and greedy search

pub mod board;
pub mod hex;
pub mod unit;
pub mod path;
pub mod order;
pub mod relax;
pub mod filter;
pub mod search;

// Re-exports for convenient access
pub use board::{Board, HexInfo, TerrainKind};
pub use hex::{Hex, DIRECTIONS};
pub use unit::{MoveMode, MoveProfile};
pub use path::{
    MovePath, MoveStep, PathKey, StepKind, StepRejection, AERO_VOCAB, GROUND_VOCAB, JUMP_VOCAB,
};
pub use order::{
    AStarRanker, AeroMpUsedRanker, GreedyRanker, MpUsedRanker, PathLengthRanker, PathRanker,
    RankKey,
};
pub use relax::{AeroRelaxer, GroundRelaxer, Relaxer};
pub use filter::{
    BasicLegality, DestinationReached, LegalityFilter, MoveLegality, MpCeilingFilter, PathFilter,
    StopCondition, TowardDestFilter, VelocityFilter,
};
pub use search::{PathFinder, SearchError, SearchState};
