//! Frontier filters and stop conditions
//!
//! Filters are independent predicates, AND-composed by the engine before a
//! candidate is admitted to the frontier. Stop conditions are evaluated once
//! per dequeued candidate and end the search early.

use crate::board::Board;
use crate::hex::Hex;
use crate::path::MovePath;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Predicate pruning the search frontier
pub trait PathFilter {
    fn accept(&self, path: &MovePath, board: &Board) -> bool;
}

/// Movement legality oracle.
///
/// This is the single integration point with the game-rules engine: terrain
/// passability beyond raw costs, stacking limits, and MP budget sufficiency
/// all live behind this trait.
pub trait MoveLegality {
    fn is_legal(&self, path: &MovePath, board: &Board) -> bool;
}

/// Reference legality oracle: MP budget plus an occupied-hex stacking rule
#[derive(Clone, Debug, Default)]
pub struct BasicLegality {
    /// Hexes other units stand in; paths may not end or pass through them
    pub occupied: FxHashSet<Hex>,
}

impl BasicLegality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_occupied(occupied: impl IntoIterator<Item = Hex>) -> Self {
        Self {
            occupied: occupied.into_iter().collect(),
        }
    }
}

impl MoveLegality for BasicLegality {
    fn is_legal(&self, path: &MovePath, board: &Board) -> bool {
        if !board.contains(path.pos()) {
            return false;
        }
        if path.hexes_moved() > 0 && self.occupied.contains(&path.pos()) {
            return false;
        }
        let budget = if path.is_jumping() {
            path.profile().jump_mp
        } else if path.profile().mode.is_aero() {
            path.profile().max_thrust
        } else {
            path.profile().max_mp
        };
        path.mp_used() <= budget
    }
}

/// Filter adapter over a legality oracle
pub struct LegalityFilter {
    oracle: Arc<dyn MoveLegality + Send + Sync>,
}

impl LegalityFilter {
    pub fn new(oracle: Arc<dyn MoveLegality + Send + Sync>) -> Self {
        Self { oracle }
    }
}

impl PathFilter for LegalityFilter {
    fn accept(&self, path: &MovePath, board: &Board) -> bool {
        self.oracle.is_legal(path, board)
    }
}

/// Rejects paths that spent more than a caller-supplied MP maximum
#[derive(Clone, Copy, Debug)]
pub struct MpCeilingFilter {
    pub max_mp: u32,
}

impl MpCeilingFilter {
    pub fn new(max_mp: u32) -> Self {
        Self { max_mp }
    }
}

impl PathFilter for MpCeilingFilter {
    fn accept(&self, path: &MovePath, _board: &Board) -> bool {
        path.mp_used() <= self.max_mp
    }
}

/// Velocity-envelope filter for powered flight: thrust spent must stay
/// within budget and the path may not end below stall velocity.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityFilter;

impl PathFilter for VelocityFilter {
    fn accept(&self, path: &MovePath, _board: &Board) -> bool {
        let profile = path.profile();
        if !profile.mode.is_aero() {
            return true;
        }
        path.mp_used() <= profile.max_thrust && path.velocity() >= profile.stall_velocity
    }
}

/// Greedy-progress filter: every translation step must strictly close the
/// distance to the destination; facing-only steps are always admitted.
#[derive(Clone, Copy, Debug)]
pub struct TowardDestFilter {
    pub dest: Hex,
}

impl TowardDestFilter {
    pub fn new(dest: Hex) -> Self {
        Self { dest }
    }
}

impl PathFilter for TowardDestFilter {
    fn accept(&self, path: &MovePath, _board: &Board) -> bool {
        let prev = path.prev_pos();
        if path.pos() == prev {
            return true;
        }
        path.pos().distance_to(self.dest) < prev.distance_to(self.dest)
    }
}

/// Predicate ending a search early once a goal state is dequeued
pub trait StopCondition {
    fn should_stop(&self, path: &MovePath) -> bool;
}

/// Halts as soon as any dequeued candidate ends at the destination
#[derive(Clone, Copy, Debug)]
pub struct DestinationReached {
    pub dest: Hex,
}

impl DestinationReached {
    pub fn new(dest: Hex) -> Self {
        Self { dest }
    }
}

impl StopCondition for DestinationReached {
    fn should_stop(&self, path: &MovePath) -> bool {
        path.pos() == self.dest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::StepKind;
    use crate::unit::{MoveMode, MoveProfile};

    fn walker(mp: u32) -> Arc<MoveProfile> {
        Arc::new(MoveProfile::ground(MoveMode::Biped, mp))
    }

    #[test]
    fn test_mp_ceiling() {
        let board = Board::flat(5, 5);
        let filter = MpCeilingFilter::new(2);
        let mut path = MovePath::new(walker(8), Hex::new(4, 4), Some(0), 0);
        assert!(filter.accept(&path, &board));
        path = path.extend(StepKind::Forwards, &board).unwrap();
        path = path.extend(StepKind::Forwards, &board).unwrap();
        assert!(filter.accept(&path, &board));
        path = path.extend(StepKind::Forwards, &board).unwrap();
        assert!(!filter.accept(&path, &board));
    }

    #[test]
    fn test_basic_legality_budget_and_stacking() {
        let board = Board::flat(5, 5);
        let oracle = BasicLegality::with_occupied([Hex::new(2, 1)]);

        let mut path = MovePath::new(walker(1), Hex::new(2, 2), Some(0), 0);
        assert!(oracle.is_legal(&path, &board));
        path = path.extend(StepKind::Forwards, &board).unwrap();
        // Ends in an occupied hex
        assert!(!oracle.is_legal(&path, &board));

        let mut other = MovePath::new(walker(1), Hex::new(3, 3), Some(0), 0);
        other = other.extend(StepKind::Forwards, &board).unwrap();
        assert!(oracle.is_legal(&other, &board));
        other = other.extend(StepKind::TurnLeft, &board).unwrap();
        // Second MP exceeds the 1-MP budget
        assert!(!oracle.is_legal(&other, &board));
    }

    #[test]
    fn test_basic_legality_jump_budget() {
        let board = Board::flat(5, 5);
        let oracle = BasicLegality::new();
        let jumper = Arc::new(MoveProfile::ground(MoveMode::Biped, 1).with_jump(3));
        let mut path = MovePath::new(jumper, Hex::new(2, 2), Some(0), 0).start_jumping();
        for _ in 0..3 {
            let succ = path
                .extensions(&board, crate::path::JUMP_VOCAB)
                .into_iter()
                .find_map(Result::ok)
                .unwrap();
            path = succ;
        }
        // 3 jump MP spent against jump_mp 3, despite max_mp 1
        assert!(oracle.is_legal(&path, &board));
    }

    #[test]
    fn test_velocity_filter() {
        let board = Board::flat(5, 5);
        let filter = VelocityFilter;
        let aero = Arc::new(MoveProfile::aerodyne(3));

        let stalled = MovePath::new_aero(Arc::clone(&aero), Hex::new(2, 4), Some(0), 0);
        assert!(!filter.accept(&stalled, &board));

        let flying = MovePath::new_aero(Arc::clone(&aero), Hex::new(2, 4), Some(0), 2);
        assert!(filter.accept(&flying, &board));

        // Spend past the thrust budget; the 4-hex run from (2,4) northward
        // ends at (2,0), still on the 5x5 board
        let mut burned = flying.clone();
        for _ in 0..4 {
            burned = burned.extend(StepKind::Forwards, &board).unwrap();
        }
        assert_eq!(burned.pos(), Hex::new(2, 0));
        assert!(!filter.accept(&burned, &board));

        // Ground paths pass through untouched
        let ground = MovePath::new(walker(4), Hex::new(2, 2), Some(0), 0);
        assert!(filter.accept(&ground, &board));
    }

    #[test]
    fn test_toward_dest_filter() {
        let board = Board::flat(5, 5);
        let filter = TowardDestFilter::new(Hex::new(2, 0));
        let base = MovePath::new(walker(6), Hex::new(2, 2), Some(0), 0);

        let closer = base.extend(StepKind::Forwards, &board).unwrap();
        assert!(filter.accept(&closer, &board));

        let away = base.extend(StepKind::Backwards, &board).unwrap();
        assert!(!filter.accept(&away, &board));

        // Facing-only changes are always admitted
        let turn = base.extend(StepKind::TurnRight, &board).unwrap();
        assert!(filter.accept(&turn, &board));
    }

    #[test]
    fn test_destination_reached() {
        let board = Board::flat(5, 5);
        let stop = DestinationReached::new(Hex::new(2, 1));
        let base = MovePath::new(walker(6), Hex::new(2, 2), Some(0), 0);
        assert!(!stop.should_stop(&base));
        let there = base.extend(StepKind::Forwards, &board).unwrap();
        assert!(stop.should_stop(&there));
    }
}
