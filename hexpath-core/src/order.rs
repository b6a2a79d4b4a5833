//! Path ordering strategies
//!
//! Each ranker maps a path to a lexicographic `RankKey`; the frontier and the
//! edge relaxer both compare paths by key, lower being better. Keeping the
//! order in a key (rather than a comparator callback) lets the frontier live
//! in a plain `BinaryHeap`.

use crate::board::Board;
use crate::hex::{facing_diff, Hex};
use crate::path::MovePath;

/// Lexicographic ordering key; lower is better
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    pub primary: i64,
    pub secondary: i64,
    pub tertiary: i64,
}

impl RankKey {
    pub const fn new(primary: i64, secondary: i64, tertiary: i64) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }
}

/// Total order over candidate paths
pub trait PathRanker {
    fn key(&self, path: &MovePath, board: &Board) -> RankKey;
}

/// Pure MP-cost order (exhaustive one-to-all search). Ties prefer more
/// hexes moved, so equally cheap but longer paths are not discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct MpUsedRanker;

impl PathRanker for MpUsedRanker {
    fn key(&self, path: &MovePath, _board: &Board) -> RankKey {
        RankKey::new(path.mp_used() as i64, -(path.hexes_moved() as i64), 0)
    }
}

/// A* order for point-to-point search: MP spent plus an admissible estimate
/// of the MP still needed to reach the destination.
#[derive(Clone, Copy, Debug)]
pub struct AStarRanker {
    pub dest: Hex,
}

impl AStarRanker {
    pub fn new(dest: Hex) -> Self {
        Self { dest }
    }

    /// Admissible remaining-cost estimate. Every term is a lower bound on a
    /// real movement cost component, so the sum never overestimates.
    pub fn heuristic(&self, path: &MovePath, board: &Board) -> u32 {
        path.pos().distance_to(self.dest)
            + self.facing_correction(path)
            + self.climb_correction(path, board)
    }

    /// Estimated MP to swing the final facing toward the destination.
    ///
    /// A unit translates along its facing or directly astern, so the
    /// alignment needed is the cheaper of the two; when the bearing falls
    /// between two hexsides, any route must leave the straight line, which
    /// costs at least one extra turn or lateral (+1), while alignment to
    /// either straddling hexside suffices. Units that can sidestep fix one
    /// hexside of misalignment without turning (-1).
    fn facing_correction(&self, path: &MovePath) -> u32 {
        if path.is_jumping() {
            return 0;
        }
        let facing = match path.facing() {
            Some(f) => f,
            None => return 0,
        };
        let degree = match path.pos().degree_to(self.dest) {
            Some(d) => d,
            None => return 0,
        };
        let near = ((degree / 60) % 6) as u8;
        let off_axis = degree % 60 != 0;
        let astern = (facing + 3) % 6;

        let mut diff = facing_diff(facing, near).min(facing_diff(astern, near)) as u32;
        if off_axis {
            let far = (near + 1) % 6;
            let alt = facing_diff(facing, far).min(facing_diff(astern, far)) as u32;
            diff = diff.min(alt);
        }
        if path.profile().can_shift {
            diff = diff.saturating_sub(1);
        }
        if off_axis {
            diff += 1;
        }
        diff
    }

    /// Estimated MP for the climb to the destination: difference between the
    /// unit's absolute standing level and the nearest valid standing surface
    /// of the destination hex (ground, building roof, or bridge deck).
    /// Doubled for foot infantry, matching their climb costs.
    fn climb_correction(&self, path: &MovePath, board: &Board) -> u32 {
        if path.is_jumping() || path.profile().mode.is_aero() || path.pos() == self.dest {
            return 0;
        }
        let (here, there) = match (board.hex_at(path.pos()), board.hex_at(self.dest)) {
            (Some(a), Some(b)) => (a, b),
            _ => return 0,
        };
        let standing = here.level as i32 + path.elevation() as i32;
        let mut best = (standing - there.level as i32).unsigned_abs();
        if let Some(h) = there.building {
            best = best.min((standing - (there.level as i32 + h as i32)).unsigned_abs());
        }
        if let Some(deck) = there.bridge {
            best = best.min((standing - deck as i32).unsigned_abs());
        }
        if path.profile().mode.is_infantry() {
            best * 2
        } else {
            best
        }
    }
}

impl PathRanker for AStarRanker {
    fn key(&self, path: &MovePath, board: &Board) -> RankKey {
        let f = path.mp_used() as i64 + self.heuristic(path, board) as i64;
        RankKey::new(f, path.mp_used() as i64, -(path.hexes_moved() as i64))
    }
}

/// Greedy order: purely by distance from the destination, MP as tie-break.
/// Fast and deliberately non-optimal; pair with `TowardDestFilter`.
#[derive(Clone, Copy, Debug)]
pub struct GreedyRanker {
    pub dest: Hex,
}

impl GreedyRanker {
    pub fn new(dest: Hex) -> Self {
        Self { dest }
    }
}

impl PathRanker for GreedyRanker {
    fn key(&self, path: &MovePath, _board: &Board) -> RankKey {
        RankKey::new(
            path.pos().distance_to(self.dest) as i64,
            path.mp_used() as i64,
            0,
        )
    }
}

/// Pure MP-used order for powered flight, where no admissible remaining-cost
/// estimate is computable. Note the inverted tie-break: aero movement prefers
/// FEWER hexes moved, unlike every ground ranker.
#[derive(Clone, Copy, Debug, Default)]
pub struct AeroMpUsedRanker;

impl PathRanker for AeroMpUsedRanker {
    fn key(&self, path: &MovePath, _board: &Board) -> RankKey {
        RankKey::new(path.mp_used() as i64, path.hexes_moved() as i64, 0)
    }
}

/// Step-count order for spheroid / airship-style movement
#[derive(Clone, Copy, Debug, Default)]
pub struct PathLengthRanker;

impl PathRanker for PathLengthRanker {
    fn key(&self, path: &MovePath, _board: &Board) -> RankKey {
        RankKey::new(
            path.len() as i64,
            -(path.hexes_moved() as i64),
            path.mp_used() as i64,
        )
    }
}
