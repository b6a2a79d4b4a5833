//! Edge relaxation: does a newly found path replace the recorded best?

use crate::board::Board;
use crate::order::PathRanker;
use crate::path::MovePath;

/// Dominance decision for a (position, facing) key
pub trait Relaxer {
    /// True if `candidate` should replace `incumbent` as the best-known path
    fn relaxes(
        &self,
        candidate: &MovePath,
        incumbent: Option<&MovePath>,
        board: &Board,
        ranker: &dyn PathRanker,
    ) -> bool;
}

/// Relaxer for land searches.
///
/// Before any cost comparison, paths are partitioned by stance: a path ending
/// prone never replaces a standing one regardless of cost, and a standing
/// path always replaces a prone incumbent. Ground vehicles get the analogous
/// hull-down partition.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroundRelaxer;

impl Relaxer for GroundRelaxer {
    fn relaxes(
        &self,
        candidate: &MovePath,
        incumbent: Option<&MovePath>,
        board: &Board,
        ranker: &dyn PathRanker,
    ) -> bool {
        let incumbent = match incumbent {
            Some(p) => p,
            None => return true,
        };
        if candidate.is_prone() != incumbent.is_prone() {
            return incumbent.is_prone();
        }
        if candidate.profile().mode.is_ground_vehicle()
            && candidate.is_hull_down() != incumbent.is_hull_down()
        {
            return incumbent.is_hull_down();
        }
        ranker.key(candidate, board) < ranker.key(incumbent, board)
    }
}

/// Relaxer for airborne searches: stance partitions are meaningless for
/// aircraft, so only the ranker decides.
#[derive(Clone, Copy, Debug, Default)]
pub struct AeroRelaxer;

impl Relaxer for AeroRelaxer {
    fn relaxes(
        &self,
        candidate: &MovePath,
        incumbent: Option<&MovePath>,
        board: &Board,
        ranker: &dyn PathRanker,
    ) -> bool {
        match incumbent {
            None => true,
            Some(inc) => ranker.key(candidate, board) < ranker.key(inc, board),
        }
    }
}
