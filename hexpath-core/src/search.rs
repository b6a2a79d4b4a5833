//! Generic best-first movement search engine
//!
//! The engine owns a priority frontier of candidate paths and a best-known
//! cost map keyed by (position, facing). A search is configured from four
//! pluggable strategies (ranker, relaxer, filters, stop condition) plus a
//! step vocabulary, seeded with one or more start paths, and run to
//! exhaustion or to a stop condition.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::board::Board;
use crate::filter::{
    BasicLegality, DestinationReached, LegalityFilter, MoveLegality, MpCeilingFilter, PathFilter,
    StopCondition, TowardDestFilter, VelocityFilter,
};
use crate::hex::Hex;
use crate::order::{
    AStarRanker, AeroMpUsedRanker, GreedyRanker, MpUsedRanker, PathLengthRanker, PathRanker,
    RankKey,
};
use crate::path::{MovePath, PathKey, StepKind, StepRejection, AERO_VOCAB, GROUND_VOCAB, JUMP_VOCAB};
use crate::relax::{AeroRelaxer, GroundRelaxer, Relaxer};

/// Configuration errors; reported fast, never degraded to an empty search
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search run with no start state")]
    NoStartState,
    #[error("start hex ({0}, {1}) is not on the board")]
    StartOffBoard(i16, i16),
}

/// Engine lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Exhausted,
}

struct FrontierEntry {
    key: RankKey,
    seq: u64,
    path: MovePath,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).then(self.seq.cmp(&other.seq))
    }
}

/// Best-first path search over a board
pub struct PathFinder {
    board: Arc<Board>,
    ranker: Box<dyn PathRanker + Send + Sync>,
    relaxer: Box<dyn Relaxer + Send + Sync>,
    filters: Vec<Box<dyn PathFilter + Send + Sync>>,
    stop: Option<Box<dyn StopCondition + Send + Sync>>,
    vocab: Vec<StepKind>,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    best: FxHashMap<PathKey, MovePath>,
    state: SearchState,
    seq: u64,
    warned_off_board: bool,
}

impl PathFinder {
    /// Fully general constructor parameterized by the strategy objects
    pub fn with_strategies(
        board: Arc<Board>,
        ranker: Box<dyn PathRanker + Send + Sync>,
        relaxer: Box<dyn Relaxer + Send + Sync>,
        vocab: &[StepKind],
    ) -> Self {
        Self {
            board,
            ranker,
            relaxer,
            filters: Vec::new(),
            stop: None,
            vocab: vocab.to_vec(),
            frontier: BinaryHeap::new(),
            best: FxHashMap::default(),
            state: SearchState::Idle,
            seq: 0,
            warned_off_board: false,
        }
    }

    // ------------------------------------------------------------------
    // Preset configurations
    // ------------------------------------------------------------------

    /// Point-to-point least-cost search (A* with the admissible heuristic)
    pub fn shortest_to(board: Arc<Board>, dest: Hex) -> Self {
        Self::with_strategies(
            board,
            Box::new(AStarRanker::new(dest)),
            Box::new(GroundRelaxer),
            GROUND_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::new()))
        .with_stop(Box::new(DestinationReached::new(dest)))
    }

    /// Exhaustive one-to-all search within an MP budget
    pub fn reachable(board: Arc<Board>, max_mp: u32) -> Self {
        Self::with_strategies(
            board,
            Box::new(MpUsedRanker),
            Box::new(GroundRelaxer),
            GROUND_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::new()))
        .with_filter(Box::new(MpCeilingFilter::new(max_mp)))
    }

    /// One-to-all search for a jumping unit; seed with a jumping start path
    pub fn jump_reachable(board: Arc<Board>, max_mp: u32) -> Self {
        Self::with_strategies(
            board,
            Box::new(MpUsedRanker),
            Box::new(GroundRelaxer),
            JUMP_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::new()))
        .with_filter(Box::new(MpCeilingFilter::new(max_mp)))
    }

    /// Fast non-optimal "move generally toward X" search for bot planning
    pub fn greedy_to(board: Arc<Board>, dest: Hex) -> Self {
        Self::with_strategies(
            board,
            Box::new(GreedyRanker::new(dest)),
            Box::new(GroundRelaxer),
            GROUND_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::new()))
        .with_filter(Box::new(TowardDestFilter::new(dest)))
        .with_stop(Box::new(DestinationReached::new(dest)))
    }

    /// One-to-all search for aerodyne movement under the velocity envelope
    pub fn aero_reachable(board: Arc<Board>) -> Self {
        Self::with_strategies(
            board,
            Box::new(AeroMpUsedRanker),
            Box::new(AeroRelaxer),
            AERO_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::new()))
        .with_filter(Box::new(VelocityFilter))
    }

    /// One-to-all search for spheroid / airship movement
    pub fn spheroid_reachable(board: Arc<Board>) -> Self {
        Self::with_strategies(
            board,
            Box::new(PathLengthRanker),
            Box::new(AeroRelaxer),
            AERO_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::new()))
        .with_filter(Box::new(VelocityFilter))
    }

    // ------------------------------------------------------------------
    // Builder-style configuration
    // ------------------------------------------------------------------

    pub fn with_filter(mut self, filter: Box<dyn PathFilter + Send + Sync>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Install a movement-legality oracle (the game-rules integration point)
    pub fn with_oracle(self, oracle: Arc<dyn MoveLegality + Send + Sync>) -> Self {
        self.with_filter(Box::new(LegalityFilter::new(oracle)))
    }

    pub fn with_stop(mut self, stop: Box<dyn StopCondition + Send + Sync>) -> Self {
        self.stop = Some(stop);
        self
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the search from one or more seed paths until the frontier is
    /// exhausted or a stop condition fires.
    pub fn run(&mut self, starts: impl IntoIterator<Item = MovePath>) -> Result<(), SearchError> {
        self.frontier.clear();
        self.best.clear();
        self.seq = 0;
        self.warned_off_board = false;

        let mut seeded = 0usize;
        for start in starts {
            if !self.board.contains(start.pos()) {
                let pos = start.pos();
                return Err(SearchError::StartOffBoard(pos.q, pos.r));
            }
            self.admit(start);
            seeded += 1;
        }
        if seeded == 0 {
            return Err(SearchError::NoStartState);
        }

        self.state = SearchState::Running;
        while let Some(Reverse(entry)) = self.frontier.pop() {
            // Lazy deletion: a candidate superseded while it sat in the
            // frontier is discarded, never re-expanded
            if let Some(best) = self.best.get(&entry.path.key()) {
                if self.ranker.key(best, &self.board) < entry.key {
                    continue;
                }
            }

            if let Some(stop) = &self.stop {
                if stop.should_stop(&entry.path) {
                    self.state = SearchState::Exhausted;
                    return Ok(());
                }
            }

            for result in entry.path.extensions(&self.board, &self.vocab) {
                match result {
                    Ok(succ) => {
                        if self.filters.iter().all(|f| f.accept(&succ, &self.board)) {
                            self.admit(succ);
                        }
                    }
                    Err(StepRejection::OffBoard(hex)) => {
                        if !self.warned_off_board {
                            debug!(q = hex.q, r = hex.r, "expansion hit a hex missing from the board; treating as impassable");
                            self.warned_off_board = true;
                        }
                    }
                    Err(_) => {}
                }
            }
        }

        self.state = SearchState::Exhausted;
        Ok(())
    }

    /// Relax a candidate into the cost map; push it if it won
    fn admit(&mut self, path: MovePath) {
        let key = path.key();
        let incumbent = self.best.get(&key);
        if self
            .relaxer
            .relaxes(&path, incumbent, &self.board, self.ranker.as_ref())
        {
            let rank = self.ranker.key(&path, &self.board);
            self.best.insert(key, path.clone());
            self.seq += 1;
            self.frontier.push(Reverse(FrontierEntry {
                key: rank,
                seq: self.seq,
                path,
            }));
        }
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Least-cost path ending at a hex, minimized across final facings.
    /// An absent entry means the hex is unreachable; that is a normal
    /// outcome, not an error.
    pub fn best_path_to(&self, hex: Hex) -> Option<&MovePath> {
        self.best
            .iter()
            .filter(|((pos, _), _)| *pos == hex)
            .map(|(_, path)| path)
            .min_by_key(|path| self.ranker.key(path, &self.board))
    }

    /// One entry per reachable hex, each the minimal path across facings
    pub fn all_best_paths(&self) -> FxHashMap<Hex, MovePath> {
        let mut out: FxHashMap<Hex, MovePath> = FxHashMap::default();
        for path in self.best.values() {
            match out.get(&path.pos()) {
                Some(cur)
                    if self.ranker.key(cur, &self.board)
                        <= self.ranker.key(path, &self.board) => {}
                _ => {
                    out.insert(path.pos(), path.clone());
                }
            }
        }
        out
    }

    /// The raw best-known-cost map, keyed by (position, facing)
    pub fn all_best_paths_by_facing(&self) -> &FxHashMap<PathKey, MovePath> {
        &self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{HexInfo, TerrainKind};
    use crate::unit::{MoveMode, MoveProfile};

    fn walker(mp: u32) -> Arc<MoveProfile> {
        Arc::new(MoveProfile::ground(MoveMode::Biped, mp))
    }

    #[test]
    fn test_straight_line_shortest_path() {
        let board = Arc::new(Board::flat(5, 5));
        let mut finder = PathFinder::shortest_to(Arc::clone(&board), Hex::new(3, 1));
        let start = MovePath::new(walker(4), Hex::new(3, 3), Some(0), 0);
        finder.run([start]).unwrap();
        assert_eq!(finder.state(), SearchState::Exhausted);

        let best = finder.best_path_to(Hex::new(3, 1)).unwrap();
        assert_eq!(best.mp_used(), 2);
        assert_eq!(best.hexes_moved(), 2);
        assert_eq!(best.facing(), Some(0));
        assert!(best.steps().iter().all(|s| s.kind == StepKind::Forwards));
    }

    #[test]
    fn test_shortest_path_routes_around_terrain() {
        // A wall of heavy woods makes the straight line dearer than a detour
        let board = Arc::new(
            Board::flat(5, 5)
                .with_hex(Hex::new(2, 2), HexInfo::with_terrain(0, TerrainKind::HeavyWoods))
                .with_hex(Hex::new(3, 2), HexInfo::with_terrain(0, TerrainKind::HeavyWoods)),
        );
        let mut direct = PathFinder::reachable(Arc::clone(&board), 20);
        direct
            .run([MovePath::new(walker(20), Hex::new(3, 3), Some(0), 0)])
            .unwrap();
        let dijkstra_cost = direct.best_path_to(Hex::new(3, 1)).unwrap().mp_used();

        let mut astar = PathFinder::shortest_to(Arc::clone(&board), Hex::new(3, 1));
        astar
            .run([MovePath::new(walker(20), Hex::new(3, 3), Some(0), 0)])
            .unwrap();
        let best = astar.best_path_to(Hex::new(3, 1)).unwrap();
        assert_eq!(best.mp_used(), dijkstra_cost);
    }

    #[test]
    fn test_unreachable_is_none_not_error() {
        let board = Arc::new(
            Board::flat(3, 3).with_hex(Hex::new(1, 0), HexInfo::with_terrain(0, TerrainKind::Magma)),
        );
        let mut finder = PathFinder::shortest_to(Arc::clone(&board), Hex::new(1, 0));
        finder
            .run([MovePath::new(walker(8), Hex::new(1, 2), Some(0), 0)])
            .unwrap();
        assert!(finder.best_path_to(Hex::new(1, 0)).is_none());
        // Off-map destinations behave the same way
        let mut off = PathFinder::shortest_to(Arc::clone(&board), Hex::new(9, 9));
        off.run([MovePath::new(walker(8), Hex::new(1, 2), Some(0), 0)])
            .unwrap();
        assert!(off.best_path_to(Hex::new(9, 9)).is_none());
    }

    #[test]
    fn test_no_start_state_fails_fast() {
        let board = Arc::new(Board::flat(3, 3));
        let mut finder = PathFinder::reachable(board, 4);
        assert_eq!(
            finder.run(Vec::<MovePath>::new()),
            Err(SearchError::NoStartState)
        );
    }

    #[test]
    fn test_start_off_board_fails_fast() {
        let board = Arc::new(Board::flat(3, 3));
        let mut finder = PathFinder::reachable(board, 4);
        let start = MovePath::new(walker(4), Hex::new(7, 7), Some(0), 0);
        assert_eq!(finder.run([start]), Err(SearchError::StartOffBoard(7, 7)));
    }

    #[test]
    fn test_state_transitions() {
        let board = Arc::new(Board::flat(3, 3));
        let mut finder = PathFinder::reachable(board, 2);
        assert_eq!(finder.state(), SearchState::Idle);
        finder
            .run([MovePath::new(walker(2), Hex::new(1, 1), Some(0), 0)])
            .unwrap();
        assert_eq!(finder.state(), SearchState::Exhausted);
    }

    #[test]
    fn test_mp_ceiling_bounds_reach() {
        let board = Arc::new(Board::flat(9, 9));
        let mut finder = PathFinder::reachable(Arc::clone(&board), 2);
        finder
            .run([MovePath::new(walker(2), Hex::new(4, 4), Some(0), 0)])
            .unwrap();
        for (hex, path) in finder.all_best_paths() {
            assert!(path.mp_used() <= 2);
            assert!(Hex::new(4, 4).distance_to(hex) <= 2);
        }
    }

    #[test]
    fn test_greedy_reaches_destination() {
        let board = Arc::new(Board::flat(7, 7));
        let dest = Hex::new(5, 1);
        let mut finder = PathFinder::greedy_to(Arc::clone(&board), dest);
        finder
            .run([MovePath::new(walker(12), Hex::new(1, 5), Some(0), 0)])
            .unwrap();
        let path = finder.best_path_to(dest).unwrap();
        // Every translation step closed the distance
        let mut dist = Hex::new(1, 5).distance_to(dest);
        for step in path.steps() {
            let d = step.pos.distance_to(dest);
            assert!(d <= dist);
            dist = d;
        }
    }

    #[test]
    fn test_greedy_filter_prunes_retreat() {
        let board = Arc::new(Board::flat(5, 5));
        let dest = Hex::new(2, 0);
        let mut finder = PathFinder::greedy_to(Arc::clone(&board), dest);
        finder
            .run([MovePath::new(walker(12), Hex::new(2, 2), Some(0), 0)])
            .unwrap();
        // Nothing farther from the destination than the start is recorded
        let start_dist = Hex::new(2, 2).distance_to(dest);
        for (hex, _) in finder.all_best_paths() {
            assert!(hex.distance_to(dest) <= start_dist);
        }
    }

    #[test]
    fn test_aero_velocity_envelope() {
        let board = Arc::new(Board::flat(7, 7));
        let aero = Arc::new(MoveProfile::aerodyne(4));
        let mut finder = PathFinder::aero_reachable(Arc::clone(&board));
        finder
            .run([MovePath::new_aero(aero, Hex::new(3, 3), Some(0), 1)])
            .unwrap();
        for path in finder.all_best_paths_by_facing().values() {
            assert!(path.mp_used() <= 4);
            assert!(path.velocity() >= 1, "aerodyne paths may not stall");
        }
    }

    #[test]
    fn test_spheroid_may_hover() {
        let board = Arc::new(Board::flat(5, 5));
        let blimp = Arc::new(MoveProfile::spheroid(3));
        let mut finder = PathFinder::spheroid_reachable(Arc::clone(&board));
        finder
            .run([MovePath::new_aero(blimp, Hex::new(2, 2), Some(0), 0)])
            .unwrap();
        // The zero-velocity seed is itself a valid terminal state
        assert!(finder.best_path_to(Hex::new(2, 2)).is_some());
    }

    #[test]
    fn test_jump_search_ignores_terrain_cost() {
        let board = Arc::new(
            Board::flat(5, 5)
                .with_hex(Hex::new(2, 1), HexInfo::with_terrain(0, TerrainKind::HeavyWoods)),
        );
        let jumper = Arc::new(MoveProfile::ground(MoveMode::Biped, 0).with_jump(2));
        let mut finder = PathFinder::jump_reachable(Arc::clone(&board), 2);
        finder
            .run([MovePath::new(jumper, Hex::new(2, 2), Some(0), 0).start_jumping()])
            .unwrap();
        let onto_woods = finder.best_path_to(Hex::new(2, 1)).unwrap();
        assert_eq!(onto_woods.mp_used(), 1);
    }

    #[test]
    fn test_occupied_hex_blocks_stacking() {
        let board = Arc::new(Board::flat(5, 5));
        let mut finder = PathFinder::with_strategies(
            Arc::clone(&board),
            Box::new(MpUsedRanker),
            Box::new(GroundRelaxer),
            GROUND_VOCAB,
        )
        .with_oracle(Arc::new(BasicLegality::with_occupied([Hex::new(2, 1)])));
        finder
            .run([MovePath::new(walker(1), Hex::new(2, 2), Some(0), 0)])
            .unwrap();
        assert!(finder.best_path_to(Hex::new(2, 1)).is_none());
    }
}
