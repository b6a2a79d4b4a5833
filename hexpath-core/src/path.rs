//! Movement paths and single-step expansion
//!
//! A `MovePath` is the search-state entity: an immutable-append list of
//! movement steps plus the derived final state. Extending a path produces a
//! new value sharing the step-list prefix; nothing is ever mutated in place.

use crate::board::Board;
use crate::hex::{turn_left, turn_right, Hex};
use crate::unit::MoveProfile;
use std::sync::Arc;

/// Bookkeeping identity of a path: final hex plus final facing.
/// Two paths ending at the same hex with different facings are distinct keys.
pub type PathKey = (Hex, Option<u8>);

/// Ground units may not climb or drop more than this many levels in one step
const MAX_CLIMB: u32 = 2;

/// The step vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Forwards,
    Backwards,
    TurnLeft,
    TurnRight,
    LateralLeft,
    LateralRight,
    Jump,
    Accelerate,
    Decelerate,
}

/// One executed step and the sub-state it produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveStep {
    pub kind: StepKind,
    pub pos: Hex,
    pub facing: Option<u8>,
    /// Height above ground level of the hex the step ends in
    pub elevation: i8,
    /// MP spent on this step alone
    pub mp: u32,
    pub prone: bool,
    pub hull_down: bool,
    pub jumping: bool,
    pub velocity: i16,
}

/// Why a step could not be taken
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepRejection {
    /// Step kind does not apply to this unit, stance, or facing
    NotAllowed,
    /// Destination hex missing from the board
    OffBoard(Hex),
    /// Terrain or slope the unit cannot enter
    Impassable,
}

#[derive(Debug, PartialEq, Eq)]
struct StepNode {
    step: MoveStep,
    prev: Option<Arc<StepNode>>,
}

/// An immutable movement path and its derived final state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePath {
    profile: Arc<MoveProfile>,
    start_pos: Hex,
    start_facing: Option<u8>,
    start_elevation: i8,
    last: Option<Arc<StepNode>>,
    len: u32,
    pos: Hex,
    facing: Option<u8>,
    elevation: i8,
    mp_used: u32,
    hexes_moved: u32,
    prone: bool,
    hull_down: bool,
    jumping: bool,
    velocity: i16,
}

impl MovePath {
    /// Empty path at a unit's current position, standing
    pub fn new(profile: Arc<MoveProfile>, pos: Hex, facing: Option<u8>, elevation: i8) -> Self {
        Self {
            profile,
            start_pos: pos,
            start_facing: facing,
            start_elevation: elevation,
            last: None,
            len: 0,
            pos,
            facing,
            elevation,
            mp_used: 0,
            hexes_moved: 0,
            prone: false,
            hull_down: false,
            jumping: false,
            velocity: 0,
        }
    }

    /// Empty path for an airborne unit at the given velocity
    pub fn new_aero(profile: Arc<MoveProfile>, pos: Hex, facing: Option<u8>, velocity: i16) -> Self {
        let mut path = Self::new(profile, pos, facing, 0);
        path.velocity = velocity;
        path
    }

    pub fn prone(mut self) -> Self {
        self.prone = true;
        self
    }

    pub fn hull_down(mut self) -> Self {
        self.hull_down = true;
        self
    }

    /// Begin a jump; expansion then uses the jump vocabulary
    pub fn start_jumping(mut self) -> Self {
        self.jumping = true;
        self
    }

    // ------------------------------------------------------------------
    // Final state
    // ------------------------------------------------------------------

    pub fn profile(&self) -> &MoveProfile {
        &self.profile
    }

    pub fn pos(&self) -> Hex {
        self.pos
    }

    pub fn facing(&self) -> Option<u8> {
        self.facing
    }

    pub fn elevation(&self) -> i8 {
        self.elevation
    }

    pub fn mp_used(&self) -> u32 {
        self.mp_used
    }

    /// Count of hex entries along the path. A looping path that re-enters a
    /// hex counts it once per entry; the value is used only as an ordering
    /// tie-break, where dedup would cost a list walk per step for no benefit.
    pub fn hexes_moved(&self) -> u32 {
        self.hexes_moved
    }

    pub fn is_prone(&self) -> bool {
        self.prone
    }

    pub fn is_hull_down(&self) -> bool {
        self.hull_down
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn velocity(&self) -> i16 {
        self.velocity
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn key(&self) -> PathKey {
        (self.pos, self.facing)
    }

    /// Position before the last step (equal to `pos` for facing-only steps
    /// and for the empty path)
    pub fn prev_pos(&self) -> Hex {
        match &self.last {
            Some(node) => node
                .prev
                .as_ref()
                .map(|p| p.step.pos)
                .unwrap_or(self.start_pos),
            None => self.pos,
        }
    }

    /// Whether the last step was a facing change in place
    pub fn last_step_is_turn(&self) -> bool {
        matches!(
            self.last.as_ref().map(|n| n.step.kind),
            Some(StepKind::TurnLeft) | Some(StepKind::TurnRight)
        )
    }

    /// Steps in execution order
    pub fn steps(&self) -> Vec<MoveStep> {
        let mut out = Vec::with_capacity(self.len as usize);
        let mut node = self.last.as_deref();
        while let Some(n) = node {
            out.push(n.step);
            node = n.prev.as_deref();
        }
        out.reverse();
        out
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    /// Attempt a single step, producing a new path sharing this one's prefix
    pub fn extend(&self, kind: StepKind, board: &Board) -> Result<MovePath, StepRejection> {
        match kind {
            StepKind::TurnLeft | StepKind::TurnRight => self.turn(kind),
            StepKind::Forwards | StepKind::Backwards => {
                let facing = self.facing.ok_or(StepRejection::NotAllowed)?;
                let dir = match kind {
                    StepKind::Forwards => facing,
                    _ => (facing + 3) % 6,
                };
                self.translate(kind, dir, 0, board)
            }
            StepKind::LateralLeft | StepKind::LateralRight => {
                if !self.profile.can_shift {
                    return Err(StepRejection::NotAllowed);
                }
                let facing = self.facing.ok_or(StepRejection::NotAllowed)?;
                let dir = match kind {
                    StepKind::LateralLeft => turn_left(facing),
                    _ => turn_right(facing),
                };
                self.translate(kind, dir, 1, board)
            }
            StepKind::Jump => Err(StepRejection::NotAllowed), // direction chosen in `extensions`
            StepKind::Accelerate => self.throttle(kind, 1),
            StepKind::Decelerate => self.throttle(kind, -1),
        }
    }

    /// Legal one-step successors for a requested step vocabulary.
    ///
    /// Pure function of (self, board, vocabulary). Successors whose step kind
    /// simply does not apply are skipped; a successor dropped because its hex
    /// is missing from the board is reported as `Err(OffBoard)` so the caller
    /// can log the inconsistency.
    pub fn extensions(
        &self,
        board: &Board,
        vocab: &[StepKind],
    ) -> Vec<Result<MovePath, StepRejection>> {
        let mut out = Vec::new();
        for &kind in vocab {
            match kind {
                StepKind::Jump => {
                    if !self.jumping {
                        continue;
                    }
                    for dir in 0..6u8 {
                        self.push_result(self.jump(dir, board), &mut out);
                    }
                }
                StepKind::Forwards if self.facing.is_none() => {
                    // Facing-less units translate omnidirectionally
                    for dir in 0..6u8 {
                        self.push_result(self.translate(kind, dir, 0, board), &mut out);
                    }
                }
                _ => self.push_result(self.extend(kind, board), &mut out),
            }
        }
        out
    }

    fn push_result(
        &self,
        result: Result<MovePath, StepRejection>,
        out: &mut Vec<Result<MovePath, StepRejection>>,
    ) {
        match result {
            Ok(path) => out.push(Ok(path)),
            Err(StepRejection::OffBoard(hex)) => out.push(Err(StepRejection::OffBoard(hex))),
            Err(_) => {}
        }
    }

    fn turn(&self, kind: StepKind) -> Result<MovePath, StepRejection> {
        let facing = self.facing.ok_or(StepRejection::NotAllowed)?;
        let new_facing = match kind {
            StepKind::TurnLeft => turn_left(facing),
            _ => turn_right(facing),
        };
        // A zero-MP unit still gets one free facing change; turns while
        // jumping set the landing facing at no cost
        let mp = if self.jumping || (self.profile.max_mp == 0 && self.len == 0) {
            0
        } else {
            1
        };
        let step = MoveStep {
            kind,
            pos: self.pos,
            facing: Some(new_facing),
            elevation: self.elevation,
            mp,
            prone: self.prone,
            hull_down: self.hull_down,
            jumping: self.jumping,
            velocity: self.velocity,
        };
        Ok(self.appended(step, 0))
    }

    fn translate(
        &self,
        kind: StepKind,
        dir: u8,
        surcharge: u32,
        board: &Board,
    ) -> Result<MovePath, StepRejection> {
        if self.jumping || self.hull_down {
            return Err(StepRejection::NotAllowed);
        }
        let dest = self.pos.neighbor(dir);
        let dest_info = *board.hex_at(dest).ok_or(StepRejection::OffBoard(dest))?;

        if self.profile.mode.is_aero() {
            if self.velocity < 1 {
                return Err(StepRejection::NotAllowed);
            }
            let step = MoveStep {
                kind,
                pos: dest,
                facing: self.facing,
                elevation: self.elevation,
                mp: 1,
                prone: false,
                hull_down: false,
                jumping: false,
                velocity: self.velocity,
            };
            return Ok(self.appended(step, 1));
        }

        let entry = dest_info
            .terrain
            .entry_cost(self.profile.mode)
            .ok_or(StepRejection::Impassable)? as u32;

        let src = board.hex_at(self.pos).ok_or(StepRejection::OffBoard(self.pos))?;
        let standing = src.level as i32 + self.elevation as i32;
        let dest_surface = dest_info.surface() as i32;
        let climb = standing.abs_diff(dest_surface);
        if climb > MAX_CLIMB {
            return Err(StepRejection::Impassable);
        }
        let climb_cost = if self.profile.mode.is_infantry() {
            climb * 2
        } else {
            climb
        };
        // Crawling costs one extra MP per hex
        let crawl = if self.prone { 1 } else { 0 };

        let step = MoveStep {
            kind,
            pos: dest,
            facing: self.facing,
            elevation: (dest_surface - dest_info.level as i32) as i8,
            mp: entry + climb_cost + surcharge + crawl,
            prone: self.prone,
            hull_down: false,
            jumping: false,
            velocity: 0,
        };
        Ok(self.appended(step, 1))
    }

    fn jump(&self, dir: u8, board: &Board) -> Result<MovePath, StepRejection> {
        let dest = self.pos.neighbor(dir);
        let dest_info = *board.hex_at(dest).ok_or(StepRejection::OffBoard(dest))?;
        // Jumping clears terrain and slope; each hex costs a flat 1 MP
        let step = MoveStep {
            kind: StepKind::Jump,
            pos: dest,
            facing: self.facing,
            elevation: (dest_info.surface() - dest_info.level) as i8,
            mp: 1,
            prone: false,
            hull_down: false,
            jumping: true,
            velocity: 0,
        };
        Ok(self.appended(step, 1))
    }

    fn throttle(&self, kind: StepKind, delta: i16) -> Result<MovePath, StepRejection> {
        if !self.profile.mode.is_aero() {
            return Err(StepRejection::NotAllowed);
        }
        if delta < 0 && self.velocity == 0 {
            return Err(StepRejection::NotAllowed);
        }
        let step = MoveStep {
            kind,
            pos: self.pos,
            facing: self.facing,
            elevation: self.elevation,
            mp: 1,
            prone: false,
            hull_down: false,
            jumping: false,
            velocity: self.velocity + delta,
        };
        Ok(self.appended(step, 0))
    }

    fn appended(&self, step: MoveStep, hexes: u32) -> MovePath {
        MovePath {
            profile: Arc::clone(&self.profile),
            start_pos: self.start_pos,
            start_facing: self.start_facing,
            start_elevation: self.start_elevation,
            last: Some(Arc::new(StepNode {
                step,
                prev: self.last.clone(),
            })),
            len: self.len + 1,
            pos: step.pos,
            facing: step.facing,
            elevation: step.elevation,
            mp_used: self.mp_used + step.mp,
            hexes_moved: self.hexes_moved + hexes,
            prone: step.prone,
            hull_down: step.hull_down,
            jumping: step.jumping,
            velocity: step.velocity,
        }
    }
}

/// Default step vocabulary for ground movement
pub const GROUND_VOCAB: &[StepKind] = &[
    StepKind::Forwards,
    StepKind::Backwards,
    StepKind::TurnLeft,
    StepKind::TurnRight,
    StepKind::LateralLeft,
    StepKind::LateralRight,
];

/// Step vocabulary while jumping
pub const JUMP_VOCAB: &[StepKind] = &[StepKind::Jump, StepKind::TurnLeft, StepKind::TurnRight];

/// Step vocabulary for airborne movement
pub const AERO_VOCAB: &[StepKind] = &[
    StepKind::Forwards,
    StepKind::TurnLeft,
    StepKind::TurnRight,
    StepKind::Accelerate,
    StepKind::Decelerate,
];
