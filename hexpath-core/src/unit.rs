//! Unit movement profiles

use serde::{Deserialize, Serialize};

/// Movement mode of a unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveMode {
    Biped,
    Tracked,
    Wheeled,
    Hover,
    Foot,
    Aerodyne,
    Spheroid,
}

impl MoveMode {
    /// Ground vehicles carry the hull-down dominance partition
    pub fn is_ground_vehicle(&self) -> bool {
        matches!(self, MoveMode::Tracked | MoveMode::Wheeled | MoveMode::Hover)
    }

    /// Foot infantry pay doubled elevation-change costs
    pub fn is_infantry(&self) -> bool {
        matches!(self, MoveMode::Foot)
    }

    /// Airborne movement with velocity instead of a simple MP budget
    pub fn is_aero(&self) -> bool {
        matches!(self, MoveMode::Aerodyne | MoveMode::Spheroid)
    }
}

/// Immutable snapshot of a unit's movement capabilities
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveProfile {
    pub mode: MoveMode,
    /// Maximum movement points for ground movement
    pub max_mp: u32,
    /// Maximum movement points while jumping
    pub jump_mp: u32,
    /// Unit can make lateral shifts (sidesteps)
    pub can_shift: bool,
    /// Thrust budget per turn (aero only)
    pub max_thrust: u32,
    /// Minimum velocity an airborne unit may end its turn at (aero only)
    pub stall_velocity: i16,
}

impl MoveProfile {
    /// Ground unit with a plain MP budget
    pub fn ground(mode: MoveMode, max_mp: u32) -> Self {
        Self {
            mode,
            max_mp,
            jump_mp: 0,
            can_shift: false,
            max_thrust: 0,
            stall_velocity: 0,
        }
    }

    /// Aerodyne flier: must keep moving or it stalls
    pub fn aerodyne(max_thrust: u32) -> Self {
        Self {
            mode: MoveMode::Aerodyne,
            max_mp: max_thrust,
            jump_mp: 0,
            can_shift: false,
            max_thrust,
            stall_velocity: 1,
        }
    }

    /// Spheroid / airship-style flier: may hover at zero velocity
    pub fn spheroid(max_thrust: u32) -> Self {
        Self {
            mode: MoveMode::Spheroid,
            max_mp: max_thrust,
            jump_mp: 0,
            can_shift: false,
            max_thrust,
            stall_velocity: 0,
        }
    }

    pub fn with_jump(mut self, jump_mp: u32) -> Self {
        self.jump_mp = jump_mp;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.can_shift = true;
        self
    }
}
