//! Terrain query surface for movement planning
//!
//! The board is immutable during a search. Off-map hexes are reported as
//! `None` and must be treated as impassable by callers, never as an error.

use crate::hex::Hex;
use crate::unit::MoveMode;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Terrain occupying a hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainKind {
    Clear,
    Rough,
    LightWoods,
    HeavyWoods,
    Water { depth: u8 },
    Magma,
}

impl TerrainKind {
    /// MP cost to enter a hex of this terrain, per movement mode.
    /// None means impassable for that mode. Every passable combination
    /// costs at least 1 MP.
    pub fn entry_cost(&self, mode: MoveMode) -> Option<u8> {
        if mode.is_aero() {
            // Flight ignores ground terrain
            return Some(1);
        }
        match self {
            TerrainKind::Clear => Some(1),
            TerrainKind::Rough => match mode {
                MoveMode::Wheeled => Some(3),
                _ => Some(2),
            },
            TerrainKind::LightWoods => match mode {
                MoveMode::Wheeled | MoveMode::Hover => None,
                _ => Some(2),
            },
            TerrainKind::HeavyWoods => match mode {
                MoveMode::Wheeled | MoveMode::Hover => None,
                _ => Some(3),
            },
            TerrainKind::Water { depth } => match (mode, depth) {
                (_, 0) => Some(1),
                (MoveMode::Hover, _) => Some(1),
                (MoveMode::Biped, 1) => Some(2),
                (MoveMode::Biped, _) => Some(4),
                _ => None,
            },
            TerrainKind::Magma => None,
        }
    }
}

/// Terrain record for one hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexInfo {
    /// Ground level
    pub level: i8,
    pub terrain: TerrainKind,
    /// Building height above ground; the roof is a valid standing surface
    pub building: Option<u8>,
    /// Absolute elevation of a bridge deck crossing this hex
    pub bridge: Option<i8>,
}

impl HexInfo {
    pub const fn clear(level: i8) -> Self {
        Self {
            level,
            terrain: TerrainKind::Clear,
            building: None,
            bridge: None,
        }
    }

    pub const fn with_terrain(level: i8, terrain: TerrainKind) -> Self {
        Self {
            level,
            terrain,
            building: None,
            bridge: None,
        }
    }

    /// Highest valid standing surface of this hex (ground, roof, or bridge deck)
    pub fn surface(&self) -> i8 {
        let mut s = self.level;
        if let Some(h) = self.building {
            s = s.max(self.level + h as i8);
        }
        if let Some(b) = self.bridge {
            s = s.max(b);
        }
        s
    }
}

/// Hex -> terrain lookup (sparse representation)
#[derive(Clone, Debug, Default)]
pub struct Board {
    hexes: FxHashMap<Hex, HexInfo>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Hex, HexInfo)>) -> Self {
        Self {
            hexes: entries.into_iter().collect(),
        }
    }

    /// Flat clear board covering q in 0..cols, r in 0..rows at level 0
    pub fn flat(cols: i16, rows: i16) -> Self {
        let mut hexes = FxHashMap::default();
        for q in 0..cols {
            for r in 0..rows {
                hexes.insert(Hex::new(q, r), HexInfo::clear(0));
            }
        }
        Self { hexes }
    }

    /// Replace one hex (board construction only; never called during a search)
    pub fn with_hex(mut self, coord: Hex, info: HexInfo) -> Self {
        self.hexes.insert(coord, info);
        self
    }

    pub fn hex_at(&self, coord: Hex) -> Option<&HexInfo> {
        self.hexes.get(&coord)
    }

    pub fn contains(&self, coord: Hex) -> bool {
        self.hexes.contains_key(&coord)
    }

    /// Ground level at a hex, if on the board
    pub fn level_at(&self, coord: Hex) -> Option<i8> {
        self.hexes.get(&coord).map(|h| h.level)
    }

    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hex, &HexInfo)> {
        self.hexes.iter()
    }
}
