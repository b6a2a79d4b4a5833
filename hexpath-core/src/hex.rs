//! Hex grid geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i16,
    pub r: i16,
}

impl Hex {
    pub const fn new(q: i16, r: i16) -> Self {
        Self { q, r }
    }

    /// Hex-grid distance between two hexes
    pub fn distance_to(&self, other: Hex) -> u32 {
        let dq = (self.q - other.q).abs() as u32;
        let dr = (self.r - other.r).abs() as u32;
        let ds = ((self.q + self.r) - (other.q + other.r)).abs() as u32;
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// Angular bearing toward another hex, in degrees (0 = north, clockwise).
    /// Returns None for the same hex.
    pub fn degree_to(&self, other: Hex) -> Option<i32> {
        if *self == other {
            return None;
        }
        let dq = (other.q - self.q) as f32;
        let dr = (other.r - self.r) as f32;

        // Axial to cartesian (pointy-top layout matching DIRECTIONS)
        let x = 1.5 * dq;
        let y = 0.866_025_4 * dq + 1.732_050_8 * dr;

        let mut angle = y.atan2(x).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        // Shift so that due north reads 0 and angles grow clockwise
        Some(((angle.round() as i32) + 90).rem_euclid(360))
    }

    /// Direction (0-5) whose hexside is nearest the bearing toward another hex.
    /// Returns None for the same hex.
    pub fn direction_to(&self, other: Hex) -> Option<u8> {
        self.degree_to(other)
            .map(|deg| (((deg + 30) / 60) % 6) as u8)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i16, i16); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Rotate a facing one hexside counter-clockwise
pub fn turn_left(facing: u8) -> u8 {
    (facing + 5) % 6
}

/// Rotate a facing one hexside clockwise
pub fn turn_right(facing: u8) -> u8 {
    (facing + 1) % 6
}

/// Minimal number of hexside rotations between two facings (0-3)
pub fn facing_diff(a: u8, b: u8) -> u8 {
    let cw = (b + 6 - a) % 6;
    let ccw = (a + 6 - b) % 6;
    cw.min(ccw)
}
