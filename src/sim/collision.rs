//! Collision geometry
//!
//! Lanes are one-dimensional for hazard purposes: a player is a horizontal
//! band inside their row, and every mover is a horizontal span. Only
//! projectiles and the chaser use 2D proximity.

use glam::Vec2;

use crate::consts::TILE_SIZE;

/// Half-width of the player's hit band (a quarter tile)
pub const PLAYER_HALF_WIDTH: f32 = TILE_SIZE * 0.25;

/// Closed horizontal interval in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub left: f32,
    pub right: f32,
}

impl Span {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Span starting at `x` with the given width
    pub fn from_origin(x: f32, width: f32) -> Self {
        Self::new(x, x + width)
    }

    /// Shrink both ends by `amount`
    pub fn inset(self, amount: f32) -> Self {
        Self::new(self.left + amount, self.right - amount)
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Span) -> bool {
        self.right > other.left && self.left < other.right
    }

    /// Strict containment of a point
    pub fn contains(&self, x: f32) -> bool {
        x > self.left && x < self.right
    }

    pub fn center(&self) -> f32 {
        (self.left + self.right) * 0.5
    }
}

/// Hit band of a player whose cell starts at `x`
pub fn player_band(x: f32) -> Span {
    let center = x + TILE_SIZE * 0.5;
    Span::new(center - PLAYER_HALF_WIDTH, center + PLAYER_HALF_WIDTH)
}

/// Axis-aligned proximity: both axes closer than `half`
pub fn within_box(a: Vec2, b: Vec2, half: f32) -> bool {
    let d = (a - b).abs();
    d.x < half && d.y < half
}
