//! Lane Hopper - simulation core of an endless lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, hops, hazards, enemies, projectiles)
//! - `game`: Frame-driven facade (intents in, snapshots out, best score)
//! - `platform`: Browser/native storage abstraction
//! - `persistence`: Versioned save envelopes
//! - `settings`: Player preferences

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::BestScore;
pub use settings::{DifficultyTier, GameMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Size of one grid cell in pixels
    pub const TILE_SIZE: f32 = 40.0;
    /// Play field width in pixels
    pub const FIELD_WIDTH: f32 = 800.0;
    /// Play field height in pixels (visible window)
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Number of grid columns in every lane
    pub const LANE_COLUMNS: i32 = 20;

    /// How many lanes ahead of the leading player must exist
    pub const LANE_LOOKAHEAD: i32 = 20;
    /// Maximum lanes kept while playing
    pub const MAX_LANES: usize = 50;
    /// Maximum lanes kept in the idle preview
    pub const MAX_PREVIEW_LANES: usize = 30;
    /// Rows 0..SAFE_START_ROWS are always empty grass
    pub const SAFE_START_ROWS: i32 = 3;

    /// Ticks to complete a hop at base speed
    pub const HOP_DURATION: f32 = 5.0;
    /// Speed power-up divides hop duration by this
    pub const SPEED_HOP_DIVISOR: f32 = 1.5;
    /// Peak hop height as a fraction of a tile
    pub const HOP_HEIGHT: f32 = 0.8;
    /// Power-up duration in ticks (~10 seconds at 60 Hz)
    pub const POWERUP_DURATION: u32 = 600;

    /// Co-op health pool
    pub const COOP_MAX_HEALTH: i32 = 3;
    /// Invincibility window after a survivable co-op hit
    pub const INVINCIBLE_TICKS: u32 = 60;
    /// Rows the team must advance before a dead co-op player returns
    pub const RESPAWN_ROWS: i32 = 20;

    /// Falling this far behind the camera is damage
    pub const CAMERA_FALL_MARGIN: f32 = 100.0;
    /// Co-op rescue applies when this far behind the camera
    pub const CAMERA_RESCUE_MARGIN: f32 = 50.0;
    /// Camera leads the front player by this fraction of the field height
    pub const CAMERA_LEAD: f32 = 0.25;
    /// Camera easing factor per tick
    pub const CAMERA_EASE: f32 = 0.1;
    /// Camera speed in the idle preview (pixels per tick)
    pub const PREVIEW_SCROLL: f32 = 0.4;
}

/// Pixel position of the left edge of a grid column (or the near edge of a row)
#[inline]
pub fn grid_to_px(cell: i32) -> f32 {
    cell as f32 * consts::TILE_SIZE
}

/// Nearest grid cell for a pixel coordinate
#[inline]
pub fn px_to_grid(px: f32) -> i32 {
    (px / consts::TILE_SIZE).round() as i32
}

/// Centre of the cell whose near-left corner is `corner`
#[inline]
pub fn cell_center(corner: Vec2) -> Vec2 {
    corner + Vec2::splat(consts::TILE_SIZE / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_px_roundtrip() {
        assert_eq!(grid_to_px(3), 120.0);
        assert_eq!(px_to_grid(120.0), 3);
        assert_eq!(px_to_grid(139.0), 3);
        assert_eq!(px_to_grid(141.0), 4);
        assert_eq!(px_to_grid(-19.0), 0);
    }

    #[test]
    fn test_columns_fill_field() {
        assert_eq!(consts::LANE_COLUMNS as f32 * consts::TILE_SIZE, consts::FIELD_WIDTH);
    }
}
