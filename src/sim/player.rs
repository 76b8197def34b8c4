//! Player entity
//!
//! A player has two positions: the logical grid cell (authoritative for
//! collision and scoring) and a continuous pixel position used for the
//! interpolated hop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::grid_to_px;

/// Cardinal move direction. `Up` is forward (increasing row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Grid delta (columns, rows)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Unit vector in world space
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Chicken breed (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Breed {
    #[default]
    Classic,
    Silkie,
    Rooster,
    Void,
}

/// Hat/accessory (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Cosmetic {
    #[default]
    None,
    TopHat,
    Sunglasses,
    Crown,
    Headphones,
}

/// Per-slot colour scheme so co-op players are told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorProfile {
    Default,
    P2,
}

/// Power-up pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Speed,
    Multiplier,
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpState {
    pub shield: bool,
    pub speed_ticks: u32,
    pub multiplier_ticks: u32,
}

impl PowerUpState {
    pub fn apply(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Shield => self.shield = true,
            PowerUpKind::Speed => self.speed_ticks = POWERUP_DURATION,
            PowerUpKind::Multiplier => self.multiplier_ticks = POWERUP_DURATION,
        }
    }

    /// Count timers down by one tick
    pub fn tick_down(&mut self) {
        self.speed_ticks = self.speed_ticks.saturating_sub(1);
        self.multiplier_ticks = self.multiplier_ticks.saturating_sub(1);
    }

    /// Spend the shield charge. Returns false if there was none.
    pub fn consume_shield(&mut self) -> bool {
        std::mem::replace(&mut self.shield, false)
    }

    /// Score gained per new row
    pub fn score_multiplier(&self) -> u64 {
        if self.multiplier_ticks > 0 { 2 } else { 1 }
    }
}

/// A participant (one or two per run)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,

    // Logical position
    pub grid_x: i32,
    pub grid_y: i32,

    // Visual position (bottom-left corner of the sprite cell) and hop height
    pub pos: Vec2,
    pub z: f32,
    /// Squash and stretch
    pub scale: Vec2,

    // Hop state
    pub is_moving: bool,
    pub move_progress: f32,
    pub start: Vec2,
    pub target: Vec2,
    /// One buffered move, replayed when the current hop lands
    pub next_move: Option<Direction>,
    pub facing: Direction,

    // Status
    pub dead: bool,
    /// False while waiting for a co-op respawn
    pub active: bool,
    /// Rows of team progress left before respawn
    pub respawn_timer: i32,
    pub health: i32,
    pub max_health: i32,
    pub invincible_ticks: u32,

    // Drift while standing on a moving water platform
    pub on_log: bool,
    pub log_speed: f32,

    pub powerups: PowerUpState,

    pub color_profile: ColorProfile,
    pub breed: Breed,
    pub cosmetic: Cosmetic,
}

impl Player {
    pub fn new(id: usize, column: i32, breed: Breed, cosmetic: Cosmetic) -> Self {
        let pos = Vec2::new(grid_to_px(column), 0.0);
        Self {
            id,
            grid_x: column,
            grid_y: 0,
            pos,
            z: 0.0,
            scale: Vec2::ONE,
            is_moving: false,
            move_progress: 0.0,
            start: pos,
            target: pos,
            next_move: None,
            facing: Direction::Up,
            dead: false,
            active: true,
            respawn_timer: 0,
            health: COOP_MAX_HEALTH,
            max_health: COOP_MAX_HEALTH,
            invincible_ticks: 0,
            on_log: false,
            log_speed: 0.0,
            powerups: PowerUpState::default(),
            color_profile: if id == 0 { ColorProfile::Default } else { ColorProfile::P2 },
            breed,
            cosmetic,
        }
    }

    /// Alive and in the world
    pub fn is_playing(&self) -> bool {
        !self.dead && self.active
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Centre of the player's cell in pixels
    pub fn center(&self) -> Vec2 {
        crate::cell_center(self.pos)
    }

    /// Ticks per hop (shortened under the speed power-up)
    pub fn hop_duration(&self) -> f32 {
        if self.powerups.speed_ticks > 0 {
            HOP_DURATION / SPEED_HOP_DIVISOR
        } else {
            HOP_DURATION
        }
    }

    /// Stop any hop in progress and place the player exactly
    pub fn place(&mut self, grid_x: i32, grid_y: i32, pos: Vec2) {
        self.grid_x = grid_x;
        self.grid_y = grid_y;
        self.pos = pos;
        self.z = 0.0;
        self.is_moving = false;
        self.move_progress = 0.0;
        self.start = pos;
        self.target = pos;
        self.scale = Vec2::ONE;
    }
}

/// Squash-and-stretch scale for a hop at `progress` in [0, 1]
pub fn hop_scale(progress: f32) -> Vec2 {
    if progress < 0.2 {
        Vec2::new(1.2 - progress, 0.8 + progress)
    } else if progress > 0.8 {
        Vec2::new(1.0 + (progress - 0.8), 1.0 - (progress - 0.8))
    } else {
        Vec2::new(0.9, 1.1)
    }
}

/// Hop height at `progress` in [0, 1]
pub fn hop_height(progress: f32) -> f32 {
    (progress * std::f32::consts::PI).sin() * TILE_SIZE * HOP_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_grounded_at_column() {
        let p = Player::new(0, 10, Breed::Classic, Cosmetic::None);
        assert_eq!(p.grid_x, 10);
        assert_eq!(p.pos, Vec2::new(400.0, 0.0));
        assert!(p.is_playing());
        assert_eq!(p.color_profile, ColorProfile::Default);
        assert_eq!(Player::new(1, 9, Breed::Void, Cosmetic::Crown).color_profile, ColorProfile::P2);
    }

    #[test]
    fn test_speed_powerup_shortens_hop() {
        let mut p = Player::new(0, 10, Breed::Classic, Cosmetic::None);
        assert_eq!(p.hop_duration(), HOP_DURATION);
        p.powerups.apply(PowerUpKind::Speed);
        assert!(p.hop_duration() < HOP_DURATION);
    }

    #[test]
    fn test_powerup_timers_expire() {
        let mut state = PowerUpState::default();
        state.apply(PowerUpKind::Multiplier);
        assert_eq!(state.score_multiplier(), 2);
        for _ in 0..POWERUP_DURATION {
            state.tick_down();
        }
        assert_eq!(state.multiplier_ticks, 0);
        assert_eq!(state.score_multiplier(), 1);
        state.tick_down();
        assert_eq!(state.multiplier_ticks, 0);
    }

    #[test]
    fn test_shield_is_single_use() {
        let mut state = PowerUpState::default();
        assert!(!state.consume_shield());
        state.apply(PowerUpKind::Shield);
        assert!(state.consume_shield());
        assert!(!state.shield);
    }

    #[test]
    fn test_hop_curve_endpoints() {
        assert!(hop_height(0.0).abs() < 1e-4);
        assert!((hop_height(0.5) - TILE_SIZE * HOP_HEIGHT).abs() < 1e-3);
        assert_eq!(hop_scale(0.5), Vec2::new(0.9, 1.1));
    }
}
