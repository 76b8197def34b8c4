//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by lane row, then entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod enemy;
pub mod generate;
pub mod hazard;
pub mod lane;
pub mod motion;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod window;

pub use enemy::{Enemy, EnemyKind};
pub use generate::{DifficultyCurve, generate_lane};
pub use lane::{Lane, LaneKind, Obstacle, ObstacleKind, TrafficLight, WaterKind};
pub use motion::{MoveOutcome, attempt_move, queue_move};
pub use player::{Breed, Cosmetic, Direction, Player, PowerUpKind};
pub use projectile::{Owner, Projectile};
pub use state::{EntityIds, GameEvent, GamePhase, GameState, PlayerHud, Snapshot};
pub use tick::{Intent, MAX_PLAYERS, TickInput, tick};
pub use window::LaneWindow;
