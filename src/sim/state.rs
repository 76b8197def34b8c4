//! Game state and core simulation types
//!
//! All state that must survive between ticks lives here. Cosmetic effects
//! ride along but are skipped when serializing.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{Effects, FloatingText, Particle};
use super::enemy::Enemy;
use super::lane::Lane;
use super::player::{PowerUpKind, Player};
use super::projectile::Projectile;
use super::window::LaneWindow;
use crate::consts::*;
use crate::settings::{DifficultyTier, GameMode, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle preview: lanes scroll by on their own, no players
    Menu,
    /// Active gameplay
    Playing,
    /// Every player is dead
    GameOver,
}

/// Monotonic id source for lanes' contents and actors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

/// Things that happened during a tick, for audio/HUD collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Hopped { player: usize, row: i32 },
    ConePunched { player: usize, row: i32, column: i32 },
    Scored { points: u64, total: u64 },
    PowerUpCollected { player: usize, kind: PowerUpKind },
    Slipped { player: usize },
    /// A shield charge absorbed a hit
    ShieldAbsorbed { player: usize },
    VehicleSmashed { player: usize, row: i32 },
    TrainSmashed { player: usize, row: i32 },
    Damaged { player: usize, health: i32 },
    Killed { player: usize },
    Rescued { player: usize },
    Revived { player: usize },
    TrainIncoming { row: i32 },
    TurretFired { row: i32, column: i32 },
    ChaserSplatted,
    ChaserBopped { player: usize },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    pub difficulty: DifficultyTier,
    pub phase: GamePhase,
    /// Distance score, never decreases
    pub score: u64,
    pub high_score: u64,
    /// World y of the bottom of the visible window
    pub camera_y: f32,
    pub frame_count: u64,
    pub lanes: LaneWindow,
    /// Fixed order: player 1 first
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Events emitted by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Visual effects (not gameplay-affecting)
    #[serde(skip)]
    pub fx: Effects,
    /// Gameplay RNG
    pub rng: Pcg32,
    pub ids: EntityIds,
}

impl GameState {
    /// Start a run: safe rows, initial lane buffer, one or two players
    pub fn new(seed: u64, settings: &Settings, high_score: u64) -> Self {
        let mut state = Self::empty(seed, settings.mode, settings.difficulty, high_score);
        state.phase = GamePhase::Playing;
        state.lanes = LaneWindow::initial(
            LANE_LOOKAHEAD,
            settings.difficulty,
            &mut state.rng,
            &mut state.ids,
        );

        let start_column = LANE_COLUMNS / 2;
        state.players = (0..settings.mode.player_count())
            .map(|id| Player::new(id, start_column - id as i32, settings.breed, settings.cosmetic))
            .collect();

        log::info!(
            "New run: seed {}, {:?}, {} ({} players)",
            seed,
            settings.mode,
            settings.difficulty.as_str(),
            state.players.len()
        );
        state
    }

    /// Menu backdrop: scrolling lanes with nobody on them
    pub fn preview(seed: u64, difficulty: DifficultyTier) -> Self {
        Self::empty(seed, GameMode::Single, difficulty, 0)
    }

    fn empty(seed: u64, mode: GameMode, difficulty: DifficultyTier, high_score: u64) -> Self {
        Self {
            seed,
            mode,
            difficulty,
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            camera_y: 0.0,
            frame_count: 0,
            lanes: LaneWindow::default(),
            players: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            fx: Effects::new(seed),
            rng: Pcg32::seed_from_u64(seed),
            ids: EntityIds::default(),
        }
    }

    /// Rows a renderer would draw for the current camera
    pub fn visible_rows(&self) -> (i32, i32) {
        let min = (self.camera_y / TILE_SIZE).floor() as i32 - 2;
        let max = ((self.camera_y + FIELD_HEIGHT) / TILE_SIZE).floor() as i32 + 4;
        (min, max)
    }

    /// Highest row reached by any player still in the world
    pub fn lead_row(&self) -> i32 {
        self.players
            .iter()
            .filter(|p| p.is_playing())
            .map(|p| p.grid_y)
            .max()
            .unwrap_or(0)
    }

    pub fn all_dead(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.dead)
    }

    /// Per-player HUD figures, derived on demand
    pub fn hud(&self, player: usize) -> Option<PlayerHud> {
        let p = self.players.get(player)?;
        Some(PlayerHud {
            player,
            health: p.health,
            max_health: p.max_health,
            shield: p.powerups.shield,
            speed_ticks: p.powerups.speed_ticks,
            multiplier_ticks: p.powerups.multiplier_ticks,
            respawn_rows: (p.dead && self.mode == GameMode::Coop).then_some(p.respawn_timer.max(0)),
            dead: p.dead,
        })
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot<'_> {
        let (min, max) = self.visible_rows();
        Snapshot {
            phase: self.phase,
            mode: self.mode,
            score: self.score,
            high_score: self.high_score,
            camera_y: self.camera_y,
            frame_count: self.frame_count,
            lanes: self.lanes.rows(min, max),
            players: &self.players,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            particles: &self.fx.particles,
            texts: &self.fx.texts,
            shake: self.fx.shake,
            events: &self.events,
        }
    }
}

/// HUD figures for one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHud {
    pub player: usize,
    pub health: i32,
    pub max_health: i32,
    pub shield: bool,
    pub speed_ticks: u32,
    pub multiplier_ticks: u32,
    /// Rows of team progress until a co-op respawn
    pub respawn_rows: Option<i32>,
    pub dead: bool,
}

/// Externally visible state after a tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub mode: GameMode,
    pub score: u64,
    pub high_score: u64,
    pub camera_y: f32,
    pub frame_count: u64,
    /// Lanes in the visible window, ascending by row
    pub lanes: &'a [Lane],
    pub players: &'a [Player],
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub texts: &'a [FloatingText],
    pub shake: f32,
    pub events: &'a [GameEvent],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_single_run() {
        let state = GameState::new(7, &Settings::default(), 12);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].grid_x, 10);
        assert_eq!(state.lanes.first_row(), Some(0));
        assert_eq!(state.lanes.last_row(), Some(LANE_LOOKAHEAD - 1));
        assert_eq!(state.high_score, 12);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_new_coop_run() {
        let settings = Settings::new(GameMode::Coop, DifficultyTier::Normal);
        let state = GameState::new(7, &settings, 0);
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[1].grid_x, 9);
        assert_eq!(state.hud(1).map(|h| h.health), Some(COOP_MAX_HEALTH));
        assert!(state.hud(2).is_none());
    }

    #[test]
    fn test_preview_has_no_players() {
        let state = GameState::preview(3, DifficultyTier::Impossible);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.players.is_empty());
        assert!(!state.all_dead());
    }

    #[test]
    fn test_ids_increase() {
        let mut ids = EntityIds::default();
        let a = ids.next();
        let b = ids.next();
        assert!(b > a);
    }

    #[test]
    fn test_snapshot_shows_visible_lanes() {
        let state = GameState::new(1, &Settings::default(), 0);
        let snap = state.snapshot();
        assert_eq!(state.visible_rows(), (-2, 19));
        assert_eq!(snap.lanes.len(), LANE_LOOKAHEAD as usize);
        assert_eq!(snap.players.len(), 1);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(5, &Settings::default(), 0);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lanes.lanes, state.lanes.lanes);
        assert_eq!(back.seed, 5);
    }
}
