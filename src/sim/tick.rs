//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. One call
//! is one logical step; every timer in the game counts these steps.

use super::enemy::update_enemies;
use super::hazard::{check_camera_fall, resolve_lane_hazards, respawn_waiting_players};
use super::motion::{queue_move, update_player};
use super::player::Direction;
use super::projectile::{fire_turrets, shoot, update_projectiles};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Most players a run can have
pub const MAX_PLAYERS: usize = 2;

/// A decoded player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    Shoot,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest intent per player slot; a newer one overwrites an older one
    pub intents: [Option<Intent>; MAX_PLAYERS],
}

impl TickInput {
    /// Queue an intent. Unknown player slots are ignored.
    pub fn submit(&mut self, player: usize, intent: Intent) -> bool {
        match self.intents.get_mut(player) {
            Some(slot) => {
                *slot = Some(intent);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.intents = [None; MAX_PLAYERS];
    }
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.frame_count += 1;
    state.fx.update();

    if state.phase == GamePhase::Menu {
        tick_preview(state);
        return;
    }

    // Lane buffer
    let lead = state.lead_row();
    state
        .lanes
        .ensure_ahead(lead, state.difficulty, &mut state.rng, &mut state.ids);

    // Intents
    for (idx, intent) in input.intents.iter().enumerate() {
        match intent {
            Some(Intent::Move(direction)) => {
                queue_move(state, idx, *direction);
            }
            Some(Intent::Shoot) => {
                shoot(state, idx);
            }
            None => {}
        }
    }

    // Environment
    for row in state.lanes.advance_all(&mut state.rng, &mut state.ids) {
        state.events.push(GameEvent::TrainIncoming { row });
    }

    // Enemies and projectiles
    fire_turrets(state);
    update_enemies(state);
    update_projectiles(state);

    update_camera(state);

    // Players, in fixed order
    for idx in 0..state.players.len() {
        update_player(state, idx);
        check_camera_fall(state, idx);
        resolve_lane_hazards(state, idx);
    }

    respawn_waiting_players(state);

    if state.all_dead() {
        end_run(state);
    }
}

/// Ease the camera toward the front player; it never scrolls back
fn update_camera(state: &mut GameState) {
    let front = state
        .players
        .iter()
        .filter(|p| p.is_playing())
        .map(|p| p.pos.y)
        .fold(state.camera_y, f32::max);
    let target = front - FIELD_HEIGHT * CAMERA_LEAD;
    if target > state.camera_y {
        state.camera_y += (target - state.camera_y) * CAMERA_EASE;
    }
}

/// Idle backdrop: lanes move and scroll by with nobody on them
fn tick_preview(state: &mut GameState) {
    state.lanes.advance_all(&mut state.rng, &mut state.ids);
    state.camera_y += PREVIEW_SCROLL;
    let (_, max_visible) = state.visible_rows();
    state
        .lanes
        .preview_scroll(max_visible, state.difficulty, &mut state.rng, &mut state.ids);
}

fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!("Game over at {} (frame {})", state.score, state.frame_count);
    if state.score > state.high_score {
        state.high_score = state.score;
        state.events.push(GameEvent::NewHighScore { score: state.score });
        log::info!("New high score: {}", state.score);
    }
}
