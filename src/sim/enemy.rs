//! Pursuit enemy
//!
//! Exactly one chaser exists while playing. It walks straight at the
//! nearest player; touching them costs a shield charge or a hit, and either
//! way the chaser is spent and a fresh one appears behind the camera.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::palette;
use super::hazard;
use super::player::Direction;
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::settings::DifficultyTier;

/// Contact distance between chaser and player
pub const CHASER_CONTACT: f32 = TILE_SIZE * 0.8;
/// Spawn this far behind the camera
pub const CHASER_SPAWN_BEHIND: f32 = 100.0;
/// Trailing the camera by more than this teleports the chaser back
pub const CHASER_LEASH: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Chaser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Bottom-left corner of the sprite cell, like a player's
    pub pos: Vec2,
    pub speed: f32,
    pub facing: Direction,
    pub active: bool,
}

impl Enemy {
    pub fn chaser(id: u32, pos: Vec2, tier: DifficultyTier) -> Self {
        Self {
            id,
            kind: EnemyKind::Chaser,
            pos,
            speed: chaser_speed(tier),
            facing: Direction::Up,
            active: true,
        }
    }

    pub fn center(&self) -> Vec2 {
        crate::cell_center(self.pos)
    }
}

/// Constant pursuit speed for a tier
pub fn chaser_speed(tier: DifficultyTier) -> f32 {
    1.2 + 0.1 * tier.multiplier()
}

fn spawn_point(camera_y: f32) -> Vec2 {
    Vec2::new(FIELD_WIDTH / 2.0, camera_y - CHASER_SPAWN_BEHIND)
}

/// Coarse facing from the dominant axis of travel
fn facing_for(delta: Vec2) -> Direction {
    if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 { Direction::Right } else { Direction::Left }
    } else if delta.y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Sweep spent enemies, keep one chaser alive, and step each toward its prey
pub fn update_enemies(state: &mut GameState) {
    state.enemies.retain(|e| e.active);
    if !state.enemies.iter().any(|e| e.kind == EnemyKind::Chaser) {
        let id = state.ids.next();
        let chaser = Enemy::chaser(id, spawn_point(state.camera_y), state.difficulty);
        state.enemies.push(chaser);
    }

    for i in 0..state.enemies.len() {
        let from = state.enemies[i].pos;
        let target = state
            .players
            .iter()
            .filter(|p| p.is_playing())
            .min_by(|a, b| a.pos.distance(from).total_cmp(&b.pos.distance(from)))
            .map(|p| (p.id, p.pos));

        let enemy = &mut state.enemies[i];
        match target {
            Some((player, at)) => {
                let delta = at - enemy.pos;
                let dist = delta.length();
                if dist > 0.0 {
                    enemy.pos += delta / dist * enemy.speed;
                    enemy.facing = facing_for(delta);
                }
                if dist < CHASER_CONTACT {
                    enemy.active = false;
                    touch_player(state, i, player);
                }
            }
            None => enemy.pos.y += enemy.speed,
        }

        let camera_y = state.camera_y;
        let enemy = &mut state.enemies[i];
        if enemy.pos.y < camera_y - CHASER_LEASH {
            enemy.pos = spawn_point(camera_y);
        }
    }
}

fn touch_player(state: &mut GameState, enemy: usize, idx: usize) {
    let at = state.enemies[enemy].pos;
    let shielded = state
        .players
        .get_mut(idx)
        .is_some_and(|p| p.powerups.consume_shield());
    if shielded {
        state.fx.burst(at, palette::CHASER_ORANGE, 20, 1.0);
        state.fx.text(at, "BOP!", palette::WHITE);
        state.events.push(GameEvent::ShieldAbsorbed { player: idx });
        state.events.push(GameEvent::ChaserBopped { player: idx });
    } else {
        hazard::take_damage(state, idx);
    }
}
