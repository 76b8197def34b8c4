//! Turrets, player shots and projectile travel

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::within_box;
use super::effects::palette;
use super::enemy::EnemyKind;
use super::hazard;
use super::lane::{ObstacleKind, Scenery};
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::{cell_center, grid_to_px};

pub const PLAYER_SHOT_SPEED: f32 = 15.0;
pub const TURRET_SHOT_SPEED: f32 = 4.0;
/// Hit half-extent of a turret shot against a player
pub const HOSTILE_HIT: f32 = 15.0;
/// Hit half-extent of a player shot against chasers and turrets
pub const FRIENDLY_HIT: f32 = 20.0;

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Hostile: hurts players
    Turret,
    /// Friendly: hurts chasers
    Player(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
    pub active: bool,
}

/// Fire a shot from a player's centre in the direction they face
pub fn shoot(state: &mut GameState, idx: usize) -> bool {
    let Some(player) = state.players.get_mut(idx) else {
        return false;
    };
    if !player.is_playing() {
        return false;
    }
    player.scale = Vec2::new(1.2, 0.8);
    let projectile = Projectile {
        id: state.ids.next(),
        pos: player.center(),
        vel: player.facing.unit() * PLAYER_SHOT_SPEED,
        owner: Owner::Player(idx),
        active: true,
    };
    state.projectiles.push(projectile);
    true
}

/// Count down turrets in visible grass lanes; fire the ones that expire
pub fn fire_turrets(state: &mut GameState) {
    let targets: Vec<Vec2> = state
        .players
        .iter()
        .filter(|p| p.is_playing())
        .map(|p| p.pos)
        .collect();
    let (min, max) = state.visible_rows();

    let mut shots = Vec::new();
    for lane in state.lanes.rows_mut(min, max) {
        if !lane.is_grass() {
            continue;
        }
        let lane_y = lane.world_y();
        for obstacle in &mut lane.obstacles {
            let ObstacleKind::Scenery {
                column,
                item: Scenery::Turret { cooldown },
            } = &mut obstacle.kind
            else {
                continue;
            };
            *cooldown = cooldown.saturating_sub(1);
            if *cooldown > 0 {
                continue;
            }
            *cooldown = state.rng.random_range(120..240);

            let turret = Vec2::new(obstacle.x, lane_y);
            let Some(target) = targets
                .iter()
                .copied()
                .min_by(|a, b| a.distance(turret).total_cmp(&b.distance(turret)))
            else {
                continue;
            };
            let from = cell_center(turret);
            let dir = (cell_center(target) - from).normalize_or_zero();
            shots.push((from, dir * TURRET_SHOT_SPEED, lane.row, *column));
        }
    }

    for (from, vel, row, column) in shots {
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos: from,
            vel,
            owner: Owner::Turret,
            active: true,
        });
        state.fx.burst(from, palette::HIT_RED, 5, 1.0);
        state.events.push(GameEvent::TurretFired { row, column });
    }
}

/// Move projectiles, resolve hits, and drop the spent ones
pub fn update_projectiles(state: &mut GameState) {
    let camera_y = state.camera_y;
    for i in 0..state.projectiles.len() {
        let projectile = &mut state.projectiles[i];
        projectile.pos += projectile.vel;
        let pos = projectile.pos;
        let off_screen = pos.x < -50.0
            || pos.x > FIELD_WIDTH + 50.0
            || pos.y < camera_y - 100.0
            || pos.y > camera_y + FIELD_HEIGHT + 100.0;
        if off_screen {
            projectile.active = false;
            continue;
        }

        let owner = projectile.owner;
        let hit = match owner {
            Owner::Turret => hostile_hit(state, pos),
            Owner::Player(_) => friendly_hit(state, pos),
        };
        if hit {
            state.projectiles[i].active = false;
        }
    }
    state.projectiles.retain(|p| p.active);
}

fn hostile_hit(state: &mut GameState, pos: Vec2) -> bool {
    let Some(idx) = state
        .players
        .iter()
        .position(|p| p.is_playing() && within_box(pos, p.center(), HOSTILE_HIT))
    else {
        return false;
    };
    let player = &mut state.players[idx];
    let at = player.center();
    if player.powerups.consume_shield() {
        let label_at = player.pos;
        state.fx.burst(at, palette::SHIELD, 10, 1.0);
        state.fx.text(label_at, "BLOCKED!", palette::WHITE);
        state.events.push(GameEvent::ShieldAbsorbed { player: idx });
    } else if hazard::take_damage(state, idx) {
        state.fx.burst(at, palette::CHICKEN_BODY, 15, 1.0);
    }
    true
}

fn friendly_hit(state: &mut GameState, pos: Vec2) -> bool {
    let chaser = state.enemies.iter_mut().find(|e| {
        e.active && e.kind == EnemyKind::Chaser && within_box(pos, e.center(), FRIENDLY_HIT)
    });
    if let Some(chaser) = chaser {
        chaser.active = false;
        let (at, label_at) = (chaser.center(), chaser.pos);
        state.fx.burst(at, palette::CHASER_ORANGE, 15, 1.0);
        state.fx.text(label_at, "SPLAT!", palette::WHITE);
        state.events.push(GameEvent::ChaserSplatted);
        return true;
    }

    // Turrets soak up shots but cannot be destroyed
    let (min, max) = state.visible_rows();
    let turret = state
        .lanes
        .rows(min, max)
        .iter()
        .filter(|l| l.is_grass())
        .flat_map(|l| {
            l.obstacles
                .iter()
                .filter(|o| o.is_turret())
                .map(move |o| cell_center(Vec2::new(o.x, grid_to_px(l.row))))
        })
        .find(|&center| within_box(pos, center, FRIENDLY_HIT));
    if let Some(center) = turret {
        state.fx.burst(center, palette::TURRET, 5, 1.0);
        return true;
    }
    false
}
