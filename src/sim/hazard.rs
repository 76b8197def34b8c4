//! Hazard resolution and the damage pipeline
//!
//! Single-player damage kills outright. In co-op it costs one health point,
//! grants a short invincibility window and pulls the player out of unsafe
//! spots; at zero health the player waits for the team to advance
//! `RESPAWN_ROWS` rows.

use glam::Vec2;

use super::collision::player_band;
use super::effects::palette;
use super::lane::{LaneKind, Mover, ObstacleKind};
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::grid_to_px;
use crate::settings::GameMode;

/// Vehicles are shorter than their sprites by this much at each end
const VEHICLE_INSET: f32 = 8.0;
const TRAIN_INSET: f32 = 10.0;

/// Damage a player. Returns false when it had no effect (dead or invincible).
pub fn take_damage(state: &mut GameState, idx: usize) -> bool {
    let mode = state.mode;
    let Some(player) = state.players.get_mut(idx) else {
        return false;
    };
    if player.dead || player.is_invincible() {
        return false;
    }

    if mode == GameMode::Single {
        kill(state, idx);
        return true;
    }

    player.health -= 1;
    let health = player.health;
    state.events.push(GameEvent::Damaged { player: idx, health });
    if health <= 0 {
        kill(state, idx);
        return true;
    }

    player.invincible_ticks = INVINCIBLE_TICKS;
    let label_at = player.pos + Vec2::new(0.0, TILE_SIZE);
    let behind_camera = player.pos.y < state.camera_y - CAMERA_RESCUE_MARGIN;
    let row = player.grid_y;
    state.fx.text(label_at, "-1 HP", palette::HIT_RED);

    let unsafe_ground = state.lanes.get(row).is_none_or(|l| l.is_water());
    if unsafe_ground || behind_camera {
        rescue(state, idx);
    }
    true
}

/// Remove a player from play until a co-op respawn
pub fn kill(state: &mut GameState, idx: usize) {
    let Some(player) = state.players.get_mut(idx) else {
        return;
    };
    player.dead = true;
    player.active = false;
    player.respawn_timer = RESPAWN_ROWS;
    player.is_moving = false;
    player.next_move = None;
    player.on_log = false;
    player.log_speed = 0.0;
    player.z = 0.0;
    state.events.push(GameEvent::Killed { player: idx });
    log::debug!("Player {} killed at row {}", idx, player.grid_y);
}

/// Move a surviving co-op player somewhere safe: onto a living teammate,
/// or else the nearest grass row at or behind them
pub fn rescue(state: &mut GameState, idx: usize) {
    let teammate = state
        .players
        .iter()
        .find(|p| p.id != idx && p.is_playing())
        .map(|p| (p.grid_x, p.grid_y, p.pos, p.on_log, p.log_speed));

    let Some(player) = state.players.get_mut(idx) else {
        return;
    };

    if let Some((grid_x, grid_y, pos, on_log, log_speed)) = teammate {
        player.place(grid_x, grid_y, pos);
        player.on_log = on_log;
        player.log_speed = log_speed;
    } else if let Some(lane) = state.lanes.nearest_grass_at_or_behind(player.grid_y) {
        let column = player.grid_x;
        player.place(column, lane.row, Vec2::new(grid_to_px(column), lane.world_y()));
        player.on_log = false;
        player.log_speed = 0.0;
    } else {
        return;
    }
    state.events.push(GameEvent::Rescued { player: idx });
}

/// Bring back co-op players whose countdown has run out
pub fn respawn_waiting_players(state: &mut GameState) {
    if state.mode != GameMode::Coop {
        return;
    }
    let Some(anchor) = state
        .players
        .iter()
        .find(|p| p.is_playing())
        .map(|p| (p.grid_x, p.grid_y, p.pos.y, p.on_log, p.log_speed))
    else {
        return;
    };
    let (grid_x, grid_y, y, on_log, log_speed) = anchor;

    for player in state
        .players
        .iter_mut()
        .filter(|p| p.dead && !p.active && p.respawn_timer <= 0)
    {
        player.dead = false;
        player.active = true;
        player.health = player.max_health;
        player.invincible_ticks = 0;
        player.place(grid_x, grid_y, Vec2::new(grid_to_px(grid_x), y));
        player.on_log = on_log;
        player.log_speed = log_speed;
        player.powerups.shield = true;

        state.fx.burst(player.center(), palette::WHITE, 30, 1.0);
        state
            .fx
            .text(player.pos + Vec2::new(0.0, TILE_SIZE), "SAVED!", palette::WHITE);
        state.events.push(GameEvent::Revived { player: player.id });
        log::debug!("Player {} revived at row {}", player.id, grid_y);
    }
}

/// Falling too far behind the camera always hurts
pub fn check_camera_fall(state: &mut GameState, idx: usize) {
    let fell = state
        .players
        .get(idx)
        .is_some_and(|p| p.is_playing() && p.pos.y < state.camera_y - CAMERA_FALL_MARGIN);
    if fell {
        take_damage(state, idx);
    }
}

/// What the player's band touches in their current lane
enum Contact {
    None,
    /// Indices of overlapping vehicles
    Vehicles(Vec<usize>),
    Train(usize),
    /// Standing on a platform (drift velocity, platform centre)
    Platform { drift: f32, center: f32 },
    Drowning,
}

/// Per-lane hazard rules for one player
pub fn resolve_lane_hazards(state: &mut GameState, idx: usize) {
    let Some(player) = state.players.get(idx) else {
        return;
    };
    if player.dead {
        return;
    }
    let row = player.grid_y;
    let moving = player.is_moving;
    let band = player_band(player.pos.x);
    let Some(lane) = state.lanes.get(row) else {
        return;
    };

    let contact = match &lane.kind {
        LaneKind::Road => {
            let hits: Vec<usize> = lane
                .obstacles
                .iter()
                .enumerate()
                .filter(|(_, o)| !o.dead && band.overlaps(&o.span().inset(VEHICLE_INSET)))
                .map(|(i, _)| i)
                .collect();
            if hits.is_empty() { Contact::None } else { Contact::Vehicles(hits) }
        }
        LaneKind::Rail(_) => lane
            .obstacles
            .iter()
            .position(|o| o.is_train() && !o.dead && band.overlaps(&o.span().inset(TRAIN_INSET)))
            .map_or(Contact::None, Contact::Train),
        LaneKind::Water(_) if !moving => {
            let sign = lane.sign();
            lane.obstacles
                .iter()
                .filter(|o| !o.dead && o.span().contains(band.center()))
                .last()
                .map_or(Contact::Drowning, |o| Contact::Platform {
                    drift: o.speed() * sign,
                    center: o.span().center(),
                })
        }
        LaneKind::Water(_) | LaneKind::Grass => Contact::None,
    };
    let lane_is_water = lane.is_water();

    if !lane_is_water && !moving {
        if let Some(player) = state.players.get_mut(idx) {
            player.on_log = false;
            player.log_speed = 0.0;
        }
    }

    match contact {
        Contact::None => {}
        Contact::Vehicles(hits) => {
            for i in hits {
                hit_by_vehicle(state, idx, row, i);
            }
        }
        Contact::Train(i) => hit_by_train(state, idx, row, i),
        Contact::Platform { drift, center } => {
            if let Some(player) = state.players.get_mut(idx) {
                player.on_log = true;
                player.log_speed = drift;
                let diff = center - band.center();
                if diff.abs() > 1.0 {
                    player.pos.x += diff * 0.1;
                }
            }
        }
        Contact::Drowning => {
            let at = band_center(state, idx);
            take_damage(state, idx);
            state.fx.shake(10.0);
            state.fx.burst(at, palette::WATER, 15, 1.0);
        }
    }
}

fn band_center(state: &GameState, idx: usize) -> Vec2 {
    state.players.get(idx).map_or(Vec2::ZERO, |p| p.center())
}

fn hit_by_vehicle(state: &mut GameState, idx: usize, row: i32, obstacle: usize) {
    let Some(player) = state.players.get_mut(idx) else {
        return;
    };
    if player.powerups.consume_shield() {
        let label_at = player.pos + Vec2::new(0.0, TILE_SIZE);
        let Some(vehicle) = state
            .lanes
            .get_mut(row)
            .and_then(|l| l.obstacles.get_mut(obstacle))
        else {
            return;
        };
        vehicle.dead = true;
        let color = match vehicle.kind {
            ObstacleKind::Mover {
                body: Mover::Car { paint } | Mover::Truck { paint },
                ..
            } => palette::CAR_SIDES[paint as usize % palette::CAR_SIDES.len()],
            _ => palette::HIT_RED,
        };
        let (x, width) = (vehicle.x, vehicle.width);
        state.fx.vehicle_explosion(x, grid_to_px(row), color, width);
        state.fx.text(label_at, "SMASH!", palette::WHITE);
        state.events.push(GameEvent::ShieldAbsorbed { player: idx });
        state.events.push(GameEvent::VehicleSmashed { player: idx, row });
        log::debug!("Player {} smashed a vehicle on row {}", idx, row);
    } else {
        let at = player.center();
        if take_damage(state, idx) {
            state.fx.shake(20.0);
            state.fx.burst(at, palette::CHICKEN_BODY, 20, 1.0);
        }
    }
}

fn hit_by_train(state: &mut GameState, idx: usize, row: i32, obstacle: usize) {
    let Some(player) = state.players.get_mut(idx) else {
        return;
    };
    if player.powerups.consume_shield() {
        let x = player.pos.x;
        let label_at = player.pos + Vec2::new(0.0, TILE_SIZE);
        if let Some(train) = state
            .lanes
            .get_mut(row)
            .and_then(|l| l.obstacles.get_mut(obstacle))
        {
            train.dead = true;
        }
        state
            .fx
            .vehicle_explosion(x - TILE_SIZE, grid_to_px(row), palette::TRAIN_SIDE, TILE_SIZE * 3.0);
        state.fx.text(label_at, "EPIC!", palette::WHITE);
        state.events.push(GameEvent::ShieldAbsorbed { player: idx });
        state.events.push(GameEvent::TrainSmashed { player: idx, row });
        log::debug!("Player {} smashed a train on row {}", idx, row);
    } else {
        let at = player.center();
        if take_damage(state, idx) {
            state.fx.shake(25.0);
            state.fx.burst(at, palette::CHICKEN_BODY, 30, 1.0);
        }
    }
}
