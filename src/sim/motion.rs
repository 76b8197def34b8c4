//! Player motion: intents become hops
//!
//! Grid position is authoritative and moves the instant a hop is accepted;
//! the pixel position catches up over the hop duration. A player holds at
//! most one buffered move, replayed when the current hop lands.

use glam::Vec2;
use rand::seq::IndexedRandom;

use super::effects::palette;
use super::hazard;
use super::lane::{ObstacleKind, Scenery};
use super::player::{Direction, PowerUpKind, hop_height, hop_scale};
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::{grid_to_px, px_to_grid};

/// A move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Step(Direction),
    /// Involuntary hop in a random direction (oil spill)
    Slide,
}

/// What became of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Hop started
    Moved,
    /// Out of bounds or into scenery
    Blocked,
    /// Knocked over a traffic cone instead of moving
    Punched,
    /// Stored for replay after the current hop
    Buffered,
    /// No such player, or not in the world
    Ignored,
}

/// Apply a move intent: start it now when idle, otherwise buffer it.
/// A newer buffered move replaces an older one.
pub fn queue_move(state: &mut GameState, idx: usize, direction: Direction) -> MoveOutcome {
    let Some(player) = state.players.get_mut(idx) else {
        return MoveOutcome::Ignored;
    };
    if !player.is_playing() {
        return MoveOutcome::Ignored;
    }
    if player.is_moving {
        player.next_move = Some(direction);
        return MoveOutcome::Buffered;
    }
    attempt_move(state, idx, MoveKind::Step(direction))
}

/// Try to start a hop right away
pub fn attempt_move(state: &mut GameState, idx: usize, kind: MoveKind) -> MoveOutcome {
    if state.lanes.lanes.is_empty() {
        return MoveOutcome::Ignored;
    }
    let direction = match kind {
        MoveKind::Step(direction) => direction,
        MoveKind::Slide => Direction::ALL
            .choose(&mut state.rng)
            .copied()
            .unwrap_or(Direction::Up),
    };
    let Some(player) = state.players.get_mut(idx) else {
        return MoveOutcome::Ignored;
    };
    if !player.is_playing() {
        return MoveOutcome::Ignored;
    }

    player.facing = direction;
    let (dx, dy) = direction.delta();
    let column = px_to_grid(player.pos.x) + dx;
    let row = player.grid_y + dy;

    if !(0..LANE_COLUMNS).contains(&column) || row < 0 {
        return MoveOutcome::Blocked;
    }

    if let Some(lane) = state.lanes.get_mut(row) {
        if lane.is_grass() {
            if let Some(i) = lane.scenery_at(column) {
                let punched = matches!(
                    lane.obstacles[i].kind,
                    ObstacleKind::Scenery { item: Scenery::TrafficCone, .. }
                );
                if !punched {
                    return MoveOutcome::Blocked;
                }
                lane.obstacles.remove(i);
                let corner = Vec2::new(grid_to_px(column), grid_to_px(row));
                state.fx.burst(crate::cell_center(corner), palette::CONE_ORANGE, 8, 1.0);
                state.fx.text(corner, "PUNCH!", palette::WHITE);
                state.fx.shake(2.0);
                state.events.push(GameEvent::ConePunched { player: idx, row, column });
                return MoveOutcome::Punched;
            }
        }
    }

    player.is_moving = true;
    player.move_progress = 0.0;
    player.start = player.pos;
    player.grid_x = column;
    player.grid_y = row;
    player.target = Vec2::new(player.pos.x + dx as f32 * TILE_SIZE, grid_to_px(row));
    player.scale = Vec2::new(1.3, 0.7);
    let multiplier = player.powerups.score_multiplier();
    state.events.push(GameEvent::Hopped { player: idx, row });

    if row as u64 > state.score {
        state.score += multiplier;
        for p in state.players.iter_mut().filter(|p| p.dead && p.respawn_timer > 0) {
            p.respawn_timer -= multiplier as i32;
        }
        state.events.push(GameEvent::Scored { points: multiplier, total: state.score });
    }

    state
        .lanes
        .ensure_ahead(row, state.difficulty, &mut state.rng, &mut state.ids);
    state.lanes.trim(MAX_LANES);
    MoveOutcome::Moved
}

/// Per-tick player update: timers, hop interpolation, drift, idle easing
pub fn update_player(state: &mut GameState, idx: usize) {
    let frame = state.frame_count;
    let Some(player) = state.players.get_mut(idx) else {
        return;
    };
    if player.dead {
        return;
    }

    player.powerups.tick_down();
    player.invincible_ticks = player.invincible_ticks.saturating_sub(1);

    if player.is_moving {
        player.move_progress += 1.0 / player.hop_duration();
        player.scale = hop_scale(player.move_progress);
        if player.move_progress >= 1.0 {
            land(state, idx);
        } else {
            let t = player.move_progress;
            player.pos = player.start.lerp(player.target, t);
            player.z = hop_height(t);
        }
        return;
    }

    if player.on_log {
        player.pos.x += player.log_speed;
        player.grid_x = px_to_grid(player.pos.x).clamp(0, LANE_COLUMNS - 1);
        let x = player.pos.x;
        // Half a tile past either edge is off the field
        if x <= -TILE_SIZE / 2.0 || x >= FIELD_WIDTH - TILE_SIZE / 2.0 {
            let at = player.center();
            hazard::take_damage(state, idx);
            state.fx.burst(at, palette::WATER_SIDE, 20, 1.0);
        }
    } else {
        let desired = grid_to_px(player.grid_x);
        if (player.pos.x - desired).abs() > 0.5 {
            player.pos.x += (desired - player.pos.x) * 0.2;
        } else {
            player.pos.x = desired;
        }
        player.pos.y = grid_to_px(player.grid_y);
    }

    // Idle breathing
    if let Some(player) = state.players.get_mut(idx) {
        let breath = (frame as f32 * 0.1 + idx as f32).sin() * 0.03;
        player.scale.x += (1.0 + breath - player.scale.x) * 0.2;
        player.scale.y += (1.0 - breath - player.scale.y) * 0.2;
    }
}

/// Finish a hop: snap, collect, slip, replay
fn land(state: &mut GameState, idx: usize) {
    let (row, column, corner) = {
        let p = &mut state.players[idx];
        p.move_progress = 1.0;
        p.is_moving = false;
        p.pos = p.target;
        p.z = 0.0;
        p.scale = Vec2::ONE;
        p.grid_x = px_to_grid(p.pos.x);
        (p.grid_y, p.grid_x, p.pos)
    };
    let label_at = corner + Vec2::new(0.0, TILE_SIZE);

    if let Some(kind) = state.lanes.get_mut(row).and_then(|l| l.take_power_up(column)) {
        state.players[idx].powerups.apply(kind);
        let (label, color) = match kind {
            PowerUpKind::Shield => ("SHIELD!", palette::SHIELD),
            PowerUpKind::Speed => ("SPEED!", palette::SPEED),
            PowerUpKind::Multiplier => ("2X SCORE!", palette::MULTIPLIER),
        };
        state.fx.text(label_at, label, color);
        state.fx.burst(crate::cell_center(corner), color, 10, 1.0);
        state.events.push(GameEvent::PowerUpCollected { player: idx, kind });
        log::debug!("Player {} collected {:?}", idx, kind);
    }

    let on_oil = state.lanes.get(row).is_some_and(|l| l.has_oil_at(column));
    if on_oil {
        state.fx.text(label_at, "SLIP!", palette::WHITE);
        state.events.push(GameEvent::Slipped { player: idx });
        // A buffered move survives the slip and plays after it
        if attempt_move(state, idx, MoveKind::Slide) == MoveOutcome::Moved {
            return;
        }
    }

    if let Some(next) = state.players[idx].next_move.take() {
        attempt_move(state, idx, MoveKind::Step(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{DifficultyTier, GameMode, Settings};
    use crate::sim::lane::{
        Decoration, DecorationKind, Lane, LaneKind, Obstacle, PowerUp, WaterKind,
    };

    /// Run on bare grass so nothing but the test's own setup matters
    fn grass_state() -> GameState {
        let mut state = GameState::new(21, &Settings::default(), 0);
        for lane in &mut state.lanes.lanes {
            *lane = Lane::grass(lane.row);
        }
        state
    }

    fn finish_hop(state: &mut GameState) {
        for _ in 0..10 {
            update_player(state, 0);
        }
    }

    #[test]
    fn test_grid_moves_before_pixels() {
        let mut state = grass_state();
        assert_eq!(attempt_move(&mut state, 0, MoveKind::Step(Direction::Up)), MoveOutcome::Moved);
        let p = &state.players[0];
        assert_eq!((p.grid_x, p.grid_y), (10, 1));
        assert_eq!(p.pos, Vec2::new(400.0, 0.0));
        assert!(p.is_moving);

        update_player(&mut state, 0);
        let p = &state.players[0];
        assert!(p.pos.y > 0.0 && p.pos.y < TILE_SIZE);
        assert!(p.z > 0.0);

        finish_hop(&mut state);
        let p = &state.players[0];
        assert!(!p.is_moving);
        assert_eq!(p.pos, Vec2::new(400.0, 40.0));
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut state = grass_state();
        assert_eq!(attempt_move(&mut state, 0, MoveKind::Step(Direction::Down)), MoveOutcome::Blocked);
        state.players[0].place(0, 0, Vec2::ZERO);
        assert_eq!(attempt_move(&mut state, 0, MoveKind::Step(Direction::Left)), MoveOutcome::Blocked);
        state.players[0].place(LANE_COLUMNS - 1, 0, Vec2::new(grid_to_px(LANE_COLUMNS - 1), 0.0));
        assert_eq!(attempt_move(&mut state, 0, MoveKind::Step(Direction::Right)), MoveOutcome::Blocked);
        assert_eq!(state.players[0].grid_x, LANE_COLUMNS - 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_scenery_blocks() {
        let mut state = grass_state();
        if let Some(lane) = state.lanes.get_mut(1) {
            lane.obstacles.push(Obstacle::scenery(900, 10, Scenery::Tree));
        }
        assert_eq!(attempt_move(&mut state, 0, MoveKind::Step(Direction::Up)), MoveOutcome::Blocked);
        assert_eq!(state.players[0].grid_y, 0);
        assert_eq!(state.lanes.get(1).map(|l| l.obstacles.len()), Some(1));
    }

    #[test]
    fn test_buffered_move_replays_on_landing() {
        let mut state = grass_state();
        queue_move(&mut state, 0, Direction::Up);
        assert_eq!(queue_move(&mut state, 0, Direction::Left), MoveOutcome::Buffered);
        assert_eq!(queue_move(&mut state, 0, Direction::Right), MoveOutcome::Buffered);
        assert_eq!(state.players[0].next_move, Some(Direction::Right));

        for _ in 0..6 {
            update_player(&mut state, 0);
        }
        let p = &state.players[0];
        assert!(p.is_moving);
        assert_eq!((p.grid_x, p.grid_y), (11, 1));
        assert_eq!(p.next_move, None);
    }

    #[test]
    fn test_multiplier_doubles_score_and_speed_shortens_hop() {
        let mut state = grass_state();
        state.players[0].powerups.apply(PowerUpKind::Multiplier);
        state.players[0].powerups.apply(PowerUpKind::Speed);
        attempt_move(&mut state, 0, MoveKind::Step(Direction::Up));
        assert_eq!(state.score, 2);

        for _ in 0..4 {
            update_player(&mut state, 0);
        }
        assert!(!state.players[0].is_moving);

        // Row 2 does not beat a score of 2
        attempt_move(&mut state, 0, MoveKind::Step(Direction::Up));
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_pickup_on_landing() {
        let mut state = grass_state();
        if let Some(lane) = state.lanes.get_mut(1) {
            lane.power_ups.push(PowerUp { id: 901, kind: PowerUpKind::Shield, column: 10 });
        }
        attempt_move(&mut state, 0, MoveKind::Step(Direction::Up));
        assert!(!state.players[0].powerups.shield);
        finish_hop(&mut state);
        assert!(state.players[0].powerups.shield);
        assert!(state.lanes.get(1).is_some_and(|l| l.power_ups.is_empty()));
        assert!(state.events.contains(&GameEvent::PowerUpCollected { player: 0, kind: PowerUpKind::Shield }));
    }

    #[test]
    fn test_oil_forces_a_slide() {
        let mut state = grass_state();
        if let Some(lane) = state.lanes.get_mut(1) {
            lane.decorations.push(Decoration {
                id: 902,
                x: 400.0,
                y_offset: 0.0,
                kind: DecorationKind::OilSpill { column: 10 },
            });
        }
        attempt_move(&mut state, 0, MoveKind::Step(Direction::Up));
        state.players[0].next_move = Some(Direction::Up);
        for _ in 0..5 {
            update_player(&mut state, 0);
        }
        let p = &state.players[0];
        assert!(state.events.contains(&GameEvent::Slipped { player: 0 }));
        // Any direction is open from (10, 1), so the slide always starts
        assert!(p.is_moving);
        assert_ne!((p.grid_x, p.grid_y), (10, 1));
        assert_eq!(p.next_move, Some(Direction::Up));
    }

    #[test]
    fn test_idle_eases_back_to_cell() {
        let mut state = grass_state();
        state.players[0].pos.x = 410.0;
        update_player(&mut state, 0);
        assert_eq!(state.players[0].pos.x, 408.0);
        for _ in 0..60 {
            update_player(&mut state, 0);
        }
        assert_eq!(state.players[0].pos.x, 400.0);
    }

    #[test]
    fn test_drifting_off_the_edge_kills() {
        let mut state = grass_state();
        state.players[0].place(19, 0, Vec2::new(779.0, 0.0));
        state.players[0].on_log = true;
        state.players[0].log_speed = 3.0;
        update_player(&mut state, 0);
        assert!(state.players[0].dead);
    }

    #[test]
    fn test_drift_to_exact_edge_is_off_the_field() {
        let mut state = grass_state();
        state.players[0].place(19, 0, Vec2::new(777.0, 0.0));
        state.players[0].on_log = true;
        state.players[0].log_speed = 3.0;
        update_player(&mut state, 0);
        assert_eq!(state.players[0].pos.x, 780.0);
        assert!(state.players[0].dead);

        let mut state = grass_state();
        state.players[0].place(0, 0, Vec2::new(-17.0, 0.0));
        state.players[0].on_log = true;
        state.players[0].log_speed = -3.0;
        update_player(&mut state, 0);
        assert!(state.players[0].dead);
    }

    #[test]
    fn test_drift_column_stays_on_the_grid() {
        let mut state = grass_state();
        state.players[0].place(19, 0, Vec2::new(770.0, 0.0));
        state.players[0].on_log = true;
        state.players[0].log_speed = 9.0;
        update_player(&mut state, 0);
        let p = &state.players[0];
        assert!(!p.dead);
        assert_eq!(p.pos.x, 779.0);
        assert_eq!(p.grid_x, LANE_COLUMNS - 1);
    }

    #[test]
    fn test_coop_drift_off_edge_rescues_onto_teammate() {
        let settings = Settings::new(GameMode::Coop, DifficultyTier::Normal);
        let mut state = GameState::new(21, &settings, 0);
        for lane in &mut state.lanes.lanes {
            *lane = Lane::grass(lane.row);
        }
        if let Some(lane) = state.lanes.get_mut(3) {
            lane.kind = LaneKind::Water(WaterKind::Log);
        }
        state.players[0].place(19, 3, Vec2::new(779.0, grid_to_px(3)));
        state.players[0].on_log = true;
        state.players[0].log_speed = 3.0;

        update_player(&mut state, 0);

        let p = &state.players[0];
        assert!(!p.dead);
        assert_eq!(p.health, COOP_MAX_HEALTH - 1);
        assert_eq!((p.grid_x, p.grid_y), (9, 0));
        assert_eq!(p.pos, Vec2::new(360.0, 0.0));
        assert!(!p.on_log);
        assert!(state.events.contains(&GameEvent::Rescued { player: 0 }));
    }
}
