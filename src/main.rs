//! Lane Hopper entry point
//!
//! Native builds play one seeded run headlessly with a simple autopilot and
//! log the outcome. Rendering and input capture are left to the host.

#[cfg(not(target_arch = "wasm32"))]
use lane_hopper::sim::{
    Direction, GameEvent, GamePhase, GameState, Intent, Lane, LaneKind, TrafficLight,
};

/// Ticks to run when `LANE_HOPPER_TICKS` is unset (one minute at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 3600;

/// Autopilot fires a shot this often
#[cfg(not(target_arch = "wasm32"))]
const SHOT_INTERVAL: u64 = 45;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_hopper::{Game, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lane Hopper (native) starting...");

    let settings = Settings::load();
    let seed = env_or("LANE_HOPPER_SEED", clock_seed());
    let ticks = env_or("LANE_HOPPER_TICKS", DEFAULT_TICKS);

    let mut game = Game::initialize(&settings, seed);
    for _ in 0..ticks {
        for idx in 0..game.state().players.len() {
            if let Some(intent) = autopilot(game.state(), idx) {
                game.submit_intent(idx, intent);
            }
        }

        let snapshot = game.tick();
        for event in snapshot.events {
            match event {
                GameEvent::Hopped { .. } | GameEvent::Scored { .. } => {}
                _ => log::debug!("frame {}: {:?}", snapshot.frame_count, event),
            }
        }
        if snapshot.phase == GamePhase::GameOver {
            break;
        }
    }

    let state = game.state();
    log::info!(
        "Run finished: score {}, best {}, {} frames, phase {:?}",
        state.score,
        game.best_score(),
        state.frame_count,
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives `Game` directly; nothing to do here
}

#[cfg(not(target_arch = "wasm32"))]
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable {}={:?}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Hop forward when the next lane looks safe, otherwise sidestep or wait
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState, idx: usize) -> Option<Intent> {
    let player = state.players.get(idx)?;
    if !player.is_playing() || player.is_moving {
        return None;
    }
    if state.frame_count % SHOT_INTERVAL == 0 {
        return Some(Intent::Shoot);
    }

    let ahead = state.lanes.get(player.grid_y + 1)?;
    let center = player.center().x;
    if lane_is_safe(ahead, player.grid_x, center) {
        return Some(Intent::Move(Direction::Up));
    }
    // Walk around scenery; wait out traffic and closed crossings
    if ahead.is_grass() && !player.on_log {
        for (direction, column) in [
            (Direction::Left, player.grid_x - 1),
            (Direction::Right, player.grid_x + 1),
        ] {
            let here = state.lanes.get(player.grid_y);
            let free_here = here.is_some_and(|l| l.scenery_at(column).is_none());
            if (0..lane_hopper::consts::LANE_COLUMNS).contains(&column)
                && free_here
                && ahead.scenery_at(column).is_none()
            {
                return Some(Intent::Move(direction));
            }
        }
    }
    None
}

#[cfg(not(target_arch = "wasm32"))]
fn lane_is_safe(lane: &Lane, column: i32, center: f32) -> bool {
    // Clearance a hop needs against oncoming movers
    const MARGIN: f32 = 80.0;
    match &lane.kind {
        LaneKind::Grass => lane.scenery_at(column).is_none(),
        LaneKind::Road => lane
            .obstacles
            .iter()
            .filter(|o| !o.dead)
            .all(|o| center < o.x - MARGIN || center > o.x + o.width + MARGIN),
        LaneKind::Water(_) => lane
            .obstacles
            .iter()
            .any(|o| center > o.x + 10.0 && center < o.x + o.width - 10.0),
        LaneKind::Rail(signal) => signal.light == TrafficLight::Green,
    }
}
