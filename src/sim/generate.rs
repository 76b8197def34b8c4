//! Lane generator
//!
//! Builds one terrain strip at a time. Hazard density and speed scale with
//! distance and the difficulty tier, but every lane stays crossable: water
//! gaps are bounded and road traffic is capped.

use rand::Rng;

use super::lane::*;
use super::player::PowerUpKind;
use super::state::EntityIds;
use crate::consts::*;
use crate::grid_to_px;
use crate::settings::DifficultyTier;

/// Flower tints available to grass decorations
pub const FLOWER_TINTS: u8 = 5;
/// Pebble tints available to grass decorations
pub const PEBBLE_TINTS: u8 = 3;
/// Car paint jobs
pub const CAR_PAINTS: u8 = 6;

/// Distance-derived difficulty knobs for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyCurve {
    /// Density knob in [0, 1]
    pub difficulty: f32,
    /// Added to every mover's base speed; grows without bound
    pub speed_scaling: f32,
}

impl DifficultyCurve {
    pub fn at(row: i32, tier: DifficultyTier) -> Self {
        let mult = tier.multiplier();
        let row = row.max(0) as f32;
        Self {
            difficulty: (row / (150.0 / mult)).min(1.0),
            speed_scaling: row * 0.02 * mult,
        }
    }
}

/// Generate the lane for `row`
pub fn generate_lane<R: Rng + ?Sized>(
    row: i32,
    tier: DifficultyTier,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Lane {
    if row < SAFE_START_ROWS {
        return Lane::grass(row);
    }

    let curve = DifficultyCurve::at(row, tier);
    let d = curve.difficulty;

    let grass_thresh = (0.25 - d * 0.20).max(0.05);
    let road_thresh = grass_thresh + 0.35 + d * 0.10;
    let water_thresh = road_thresh + 0.20 + d * 0.15;

    let roll: f32 = rng.random();
    let direction: i8 = if rng.random_bool(0.5) { 1 } else { -1 };
    let base_speed = rng.random_range(2.0..4.5) + curve.speed_scaling;

    let mut lane = Lane {
        direction,
        speed: base_speed,
        ..Lane::grass(row)
    };

    if roll < grass_thresh {
        fill_grass(&mut lane, rng, ids);
    } else if roll < road_thresh {
        fill_road(&mut lane, d, rng, ids);
    } else if roll < water_thresh {
        fill_water(&mut lane, rng, ids);
    } else {
        lane.kind = LaneKind::Rail(RailSignal {
            light: TrafficLight::Green,
            timer: 0,
            green_duration: (200.0 - d * 120.0).max(40.0) as u32,
        });
    }

    log::debug!("Generated row {} as {:?}", row, lane.kind);
    lane
}

fn fill_grass<R: Rng + ?Sized>(lane: &mut Lane, rng: &mut R, ids: &mut EntityIds) {
    for column in 0..LANE_COLUMNS {
        if rng.random_bool(0.15) {
            let roll: f32 = rng.random();
            let item = if roll < 0.45 {
                Scenery::Tree
            } else if roll < 0.65 {
                Scenery::Stone
            } else if roll < 0.8 {
                Scenery::Bush
            } else if roll < 0.9 {
                Scenery::Stump
            } else if roll < 0.95 {
                Scenery::TrafficCone
            } else {
                Scenery::Turret {
                    cooldown: rng.random_range(60..180),
                }
            };
            lane.obstacles.push(Obstacle::scenery(ids.next(), column, item));
            continue;
        }

        if rng.random_bool(0.02) {
            let roll: f32 = rng.random();
            let kind = if roll < 0.4 {
                PowerUpKind::Speed
            } else if roll < 0.7 {
                PowerUpKind::Multiplier
            } else {
                PowerUpKind::Shield
            };
            lane.power_ups.push(PowerUp { id: ids.next(), kind, column });
            continue;
        }

        if !rng.random_bool(0.4) {
            continue;
        }
        let roll: f32 = rng.random();
        let kind = if roll < 0.3 {
            DecorationKind::Flower { tint: rng.random_range(0..FLOWER_TINTS) }
        } else if roll < 0.5 {
            DecorationKind::Pebble { tint: rng.random_range(0..PEBBLE_TINTS) }
        } else {
            DecorationKind::GrassTuft
        };
        push_ornament(lane, column, kind, rng, ids);

        let pebble = matches!(kind, DecorationKind::Pebble { .. });
        if !pebble && rng.random_bool(0.3) {
            let second = match kind {
                DecorationKind::Flower { .. } => DecorationKind::Flower {
                    tint: rng.random_range(0..FLOWER_TINTS),
                },
                other => other,
            };
            push_ornament(lane, column, second, rng, ids);
        }
    }
}

fn push_ornament<R: Rng + ?Sized>(
    lane: &mut Lane,
    column: i32,
    kind: DecorationKind,
    rng: &mut R,
    ids: &mut EntityIds,
) {
    lane.decorations.push(Decoration {
        id: ids.next(),
        x: grid_to_px(column) + rng.random_range(5.0..TILE_SIZE - 5.0),
        y_offset: rng.random_range(5.0..TILE_SIZE - 5.0),
        kind,
    });
}

fn fill_road<R: Rng + ?Sized>(lane: &mut Lane, d: f32, rng: &mut R, ids: &mut EntityIds) {
    lane.kind = LaneKind::Road;

    if rng.random_bool(0.3) {
        let column = rng.random_range(0..LANE_COLUMNS);
        lane.decorations.push(Decoration {
            id: ids.next(),
            x: grid_to_px(column),
            y_offset: 0.0,
            kind: DecorationKind::OilSpill { column },
        });
    }

    let max_cars = (4 + (d * 5.0).floor() as usize).min(8);
    let count = rng.random_range(3..max_cars);
    if rng.random_bool(0.3) {
        lane.speed *= 1.5;
    }
    let min_spacing = (250.0 - d * 120.0).max(150.0);
    let max_spacing = (400.0 - d * 180.0).max(250.0);

    let mut x = rng.random_range(0.0..200.0);
    for _ in 0..count {
        let truck = rng.random_bool(0.25);
        x += rng.random_range(min_spacing..max_spacing);
        if x > FIELD_WIDTH + 200.0 {
            break;
        }
        let paint = rng.random_range(0..CAR_PAINTS);
        let (width, body) = if truck {
            (TILE_SIZE * 3.0, Mover::Truck { paint })
        } else {
            (TILE_SIZE * 2.0, Mover::Car { paint })
        };
        lane.obstacles
            .push(Obstacle::mover(ids.next(), x, width, lane.speed, body));
    }
}

fn fill_water<R: Rng + ?Sized>(lane: &mut Lane, rng: &mut R, ids: &mut EntityIds) {
    let roll: f32 = rng.random();
    let subtype = if roll < 0.15 {
        WaterKind::Lilypad
    } else if roll < 0.35 {
        WaterKind::Turtle
    } else {
        WaterKind::Log
    };
    lane.kind = LaneKind::Water(subtype);

    if subtype == WaterKind::Lilypad {
        lane.speed = 0.0;
        let mut gap = 0;
        for column in 0..LANE_COLUMNS {
            // Never leave more than two open columns in a row
            let spawn = rng.random_bool(0.3) || gap >= 2;
            if spawn {
                lane.obstacles.push(Obstacle::mover(
                    ids.next(),
                    grid_to_px(column),
                    TILE_SIZE,
                    0.0,
                    Mover::Lilypad,
                ));
                gap = 0;
            } else {
                gap += 1;
            }
        }
        return;
    }

    lane.speed *= 0.8;
    let mut x = -rng.random_range(50.0..200.0);
    while x < FIELD_WIDTH + 200.0 {
        let (width, body) = match subtype {
            WaterKind::Turtle => (rng.random_range(2..4) as f32 * TILE_SIZE, Mover::Turtle),
            _ => {
                let size: f32 = rng.random();
                let tiles = if size < 0.3 {
                    3.0
                } else if size < 0.7 {
                    4.0
                } else {
                    5.0
                };
                (tiles * TILE_SIZE, Mover::Log)
            }
        };
        lane.obstacles
            .push(Obstacle::mover(ids.next(), x, width, lane.speed, body));
        x += width + rng.random_range(PLATFORM_GAP_MIN..PLATFORM_GAP_MAX);
    }
}
