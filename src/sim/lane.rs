//! Lanes and everything that lives on them
//!
//! A lane is one terrain strip at an integer row. It is built once by the
//! generator and then mutated in place every tick (movers scroll, rail
//! signals cycle) until the window drops it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Span;
use super::player::PowerUpKind;
use super::state::EntityIds;
use crate::consts::*;
use crate::grid_to_px;

/// Movers this far past the downstream edge are recycled upstream
pub const RECYCLE_BUFFER: f32 = 300.0;
/// Gap range between water platforms (px)
pub const PLATFORM_GAP_MIN: f32 = 60.0;
pub const PLATFORM_GAP_MAX: f32 = 150.0;
/// Ticks the rail signal stays amber before the train arrives
pub const WARNING_TICKS: u32 = 60;

/// Water lane flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterKind {
    Log,
    Turtle,
    Lilypad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficLight {
    Green,
    Warning,
    Red,
}

/// Crossing signal of a rail lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailSignal {
    pub light: TrafficLight,
    pub timer: u32,
    pub green_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LaneKind {
    Grass,
    Road,
    Water(WaterKind),
    Rail(RailSignal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainVariant {
    Standard,
    Freight,
    Bullet,
}

impl TrainVariant {
    /// (speed px/tick, length px)
    pub fn profile(self) -> (f32, f32) {
        match self {
            TrainVariant::Standard => (40.0, FIELD_WIDTH * 2.0),
            TrainVariant::Freight => (20.0, FIELD_WIDTH * 3.5),
            TrainVariant::Bullet => (80.0, FIELD_WIDTH * 2.5),
        }
    }
}

/// Static grass-lane items occupying one grid column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scenery {
    Tree,
    Stone,
    Bush,
    Stump,
    /// Destroyed by hopping into it
    TrafficCone,
    /// Blocks like a tree; the generator never places one
    AbandonedBus,
    /// "Black cube": fires at the nearest player when the cooldown runs out
    Turret { cooldown: u32 },
}

/// Things that travel along a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mover {
    Car { paint: u8 },
    Truck { paint: u8 },
    Log,
    Turtle,
    Lilypad,
    Train(TrainVariant),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Scenery { column: i32, item: Scenery },
    Mover { speed: f32, body: Mover },
}

/// A hazard, platform or piece of scenery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge in pixels
    pub x: f32,
    pub width: f32,
    pub kind: ObstacleKind,
    /// Destroyed this tick; swept on the lane's next advance
    pub dead: bool,
}

impl Obstacle {
    pub fn scenery(id: u32, column: i32, item: Scenery) -> Self {
        Self {
            id,
            x: grid_to_px(column),
            width: TILE_SIZE,
            kind: ObstacleKind::Scenery { column, item },
            dead: false,
        }
    }

    pub fn mover(id: u32, x: f32, width: f32, speed: f32, body: Mover) -> Self {
        Self {
            id,
            x,
            width,
            kind: ObstacleKind::Mover { speed, body },
            dead: false,
        }
    }

    pub fn span(&self) -> Span {
        Span::from_origin(self.x, self.width)
    }

    pub fn column(&self) -> Option<i32> {
        match self.kind {
            ObstacleKind::Scenery { column, .. } => Some(column),
            ObstacleKind::Mover { .. } => None,
        }
    }

    pub fn speed(&self) -> f32 {
        match self.kind {
            ObstacleKind::Mover { speed, .. } => speed,
            ObstacleKind::Scenery { .. } => 0.0,
        }
    }

    pub fn is_turret(&self) -> bool {
        matches!(
            self.kind,
            ObstacleKind::Scenery { item: Scenery::Turret { .. }, .. }
        )
    }

    pub fn is_train(&self) -> bool {
        matches!(self.kind, ObstacleKind::Mover { body: Mover::Train(_), .. })
    }
}

/// A collectible resting on one grid column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub column: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Flower { tint: u8 },
    Pebble { tint: u8 },
    GrassTuft,
    /// Stepping on it makes the player slip in a random direction
    OilSpill { column: i32 },
}

/// Non-blocking ornament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: u32,
    pub x: f32,
    pub y_offset: f32,
    pub kind: DecorationKind,
}

/// One terrain strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub row: i32,
    pub kind: LaneKind,
    /// Scroll direction, +1 (rightward) or -1
    pub direction: i8,
    /// Base mover speed for this lane
    pub speed: f32,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub decorations: Vec<Decoration>,
}

impl Lane {
    /// Empty grass strip
    pub fn grass(row: i32) -> Self {
        Self {
            row,
            kind: LaneKind::Grass,
            direction: 1,
            speed: 0.0,
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            decorations: Vec::new(),
        }
    }

    pub fn sign(&self) -> f32 {
        self.direction as f32
    }

    /// Pixel y of this lane's near edge
    pub fn world_y(&self) -> f32 {
        grid_to_px(self.row)
    }

    pub fn is_grass(&self) -> bool {
        matches!(self.kind, LaneKind::Grass)
    }

    pub fn is_water(&self) -> bool {
        matches!(self.kind, LaneKind::Water(_))
    }

    pub fn light(&self) -> Option<TrafficLight> {
        match &self.kind {
            LaneKind::Rail(signal) => Some(signal.light),
            _ => None,
        }
    }

    /// Index of the scenery item occupying `column`
    pub fn scenery_at(&self, column: i32) -> Option<usize> {
        self.obstacles
            .iter()
            .position(|o| !o.dead && o.column() == Some(column))
    }

    /// The train currently on this rail lane
    pub fn train(&self) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.is_train() && !o.dead)
    }

    /// Remove and return the power-up on `column`
    pub fn take_power_up(&mut self, column: i32) -> Option<PowerUpKind> {
        let index = self.power_ups.iter().position(|p| p.column == column)?;
        Some(self.power_ups.remove(index).kind)
    }

    pub fn has_oil_at(&self, column: i32) -> bool {
        self.decorations
            .iter()
            .any(|d| d.kind == DecorationKind::OilSpill { column })
    }

    /// Advance movers and the rail signal by one tick.
    /// Returns true when a train has just been dispatched onto this lane.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, ids: &mut EntityIds) -> bool {
        match self.kind {
            LaneKind::Road | LaneKind::Water(_) => {
                self.obstacles.retain(|o| !o.dead);
                self.scroll_movers(rng);
                false
            }
            LaneKind::Rail(_) => self.advance_rail(rng, ids),
            LaneKind::Grass => false,
        }
    }

    fn scroll_movers<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let sign = self.sign();
        for i in 0..self.obstacles.len() {
            let step = self.obstacles[i].speed() * sign;
            self.obstacles[i].x += step;
            let width = self.obstacles[i].width;
            let x = self.obstacles[i].x;

            if self.direction > 0 && x > FIELD_WIDTH + RECYCLE_BUFFER {
                let min_x = self
                    .obstacles
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, o)| o.x)
                    .reduce(f32::min)
                    .unwrap_or(0.0);
                let offscreen = -width - rng.random_range(50.0..200.0);
                let behind = min_x - width - rng.random_range(PLATFORM_GAP_MIN..PLATFORM_GAP_MAX);
                self.obstacles[i].x = offscreen.min(behind);
            } else if self.direction < 0 && x < -RECYCLE_BUFFER {
                let max_x = self
                    .obstacles
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, o)| o.x + o.width)
                    .reduce(f32::max)
                    .unwrap_or(FIELD_WIDTH);
                let offscreen = FIELD_WIDTH + RECYCLE_BUFFER + rng.random_range(50.0..200.0);
                let behind = max_x + rng.random_range(PLATFORM_GAP_MIN..PLATFORM_GAP_MAX);
                self.obstacles[i].x = offscreen.max(behind);
            }
        }
    }

    fn advance_rail<R: Rng + ?Sized>(&mut self, rng: &mut R, ids: &mut EntityIds) -> bool {
        let sign = self.sign();
        let LaneKind::Rail(signal) = &mut self.kind else {
            return false;
        };
        signal.timer += 1;

        match signal.light {
            TrafficLight::Green => {
                if signal.timer > signal.green_duration {
                    signal.light = TrafficLight::Warning;
                    signal.timer = 0;
                }
                false
            }
            TrafficLight::Warning => {
                if signal.timer <= WARNING_TICKS {
                    return false;
                }
                signal.light = TrafficLight::Red;
                signal.timer = 0;

                let roll: f32 = rng.random();
                let variant = if roll < 0.25 {
                    TrainVariant::Freight
                } else if roll > 0.85 {
                    TrainVariant::Bullet
                } else {
                    TrainVariant::Standard
                };
                let (speed, length) = variant.profile();
                let x = if self.direction > 0 { -length } else { FIELD_WIDTH + length };
                self.obstacles
                    .push(Obstacle::mover(ids.next(), x, length, speed, Mover::Train(variant)));
                true
            }
            TrafficLight::Red => {
                self.obstacles.retain(|o| !o.dead);
                let cleared = match self.obstacles.first_mut() {
                    Some(train) => {
                        train.x += train.speed() * sign;
                        (sign > 0.0 && train.x > FIELD_WIDTH + 100.0)
                            || (sign < 0.0 && train.x + train.width < -100.0)
                    }
                    // Smashed by a shield: the crossing reopens at once
                    None => true,
                };
                if cleared {
                    self.obstacles.clear();
                    signal.light = TrafficLight::Green;
                    signal.timer = 0;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rail_lane(direction: i8, green: u32) -> Lane {
        Lane {
            kind: LaneKind::Rail(RailSignal {
                light: TrafficLight::Green,
                timer: 0,
                green_duration: green,
            }),
            direction,
            ..Lane::grass(5)
        }
    }

    #[test]
    fn test_rail_cycle_green_warning_red_green() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = EntityIds::default();
        let mut lane = rail_lane(1, 40);

        for _ in 0..41 {
            assert!(!lane.advance(&mut rng, &mut ids));
        }
        assert_eq!(lane.light(), Some(TrafficLight::Warning));
        assert!(lane.train().is_none());

        let mut dispatched = false;
        for _ in 0..61 {
            dispatched |= lane.advance(&mut rng, &mut ids);
        }
        assert!(dispatched);
        assert_eq!(lane.light(), Some(TrafficLight::Red));
        assert!(lane.train().is_some());

        for _ in 0..1000 {
            lane.advance(&mut rng, &mut ids);
            if lane.light() == Some(TrafficLight::Green) {
                break;
            }
        }
        assert_eq!(lane.light(), Some(TrafficLight::Green));
        assert!(lane.obstacles.is_empty());
    }

    #[test]
    fn test_smashed_train_reopens_crossing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = EntityIds::default();
        let mut lane = rail_lane(-1, 0);
        while lane.light() != Some(TrafficLight::Red) {
            lane.advance(&mut rng, &mut ids);
        }
        lane.obstacles[0].dead = true;
        lane.advance(&mut rng, &mut ids);
        assert_eq!(lane.light(), Some(TrafficLight::Green));
        assert!(lane.train().is_none());
    }

    #[test]
    fn test_road_movers_scroll_and_recycle() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ids = EntityIds::default();
        let mut lane = Lane {
            kind: LaneKind::Road,
            speed: 5.0,
            ..Lane::grass(4)
        };
        lane.obstacles.push(Obstacle::mover(1, FIELD_WIDTH + RECYCLE_BUFFER - 1.0, 80.0, 5.0, Mover::Car { paint: 0 }));
        lane.obstacles.push(Obstacle::mover(2, 100.0, 80.0, 5.0, Mover::Car { paint: 1 }));

        lane.advance(&mut rng, &mut ids);
        assert_eq!(lane.obstacles[1].x, 105.0);
        // Recycled behind the other car, off the left edge
        assert!(lane.obstacles[0].x + lane.obstacles[0].width < 0.0);
        assert!(lane.obstacles[0].x < lane.obstacles[1].x - PLATFORM_GAP_MIN);
    }

    #[test]
    fn test_dead_movers_are_swept() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = EntityIds::default();
        let mut lane = Lane {
            kind: LaneKind::Road,
            ..Lane::grass(4)
        };
        lane.obstacles.push(Obstacle::mover(1, 0.0, 80.0, 3.0, Mover::Truck { paint: 2 }));
        lane.obstacles[0].dead = true;
        lane.advance(&mut rng, &mut ids);
        assert!(lane.obstacles.is_empty());
    }

    #[test]
    fn test_power_up_taken_once() {
        let mut lane = Lane::grass(7);
        lane.power_ups.push(PowerUp { id: 1, kind: PowerUpKind::Speed, column: 3 });
        assert_eq!(lane.take_power_up(2), None);
        assert_eq!(lane.take_power_up(3), Some(PowerUpKind::Speed));
        assert_eq!(lane.take_power_up(3), None);
    }

    #[test]
    fn test_scenery_lookup_by_column() {
        let mut lane = Lane::grass(7);
        lane.obstacles.push(Obstacle::scenery(1, 4, Scenery::Tree));
        assert_eq!(lane.scenery_at(4), Some(0));
        assert_eq!(lane.scenery_at(5), None);
        lane.obstacles[0].dead = true;
        assert_eq!(lane.scenery_at(4), None);
    }
}
