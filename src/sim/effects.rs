//! Cosmetic effects: particles, floating texts, screen shake
//!
//! Nothing here feeds back into gameplay. Effects draw from their own RNG
//! stream so spawning more or fewer particles never changes a run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 512;

/// Effect colours (0xRRGGBB)
pub mod palette {
    pub const WHITE: u32 = 0xffffff;
    pub const HIT_RED: u32 = 0xef4444;
    pub const CONE_ORANGE: u32 = 0xf97316;
    pub const CHASER_ORANGE: u32 = 0xea580c;
    pub const CHICKEN_BODY: u32 = 0xfef08a;
    pub const WATER: u32 = 0x38bdf8;
    pub const WATER_SIDE: u32 = 0x0ea5e9;
    pub const TRAIN_SIDE: u32 = 0x991b1b;
    pub const TURRET: u32 = 0x000000;
    pub const SHIELD: u32 = 0x3b82f6;
    pub const SPEED: u32 = 0xf59e0b;
    pub const MULTIPLIER: u32 = 0xd946ef;
    pub const WHEEL: u32 = 0x171717;
    pub const FIRE: u32 = 0xfbbf24;
    pub const SMOKE: u32 = 0x94a3b8;
    /// Side colours of the car paint jobs, indexed by `paint`
    pub const CAR_SIDES: [u32; 6] = [0xb91c1c, 0x1d4ed8, 0xa16207, 0x7e22ce, 0xea580c, 0xdb2777];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Simple,
    Debris,
    Smoke,
    Fire,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub kind: ParticleKind,
    /// Added to `vel.y` each tick (negative pulls toward the camera's bottom)
    pub gravity: f32,
    /// Velocity multiplier per tick (1.0 = none)
    pub drag: f32,
    pub rotation: f32,
    pub spin: f32,
}

/// Short text popping up over the field ("SMASH!", "-1 HP", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub life: f32,
    pub max_life: f32,
    pub vy: f32,
}

/// All presentation-only effect state
#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub shake: f32,
    rng: Pcg32,
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            texts: Vec::new(),
            shake: 0.0,
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed_f00d),
        }
    }

    fn push(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
        }
    }

    /// Simple spark burst
    pub fn burst(&mut self, at: Vec2, color: u32, count: u32, speed: f32) {
        for _ in 0..count {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 5.0 * speed,
                (self.rng.random::<f32>() - 0.5) * 5.0 * speed + 2.0,
            );
            let particle = Particle {
                pos: at,
                vel,
                color,
                life: self.rng.random_range(20.0..40.0),
                max_life: 40.0,
                size: self.rng.random_range(2.0..5.0),
                kind: ParticleKind::Simple,
                gravity: -0.2,
                drag: 1.0,
                rotation: 0.0,
                spin: 0.0,
            };
            self.push(particle);
        }
    }

    /// Debris, wheels and smoke for a destroyed vehicle spanning `width` px
    pub fn vehicle_explosion(&mut self, x: f32, y: f32, color: u32, width: f32) {
        self.shake = 15.0;
        let width = width.max(1.0);
        for _ in 0..8 {
            let particle = Particle {
                pos: Vec2::new(x + self.rng.random_range(0.0..width), y + self.rng.random_range(0.0..TILE_SIZE)),
                vel: Vec2::new((self.rng.random::<f32>() - 0.5) * 15.0, self.rng.random_range(5.0..12.0)),
                color,
                life: self.rng.random_range(40.0..60.0),
                max_life: 60.0,
                size: self.rng.random_range(4.0..8.0),
                kind: ParticleKind::Debris,
                gravity: -0.4,
                drag: 0.98,
                rotation: self.rng.random_range(0.0..std::f32::consts::TAU),
                spin: (self.rng.random::<f32>() - 0.5) * 0.5,
            };
            self.push(particle);
        }
        for _ in 0..3 {
            let particle = Particle {
                pos: Vec2::new(x + self.rng.random_range(0.0..width), y),
                vel: Vec2::new((self.rng.random::<f32>() - 0.5) * 10.0, self.rng.random_range(8.0..15.0)),
                color: palette::WHEEL,
                life: self.rng.random_range(40.0..60.0),
                max_life: 60.0,
                size: self.rng.random_range(5.0..7.0),
                kind: ParticleKind::Debris,
                gravity: -0.4,
                drag: 0.99,
                rotation: self.rng.random_range(0.0..std::f32::consts::TAU),
                spin: (self.rng.random::<f32>() - 0.5) * 0.4,
            };
            self.push(particle);
        }
        for _ in 0..12 {
            let fire = self.rng.random_bool(0.4);
            let particle = Particle {
                pos: Vec2::new(x + self.rng.random_range(0.0..width), y + self.rng.random_range(0.0..TILE_SIZE)),
                vel: Vec2::new((self.rng.random::<f32>() - 0.5) * 2.0, self.rng.random_range(1.0..4.0)),
                color: if fire { palette::FIRE } else { palette::SMOKE },
                life: self.rng.random_range(30.0..50.0),
                max_life: 50.0,
                size: self.rng.random_range(6.0..12.0),
                kind: if fire { ParticleKind::Fire } else { ParticleKind::Smoke },
                gravity: 0.05,
                drag: 0.95,
                rotation: self.rng.random_range(0.0..std::f32::consts::TAU),
                spin: (self.rng.random::<f32>() - 0.5) * 0.1,
            };
            self.push(particle);
        }
    }

    pub fn text(&mut self, at: Vec2, text: &str, color: u32) {
        self.texts.push(FloatingText {
            pos: at,
            text: text.to_string(),
            color,
            life: 60.0,
            max_life: 60.0,
            vy: 1.0,
        });
    }

    /// Raise screen shake to at least `amount`
    pub fn shake(&mut self, amount: f32) {
        self.shake = self.shake.max(amount);
    }

    /// Advance all effects by one tick
    pub fn update(&mut self) {
        if self.shake > 0.0 {
            self.shake *= 0.9;
            if self.shake < 0.5 {
                self.shake = 0.0;
            }
        }

        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel *= p.drag;
            p.vel.y += p.gravity;
            p.rotation += p.spin;
            if matches!(p.kind, ParticleKind::Smoke | ParticleKind::Fire) {
                p.size *= 1.02;
            }
            p.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);

        for t in &mut self.texts {
            t.pos.y += t.vy;
            t.life -= 1.0;
        }
        self.texts.retain(|t| t.life > 0.0);
    }
}
