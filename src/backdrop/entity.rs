use std::f32::consts::TAU;

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use rand::Rng;

use super::config::BackdropConfig;
use crate::util::sample_range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Cyan,
    White,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outline {
    Hexagon,
    Pentagon,
    Triangle,
    Circle,
}

impl Outline {
    const ALL: [Self; 4] = [Self::Hexagon, Self::Pentagon, Self::Triangle, Self::Circle];

    /// Polygon side count; `None` for circles.
    pub fn sides(self) -> Option<usize> {
        match self {
            Self::Hexagon => Some(6),
            Self::Pentagon => Some(5),
            Self::Triangle => Some(3),
            Self::Circle => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub position: Pos2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub size: f32,
}

impl Motion {
    fn spawn(rng: &mut impl Rng, config: &BackdropConfig, bounds: Vec2, size: f32, spin: f32) -> Self {
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            position: random_point(rng, bounds),
            velocity: random_velocity(rng, config),
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: sample_range(rng, config.rotation_speed.min, config.rotation_speed.max)
                * spin
                * direction,
            size,
        }
    }

    pub fn half_size(&self) -> f32 {
        self.size * 0.5
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Sinusoid `amount * sin(time * speed + offset)` with time in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub offset: f32,
    pub speed: f32,
    pub amount: f32,
}

impl Wave {
    fn random(rng: &mut impl Rng, speed_min: f32, speed_span: f32, amount: f32) -> Self {
        Self {
            offset: rng.gen_range(0.0..TAU),
            speed: speed_min + rng.r#gen::<f32>() * speed_span,
            amount,
        }
    }

    pub fn sample(&self, time: f64) -> f32 {
        ((time * f64::from(self.speed) + f64::from(self.offset)).sin() as f32) * self.amount
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub motion: Motion,
    pub outline: Outline,
    pub tint: Tint,
    pub base_opacity: f32,
    pub pulse: Wave,
    pub opacity: f32,
}

impl Shape {
    pub(super) fn spawn(rng: &mut impl Rng, config: &BackdropConfig, bounds: Vec2) -> Self {
        let size = sample_range(rng, config.shape_size.min, config.shape_size.max);
        Self {
            motion: Motion::spawn(rng, config, bounds, size, 1.0),
            outline: Outline::ALL[rng.gen_range(0..Outline::ALL.len())],
            tint: if rng.gen_bool(0.7) { Tint::Cyan } else { Tint::White },
            base_opacity: 0.1 + rng.r#gen::<f32>() * 0.2,
            pulse: Wave::random(rng, 0.002, 0.004, 0.1),
            opacity: 0.15,
        }
    }

    pub(super) fn refresh_pulse(&mut self, time: f64) {
        self.opacity = self.base_opacity + self.pulse.sample(time);
    }
}

/// Where a letter is headed while it takes part in a formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationSlot {
    pub target: Pos2,
    /// Snapshot taken at the start of the current phase.
    pub start: Pos2,
    pub start_rotation: f32,
    pub disperse_target: Pos2,
    pub disperse_velocity: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Letter {
    pub motion: Motion,
    pub glyph: char,
    pub tint: Tint,
    pub base_opacity: f32,
    pub pulse: Wave,
    pub breathing: Wave,
    pub opacity: f32,
    pub scale: f32,
    pub opacity_boost: f32,
    pub slot: Option<FormationSlot>,
}

impl Letter {
    pub const MAX_OPACITY_BOOST: f32 = 2.5;

    pub(super) fn spawn(
        rng: &mut impl Rng,
        config: &BackdropConfig,
        bounds: Vec2,
        glyph: char,
    ) -> Self {
        let size = sample_range(rng, config.letter_size.min, config.letter_size.max);
        let scale_amount = 0.1 + rng.r#gen::<f32>() * 0.1;
        Self {
            motion: Motion::spawn(rng, config, bounds, size, 0.3),
            glyph,
            tint: if rng.gen_bool(0.8) { Tint::Cyan } else { Tint::White },
            base_opacity: 0.15 + rng.r#gen::<f32>() * 0.25,
            pulse: Wave::random(rng, 0.001, 0.002, 0.1),
            breathing: Wave::random(rng, 0.0015, 0.002, scale_amount),
            opacity: 0.2,
            scale: 1.0,
            opacity_boost: 1.0,
            slot: None,
        }
    }

    pub fn in_formation(&self) -> bool {
        self.slot.is_some()
    }

    /// How far the formation highlight has ramped, in `0.0..=1.0`.
    pub fn boost_level(&self) -> f32 {
        ((self.opacity_boost - 1.0) / (Self::MAX_OPACITY_BOOST - 1.0)).clamp(0.0, 1.0)
    }

    pub(super) fn refresh_pulse(&mut self, time: f64) {
        self.opacity = self.base_opacity + self.pulse.sample(time);
        self.scale = 1.0 + self.breathing.sample(time);
    }
}

pub(super) fn random_point(rng: &mut impl Rng, bounds: Vec2) -> Pos2 {
    pos2(
        rng.r#gen::<f32>() * bounds.x.max(0.0),
        rng.r#gen::<f32>() * bounds.y.max(0.0),
    )
}

pub(super) fn random_velocity(rng: &mut impl Rng, config: &BackdropConfig) -> Vec2 {
    let speed = sample_range(rng, config.speed.min, config.speed.max);
    let angle = rng.gen_range(0.0..TAU);
    vec2(angle.cos(), angle.sin()) * speed
}
