use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("`{field}` must be a finite, non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("damping must be within (0, 1), got {0}")]
    Damping(f32),
    #[error("brand text must contain at least one glyph")]
    EmptyBrand,
    #[error("at least one letter set is required")]
    NoLetterSets,
    #[error("formation vertical position must be within 0..=1, got {0}")]
    VerticalFraction(f32),
    #[error("`{field}` range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttractionConfig {
    pub radius: f32,
    pub strength: f32,
    pub max_speed: f32,
}

impl Default for AttractionConfig {
    fn default() -> Self {
        Self {
            radius: 200.0,
            strength: 0.02,
            max_speed: 2.0,
        }
    }
}

/// Formation timings are in milliseconds of frame clock.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub interval_ms: f64,
    pub hold_ms: f64,
    pub forming_ms: f64,
    pub disperse_ms: f64,
    pub first_delay_ms: f64,
    pub letter_spacing: f32,
    pub y_fraction: f32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 90_000.0,
            hold_ms: 5_000.0,
            forming_ms: 5_000.0,
            disperse_ms: 2_000.0,
            first_delay_ms: 10_000.0,
            letter_spacing: 55.0,
            y_fraction: 0.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub shape_count: usize,
    pub connection_distance: f32,
    /// Number of disjoint copies of the brand letters floating around.
    pub letter_sets: usize,
    pub brand: String,
    pub speed: Span,
    pub rotation_speed: Span,
    pub shape_size: Span,
    pub letter_size: Span,
    pub damping: f32,
    pub attraction: AttractionConfig,
    pub formation: FormationConfig,
    pub draw_background: bool,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            shape_count: 25,
            connection_distance: 150.0,
            letter_sets: 4,
            brand: "CYANVIEW".to_owned(),
            speed: Span::new(0.15, 0.4),
            rotation_speed: Span::new(0.001, 0.003),
            shape_size: Span::new(15.0, 55.0),
            letter_size: Span::new(35.0, 70.0),
            damping: 0.98,
            attraction: AttractionConfig::default(),
            formation: FormationConfig::default(),
            draw_background: true,
        }
    }
}

impl BackdropConfig {
    /// Reads overrides from a JSON file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read backdrop config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid backdrop config {}", path.display()))?;
        Ok(config)
    }

    pub fn glyphs(&self) -> Vec<char> {
        self.brand.chars().filter(|glyph| !glyph.is_whitespace()).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("formation.interval_ms", self.formation.interval_ms),
            ("formation.hold_ms", self.formation.hold_ms),
            ("formation.forming_ms", self.formation.forming_ms),
            ("formation.disperse_ms", self.formation.disperse_ms),
            ("connection_distance", f64::from(self.connection_distance)),
            ("attraction.radius", f64::from(self.attraction.radius)),
            ("attraction.max_speed", f64::from(self.attraction.max_speed)),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        let first_delay = self.formation.first_delay_ms;
        if first_delay < 0.0 || !first_delay.is_finite() {
            return Err(ConfigError::Negative {
                field: "formation.first_delay_ms",
                value: first_delay,
            });
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::Damping(self.damping));
        }

        if self.glyphs().is_empty() {
            return Err(ConfigError::EmptyBrand);
        }
        if self.letter_sets == 0 {
            return Err(ConfigError::NoLetterSets);
        }
        if !(0.0..=1.0).contains(&self.formation.y_fraction) {
            return Err(ConfigError::VerticalFraction(self.formation.y_fraction));
        }

        let spans = [
            ("speed", self.speed),
            ("rotation_speed", self.rotation_speed),
            ("shape_size", self.shape_size),
            ("letter_size", self.letter_size),
        ];
        for (field, span) in spans {
            if span.min > span.max {
                return Err(ConfigError::InvertedRange {
                    field,
                    min: span.min,
                    max: span.max,
                });
            }
        }

        Ok(())
    }
}
