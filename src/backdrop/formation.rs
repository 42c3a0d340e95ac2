use std::f32::consts::TAU;

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use rand::Rng;
use tracing::debug;

use super::config::BackdropConfig;
use super::easing::{ease_in_out_cubic, ease_out_quad};
use super::entity::{FormationSlot, Letter, random_point};
use crate::util::sample_range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationPhase {
    Idle,
    Forming,
    Holding,
    Dispersing,
}

impl FormationPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Forming => "forming",
            Self::Holding => "holding",
            Self::Dispersing => "dispersing",
        }
    }
}

/// Choreography that periodically pulls one letter set into the brand name.
#[derive(Clone, Debug, PartialEq)]
pub struct FormationCycle {
    phase: FormationPhase,
    active_set: Option<usize>,
    phase_started_at: f64,
    idle_since: Option<f64>,
    last_end: Option<f64>,
}

impl Default for FormationCycle {
    fn default() -> Self {
        Self {
            phase: FormationPhase::Idle,
            active_set: None,
            phase_started_at: 0.0,
            idle_since: None,
            last_end: None,
        }
    }
}

impl FormationCycle {
    pub fn phase(&self) -> FormationPhase {
        self.phase
    }

    pub fn active_set(&self) -> Option<usize> {
        self.active_set
    }

    /// Time the most recent formation finished dispersing.
    #[cfg(test)]
    pub fn last_end(&self) -> Option<f64> {
        self.last_end
    }

    /// Shifts every phase clock forward by `paused`, so time spent stopped does
    /// not count towards the current phase.
    pub(super) fn rebase(&mut self, paused: f64) {
        if paused <= 0.0 || !paused.is_finite() {
            return;
        }
        self.phase_started_at += paused;
        if let Some(idle_since) = self.idle_since.as_mut() {
            *idle_since += paused;
        }
    }

    /// Advances the cycle to `time`. Returns the new phase when it changed.
    pub(super) fn advance(
        &mut self,
        letters: &mut [Letter],
        config: &BackdropConfig,
        bounds: Vec2,
        time: f64,
        rng: &mut impl Rng,
    ) -> Option<FormationPhase> {
        let set_len = config.glyphs().len();
        let set_count = if set_len == 0 {
            0
        } else {
            letters.len() / set_len
        };
        let before = self.phase;

        match self.phase {
            FormationPhase::Idle => {
                let idle_since = *self.idle_since.get_or_insert(time);
                let delay = if self.last_end.is_none() {
                    config.formation.first_delay_ms
                } else {
                    config.formation.interval_ms
                };
                if set_count > 0 && time - idle_since > delay {
                    let set = rng.gen_range(0..set_count);
                    let targets = formation_targets(
                        set_len,
                        config.formation.letter_spacing,
                        bounds,
                        config.formation.y_fraction,
                    );
                    for (letter, target) in set_letters(letters, set, set_len).iter_mut().zip(targets) {
                        letter.slot = Some(FormationSlot {
                            target,
                            start: letter.motion.position,
                            start_rotation: letter.motion.rotation,
                            disperse_target: target,
                            disperse_velocity: Vec2::ZERO,
                        });
                        letter.motion.velocity = Vec2::ZERO;
                    }
                    self.active_set = Some(set);
                    self.enter(FormationPhase::Forming, time);
                }
            }
            FormationPhase::Forming => {
                let Some(set) = self.active_set else {
                    self.reset_to_idle(time);
                    return Some(self.phase);
                };
                let progress = phase_progress(time - self.phase_started_at, config.formation.forming_ms);
                let eased = ease_in_out_cubic(progress);
                let done = progress >= 1.0;

                for letter in set_letters(letters, set, set_len) {
                    let Some(slot) = letter.slot else {
                        continue;
                    };
                    if done {
                        letter.motion.position = slot.target;
                        letter.motion.rotation = 0.0;
                        letter.opacity_boost = Letter::MAX_OPACITY_BOOST;
                    } else {
                        letter.motion.position = slot.start + (slot.target - slot.start) * eased;
                        letter.motion.rotation = slot.start_rotation * (1.0 - eased);
                        letter.opacity_boost = 1.0 + eased * (Letter::MAX_OPACITY_BOOST - 1.0);
                    }
                }

                if done {
                    self.enter(FormationPhase::Holding, time);
                }
            }
            FormationPhase::Holding => {
                let Some(set) = self.active_set else {
                    self.reset_to_idle(time);
                    return Some(self.phase);
                };
                let elapsed = time - self.phase_started_at;

                if elapsed > config.formation.hold_ms {
                    for letter in set_letters(letters, set, set_len) {
                        let Some(slot) = letter.slot.as_mut() else {
                            continue;
                        };
                        slot.start = letter.motion.position;
                        slot.disperse_target = random_point(rng, bounds);
                        slot.disperse_velocity =
                            dispersal_velocity(rng, config, letter.motion.position, slot.disperse_target);
                    }
                    self.enter(FormationPhase::Dispersing, time);
                } else {
                    let t = time as f32;
                    for (index, letter) in set_letters(letters, set, set_len).iter_mut().enumerate() {
                        let Some(slot) = letter.slot else {
                            continue;
                        };
                        let offset = index as f32 * 0.5;
                        letter.motion.position = pos2(
                            slot.target.x + (t * 0.001 + offset).sin() * 3.0,
                            slot.target.y + (t * 0.0015 + offset).cos() * 2.0,
                        );
                        letter.motion.rotation = (t * 0.0008 + index as f32).sin() * 0.03;
                        letter.opacity_boost = Letter::MAX_OPACITY_BOOST;
                    }
                }
            }
            FormationPhase::Dispersing => {
                let Some(set) = self.active_set else {
                    self.reset_to_idle(time);
                    return Some(self.phase);
                };
                let progress =
                    phase_progress(time - self.phase_started_at, config.formation.disperse_ms);
                let eased = ease_out_quad(progress);
                let done = progress >= 1.0;

                for letter in set_letters(letters, set, set_len) {
                    let Some(slot) = letter.slot else {
                        continue;
                    };
                    if done {
                        letter.slot = None;
                        letter.opacity_boost = 1.0;
                        letter.motion.velocity = slot.disperse_velocity;
                    } else {
                        letter.motion.velocity = slot.disperse_velocity * eased;
                        letter.opacity_boost =
                            Letter::MAX_OPACITY_BOOST - eased * (Letter::MAX_OPACITY_BOOST - 1.0);
                    }
                }

                if done {
                    self.last_end = Some(time);
                    self.reset_to_idle(time);
                }
            }
        }

        (self.phase != before).then(|| {
            debug!(phase = self.phase.label(), set = ?self.active_set, time, "formation phase changed");
            self.phase
        })
    }

    fn enter(&mut self, phase: FormationPhase, time: f64) {
        self.phase = phase;
        self.phase_started_at = time;
    }

    fn reset_to_idle(&mut self, time: f64) {
        self.active_set = None;
        self.idle_since = Some(time);
        self.enter(FormationPhase::Idle, time);
    }
}

/// Evenly spaced targets centred horizontally at `y_fraction` of the height.
pub fn formation_targets(count: usize, spacing: f32, bounds: Vec2, y_fraction: f32) -> Vec<Pos2> {
    let total_width = count.saturating_sub(1) as f32 * spacing;
    let start_x = (bounds.x - total_width) / 2.0;
    let y = bounds.y * y_fraction;
    (0..count)
        .map(|index| pos2(start_x + index as f32 * spacing, y))
        .collect()
}

fn set_letters(letters: &mut [Letter], set: usize, set_len: usize) -> &mut [Letter] {
    let start = (set * set_len).min(letters.len());
    let end = (start + set_len).min(letters.len());
    &mut letters[start..end]
}

fn phase_progress(elapsed: f64, duration: f64) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0) as f32
}

/// Cruising-speed velocity aimed from `from` at `target`.
fn dispersal_velocity(rng: &mut impl Rng, config: &BackdropConfig, from: Pos2, target: Pos2) -> Vec2 {
    let speed = sample_range(rng, config.speed.min, config.speed.max);
    let delta = target - from;
    let direction = if delta.length_sq() > 1e-6 {
        delta.normalized()
    } else {
        let angle = rng.gen_range(0.0..TAU);
        vec2(angle.cos(), angle.sin())
    };
    direction * speed
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn targets_are_centred_and_evenly_spaced() {
        let targets = formation_targets(8, 55.0, vec2(1000.0, 500.0), 0.2);
        assert_eq!(targets.len(), 8);
        assert_eq!(targets[0], pos2(307.5, 100.0));
        assert_eq!(targets[7], pos2(692.5, 100.0));
        for pair in targets.windows(2) {
            assert!((pair[1].x - pair[0].x - 55.0).abs() < 1e-4);
        }
    }

    #[test]
    fn single_target_sits_in_the_middle() {
        assert_eq!(
            formation_targets(1, 55.0, vec2(400.0, 300.0), 0.5),
            vec![pos2(200.0, 150.0)]
        );
    }

    #[test]
    fn rebase_moves_phase_clocks_forward() {
        let mut cycle = FormationCycle {
            phase: FormationPhase::Holding,
            active_set: Some(1),
            phase_started_at: 100.0,
            idle_since: Some(40.0),
            last_end: Some(40.0),
        };
        cycle.rebase(500.0);
        assert_eq!(cycle.phase_started_at, 600.0);
        assert_eq!(cycle.idle_since, Some(540.0));
        assert_eq!(cycle.last_end, Some(40.0));

        cycle.rebase(-10.0);
        cycle.rebase(f64::NAN);
        assert_eq!(cycle.phase_started_at, 600.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        assert_eq!(phase_progress(0.0, 0.0), 1.0);
        assert_eq!(phase_progress(250.0, 1000.0), 0.25);
        assert_eq!(phase_progress(5000.0, 1000.0), 1.0);
    }
}
