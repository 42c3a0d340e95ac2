use eframe::egui::{Pos2, Vec2};

use super::config::AttractionConfig;
use super::entity::Motion;

/// Pulls `motion` towards the pointer when it is within the attraction radius.
///
/// Returns `false` when the pointer is absent or out of reach.
pub(super) fn attract(motion: &mut Motion, pointer: Option<Pos2>, config: &AttractionConfig) -> bool {
    let Some(pointer) = pointer else {
        return false;
    };

    let delta = pointer - motion.position;
    let distance = delta.length();
    if distance >= config.radius || distance <= 0.0 {
        return false;
    }

    let force = (1.0 - distance / config.radius) * config.strength;
    motion.velocity += delta / distance * force;

    let speed = motion.speed();
    if speed > config.max_speed {
        motion.velocity *= config.max_speed / speed;
    }
    true
}

/// Bleeds off speed left over from pointer interaction.
pub(super) fn damp(motion: &mut Motion, cruising_speed: f32, damping: f32) {
    if motion.speed() > cruising_speed * 1.5 {
        motion.velocity *= damping;
    }
}

pub(super) fn integrate(motion: &mut Motion) {
    motion.position += motion.velocity;
    motion.rotation += motion.rotation_speed;
}

/// Toroidal wrap: leaving one edge by more than half the element's size
/// re-enters from the opposite edge.
pub(super) fn wrap(motion: &mut Motion, bounds: Vec2) {
    let padding = motion.half_size();
    let position = &mut motion.position;

    if position.x < -padding {
        position.x = bounds.x + padding;
    } else if position.x > bounds.x + padding {
        position.x = -padding;
    }

    if position.y < -padding {
        position.y = bounds.y + padding;
    } else if position.y > bounds.y + padding {
        position.y = -padding;
    }
}
