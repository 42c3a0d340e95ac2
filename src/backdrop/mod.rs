mod config;
mod easing;
mod entity;
mod formation;
mod kinematics;

use eframe::egui::{Pos2, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

pub use config::BackdropConfig;
pub use entity::{Letter, Shape, Tint};
pub use formation::FormationPhase;

use formation::FormationCycle;

use crate::util::sample_range;

/// A line between two nearby elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub from: Pos2,
    pub to: Pos2,
    pub opacity: f32,
}

/// Decorative field of drifting shapes and brand letters.
///
/// Time is the frame clock in milliseconds. The field only advances while
/// running; the host stops scheduling frames once [`ParticleField::stop`] is called.
pub struct ParticleField {
    config: BackdropConfig,
    bounds: Vec2,
    shapes: Vec<Shape>,
    letters: Vec<Letter>,
    formation: FormationCycle,
    pointer: Option<Pos2>,
    running: bool,
    /// Frame time of the last update that ran.
    last_update: Option<f64>,
    /// Set by `start()` after a stop; the next update skips the paused span.
    resumed: bool,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: BackdropConfig, bounds: Vec2) -> Self {
        Self::with_rng(config, bounds, StdRng::from_entropy())
    }

    pub fn with_seed(config: BackdropConfig, bounds: Vec2, seed: u64) -> Self {
        Self::with_rng(config, bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: BackdropConfig, bounds: Vec2, mut rng: StdRng) -> Self {
        let shapes = (0..config.shape_count)
            .map(|_| Shape::spawn(&mut rng, &config, bounds))
            .collect::<Vec<_>>();

        let glyphs = config.glyphs();
        let mut letters = Vec::with_capacity(glyphs.len() * config.letter_sets);
        for _ in 0..config.letter_sets {
            for &glyph in &glyphs {
                letters.push(Letter::spawn(&mut rng, &config, bounds, glyph));
            }
        }

        Self {
            config,
            bounds,
            shapes,
            letters,
            formation: FormationCycle::default(),
            pointer: None,
            running: false,
            last_update: None,
            resumed: false,
            rng,
        }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn formation(&self) -> &FormationCycle {
        &self.formation
    }

    pub fn element_count(&self) -> usize {
        self.shapes.len() + self.letters.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resumes updates. Formation timing picks up where it was paused.
    pub fn start(&mut self) {
        if !self.running {
            info!(elements = self.element_count(), "backdrop animation started");
            self.resumed = self.last_update.is_some();
        }
        self.running = true;
    }

    /// Halts updates and forgets the pointer; no further frames are needed.
    pub fn stop(&mut self) {
        if self.running {
            info!("backdrop animation stopped");
        }
        self.running = false;
        self.pointer = None;
    }

    /// Returns `true` when the drawable size actually changed.
    pub fn resize(&mut self, bounds: Vec2) -> bool {
        if self.bounds == bounds {
            return false;
        }
        debug!(width = bounds.x, height = bounds.y, "backdrop resized");
        self.bounds = bounds;
        true
    }

    pub fn pointer_moved(&mut self, position: Pos2) {
        if self.running {
            self.pointer = Some(position);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    #[cfg(test)]
    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    /// Advances one frame. Returns the new formation phase when it changed.
    pub fn update(&mut self, time: f64) -> Option<FormationPhase> {
        if !self.running {
            return None;
        }
        if std::mem::take(&mut self.resumed)
            && let Some(last) = self.last_update
        {
            debug!(paused_ms = time - last, "backdrop resumed");
            self.formation.rebase(time - last);
        }
        self.last_update = Some(time);

        let pointer = self.pointer;
        let bounds = self.bounds;
        let config = &self.config;
        let rng = &mut self.rng;

        for shape in &mut self.shapes {
            if !kinematics::attract(&mut shape.motion, pointer, &config.attraction) {
                let cruising = sample_range(rng, config.speed.min, config.speed.max);
                kinematics::damp(&mut shape.motion, cruising, config.damping);
            }
            kinematics::integrate(&mut shape.motion);
            kinematics::wrap(&mut shape.motion, bounds);
            shape.refresh_pulse(time);
        }

        for letter in &mut self.letters {
            if !letter.in_formation()
                && !kinematics::attract(&mut letter.motion, pointer, &config.attraction)
            {
                let cruising = sample_range(rng, config.speed.min, config.speed.max);
                kinematics::damp(&mut letter.motion, cruising, config.damping);
            }
            kinematics::integrate(&mut letter.motion);
            kinematics::wrap(&mut letter.motion, bounds);
            letter.refresh_pulse(time);
        }

        self.formation
            .advance(&mut self.letters, &self.config, bounds, time, &mut self.rng)
    }

    /// Pairs of elements closer than the connection distance. Quadratic in the
    /// element count, which stays in the tens.
    pub fn connections(&self) -> Vec<Connection> {
        let threshold = self.config.connection_distance;
        let positions = self
            .shapes
            .iter()
            .map(|shape| shape.motion.position)
            .chain(self.letters.iter().map(|letter| letter.motion.position))
            .collect::<Vec<_>>();

        let mut connections = Vec::new();
        for (index, &from) in positions.iter().enumerate() {
            for &to in &positions[index + 1..] {
                let distance = from.distance(to);
                if distance < threshold {
                    connections.push(Connection {
                        from,
                        to,
                        opacity: (1.0 - distance / threshold) * 0.15,
                    });
                }
            }
        }
        connections
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::*;

    const BOUNDS: Vec2 = vec2(1280.0, 720.0);

    fn field() -> ParticleField {
        let mut field = ParticleField::with_seed(BackdropConfig::default(), BOUNDS, 42);
        field.start();
        field
    }

    fn active_letters(field: &ParticleField) -> Vec<&Letter> {
        field.letters().iter().filter(|letter| letter.in_formation()).collect()
    }

    #[test]
    fn spawns_shapes_and_letter_sets() {
        let field = field();
        assert_eq!(field.shapes().len(), 25);
        assert_eq!(field.letters().len(), 32);
        assert_eq!(field.element_count(), 57);

        let first_set = field.letters()[..8].iter().map(|letter| letter.glyph).collect::<String>();
        assert_eq!(first_set, "CYANVIEW");
        assert!(field.letters().iter().all(|letter| !letter.in_formation()));
    }

    #[test]
    fn formation_cycle_follows_the_configured_timeline() {
        let mut field = field();
        let config = field.config().formation;

        assert_eq!(field.update(0.0), None);
        assert_eq!(field.formation().phase(), FormationPhase::Idle);

        assert_eq!(field.update(config.first_delay_ms - 1.0), None);

        let forming_at = config.first_delay_ms + 1.0;
        assert_eq!(field.update(forming_at), Some(FormationPhase::Forming));
        assert_eq!(active_letters(&field).len(), 8);
        assert!(field.formation().active_set().is_some());

        let holding_at = forming_at + config.forming_ms;
        assert_eq!(field.update(holding_at - 1.0), None);
        assert_eq!(field.update(holding_at), Some(FormationPhase::Holding));

        let dispersing_at = holding_at + config.hold_ms + 1.0;
        assert_eq!(field.update(dispersing_at - 2.0), None);
        assert_eq!(field.update(dispersing_at), Some(FormationPhase::Dispersing));

        let idle_at = dispersing_at + config.disperse_ms;
        assert_eq!(field.update(idle_at), Some(FormationPhase::Idle));
        assert_eq!(field.formation().last_end(), Some(idle_at));
        assert!(active_letters(&field).is_empty());

        assert_eq!(field.update(idle_at + config.first_delay_ms + 1.0), None);
        assert_eq!(
            field.update(idle_at + config.interval_ms + 1.0),
            Some(FormationPhase::Forming)
        );
    }

    #[test]
    fn letters_snap_to_targets_when_forming_completes() {
        let mut field = field();
        let config = field.config().formation;
        field.update(0.0);
        let forming_at = config.first_delay_ms + 1.0;
        field.update(forming_at);

        let set = field.formation().active_set().expect("formation started");
        field.update(forming_at + config.forming_ms);
        assert_eq!(field.formation().phase(), FormationPhase::Holding);

        let targets = formation::formation_targets(
            8,
            config.letter_spacing,
            BOUNDS,
            config.y_fraction,
        );
        for (letter, target) in field.letters()[set * 8..(set + 1) * 8].iter().zip(targets) {
            assert_eq!(letter.motion.position, target);
            assert_eq!(letter.motion.rotation, 0.0);
            assert_eq!(letter.opacity_boost, Letter::MAX_OPACITY_BOOST);
            assert_eq!(letter.motion.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn forming_ramps_opacity_boost_with_progress() {
        let mut field = field();
        let config = field.config().formation;
        field.update(0.0);
        let forming_at = config.first_delay_ms + 1.0;
        field.update(forming_at);
        field.update(forming_at + config.forming_ms / 2.0);

        for letter in active_letters(&field) {
            assert!((letter.opacity_boost - 1.75).abs() < 1e-3);
        }
    }

    #[test]
    fn dispersal_releases_letters_with_cruising_velocity() {
        let mut field = field();
        let config = field.config().clone();
        let timing = config.formation;
        field.update(0.0);
        let forming_at = timing.first_delay_ms + 1.0;
        field.update(forming_at);
        let set = field.formation().active_set().expect("formation started");
        let holding_at = forming_at + timing.forming_ms;
        field.update(holding_at);
        let dispersing_at = holding_at + timing.hold_ms + 1.0;
        field.update(dispersing_at);

        let halfway = dispersing_at + timing.disperse_ms / 2.0;
        field.update(halfway);
        for letter in active_letters(&field) {
            assert!(letter.opacity_boost < Letter::MAX_OPACITY_BOOST);
            assert!(letter.opacity_boost > 1.0);
        }

        field.update(dispersing_at + timing.disperse_ms);
        for letter in &field.letters()[set * 8..(set + 1) * 8] {
            assert!(!letter.in_formation());
            assert_eq!(letter.opacity_boost, 1.0);
            let speed = letter.motion.speed();
            assert!(speed >= config.speed.min - 1e-4 && speed <= config.speed.max + 1e-4);
        }
    }

    #[test]
    fn pausing_does_not_count_towards_the_idle_clock() {
        let mut field = field();
        let config = field.config().formation;
        field.update(0.0);
        field.update(1_000.0);

        field.stop();
        field.start();
        assert_eq!(field.update(30_000.0), None);
        assert_eq!(field.formation().phase(), FormationPhase::Idle);

        let remaining = config.first_delay_ms - 1_000.0;
        assert_eq!(field.update(30_000.0 + remaining - 1.0), None);
        assert_eq!(
            field.update(30_000.0 + remaining + 1.0),
            Some(FormationPhase::Forming)
        );
    }

    #[test]
    fn pausing_mid_formation_resumes_the_interpolation() {
        let mut field = field();
        let config = field.config().formation;
        field.update(0.0);
        let forming_at = config.first_delay_ms + 1.0;
        field.update(forming_at);
        let paused_at = forming_at + 100.0;
        field.update(paused_at);

        field.stop();
        field.start();
        let resumed_at = paused_at + 60_000.0;
        assert_eq!(field.update(resumed_at), None);
        assert_eq!(field.formation().phase(), FormationPhase::Forming);
        for letter in active_letters(&field) {
            assert!(letter.opacity_boost < Letter::MAX_OPACITY_BOOST);
        }

        let holding_at = resumed_at + config.forming_ms - 100.0;
        assert_eq!(field.update(holding_at - 1.0), None);
        assert_eq!(field.update(holding_at), Some(FormationPhase::Holding));
    }

    #[test]
    fn letters_in_formation_ignore_pointer_and_damping() {
        let mut field = field();
        let config = field.config().formation;
        field.update(0.0);
        let forming_at = config.first_delay_ms + 1.0;
        field.update(forming_at);
        let set = field.formation().active_set().expect("formation started");
        let free = (set + 1) % field.config().letter_sets;

        let fast = vec2(50.0, 0.0);
        for letter in &mut field.letters {
            letter.motion.velocity = fast;
        }
        let anchor = field.letters[set * 8].motion.position;
        field.pointer_moved(anchor + vec2(30.0, 0.0));

        field.update(forming_at + 16.0);
        for letter in &field.letters()[set * 8..(set + 1) * 8] {
            assert!(letter.in_formation());
            assert_eq!(letter.motion.velocity, fast);
        }
        for letter in &field.letters()[free * 8..(free + 1) * 8] {
            assert!(!letter.in_formation());
            assert!(letter.motion.speed() < fast.x);
        }
    }

    #[test]
    fn dispersal_velocity_follows_the_ease_out_curve() {
        let mut field = field();
        let timing = field.config().formation;
        field.update(0.0);
        let forming_at = timing.first_delay_ms + 1.0;
        field.update(forming_at);
        let holding_at = forming_at + timing.forming_ms;
        field.update(holding_at);
        let dispersing_at = holding_at + timing.hold_ms + 1.0;
        field.update(dispersing_at);

        for (fraction, eased) in [(0.25, 0.4375), (0.5, 0.75), (0.75, 0.9375)] {
            assert!((super::easing::ease_out_quad(fraction) - eased).abs() < 1e-6);
            field.update(dispersing_at + timing.disperse_ms * f64::from(fraction));
            let letters = active_letters(&field);
            assert_eq!(letters.len(), 8);
            for letter in letters {
                let slot = letter.slot.expect("letter is dispersing");
                let expected = slot.disperse_velocity * eased;
                assert!((letter.motion.velocity - expected).length() < 1e-5);
                assert!(slot.disperse_velocity.length() > 0.0);
            }
        }
    }

    #[test]
    fn held_letters_jitter_within_bounds() {
        let mut field = field();
        let timing = field.config().formation;
        field.update(0.0);
        let forming_at = timing.first_delay_ms + 1.0;
        field.update(forming_at);
        let set = field.formation().active_set().expect("formation started");
        let holding_at = forming_at + timing.forming_ms;
        field.update(holding_at);

        let mut widest = 0.0_f32;
        for step in 1..=20 {
            let time = holding_at + f64::from(step) * 250.0;
            assert_eq!(field.update(time), None);
            assert_eq!(field.formation().phase(), FormationPhase::Holding);

            for letter in &field.letters()[set * 8..(set + 1) * 8] {
                let slot = letter.slot.expect("letter is held");
                let offset = letter.motion.position - slot.target;
                assert!(offset.x.abs() <= 3.0 + 1e-4);
                assert!(offset.y.abs() <= 2.0 + 1e-4);
                assert!(letter.motion.rotation.abs() <= 0.03 + 1e-6);
                assert_eq!(letter.opacity_boost, Letter::MAX_OPACITY_BOOST);
                widest = widest.max(offset.x.abs());
            }
        }
        assert!(widest > 1.0);
    }

    #[test]
    fn pulses_are_refreshed_every_frame() {
        let mut field = field();
        let time = 1_234.0;
        field.update(time);

        for shape in field.shapes() {
            assert!((shape.opacity - (shape.base_opacity + shape.pulse.sample(time))).abs() < 1e-6);
        }
        for letter in field.letters() {
            assert!((letter.opacity - (letter.base_opacity + letter.pulse.sample(time))).abs() < 1e-6);
            assert!((letter.scale - (1.0 + letter.breathing.sample(time))).abs() < 1e-6);
        }
    }

    #[test]
    fn stopped_field_does_not_move() {
        let mut field = field();
        field.update(0.0);
        field.stop();

        let before = field.shapes().to_vec();
        assert_eq!(field.update(16.0), None);
        assert_eq!(field.shapes(), before.as_slice());
        assert!(!field.is_running());
    }

    #[test]
    fn pointer_is_ignored_while_stopped_and_cleared_on_leave() {
        let mut field = ParticleField::with_seed(BackdropConfig::default(), BOUNDS, 1);
        field.pointer_moved(pos2(10.0, 10.0));
        assert_eq!(field.pointer(), None);

        field.start();
        field.pointer_moved(pos2(10.0, 10.0));
        assert_eq!(field.pointer(), Some(pos2(10.0, 10.0)));

        field.pointer_left();
        assert_eq!(field.pointer(), None);
    }

    #[test]
    fn resize_reports_changes_only() {
        let mut field = field();
        assert!(!field.resize(BOUNDS));
        assert!(field.resize(vec2(800.0, 600.0)));
        assert_eq!(field.bounds(), vec2(800.0, 600.0));
    }

    #[test]
    fn connections_fade_linearly_with_distance() {
        let config = BackdropConfig {
            shape_count: 2,
            letter_sets: 0,
            ..BackdropConfig::default()
        };
        let mut field = ParticleField::with_seed(config, BOUNDS, 3);
        field.shapes[0].motion.position = pos2(100.0, 100.0);
        field.shapes[1].motion.position = pos2(175.0, 100.0);

        let connections = field.connections();
        assert_eq!(connections.len(), 1);
        assert!((connections[0].opacity - 0.075).abs() < 1e-6);

        field.shapes[1].motion.position = pos2(400.0, 100.0);
        assert!(field.connections().is_empty());
    }

    #[test]
    fn attracted_elements_move_towards_pointer() {
        let config = BackdropConfig {
            shape_count: 1,
            letter_sets: 0,
            ..BackdropConfig::default()
        };
        let mut field = ParticleField::with_seed(config, BOUNDS, 5);
        field.start();
        field.shapes[0].motion.position = pos2(500.0, 300.0);
        field.shapes[0].motion.velocity = Vec2::ZERO;
        field.pointer_moved(pos2(600.0, 300.0));

        for frame in 0..30 {
            field.update(f64::from(frame) * 16.0);
        }
        let shape = &field.shapes()[0];
        assert!(shape.motion.position.x > 500.0);
        assert!(shape.motion.speed() <= field.config().attraction.max_speed + 1e-4);
    }
}
