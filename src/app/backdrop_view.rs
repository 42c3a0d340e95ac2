use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::emath::Rot2;
use eframe::egui::epaint::TextShape;
use eframe::egui::{Color32, Context, FontId, LayerId, Painter, Pos2, Shape, Stroke, Vec2, vec2};
use tracing::debug;

use crate::backdrop::{BackdropConfig, FormationPhase, Letter, ParticleField, Tint};

use super::render_utils::{CYAN, PAGE_FILL, draw_gradient, with_opacity};

/// Owns the particle field and paints it on the background layer.
///
/// The field is created on the first frame so it can be sized to the window.
pub(super) struct BackdropView {
    config: BackdropConfig,
    seed: Option<u64>,
    field: Option<ParticleField>,
    animate: bool,
}

impl BackdropView {
    pub(super) fn new(config: BackdropConfig, seed: Option<u64>, animate: bool) -> Self {
        Self {
            config,
            seed,
            field: None,
            animate,
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.field.as_ref().is_some_and(ParticleField::is_running)
    }

    pub(super) fn set_running(&mut self, running: bool) {
        self.animate = running;
        let Some(field) = self.field.as_mut() else {
            return;
        };
        if running {
            field.start();
        } else {
            field.stop();
        }
    }

    pub(super) fn stop(&mut self) {
        self.set_running(false);
    }

    /// Element count, formation phase and the letter set taking part, once the field exists.
    pub(super) fn status(&self) -> Option<(usize, FormationPhase, Option<usize>)> {
        self.field.as_ref().map(|field| {
            let formation = field.formation();
            (field.element_count(), formation.phase(), formation.active_set())
        })
    }

    pub(super) fn show(&mut self, ctx: &Context) {
        let rect = ctx.content_rect();
        let (time_secs, hover) = ctx.input(|input| (input.time, input.pointer.hover_pos()));
        let animate = self.animate;
        let field = self.field.get_or_insert_with(|| {
            debug!(width = rect.width(), height = rect.height(), "creating backdrop field");
            let config = self.config.clone();
            let mut field = match self.seed {
                Some(seed) => ParticleField::with_seed(config, rect.size(), seed),
                None => ParticleField::new(config, rect.size()),
            };
            if animate {
                field.start();
            }
            field
        });

        let painter = ctx.layer_painter(LayerId::background());
        if field.config().draw_background {
            draw_gradient(&painter, rect);
        } else {
            painter.rect_filled(rect, 0.0, PAGE_FILL);
        }

        field.resize(rect.size());
        match hover {
            Some(position) if rect.contains(position) => field.pointer_moved(position - rect.min.to_vec2()),
            _ => field.pointer_left(),
        }
        field.update(time_secs * 1000.0);

        let origin = rect.min.to_vec2();
        draw_connections(&painter, field, origin);
        for shape in field.shapes() {
            draw_shape(&painter, shape, origin);
        }
        for letter in field.letters() {
            draw_letter(&painter, letter, origin);
        }

        if field.is_running() {
            ctx.request_repaint();
        }
    }
}

fn tint_color(tint: Tint) -> Color32 {
    match tint {
        Tint::Cyan => CYAN,
        Tint::White => Color32::WHITE,
    }
}

fn draw_connections(painter: &Painter, field: &ParticleField, origin: Vec2) {
    for connection in field.connections() {
        painter.line_segment(
            [connection.from + origin, connection.to + origin],
            Stroke::new(0.5, with_opacity(CYAN, connection.opacity)),
        );
    }
}

fn draw_shape(painter: &Painter, shape: &crate::backdrop::Shape, origin: Vec2) {
    let color = tint_color(shape.tint);
    let fill = with_opacity(color, shape.opacity * 0.5);
    let stroke = Stroke::new(1.5, with_opacity(color, shape.opacity + 0.2));
    let center = shape.motion.position + origin;
    let radius = shape.motion.half_size();

    let Some(sides) = shape.outline.sides() else {
        painter.circle(center, radius, fill, stroke);
        return;
    };

    let points = (0..sides)
        .map(|index| {
            let angle = (index as f32 / sides as f32) * TAU - FRAC_PI_2 + shape.motion.rotation;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect::<Vec<Pos2>>();
    painter.add(Shape::convex_polygon(points, fill, stroke));
}

fn draw_letter(painter: &Painter, letter: &Letter, origin: Vec2) {
    let boost = letter.boost_level();
    let color = if boost > 0.5 {
        CYAN
    } else {
        tint_color(letter.tint)
    };
    let fill_opacity = (letter.opacity * 0.6 * letter.opacity_boost).min(0.9);
    let edge_opacity = ((letter.opacity + 0.25) * letter.opacity_boost).min(1.0);
    let alpha = (fill_opacity + edge_opacity) * 0.5;

    let font = FontId::proportional(letter.motion.size * letter.scale);
    let galley = painter.layout_no_wrap(letter.glyph.to_string(), font, with_opacity(color, alpha));
    let rotation = letter.motion.rotation;
    let offset = Rot2::from_angle(rotation) * (-0.5 * galley.size());
    let anchor = letter.motion.position + origin + offset;

    painter.add(TextShape::new(anchor, galley, with_opacity(color, alpha)).with_angle(rotation));
}
