use eframe::egui::{Color32, Mesh, Painter, Rect, Shape};

use crate::flow::{Icon, Severity, Tone};

pub(super) const CYAN: Color32 = Color32::from_rgb(0, 168, 232);
pub(super) const ACCENT: Color32 = Color32::from_rgb(34, 211, 238);
pub(super) const TEXT_MUTED: Color32 = Color32::from_rgb(148, 163, 184);
pub(super) const TEXT_FAINT: Color32 = Color32::from_rgb(100, 116, 139);
pub(super) const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(12, 17, 29, 200);
pub(super) const CARD_FILL: Color32 = Color32::from_rgba_premultiplied(12, 17, 29, 170);
pub(super) const CARD_STROKE: Color32 = Color32::from_rgb(30, 41, 59);
pub(super) const PAGE_FILL: Color32 = Color32::from_rgb(2, 6, 23);

const GRADIENT_START: Color32 = Color32::from_rgb(0, 51, 102);
const GRADIENT_END: Color32 = Color32::from_rgb(0, 119, 182);

const RED: Color32 = Color32::from_rgb(248, 113, 113);
const AMBER: Color32 = Color32::from_rgb(251, 191, 36);
const EMERALD: Color32 = Color32::from_rgb(52, 211, 153);
const PURPLE: Color32 = Color32::from_rgb(192, 132, 252);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// `color` with its alpha replaced by `opacity` in `0.0..=1.0`.
pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (opacity.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

pub(super) struct SeverityPalette {
    pub accent: Color32,
    pub fill: Color32,
    pub stroke: Color32,
}

pub(super) fn severity_palette(severity: Severity) -> SeverityPalette {
    let accent = match severity {
        Severity::Critical => RED,
        Severity::Warning => AMBER,
        Severity::Info => ACCENT,
        Severity::Success => EMERALD,
    };
    SeverityPalette {
        accent,
        fill: with_opacity(accent, 0.1),
        stroke: with_opacity(accent, 0.3),
    }
}

pub(super) fn success_color() -> Color32 {
    EMERALD
}

pub(super) fn failure_color() -> Color32 {
    RED
}

pub(super) fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Muted => TEXT_MUTED,
        Tone::Critical => RED,
        Tone::Warning => AMBER,
        Tone::Success => EMERALD,
    }
}

pub(super) fn address_color() -> Color32 {
    AMBER
}

pub(super) fn server_color() -> Color32 {
    PURPLE
}

pub(super) fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Power => "⚡",
        Icon::Network => "🖧",
        Icon::Terminal => "🖳",
        Icon::Settings => "⚙",
        Icon::Shield => "🛡",
        Icon::Alert => "⚠",
        Icon::Monitor => "🖵",
        Icon::Search => "🔍",
        Icon::Wifi => "📶",
        Icon::Camera => "📷",
        Icon::Cpu => "🖥",
        Icon::Success => "✔",
        Icon::Cloud => "☁",
        Icon::Info => "❓",
    }
}

/// Diagonal two-stop gradient from the top-left to the bottom-right corner.
pub(super) fn draw_gradient(painter: &Painter, rect: Rect) {
    let middle = blend_color(GRADIENT_START, GRADIENT_END, 0.5);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), GRADIENT_START);
    mesh.colored_vertex(rect.right_top(), middle);
    mesh.colored_vertex(rect.right_bottom(), GRADIENT_END);
    mesh.colored_vertex(rect.left_bottom(), middle);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}
