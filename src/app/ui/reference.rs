use std::time::Duration;

use eframe::egui::{self, Color32, RichText, Sense, Ui, vec2};

use crate::flow::{LedState, QuickReference};

use super::super::render_utils::{
    ACCENT, TEXT_FAINT, TEXT_MUTED, address_color, server_color, success_color, tone_color,
    with_opacity,
};
use super::super::ViewModel;

const DEFAULT_SUPPORT_URL: &str = "https://support.cyanview.com";

fn section_heading(ui: &mut Ui, title: &str) {
    ui.add_space(14.0);
    ui.label(RichText::new(title.to_uppercase()).small().strong().color(TEXT_FAINT));
    ui.add_space(6.0);
}

fn code_chip(ui: &mut Ui, text: &str, color: Color32) {
    ui.label(
        RichText::new(text)
            .monospace()
            .color(color)
            .background_color(with_opacity(color, 0.1)),
    );
}

fn led_dot(ui: &mut Ui, state: LedState) {
    let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
    let color = match state {
        LedState::Steady => success_color(),
        LedState::Blinking => {
            let time = ui.input(|input| input.time);
            ui.ctx().request_repaint_after(Duration::from_millis(50));
            let pulse = 0.55 + 0.45 * (time * std::f64::consts::TAU).sin().abs() as f32;
            with_opacity(address_color(), pulse)
        }
        LedState::Off => Color32::from_rgb(71, 85, 105),
    };
    ui.painter().circle_filled(rect.center(), 5.0, color);
}

fn draw_sections(ui: &mut Ui, reference: &QuickReference) {
    section_heading(ui, "Network Ports");
    for entry in &reference.ports {
        ui.horizontal(|ui| {
            code_chip(ui, &entry.port, ACCENT);
            ui.label(RichText::new(&entry.purpose).color(TEXT_MUTED));
        });
    }

    section_heading(ui, "IP Addressing");
    for entry in &reference.ips {
        code_chip(ui, &entry.format, address_color());
        ui.label(RichText::new(&entry.note).small().color(TEXT_MUTED));
        ui.add_space(4.0);
    }

    section_heading(ui, "LED Indicators");
    for entry in &reference.leds {
        ui.horizontal(|ui| {
            led_dot(ui, entry.state());
            ui.label(&entry.meaning).on_hover_text(&entry.color);
        });
    }

    section_heading(ui, "CI0 Screen Symbols");
    for entry in &reference.ci0 {
        ui.horizontal(|ui| {
            code_chip(ui, &entry.symbol, tone_color(entry.tone));
            ui.label(RichText::new(&entry.meaning).color(TEXT_MUTED));
        });
    }

    section_heading(ui, "REMI Status Icons");
    for entry in &reference.remi {
        ui.horizontal(|ui| {
            ui.label(&entry.icon);
            ui.label(RichText::new(&entry.meaning).color(TEXT_MUTED));
        });
    }

    section_heading(ui, "Cloud Servers");
    for entry in &reference.cloud {
        code_chip(ui, &entry.server, server_color());
        ui.label(RichText::new(&entry.note).small().color(TEXT_FAINT));
        ui.add_space(4.0);
    }

    ui.add_space(14.0);
    ui.separator();
    let url = reference.support_url.as_deref().unwrap_or(DEFAULT_SUPPORT_URL);
    ui.hyperlink_to("Full Documentation ↗", url);
}

impl ViewModel {
    pub(in crate::app) fn draw_reference(&self, ui: &mut Ui) {
        ui.add_space(8.0);
        ui.heading(RichText::new("⚙ Quick Reference").color(Color32::WHITE));
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| draw_sections(ui, &self.reference));
    }
}
