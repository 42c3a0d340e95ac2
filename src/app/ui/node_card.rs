use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, Stroke, Ui};

use crate::flow::{DecisionNode, EntryNode, Icon, Node, ResolutionNode, SuccessNode};

use super::super::render_utils::{
    ACCENT, CARD_FILL, CARD_STROKE, TEXT_FAINT, TEXT_MUTED, failure_color, icon_glyph,
    severity_palette, success_color, with_opacity,
};
use super::super::{ViewModel, WizardAction};

fn card_frame(fill: Color32, stroke: Color32) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill)
        .stroke(Stroke::new(1.0, stroke))
        .corner_radius(CornerRadius::same(16))
        .inner_margin(Margin::same(28))
}

fn icon_badge(ui: &mut Ui, icon: Icon, color: Color32) {
    egui::Frame::NONE
        .fill(with_opacity(color, 0.12))
        .stroke(Stroke::new(1.0, with_opacity(color, 0.3)))
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.label(RichText::new(icon_glyph(icon)).size(26.0).color(color));
        });
}

fn tinted_button(text: &str, color: Color32) -> egui::Button<'_> {
    egui::Button::new(RichText::new(text).size(16.0).color(color))
        .fill(with_opacity(color, 0.1))
        .stroke(Stroke::new(1.0, with_opacity(color, 0.3)))
        .corner_radius(CornerRadius::same(10))
}

impl ViewModel {
    /// The current node, faded out while a transition settles and back in after.
    pub(in crate::app) fn draw_node_card(&self, ui: &mut Ui, now: f64) -> Option<WizardAction> {
        let Some(node) = self.navigator.current_node() else {
            ui.label(format!("Unknown step `{}`.", self.navigator.current_id()));
            return Some(WizardAction::Restart);
        };

        let visibility = self.navigator.visibility(now);
        let idle = !self.navigator.is_transitioning();

        ui.scope(|ui| {
            ui.set_opacity(visibility);
            ui.add_enabled_ui(idle, |ui| match node {
                Node::Entry(entry) => draw_entry(ui, entry),
                Node::Decision(decision) => draw_decision(ui, decision),
                Node::Resolution(resolution) => draw_resolution(ui, resolution),
                Node::Success(success) => draw_success(ui, success),
            })
            .inner
        })
        .inner
    }
}

fn draw_entry(ui: &mut Ui, node: &EntryNode) -> Option<WizardAction> {
    let mut action = None;

    card_frame(CARD_FILL, CARD_STROKE).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            icon_badge(ui, node.icon, ACCENT);
            ui.add_space(12.0);
            ui.heading(RichText::new(&node.title).size(24.0).color(Color32::WHITE));
        });
        ui.add_space(20.0);

        for option in &node.options {
            let button = egui::Button::new(RichText::new(format!("{}  ›", option.label)).size(17.0))
                .fill(with_opacity(CARD_STROKE, 0.5))
                .corner_radius(CornerRadius::same(12));
            if ui.add_sized([ui.available_width(), 44.0], button).clicked() {
                action = Some(WizardAction::Navigate(option.target.clone()));
            }
            if !option.description.is_empty() {
                ui.label(RichText::new(&option.description).small().color(TEXT_MUTED));
            }
            ui.add_space(10.0);
        }
    });

    action
}

fn draw_decision(ui: &mut Ui, node: &DecisionNode) -> Option<WizardAction> {
    let mut action = None;

    card_frame(CARD_FILL, CARD_STROKE).show(ui, |ui| {
        ui.horizontal_top(|ui| {
            icon_badge(ui, node.icon, ACCENT);
            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(&node.question).size(22.0).color(Color32::WHITE));
                if let Some(hint) = &node.hint {
                    ui.add_space(6.0);
                    ui.label(RichText::new(format!("❓ {hint}")).color(TEXT_MUTED));
                }
            });
        });
        ui.add_space(20.0);

        ui.columns(2, |columns| {
            let choices = [
                (node.yes_label(), success_color(), &node.yes_target),
                (node.no_label(), failure_color(), &node.no_target),
            ];
            for (column, (label, color, target)) in columns.iter_mut().zip(choices) {
                let width = column.available_width();
                if column.add_sized([width, 48.0], tinted_button(label, color)).clicked() {
                    action = Some(WizardAction::Navigate(target.clone()));
                }
            }
        });
    });

    action
}

fn draw_resolution(ui: &mut Ui, node: &ResolutionNode) -> Option<WizardAction> {
    let palette = severity_palette(node.severity);
    let mut action = None;

    card_frame(palette.fill, palette.stroke).show(ui, |ui| {
        ui.horizontal_top(|ui| {
            icon_badge(ui, node.icon, palette.accent);
            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(&node.title).size(22.0).color(Color32::WHITE));
                    egui::Frame::NONE
                        .fill(palette.fill)
                        .stroke(Stroke::new(1.0, palette.stroke))
                        .corner_radius(CornerRadius::same(4))
                        .inner_margin(Margin::symmetric(6, 2))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(node.severity.label().to_uppercase())
                                    .small()
                                    .strong()
                                    .color(palette.accent),
                            );
                        });
                });
                ui.add_space(12.0);

                for (index, step) in node.steps.iter().enumerate() {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(format!("{}.", index + 1)).strong().color(palette.accent));
                        ui.label(step);
                    });
                    ui.add_space(4.0);
                }

                if let Some(note) = &node.tech_note {
                    ui.add_space(10.0);
                    egui::Frame::NONE
                        .fill(CARD_FILL)
                        .stroke(Stroke::new(1.0, CARD_STROKE))
                        .corner_radius(CornerRadius::same(8))
                        .inner_margin(Margin::same(12))
                        .show(ui, |ui| {
                            ui.horizontal_wrapped(|ui| {
                                ui.label(RichText::new("Technical Note:").strong().color(ACCENT));
                                ui.label(RichText::new(note).color(TEXT_MUTED));
                            });
                        });
                }

                if let Some(next) = &node.next_check {
                    ui.add_space(16.0);
                    if ui.add(tinted_button("Continue Troubleshooting  ›", ACCENT)).clicked() {
                        action = Some(WizardAction::Navigate(next.clone()));
                    }
                }
            });
        });
    });

    action
}

fn draw_success(ui: &mut Ui, node: &SuccessNode) -> Option<WizardAction> {
    let color = success_color();
    let mut action = None;

    card_frame(with_opacity(color, 0.1), with_opacity(color, 0.3)).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            icon_badge(ui, Icon::Success, color);
            ui.add_space(16.0);
            ui.label(RichText::new(&node.title).size(28.0).color(Color32::WHITE));
            ui.add_space(8.0);
            ui.label(RichText::new(&node.message).color(TEXT_MUTED));
            ui.add_space(20.0);

            if !node.links.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for link in &node.links {
                        ui.hyperlink_to(format!("{} ↗", link.label), &link.url);
                    }
                });
                ui.add_space(20.0);
            }

            if ui.add(tinted_button("⟲ Start Over", TEXT_FAINT)).clicked() {
                action = Some(WizardAction::Restart);
            }
        });
    });

    action
}
