use eframe::egui::{self, Align, Layout, RichText, Ui};

use super::super::render_utils::{ACCENT, TEXT_FAINT, TEXT_MUTED};
use super::super::{ViewModel, WizardAction};

impl ViewModel {
    /// "Step N", the progress bar, and the Back / Restart controls.
    pub(in crate::app) fn draw_progress(&self, ui: &mut Ui) -> Option<WizardAction> {
        let mut action = None;
        let navigator = &self.navigator;

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Step {}", navigator.step_number())).color(TEXT_FAINT));

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("⟲ Restart").clicked() {
                    action = Some(WizardAction::Restart);
                }
                if !navigator.history().is_empty() && ui.button("⏴ Back").clicked() {
                    action = Some(WizardAction::Back);
                }
                ui.add(
                    egui::ProgressBar::new(navigator.progress_fraction())
                        .desired_height(4.0)
                        .fill(ACCENT),
                );
            });
        });
        ui.add_space(16.0);

        action
    }

    /// Clickable path of visited nodes, shown once the user has left the entry.
    pub(in crate::app) fn draw_breadcrumbs(&self, ui: &mut Ui) -> Option<WizardAction> {
        if self.navigator.history().is_empty() {
            return None;
        }

        let mut action = None;
        ui.add_space(12.0);
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Path:").small().color(TEXT_FAINT));
            for (index, crumb) in self.navigator.breadcrumbs().into_iter().enumerate() {
                if crumb.is_current {
                    ui.label(RichText::new(crumb.label).small().color(ACCENT));
                    continue;
                }

                let link = ui.link(RichText::new(crumb.label).small().color(TEXT_MUTED));
                if link.on_hover_text(crumb.node_id).clicked() {
                    action = Some(WizardAction::Jump(index));
                }
                ui.label(RichText::new("›").small().color(TEXT_FAINT));
            }
        });

        action
    }
}
