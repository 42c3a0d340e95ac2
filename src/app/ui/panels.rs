use std::collections::VecDeque;
use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout, Margin, RichText, Ui};
use tracing::debug;

use crate::flow::{Navigator, WizardContent};

use super::super::backdrop_view::BackdropView;
use super::super::render_utils::{ACCENT, PANEL_FILL, TEXT_FAINT};
use super::super::{ViewModel, WizardAction};

const CONTENT_MAX_WIDTH: f32 = 760.0;
const SUPPORT_CONTACT: &str = "support@cyanview.com • Belgium (CET)";

fn panel_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(PANEL_FILL)
        .inner_margin(Margin::symmetric(16, 10))
}

impl ViewModel {
    pub(in crate::app) fn new(content: WizardContent, settle_delay_secs: f64) -> Self {
        Self {
            navigator: Navigator::new(content.graph, settle_delay_secs),
            reference: content.reference,
            show_reference: false,
            search: String::new(),
            search_cache: None,
            show_fps_bar: false,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        backdrop: &mut BackdropView,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        let now = ctx.input(|input| input.time);
        if self.navigator.tick(now) {
            ctx.request_repaint();
        }
        if let Some(remaining) = self.navigator.time_until_settle(now) {
            // The card keeps fading until the deadline.
            let frame = Duration::from_secs_f64(remaining).min(Duration::from_millis(16));
            ctx.request_repaint_after(frame);
        } else if self.navigator.visibility(now) < 1.0 {
            ctx.request_repaint_after(Duration::from_millis(16));
        }

        egui::TopBottomPanel::top("header")
            .resizable(false)
            .frame(panel_frame())
            .show(ctx, |ui| self.draw_header(ui, backdrop, reload_requested, is_loading));

        egui::TopBottomPanel::bottom("footer")
            .resizable(false)
            .frame(panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "Cyanview Network Troubleshooter v{}",
                            env!("CARGO_PKG_VERSION")
                        ))
                        .small()
                        .color(TEXT_FAINT),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(SUPPORT_CONTACT).small().color(TEXT_FAINT));
                    });
                });
            });

        if self.show_reference {
            egui::SidePanel::right("quick_reference")
                .resizable(true)
                .default_width(320.0)
                .frame(panel_frame())
                .show(ctx, |ui| self.draw_reference(ui));
        }

        let mut action = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.inner_margin(Margin::same(24)))
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading troubleshooting flowchart...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let width = ui.available_width().min(CONTENT_MAX_WIDTH);
                        let margin = (ui.available_width() - width) / 2.0;
                        ui.horizontal(|ui| {
                            ui.add_space(margin);
                            ui.vertical(|ui| {
                                ui.set_width(width);
                                action = self.draw_wizard(ui, now);
                            });
                        });
                    });
            });

        if let Some(action) = action {
            self.apply(action, now);
        }
    }

    fn draw_header(
        &mut self,
        ui: &mut Ui,
        backdrop: &mut BackdropView,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading(RichText::new("Cyanview Network Troubleshooter").strong());
                ui.label(RichText::new("RCP & RIO SETUP ASSISTANT").small().color(TEXT_FAINT));
            });
            ui.add_space(16.0);
            self.draw_search_box(ui);

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.toggle_value(&mut self.show_reference, "⚙ Quick Reference");

                let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload flowchart"));
                if reload_button.clicked() {
                    *reload_requested = true;
                }

                let mut animate = backdrop.is_running();
                if ui.checkbox(&mut animate, "Animate backdrop").changed() {
                    backdrop.set_running(animate);
                }
                ui.checkbox(&mut self.show_fps_bar, "Stats");

                if let Some(status) = self.backdrop_status_text(backdrop) {
                    ui.label(RichText::new(status).small().color(TEXT_FAINT));
                }
                if let Some(fps_text) = self.fps_display_text() {
                    ui.label(RichText::new(fps_text).small().color(ACCENT));
                }
            });
        });
    }

    fn draw_wizard(&mut self, ui: &mut Ui, now: f64) -> Option<WizardAction> {
        let from_search = self.draw_search_results(ui);
        let from_progress = self.draw_progress(ui);
        let from_card = self.draw_node_card(ui, now);
        let from_path = self.draw_breadcrumbs(ui);
        from_search.or(from_progress).or(from_card).or(from_path)
    }

    /// Applies a UI request. Refused requests are expected (e.g. clicks while a
    /// transition settles) and only logged. Returns whether it was accepted.
    fn apply(&mut self, action: WizardAction, now: f64) -> bool {
        let result = match &action {
            WizardAction::Navigate(target) | WizardAction::OpenSearchHit(target) => {
                self.navigator.navigate_to(target, now)
            }
            WizardAction::Back => self.navigator.go_back(now),
            WizardAction::Restart => self.navigator.restart(now),
            WizardAction::Jump(index) => self.navigator.jump_to_breadcrumb(*index),
        };
        match result {
            Ok(()) => {
                if matches!(action, WizardAction::OpenSearchHit(_)) {
                    self.search.clear();
                }
                true
            }
            Err(error) => {
                debug!(?action, %error, "wizard request ignored");
                false
            }
        }
    }

    /// Drops any pending transition so nothing fires after the view goes away.
    pub(in crate::app) fn teardown(&mut self) {
        self.navigator.cancel_pending();
        self.search_cache = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::flow::{ContentSource, load_content};

    fn model() -> ViewModel {
        let content = load_content(&ContentSource::default()).expect("bundled content");
        ViewModel::new(content, 0.15)
    }

    #[test]
    fn actions_drive_the_navigator() {
        let mut model = model();
        let entry = model.navigator.current_id().to_owned();

        model.apply(WizardAction::Navigate("start".to_owned()), 0.0);
        assert!(model.navigator.is_transitioning());
        model.apply(WizardAction::Back, 0.05);
        assert!(model.navigator.tick(0.2));
        assert_eq!(model.navigator.current_id(), "start");
        assert_eq!(model.navigator.history(), [entry.clone()]);

        model.apply(WizardAction::Jump(0), 0.3);
        assert_eq!(model.navigator.current_id(), entry);
        assert!(model.navigator.history().is_empty());
    }

    #[test]
    fn search_query_survives_a_refused_pick() {
        let mut model = model();
        model.search = "portfast".to_owned();
        assert!(model.apply(WizardAction::Restart, 0.0));

        assert!(!model.apply(WizardAction::OpenSearchHit("start".to_owned()), 0.05));
        assert_eq!(model.search, "portfast");

        assert!(model.navigator.tick(0.2));
        assert!(model.apply(WizardAction::OpenSearchHit("start".to_owned()), 0.3));
        assert!(model.search.is_empty());
        assert!(model.navigator.is_transitioning());
    }

    #[test]
    fn reference_panel_starts_hidden() {
        assert!(!model().show_reference);
    }

    #[test]
    fn teardown_cancels_pending_transition() {
        let mut model = model();
        model.apply(WizardAction::Restart, 0.0);
        model.teardown();
        assert!(!model.navigator.is_transitioning());
        assert!(!model.navigator.tick(10.0));
    }
}
