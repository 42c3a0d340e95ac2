use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use crate::backdrop::BackdropConfig;
use crate::flow::{ContentSource, Navigator, QuickReference, WizardContent, load_content};

mod backdrop_view;
mod render_utils;
mod ui;

use backdrop_view::BackdropView;
use ui::SearchCache;

type LoadResult = Result<WizardContent, String>;

/// Startup options threaded from the command line into the app.
pub struct AppOptions {
    pub source: ContentSource,
    pub settle_delay_secs: f64,
    pub backdrop: BackdropConfig,
    pub backdrop_seed: Option<u64>,
    pub animate_backdrop: bool,
}

pub struct TroubleshooterApp {
    source: ContentSource,
    settle_delay_secs: f64,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
    backdrop: BackdropView,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    navigator: Navigator,
    reference: QuickReference,
    show_reference: bool,
    search: String,
    search_cache: Option<SearchCache>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

/// A request raised while drawing, applied once the frame's borrows end.
#[derive(Clone, Debug, PartialEq, Eq)]
enum WizardAction {
    Navigate(String),
    /// A search result was picked; the query clears once the move is accepted.
    OpenSearchHit(String),
    Back,
    Restart,
    Jump(usize),
}

impl TroubleshooterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let state = Self::start_load(options.source.clone());
        Self {
            source: options.source,
            settle_delay_secs: options.settle_delay_secs,
            state,
            reload_rx: None,
            backdrop: BackdropView::new(
                options.backdrop,
                options.backdrop_seed,
                options.animate_backdrop,
            ),
        }
    }

    fn spawn_load(source: ContentSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_content(&source).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                error!(%error, "failed to load troubleshooting content");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: ContentSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

impl eframe::App for TroubleshooterApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.backdrop.show(ctx);

        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(content)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            content,
                            self.settle_delay_secs,
                        ))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(120.0);
                            ui.heading("Loading troubleshooting flowchart...");
                            ui.add_space(8.0);
                            ui.spinner();
                        });
                    });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE.inner_margin(egui::Margin::same(24)))
                    .show(ctx, |ui| {
                        ui.heading("Failed to load the troubleshooting flowchart");
                        ui.add_space(6.0);
                        ui.label(error.as_str());
                        ui.add_space(10.0);
                        if ui.button("Retry").clicked() {
                            transition = Some(Self::start_load(self.source.clone()));
                        }
                    });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut self.backdrop, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!("reloading troubleshooting content");
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(content)) => {
                            model.teardown();
                            transition = Some(AppState::Ready(Box::new(ViewModel::new(
                                content,
                                self.settle_delay_secs,
                            ))));
                        }
                        Ok(Err(error)) => {
                            model.teardown();
                            transition = Some(AppState::Error(error));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.teardown();
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.backdrop.stop();
        if let AppState::Ready(model) = &mut self.state {
            model.teardown();
        }
        info!("troubleshooter closed");
    }
}
