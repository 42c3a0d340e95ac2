use eframe::egui::Context;

use super::super::ViewModel;
use super::super::backdrop_view::BackdropView;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar || self.fps_samples.is_empty() {
            return None;
        }

        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        Some(format!("FPS {:.0} | avg {:.1}", self.fps_current, avg))
    }

    pub(in crate::app) fn backdrop_status_text(&self, backdrop: &BackdropView) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }

        backdrop.status().map(|(elements, phase, set)| {
            match (backdrop.is_running(), set) {
                (false, _) => format!("backdrop: {elements} elements, paused"),
                (true, Some(set)) => {
                    format!("backdrop: {elements} elements, {} set {}", phase.label(), set + 1)
                }
                (true, None) => format!("backdrop: {elements} elements, {}", phase.label()),
            }
        })
    }
}
