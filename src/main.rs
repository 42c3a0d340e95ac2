mod app;
mod backdrop;
mod flow;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{AppOptions, TroubleshooterApp};
use crate::backdrop::BackdropConfig;
use crate::flow::{ContentSource, DEFAULT_SETTLE_DELAY_SECS};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Flowchart JSON to load instead of the bundled one.
    #[arg(long)]
    flowchart: Option<PathBuf>,

    /// Quick reference JSON to load instead of the bundled one.
    #[arg(long)]
    reference: Option<PathBuf>,

    /// JSON file with backdrop settings; CLI flags below override it.
    #[arg(long)]
    backdrop_config: Option<PathBuf>,

    /// Delay between a click and the next step appearing.
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY_SECS * 1000.0)]
    settle_delay_ms: f64,

    #[arg(long)]
    shape_count: Option<usize>,

    #[arg(long)]
    connection_distance: Option<f32>,

    #[arg(long)]
    formation_interval_ms: Option<f64>,

    #[arg(long)]
    formation_hold_ms: Option<f64>,

    #[arg(long)]
    formation_forming_ms: Option<f64>,

    #[arg(long)]
    formation_disperse_ms: Option<f64>,

    #[arg(long)]
    formation_first_delay_ms: Option<f64>,

    /// Vertical position of the brand formation, as a fraction of the height.
    #[arg(long)]
    formation_y: Option<f32>,

    /// Seed for a reproducible backdrop layout.
    #[arg(long)]
    backdrop_seed: Option<u64>,

    /// Skip the gradient fill behind the backdrop.
    #[arg(long)]
    no_background: bool,

    /// Paint a still backdrop without starting the animation.
    #[arg(long)]
    no_backdrop: bool,
}

impl Args {
    fn backdrop_config(&self) -> Result<BackdropConfig> {
        let mut config = BackdropConfig::load(self.backdrop_config.as_deref())?;

        if let Some(shape_count) = self.shape_count {
            config.shape_count = shape_count;
        }
        if let Some(distance) = self.connection_distance {
            config.connection_distance = distance;
        }
        if let Some(interval) = self.formation_interval_ms {
            config.formation.interval_ms = interval;
        }
        if let Some(hold) = self.formation_hold_ms {
            config.formation.hold_ms = hold;
        }
        if let Some(forming) = self.formation_forming_ms {
            config.formation.forming_ms = forming;
        }
        if let Some(disperse) = self.formation_disperse_ms {
            config.formation.disperse_ms = disperse;
        }
        if let Some(first_delay) = self.formation_first_delay_ms {
            config.formation.first_delay_ms = first_delay;
        }
        if let Some(y_fraction) = self.formation_y {
            config.formation.y_fraction = y_fraction;
        }
        if self.no_background {
            config.draw_background = false;
        }

        config.validate().context("invalid backdrop configuration")?;
        Ok(config)
    }

    fn app_options(&self) -> Result<AppOptions> {
        if !self.settle_delay_ms.is_finite() || self.settle_delay_ms < 0.0 {
            return Err(anyhow!(
                "--settle-delay-ms must be a non-negative number, got {}",
                self.settle_delay_ms
            ));
        }

        Ok(AppOptions {
            source: ContentSource {
                flowchart: self.flowchart.clone(),
                reference: self.reference.clone(),
            },
            settle_delay_secs: self.settle_delay_ms / 1000.0,
            backdrop: self.backdrop_config()?,
            backdrop_seed: self.backdrop_seed,
            animate_backdrop: !self.no_backdrop,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = args.app_options()?;
    info!(
        flowchart = ?options.source.flowchart,
        settle_delay_secs = options.settle_delay_secs,
        "starting troubleshooter"
    );

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Cyanview Network Troubleshooter"),
        ..Default::default()
    };

    eframe::run_native(
        "cyan-troubleshooter",
        native_options,
        Box::new(move |cc| Ok(Box::new(TroubleshooterApp::new(cc, options)))),
    )
    .map_err(|error| anyhow!("failed to run the troubleshooter window: {error}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_overrides_backdrop_defaults() {
        let args = Args::try_parse_from([
            "cyan-troubleshooter",
            "--shape-count",
            "10",
            "--formation-interval-ms",
            "30000",
            "--formation-y",
            "0.5",
            "--no-background",
        ])
        .expect("valid arguments");

        let config = args.backdrop_config().expect("valid config");
        assert_eq!(config.shape_count, 10);
        assert_eq!(config.formation.interval_ms, 30_000.0);
        assert_eq!(config.formation.y_fraction, 0.5);
        assert!(!config.draw_background);
        assert_eq!(config.formation.hold_ms, 5_000.0);
    }

    #[test]
    fn defaults_use_the_standard_settle_delay() {
        let args = Args::try_parse_from(["cyan-troubleshooter"]).expect("valid arguments");
        let options = args.app_options().expect("valid options");
        assert_eq!(options.settle_delay_secs, DEFAULT_SETTLE_DELAY_SECS);
        assert!(options.animate_backdrop);
        assert!(options.source.flowchart.is_none());
    }

    #[test]
    fn rejects_invalid_overrides() {
        let args = Args::try_parse_from(["cyan-troubleshooter", "--formation-hold-ms", "0"])
            .expect("valid arguments");
        let error = args.backdrop_config().expect_err("zero hold is invalid");
        assert!(format!("{error:#}").contains("formation.hold_ms"));

        let args = Args::try_parse_from(["cyan-troubleshooter", "--settle-delay-ms=-5"])
            .expect("valid arguments");
        assert!(args.app_options().is_err());
    }
}
