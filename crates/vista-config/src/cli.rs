//! Command-line argument parsing for Vista.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Vista command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "vista", about = "Vista adaptive LOD")]
pub struct CliArgs {
    /// Desktop down-shift threshold in FPS.
    #[arg(long)]
    pub desktop_decrease_fps: Option<f32>,

    /// Desktop up-shift threshold in FPS.
    #[arg(long)]
    pub desktop_increase_fps: Option<f32>,

    /// Immersive down-shift threshold in FPS.
    #[arg(long)]
    pub immersive_decrease_fps: Option<f32>,

    /// Immersive up-shift threshold in FPS.
    #[arg(long)]
    pub immersive_increase_fps: Option<f32>,

    /// Boundary level adjust (0 = standard granularity).
    #[arg(long)]
    pub boundary_level_adjust: Option<u32>,

    /// Enable or disable automatic LOD adjustment.
    #[arg(long)]
    pub automatic_adjust: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(fps) = args.desktop_decrease_fps {
            self.lod.desktop_decrease_fps = fps;
        }
        if let Some(fps) = args.desktop_increase_fps {
            self.lod.desktop_increase_fps = fps;
        }
        if let Some(fps) = args.immersive_decrease_fps {
            self.lod.immersive_decrease_fps = fps;
        }
        if let Some(fps) = args.immersive_increase_fps {
            self.lod.immersive_increase_fps = fps;
        }
        if let Some(adjust) = args.boundary_level_adjust {
            self.lod.boundary_level_adjust = adjust;
        }
        if let Some(auto) = args.automatic_adjust {
            self.lod.automatic_adjust = auto;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
