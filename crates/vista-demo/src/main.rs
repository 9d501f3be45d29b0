//! Demo binary driving the adaptive LOD controller through a simulated
//! frame-rate dip and recovery.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p vista-demo` to watch the controller shed
//! and regain detail; `cargo run -p vista-demo -- --boundary-level-adjust 2`
//! to see the granularity offset shrink visible distances.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;
use vista_config::{CliArgs, Config};
use vista_lod::{DisplayMode, LodChange, LodController};
use vista_math::Aabb;

/// A static scene of random objects to run visibility queries against.
fn build_scene(rng: &mut Xoshiro256StarStar, count: usize) -> Vec<Aabb> {
    let mut scene = Vec::with_capacity(count);
    for _ in 0..count {
        let center = Vec3::new(
            rng.gen_range(-3000.0..3000.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-3000.0..3000.0),
        );
        // Log-uniform sizes from sub-millimeter debris to building-scale.
        let size = 10.0_f32.powf(rng.gen_range(-3.5_f32..2.0));
        scene.push(Aabb::from_center_half_extents(center, Vec3::splat(size / 2.0)));
    }
    scene
}

/// Count how many scene objects survive the visibility decision at the
/// controller's current detail scale, viewed from the origin.
fn count_visible(controller: &LodController, scene: &[Aabb]) -> usize {
    let ctx = controller.render_context(Vec3::ZERO);
    scene
        .iter()
        .filter(|bounds| controller.should_render(&ctx, bounds))
        .count()
}

/// Feed one phase of noisy frame-rate samples, advancing time by the
/// achieved frame duration each step. Returns the updated clock.
fn simulate_phase(
    controller: &mut LodController,
    rng: &mut Xoshiro256StarStar,
    mut now: Duration,
    frames: u32,
    base_fps: f32,
    jitter: f32,
) -> Duration {
    for _ in 0..frames {
        let fps = (base_fps + rng.gen_range(-jitter..jitter)).max(1.0);
        now += Duration::from_secs_f64(1.0 / f64::from(fps));
        controller.report_frame(now, fps, DisplayMode::Desktop);
    }
    now
}

/// Show the size-vs-distance curve the current detail scale produces.
fn demonstrate_visibility_curve(controller: &mut LodController) {
    info!("Visibility curve at detail scale {:.0}:", controller.detail_scale());
    for size in [0.0005_f32, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0] {
        let distance = controller.visible_distance(size);
        info!("  object size {size:>8.4}m -> visible within {distance:.1}m");
    }
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .expect("Failed to resolve config directory")
            .join("vista")
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    // Initialize logging with config and debug settings
    let log_dir = config_dir.join("logs");
    vista_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut controller = LodController::new();
    controller.load_settings(&config.lod);
    info!(
        "Controller ready: desktop thresholds {:?}, boundary level adjust {}, automatic {}",
        controller.thresholds(DisplayMode::Desktop),
        controller.boundary_level_adjust(),
        controller.automatic_adjust(),
    );

    // Mirror shift notifications the way a HUD widget would.
    let decreases = Rc::new(Cell::new(0u32));
    let increases = Rc::new(Cell::new(0u32));
    let decrease_count = Rc::clone(&decreases);
    let increase_count = Rc::clone(&increases);
    controller.on_change(move |change| match change {
        LodChange::Decreased => decrease_count.set(decrease_count.get() + 1),
        LodChange::Increased => increase_count.set(increase_count.get() + 1),
    });

    let mut rng = Xoshiro256StarStar::seed_from_u64(42); // Fixed seed for reproducible demo
    let scene = build_scene(&mut rng, 1000);
    info!("Scene: {} objects viewed from the origin", scene.len());

    demonstrate_visibility_curve(&mut controller);

    // Phase 1: healthy frame rate (covers warm-up).
    let mut now = Duration::ZERO;
    now = simulate_phase(&mut controller, &mut rng, now, 600, 60.0, 3.0);
    info!(
        "After steady phase: state {:?}, {} of {} objects visible, {}",
        controller.state(),
        count_visible(&controller, &scene),
        scene.len(),
        controller.feedback_text(),
    );

    // Phase 2: heavy scene tanks the frame rate; detail is shed.
    now = simulate_phase(&mut controller, &mut rng, now, 600, 14.0, 2.0);
    info!(
        "After heavy phase: state {:?}, {} of {} objects visible, {}",
        controller.state(),
        count_visible(&controller, &scene),
        scene.len(),
        controller.feedback_text(),
    );

    // Phase 3: load clears; detail is gradually restored.
    now = simulate_phase(&mut controller, &mut rng, now, 1200, 70.0, 3.0);
    info!(
        "After recovery phase: state {:?}, {} of {} objects visible, {}",
        controller.state(),
        count_visible(&controller, &scene),
        scene.len(),
        controller.feedback_text(),
    );

    demonstrate_visibility_curve(&mut controller);
    info!(
        "Simulated {:.1}s of frames: {} down-shifts, {} up-shifts, actor distance multiplier {:.2}",
        now.as_secs_f64(),
        decreases.get(),
        increases.get(),
        controller.actor_distance_multiplier(),
    );

    // Persist any threshold/boundary state for the next run.
    controller.save_settings(&mut config.lod);
    if let Err(e) = config.save(&config_dir) {
        eprintln!("Failed to save config: {e}");
    }
}
