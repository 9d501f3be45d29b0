//! Frame-rate hysteresis state machine driving the detail scale.
//!
//! Down-shifts must react quickly to protect frame rate, but the decision
//! to *start* down-shifting uses a long window to avoid over-reacting to a
//! momentary stutter. Up-shifts use a single moderate window plus a long
//! cool-down, since regaining detail is not time-critical.

use std::time::Duration;

use glam::Vec3;
use tracing::debug;
use vista_config::LodConfig;
use vista_math::Aabb;

use crate::moving_average::MovingAverageWindow;
use crate::visibility::{
    DEFAULT_DETAIL_SCALE, MAX_DETAIL_SCALE, MIN_DETAIL_SCALE, RenderContext, VisibilityDecider,
};

/// Frame rate assumed while the first samples warm up.
pub const ASSUMED_FPS: f32 = 60.0;

/// The first ~100 reported samples at startup are all over the place and
/// must not be trusted; they are replaced with [`ASSUMED_FPS`].
pub const WARMUP_SAMPLES: u64 = 100;

/// Span of the long window gating the first down-shift out of `Stable`.
const START_WINDOW_SPAN: Duration = Duration::from_millis(3000);
/// Span of the short window driving subsequent down-shifts.
const DOWN_WINDOW_SPAN: Duration = Duration::from_millis(500);
/// Span of the window driving up-shifts.
const UP_WINDOW_SPAN: Duration = Duration::from_millis(2500);

/// Minimum time in `Stable` (or since the last up-shift) before the first
/// down-shift is considered.
const START_SHIFT_COOLDOWN: Duration = Duration::from_millis(500);
/// Minimum time between consecutive down-shifts.
const DOWN_SHIFT_COOLDOWN: Duration = Duration::from_millis(250);
/// Minimum time between consecutive up-shifts.
const UP_SHIFT_COOLDOWN: Duration = Duration::from_millis(1750);

/// Multiplicative step applied to the detail scale on a down-shift.
const DETAIL_SCALE_DOWN_FACTOR: f32 = 0.9;
/// Multiplicative step applied to the detail scale on an up-shift.
const DETAIL_SCALE_UP_FACTOR: f32 = 1.1;

/// Animated actor models are costlier than static geometry; their distance
/// multiplier scales up this much faster as detail drops.
const ACTOR_TO_GEOMETRY_RATIO: f32 = 24.0;

/// Which threshold pair frame reports are judged against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// Flat-screen rendering; modest frame-rate requirements.
    Desktop,
    /// Head-tracked rendering; frame drops are far more objectionable.
    Immersive,
}

/// Down-shift / up-shift FPS thresholds for one display mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdPair {
    /// Detail is reduced when the averaged FPS falls below this.
    pub decrease_fps: f32,
    /// Detail is restored when the averaged FPS rises above this.
    pub increase_fps: f32,
}

/// Hysteresis state. Exactly one holds at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LodState {
    /// Frame rate is acceptable; only the long start window can trigger
    /// a down-shift.
    Stable,
    /// Actively shedding detail; the short down window re-evaluates on
    /// every cool-down expiry.
    Downshifting,
}

/// Notification delivered synchronously to registered observers when a
/// shift changes the detail scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LodChange {
    /// The detail scale was raised (more detail visible).
    Increased,
    /// The detail scale was lowered (less detail visible).
    Decreased,
}

/// Adaptive LOD controller: owns the detail scale, the three averaging
/// windows, the per-mode thresholds, and the cached visibility decider.
///
/// Single-threaded and frame-synchronous: call
/// [`report_frame`](Self::report_frame) exactly once per render frame,
/// then issue visibility queries for that frame's candidate objects.
pub struct LodController {
    state: LodState,
    detail_scale: f32,
    boundary_level_adjust: u32,
    automatic_adjust: bool,
    desktop_thresholds: ThresholdPair,
    immersive_thresholds: ThresholdPair,
    start_window: MovingAverageWindow,
    down_window: MovingAverageWindow,
    up_window: MovingAverageWindow,
    last_stable: Duration,
    last_up_shift: Duration,
    last_down_shift: Duration,
    actor_distance_multiplier: f32,
    decider: VisibilityDecider,
    observers: Vec<Box<dyn FnMut(LodChange)>>,
}

impl LodController {
    /// Create a controller at full detail, in `Stable`, with automatic
    /// adjustment enabled and default thresholds.
    pub fn new() -> Self {
        let mut controller = Self {
            state: LodState::Stable,
            detail_scale: DEFAULT_DETAIL_SCALE,
            boundary_level_adjust: 0,
            automatic_adjust: true,
            desktop_thresholds: ThresholdPair {
                decrease_fps: 30.0,
                increase_fps: 35.0,
            },
            immersive_thresholds: ThresholdPair {
                decrease_fps: 60.0,
                increase_fps: 65.0,
            },
            start_window: MovingAverageWindow::new(START_WINDOW_SPAN),
            down_window: MovingAverageWindow::new(DOWN_WINDOW_SPAN),
            up_window: MovingAverageWindow::new(UP_WINDOW_SPAN),
            last_stable: Duration::ZERO,
            last_up_shift: Duration::ZERO,
            last_down_shift: Duration::ZERO,
            actor_distance_multiplier: 0.0,
            decider: VisibilityDecider::new(),
            observers: Vec::new(),
        };
        controller.recompute_actor_distance_multiplier();
        controller
    }

    /// Report one frame's achieved frame rate at monotonic time `now`.
    ///
    /// Updates the averaging windows unconditionally; evaluates shift
    /// conditions only while automatic adjustment is enabled, so a
    /// disabled controller stays warm and ready to resume.
    pub fn report_frame(&mut self, now: Duration, current_fps: f32, mode: DisplayMode) {
        let mut fps = current_fps;
        if self.up_window.sample_count() < WARMUP_SAMPLES {
            // Startup frame times are noise; stuff the windows with
            // assumed-good data and keep the shift clocks pinned to now.
            fps = ASSUMED_FPS;
            self.last_stable = now;
            self.last_up_shift = now;
            self.last_down_shift = now;
        }

        self.start_window.update(now, fps);
        self.down_window.update(now, fps);
        self.up_window.update(now, fps);

        if !self.automatic_adjust {
            return;
        }

        let thresholds = self.thresholds(mode);
        let elapsed_since_down_shift = now.saturating_sub(self.last_down_shift);
        let elapsed_since_up_shift = now.saturating_sub(self.last_up_shift);
        let elapsed_since_stable_or_up_shift =
            now.saturating_sub(self.last_stable.max(self.last_up_shift));

        let mut do_down_shift = false;
        match self.state {
            LodState::Downshifting => {
                // Only re-evaluate once the down-shift cool-down has elapsed.
                if elapsed_since_down_shift > DOWN_SHIFT_COOLDOWN {
                    do_down_shift = self.down_window.average() < thresholds.decrease_fps;
                    if !do_down_shift {
                        debug!(
                            "down-shifting appears to be done; frame rate recovered to {:.1}",
                            self.down_window.average()
                        );
                        self.state = LodState::Stable;
                        self.last_stable = now;
                    }
                }
            }
            LodState::Stable => {
                do_down_shift = elapsed_since_stable_or_up_shift > START_SHIFT_COOLDOWN
                    && self.start_window.average() < thresholds.decrease_fps;
            }
        }

        if do_down_shift {
            if self.detail_scale > MIN_DETAIL_SCALE {
                self.detail_scale =
                    (self.detail_scale * DETAIL_SCALE_DOWN_FACTOR).max(MIN_DETAIL_SCALE);

                if self.state == LodState::Downshifting {
                    debug!(
                        "adjusting detail DOWN: average fps for last {:.1}s was {:.1}, \
                         minimum is {:.1}, new detail scale {:.0}",
                        DOWN_WINDOW_SPAN.as_secs_f32(),
                        self.down_window.average(),
                        thresholds.decrease_fps,
                        self.detail_scale
                    );
                } else {
                    debug!(
                        "adjusting detail DOWN after initial delay: average fps for last \
                         {:.1}s was {:.1}, minimum is {:.1}, new detail scale {:.0}",
                        START_WINDOW_SPAN.as_secs_f32(),
                        self.start_window.average(),
                        thresholds.decrease_fps,
                        self.detail_scale
                    );
                }

                self.last_down_shift = now;
                self.state = LodState::Downshifting;
                self.recompute_actor_distance_multiplier();
                self.decider.mark_dirty();
                self.notify(LodChange::Decreased);
            }
        } else if elapsed_since_up_shift > UP_SHIFT_COOLDOWN
            && self.up_window.average() > thresholds.increase_fps
            && self.detail_scale < MAX_DETAIL_SCALE
        {
            let base = if self.detail_scale <= MIN_DETAIL_SCALE {
                MIN_DETAIL_SCALE
            } else {
                self.detail_scale
            };
            let new_scale = (base * DETAIL_SCALE_UP_FACTOR).min(MAX_DETAIL_SCALE);
            if new_scale != self.detail_scale {
                self.detail_scale = new_scale;
                debug!(
                    "adjusting detail UP: average fps for last {:.1}s was {:.1}, \
                     upshift point is {:.1}, new detail scale {:.0}",
                    UP_WINDOW_SPAN.as_secs_f32(),
                    self.up_window.average(),
                    thresholds.increase_fps,
                    self.detail_scale
                );

                self.last_up_shift = now;
                self.state = LodState::Stable;
                self.recompute_actor_distance_multiplier();
                self.decider.mark_dirty();
                self.notify(LodChange::Increased);
            }
        }
    }

    /// Clear all three windows and restart from `Stable`. The next
    /// [`report_frame`](Self::report_frame) calls re-enter warm-up.
    pub fn reset_adjustment(&mut self, now: Duration) {
        self.start_window.reset();
        self.down_window.reset();
        self.up_window.reset();
        self.last_up_shift = now;
        self.last_down_shift = now;
        self.state = LodState::Stable;
    }

    /// Whether an object of the given size at the given distance from the
    /// viewpoint should be rendered at the current detail scale. Rebuilds
    /// the cached table first if a shift or setter invalidated it.
    pub fn is_visible(&mut self, object_size: f32, distance: f32) -> bool {
        self.decider
            .is_visible(self.detail_scale, self.boundary_level_adjust, object_size, distance)
    }

    /// Maximum distance at which an object of the given size is rendered
    /// at the current detail scale. Debug/tooling surface.
    pub fn visible_distance(&mut self, object_size: f32) -> f32 {
        self.decider
            .visible_distance(self.detail_scale, self.boundary_level_adjust, object_size)
    }

    /// Whether the bounded object should be rendered given a per-frame
    /// render context (see [`render_context`](Self::render_context)).
    pub fn should_render(&self, ctx: &RenderContext, bounds: &Aabb) -> bool {
        self.decider.should_render(ctx, bounds)
    }

    /// Snapshot the current detail scale and boundary level for the render
    /// pipeline's per-frame arguments.
    pub fn render_context(&self, view_position: Vec3) -> RenderContext {
        RenderContext {
            detail_scale: self.detail_scale,
            boundary_level_adjust: self.boundary_level_adjust,
            view_position,
        }
    }

    /// Register an observer fired synchronously on every shift.
    pub fn on_change(&mut self, observer: impl FnMut(LodChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: LodChange) {
        for observer in &mut self.observers {
            observer(change);
        }
    }

    fn recompute_actor_distance_multiplier(&mut self) {
        self.actor_distance_multiplier =
            ACTOR_TO_GEOMETRY_RATIO / (self.detail_scale / DEFAULT_DETAIL_SCALE);
    }

    /// Human-readable summary of the current detail scale as a "20:N
    /// vision" ratio with a granularity suffix.
    pub fn feedback_text(&self) -> String {
        let granularity = match self.boundary_level_adjust {
            0 => ".".to_string(),
            1 => " at half of standard granularity.".to_string(),
            2 => " at a third of standard granularity.".to_string(),
            n => format!(" at 1/{}th of standard granularity.", n + 1),
        };

        let relative_to_default = self.detail_scale / DEFAULT_DETAIL_SCALE;
        let relative_to_twenty_twenty = (20.0 / relative_to_default) as i32;

        if relative_to_default > 1.01 {
            format!(
                "20:{relative_to_twenty_twenty} or {relative_to_default:.2} times further \
                 than average vision{granularity}"
            )
        } else if relative_to_default > 0.99 {
            format!("20:20 or the default distance for average vision{granularity}")
        } else if relative_to_default > 0.01 {
            format!(
                "20:{relative_to_twenty_twenty} or {relative_to_default:.3} of default \
                 distance for average vision{granularity}"
            )
        } else {
            format!(
                "{relative_to_default:.3} of default distance for average vision{granularity}"
            )
        }
    }

    // --- Settings bridge ---

    /// Apply persisted settings to the controller.
    pub fn load_settings(&mut self, config: &LodConfig) {
        self.desktop_thresholds = ThresholdPair {
            decrease_fps: config.desktop_decrease_fps,
            increase_fps: config.desktop_increase_fps,
        };
        self.immersive_thresholds = ThresholdPair {
            decrease_fps: config.immersive_decrease_fps,
            increase_fps: config.immersive_increase_fps,
        };
        self.set_boundary_level_adjust(config.boundary_level_adjust);
        self.automatic_adjust = config.automatic_adjust;
    }

    /// Copy controller state back into the persisted settings.
    pub fn save_settings(&self, config: &mut LodConfig) {
        config.desktop_decrease_fps = self.desktop_thresholds.decrease_fps;
        config.desktop_increase_fps = self.desktop_thresholds.increase_fps;
        config.immersive_decrease_fps = self.immersive_thresholds.decrease_fps;
        config.immersive_increase_fps = self.immersive_thresholds.increase_fps;
        config.boundary_level_adjust = self.boundary_level_adjust;
        config.automatic_adjust = self.automatic_adjust;
    }

    // --- Accessors / external overrides ---

    /// Current hysteresis state.
    pub fn state(&self) -> LodState {
        self.state
    }

    /// Current detail scale.
    pub fn detail_scale(&self) -> f32 {
        self.detail_scale
    }

    /// External override for the detail scale (debug tooling). Stores the
    /// raw value and invalidates the table exactly as an internal shift
    /// would; the next up-shift clamps back into range.
    pub fn set_detail_scale(&mut self, detail_scale: f32) {
        self.detail_scale = detail_scale;
        self.recompute_actor_distance_multiplier();
        self.decider.mark_dirty();
    }

    /// Current boundary level adjust.
    pub fn boundary_level_adjust(&self) -> u32 {
        self.boundary_level_adjust
    }

    /// Set the boundary level adjust, invalidating the table.
    pub fn set_boundary_level_adjust(&mut self, boundary_level_adjust: u32) {
        self.boundary_level_adjust = boundary_level_adjust;
        self.decider.mark_dirty();
    }

    /// Whether automatic adjustment is enabled.
    pub fn automatic_adjust(&self) -> bool {
        self.automatic_adjust
    }

    /// Enable or disable automatic adjustment. While disabled, frame
    /// reports still feed the windows but never shift the scale.
    pub fn set_automatic_adjust(&mut self, enabled: bool) {
        self.automatic_adjust = enabled;
    }

    /// Distance multiplier for animated actor models at the current
    /// detail scale.
    pub fn actor_distance_multiplier(&self) -> f32 {
        self.actor_distance_multiplier
    }

    /// The threshold pair for the given display mode.
    pub fn thresholds(&self, mode: DisplayMode) -> ThresholdPair {
        match mode {
            DisplayMode::Desktop => self.desktop_thresholds,
            DisplayMode::Immersive => self.immersive_thresholds,
        }
    }

    /// Replace the threshold pair for the given display mode.
    pub fn set_thresholds(&mut self, mode: DisplayMode, thresholds: ThresholdPair) {
        match mode {
            DisplayMode::Desktop => self.desktop_thresholds = thresholds,
            DisplayMode::Immersive => self.immersive_thresholds = thresholds,
        }
    }
}

impl Default for LodController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    /// Controller with 20/55 desktop thresholds plus a shared log of every
    /// shift notification.
    fn test_controller() -> (LodController, Rc<RefCell<Vec<LodChange>>>) {
        let mut controller = LodController::new();
        controller.set_thresholds(
            DisplayMode::Desktop,
            ThresholdPair {
                decrease_fps: 20.0,
                increase_fps: 55.0,
            },
        );
        let changes = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&changes);
        controller.on_change(move |change| log.borrow_mut().push(change));
        (controller, changes)
    }

    /// Drive the controller through warm-up at 60 FPS; returns the time of
    /// the last warm-up frame.
    fn warm_up(controller: &mut LodController) -> Duration {
        let mut now = Duration::ZERO;
        for _ in 0..WARMUP_SAMPLES {
            now += secs(FRAME);
            controller.report_frame(now, 60.0, DisplayMode::Desktop);
        }
        now
    }

    /// Feed a constant FPS until the predicate holds or the deadline passes.
    fn feed_until(
        controller: &mut LodController,
        mut now: Duration,
        fps: f32,
        deadline: Duration,
        mut done: impl FnMut(&LodController) -> bool,
    ) -> Duration {
        let dt = secs(1.0 / f64::from(fps.max(1.0)));
        while now < deadline && !done(controller) {
            now += dt;
            controller.report_frame(now, fps, DisplayMode::Desktop);
        }
        now
    }

    /// The detail scale stays within bounds for any sample sequence.
    #[test]
    fn test_detail_scale_stays_in_bounds() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let (mut controller, _changes) = test_controller();
        let mut now = Duration::ZERO;
        for _ in 0..5000 {
            now += secs(rng.gen_range(0.001..0.1));
            let fps: f32 = rng.gen_range(0.0..120.0);
            controller.report_frame(now, fps, DisplayMode::Desktop);
            let scale = controller.detail_scale();
            assert!(
                (MIN_DETAIL_SCALE..=MAX_DETAIL_SCALE).contains(&scale),
                "detail scale {scale} escaped [{MIN_DETAIL_SCALE}, {MAX_DETAIL_SCALE}]"
            );
        }
    }

    /// Terrible frame rates during warm-up are replaced with the assumed
    /// FPS and never trigger a shift.
    #[test]
    fn test_warmup_ignores_early_samples() {
        let (mut controller, changes) = test_controller();
        let mut now = Duration::ZERO;
        for _ in 0..50 {
            now += secs(FRAME);
            controller.report_frame(now, 1.0, DisplayMode::Desktop);
        }
        assert_eq!(controller.state(), LodState::Stable);
        assert_eq!(controller.detail_scale(), DEFAULT_DETAIL_SCALE);
        assert!(changes.borrow().is_empty());
        // The windows saw the assumed rate, not the reported one.
        assert!((controller.up_window.average() - ASSUMED_FPS).abs() < 1e-3);
    }

    /// Starting Stable, sustained FPS below the decrease threshold triggers
    /// exactly one down-shift and a transition to Downshifting.
    #[test]
    fn test_sustained_low_fps_triggers_downshift() {
        let (mut controller, changes) = test_controller();
        let start = warm_up(&mut controller);

        feed_until(&mut controller, start, 15.0, start + secs(10.0), |c| {
            c.state() == LodState::Downshifting
        });

        assert_eq!(controller.state(), LodState::Downshifting);
        assert_eq!(changes.borrow().as_slice(), &[LodChange::Decreased]);
        assert!(controller.detail_scale() < DEFAULT_DETAIL_SCALE);
    }

    /// While Downshifting, sustained FPS back above the decrease threshold
    /// returns to Stable with no further scale change.
    #[test]
    fn test_recovery_transitions_to_stable() {
        let (mut controller, changes) = test_controller();
        let start = warm_up(&mut controller);
        let now = feed_until(&mut controller, start, 15.0, start + secs(10.0), |c| {
            c.state() == LodState::Downshifting
        });
        let scale_after_down = controller.detail_scale();

        // 45 FPS sits between the thresholds: enough to end the down-shift,
        // not enough to earn detail back.
        feed_until(&mut controller, now, 45.0, now + secs(2.0), |_| false);

        assert_eq!(controller.state(), LodState::Stable);
        assert_eq!(controller.detail_scale(), scale_after_down);
        assert_eq!(changes.borrow().as_slice(), &[LodChange::Decreased]);
    }

    /// A down-shift followed by FPS above the increase threshold for longer
    /// than the up cool-down triggers exactly one up-shift; the scale
    /// recovers and never decreases further.
    #[test]
    fn test_upshift_recovers_after_downshift() {
        let (mut controller, changes) = test_controller();
        let start = warm_up(&mut controller);
        let now = feed_until(&mut controller, start, 15.0, start + secs(10.0), |c| {
            c.state() == LodState::Downshifting
        });
        let scale_after_down = controller.detail_scale();

        feed_until(&mut controller, now, 60.0, now + secs(3.0), |_| false);

        assert_eq!(controller.state(), LodState::Stable);
        assert!(
            controller.detail_scale() > scale_after_down,
            "up-shift must raise the scale"
        );
        assert!(controller.detail_scale() <= MAX_DETAIL_SCALE);
        assert_eq!(
            changes.borrow().as_slice(),
            &[LodChange::Decreased, LodChange::Increased]
        );
    }

    /// 150 samples of 15 FPS (warm-up included) must produce at least one
    /// Decreased notification and leave the controller Downshifting.
    #[test]
    fn test_concrete_low_fps_scenario() {
        let (mut controller, changes) = test_controller();
        for i in 1..=150u32 {
            let now = secs(f64::from(i) / 15.0);
            controller.report_frame(now, 15.0, DisplayMode::Desktop);
        }
        assert!(
            changes
                .borrow()
                .iter()
                .any(|&c| c == LodChange::Decreased),
            "expected at least one Decreased notification"
        );
        assert_eq!(controller.state(), LodState::Downshifting);
    }

    /// With automatic adjustment disabled the windows keep accumulating but
    /// nothing shifts.
    #[test]
    fn test_disabled_controller_stays_warm() {
        let (mut controller, changes) = test_controller();
        controller.set_automatic_adjust(false);
        let start = warm_up(&mut controller);
        feed_until(&mut controller, start, 10.0, start + secs(10.0), |_| false);

        assert_eq!(controller.state(), LodState::Stable);
        assert_eq!(controller.detail_scale(), DEFAULT_DETAIL_SCALE);
        assert!(changes.borrow().is_empty());
        assert!(controller.up_window.sample_count() > WARMUP_SAMPLES);
    }

    /// The immersive threshold pair is judged independently of desktop.
    #[test]
    fn test_display_mode_selects_thresholds() {
        let mut controller = LodController::new();
        controller.set_thresholds(
            DisplayMode::Immersive,
            ThresholdPair {
                decrease_fps: 90.0,
                increase_fps: 95.0,
            },
        );
        let mut now = Duration::ZERO;
        for _ in 0..WARMUP_SAMPLES {
            now += secs(FRAME);
            controller.report_frame(now, 60.0, DisplayMode::Immersive);
        }
        // 60 FPS is fine on desktop but below the immersive decrease point.
        for _ in 0..300 {
            now += secs(FRAME);
            controller.report_frame(now, 60.0, DisplayMode::Immersive);
        }
        assert_eq!(controller.state(), LodState::Downshifting);
        assert!(controller.detail_scale() < DEFAULT_DETAIL_SCALE);
    }

    /// Changing the boundary level adjust marks the table dirty and changes
    /// returned visible distances without touching the detail scale.
    #[test]
    fn test_boundary_adjust_invalidates_table() {
        let (mut controller, _changes) = test_controller();
        let at_zero = controller.visible_distance(1.0);
        assert!(!controller.decider.is_dirty());

        controller.set_boundary_level_adjust(2);
        assert!(controller.decider.is_dirty());
        assert_eq!(controller.detail_scale(), DEFAULT_DETAIL_SCALE);

        let at_two = controller.visible_distance(1.0);
        assert!((at_zero / at_two - 4.0).abs() < 1e-4);
    }

    /// The external detail-scale override invalidates the table like an
    /// internal shift would.
    #[test]
    fn test_set_detail_scale_invalidates_table() {
        let (mut controller, _changes) = test_controller();
        let before = controller.visible_distance(1.0);
        controller.set_detail_scale(DEFAULT_DETAIL_SCALE * 0.5);
        assert!(controller.decider.is_dirty());
        let after = controller.visible_distance(1.0);
        assert!((before / after - 2.0).abs() < 1e-4);
    }

    /// Reset clears the windows and re-enters warm-up.
    #[test]
    fn test_reset_adjustment_reenters_warmup() {
        let (mut controller, _changes) = test_controller();
        let now = warm_up(&mut controller);
        controller.reset_adjustment(now);
        assert_eq!(controller.state(), LodState::Stable);
        assert_eq!(controller.up_window.sample_count(), 0);

        // The first post-reset sample is substituted again.
        controller.report_frame(now + secs(FRAME), 2.0, DisplayMode::Desktop);
        assert!((controller.up_window.average() - ASSUMED_FPS).abs() < 1e-3);
    }

    /// Actor distance multiplier grows as the detail scale shrinks.
    #[test]
    fn test_actor_distance_multiplier_tracks_scale() {
        let mut controller = LodController::new();
        let at_default = controller.actor_distance_multiplier();
        controller.set_detail_scale(DEFAULT_DETAIL_SCALE * 0.5);
        assert!((controller.actor_distance_multiplier() - at_default * 2.0).abs() < 1e-3);
    }

    /// Feedback text renders the 20:N vision ratio and granularity suffix.
    #[test]
    fn test_feedback_text() {
        let mut controller = LodController::new();
        assert_eq!(
            controller.feedback_text(),
            "20:20 or the default distance for average vision."
        );

        controller.set_detail_scale(DEFAULT_DETAIL_SCALE * 0.5);
        assert_eq!(
            controller.feedback_text(),
            "20:40 or 0.500 of default distance for average vision."
        );

        controller.set_boundary_level_adjust(1);
        controller.set_detail_scale(DEFAULT_DETAIL_SCALE * 2.0);
        assert_eq!(
            controller.feedback_text(),
            "20:10 or 2.00 times further than average vision at half of standard granularity."
        );
    }

    /// Settings round-trip through the config struct.
    #[test]
    fn test_settings_roundtrip() {
        let config = LodConfig {
            desktop_decrease_fps: 22.0,
            desktop_increase_fps: 44.0,
            immersive_decrease_fps: 66.0,
            immersive_increase_fps: 77.0,
            boundary_level_adjust: 3,
            automatic_adjust: false,
        };
        let mut controller = LodController::new();
        controller.load_settings(&config);

        assert_eq!(
            controller.thresholds(DisplayMode::Desktop),
            ThresholdPair {
                decrease_fps: 22.0,
                increase_fps: 44.0
            }
        );
        assert_eq!(controller.boundary_level_adjust(), 3);
        assert!(!controller.automatic_adjust());

        let mut saved = LodConfig::default();
        controller.save_settings(&mut saved);
        assert_eq!(saved, config);
    }
}
