//! Adaptive level-of-detail control: frame-rate hysteresis, multi-window
//! averaging, and the derived size-vs-distance visibility lookup.
//!
//! The render loop reports its achieved frame rate to [`LodController`] once
//! per frame; the controller nudges a single scalar detail scale up or down
//! and invalidates the cached visibility table. Later in the same frame the
//! renderer asks, per candidate object, whether it is worth drawing at the
//! current detail scale via [`LodController::is_visible`] or
//! [`LodController::should_render`].

mod controller;
mod moving_average;
mod visibility;

pub use controller::{
    ASSUMED_FPS, DisplayMode, LodChange, LodController, LodState, ThresholdPair, WARMUP_SAMPLES,
};
pub use moving_average::MovingAverageWindow;
pub use visibility::{
    DEFAULT_DETAIL_SCALE, MAX_DETAIL_SCALE, MIN_DETAIL_SCALE, RenderContext, VisibilityDecider,
    WORLD_MAX_SCALE, boundary_distance_for_level,
};
