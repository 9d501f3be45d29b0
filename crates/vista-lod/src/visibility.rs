//! Size-vs-distance visibility lookup derived from the detail scale.
//!
//! The table stores one row per power-of-two object size, from half the
//! world scale down to a 1 mm floor, each mapped to the maximum distance
//! at which an object of that size is still worth drawing. Smaller objects
//! are visible only from closer. The table is cheap to rebuild but queried
//! once per candidate object per frame, so it is cached and invalidated by
//! a dirty flag whenever the detail scale or boundary level changes.

use glam::Vec3;
use vista_math::Aabb;

/// Largest spatial scale in the world, in meters. The visibility table's
/// coarsest row sits at half this size.
pub const WORLD_MAX_SCALE: f32 = 16384.0;

/// Detail scale corresponding to "average vision": the default and maximum.
pub const DEFAULT_DETAIL_SCALE: f32 = WORLD_MAX_SCALE * 400.0;

/// Floor the automatic adjustment will not shift below.
pub const MIN_DETAIL_SCALE: f32 = DEFAULT_DETAIL_SCALE * 0.25;

/// Ceiling the automatic adjustment will not shift above.
pub const MAX_DETAIL_SCALE: f32 = DEFAULT_DETAIL_SCALE;

/// Smallest object size the table resolves. 1mm is plenty small.
const SMALLEST_TABLE_SCALE: f32 = 0.001;

/// Must be this many times closer to fine geometry than to coarse
/// structure to see it.
const STRUCTURE_TO_MESH_RATIO: f32 = 4.0;

/// Visible distance for a given boundary level at the given detail scale.
/// Each level halves the distance at which a boundary of that granularity
/// is rendered.
pub fn boundary_distance_for_level(level: u32, detail_scale: f32) -> f32 {
    detail_scale / 2f32.powi(level as i32)
}

/// Per-frame snapshot of the values the render pipeline needs for
/// visibility queries: the current detail scale and boundary level, plus
/// the viewpoint the frame is rendered from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderContext {
    /// Detail scale in effect for this frame.
    pub detail_scale: f32,
    /// Boundary level adjust in effect for this frame.
    pub boundary_level_adjust: u32,
    /// World-space viewpoint distances are measured from.
    pub view_position: Vec3,
}

/// Cached mapping from object-size thresholds to maximum visible distance.
///
/// Rows are ascending by size. `max_visible` is the distance for objects
/// at or beyond the world scale, kept outside the rows so oversized
/// lookups have a fallback.
#[derive(Clone, Debug, PartialEq)]
struct VisibilityTable {
    rows: Vec<(f32, f32)>,
    max_visible: f32,
    dirty: bool,
}

impl VisibilityTable {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            max_visible: 0.0,
            dirty: true,
        }
    }

    /// Rebuild all rows from the given detail scale and boundary level,
    /// clearing the dirty flag. Idempotent for unchanged inputs.
    fn rebuild(&mut self, detail_scale: f32, boundary_level_adjust: u32) {
        self.max_visible = boundary_distance_for_level(boundary_level_adjust, detail_scale)
            / STRUCTURE_TO_MESH_RATIO;
        self.rows.clear();

        let mut scale = WORLD_MAX_SCALE;
        let mut visible = self.max_visible;
        while scale > SMALLEST_TABLE_SCALE {
            scale *= 0.5;
            visible *= 0.5;
            self.rows.push((scale, visible));
        }
        // Stored coarse-to-fine; kept ascending for partition_point.
        self.rows.reverse();
        self.dirty = false;
    }

    /// Maximum distance at which an object of the given size is rendered.
    ///
    /// Sizes below the finest row are never culled (returns infinity);
    /// sizes above the coarsest row fall back to the max-scale distance,
    /// doubled as a conservative correction for landing between steps.
    fn visible_distance(&self, object_size: f32) -> f32 {
        let Some(&(smallest_size, _)) = self.rows.first() else {
            return self.max_visible;
        };
        if object_size < smallest_size {
            return f32::INFINITY;
        }

        let index = self.rows.partition_point(|&(size, _)| size < object_size);
        let (closest_size, mut visible) = match self.rows.get(index) {
            Some(&row) => row,
            None => (WORLD_MAX_SCALE, self.max_visible),
        };
        if closest_size < object_size {
            visible *= 2.0;
        }
        visible
    }
}

/// Factor ladder shared by the render-context query path: the same
/// power-of-two steps as the table, but storing scale-independent
/// fractions of the max-scale distance instead of distances.
fn build_factor_ladder() -> Vec<(f32, f32)> {
    let mut rows = Vec::new();
    let mut scale = WORLD_MAX_SCALE;
    let mut factor = 1.0_f32;
    while scale > SMALLEST_TABLE_SCALE {
        scale *= 0.5;
        factor *= 0.5;
        rows.push((scale, factor));
    }
    rows.reverse();
    rows
}

/// Stateless-per-call visibility decisions backed by the cached
/// [`VisibilityTable`].
///
/// Two call shapes are offered: [`is_visible`](Self::is_visible) consumes a
/// precomputed size/distance pair against the distance table, while
/// [`should_render`](Self::should_render) takes a [`RenderContext`] and a
/// bounding box and applies the factor ladder, which depends only on the
/// context passed in. Both produce the same decision for the same inputs.
pub struct VisibilityDecider {
    table: VisibilityTable,
    factors: Vec<(f32, f32)>,
}

impl VisibilityDecider {
    /// Create a decider with an unbuilt (dirty) table. The table is built
    /// lazily on the first query.
    pub fn new() -> Self {
        Self {
            table: VisibilityTable::new(),
            factors: build_factor_ladder(),
        }
    }

    /// Invalidate the cached table. Must be called whenever the detail
    /// scale or boundary level adjust passed to queries changes.
    pub fn mark_dirty(&mut self) {
        self.table.dirty = true;
    }

    /// Whether the table will be rebuilt on the next query.
    pub fn is_dirty(&self) -> bool {
        self.table.dirty
    }

    /// Maximum distance at which an object of the given size is rendered,
    /// rebuilding the table first if it is dirty.
    pub fn visible_distance(
        &mut self,
        detail_scale: f32,
        boundary_level_adjust: u32,
        object_size: f32,
    ) -> f32 {
        if self.table.dirty {
            self.table.rebuild(detail_scale, boundary_level_adjust);
        }
        self.table.visible_distance(object_size)
    }

    /// Whether an object of the given size at the given distance from the
    /// viewpoint should be rendered.
    pub fn is_visible(
        &mut self,
        detail_scale: f32,
        boundary_level_adjust: u32,
        object_size: f32,
        distance: f32,
    ) -> bool {
        distance <= self.visible_distance(detail_scale, boundary_level_adjust, object_size)
    }

    /// Whether the bounded object should be rendered given the context's
    /// detail scale, boundary level, and viewpoint.
    ///
    /// Uses the scale-independent factor ladder, so it never touches the
    /// cached table and takes `&self`.
    pub fn should_render(&self, ctx: &RenderContext, bounds: &Aabb) -> bool {
        let max_visible = boundary_distance_for_level(ctx.boundary_level_adjust, ctx.detail_scale)
            / STRUCTURE_TO_MESH_RATIO;
        let object_size = bounds.largest_dimension();
        let distance = (bounds.center() - ctx.view_position).length();

        let Some(&(smallest_size, _)) = self.factors.first() else {
            return distance <= max_visible;
        };
        if object_size < smallest_size {
            return true;
        }

        let index = self.factors.partition_point(|&(size, _)| size < object_size);
        let (closest_size, mut visible) = match self.factors.get(index) {
            Some(&(size, factor)) => (size, max_visible * factor),
            None => (WORLD_MAX_SCALE, max_visible),
        };
        if closest_size < object_size {
            visible *= 2.0;
        }
        distance <= visible
    }
}

impl Default for VisibilityDecider {
    fn default() -> Self {
        Self::new()
    }
}
