//! f32 spatial primitives shared by the Vista LOD crates.

mod aabb;

pub use aabb::Aabb;
