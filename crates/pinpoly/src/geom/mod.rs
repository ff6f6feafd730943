//! Planar value types and the containment predicate.
//!
//! - `Polygon`, `TestBatch`: validated, immutable after construction.
//! - `BoundingBox`: derived once per polygon, used as an O(1) reject filter.
//! - `contains`: bbox reject, then even-odd ray casting.

mod contain;
mod types;

pub(crate) use contain::bounds_of;
pub use contain::{bounding_box, contains, ray_cast};
pub use types::{
    BatchCfg, BoundingBox, Point, Polygon, TestBatch, MAX_VERTICES, MIN_VERTICES,
};
