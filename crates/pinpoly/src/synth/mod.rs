//! Random polygon sources.
//!
//! - `convex`: Valtr-style construction, simple and convex by construction.
//! - `concave`: jittered star, best effort only (may self-intersect for unlucky jitter).
//!
//! Both take the random source by `&mut`, so a seeded `StdRng` replays the same polygon.

mod concave;
mod convex;

pub use concave::star_polygon;
pub use convex::convex_polygon;

use crate::error::Error;
use crate::geom::{Point, Polygon};
use rand::Rng;
use std::fmt;

/// Generator configuration.
#[derive(Clone, Copy, Debug)]
pub struct SynthCfg {
    /// Convex pool coordinates are drawn from `[0, coord_max)` on both axes.
    pub coord_max: f64,
    /// An axis whose pool span is below this is widened by `1.0`.
    pub span_eps: f64,
    pub star_center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Integer radial jitter drawn from `[-jitter, jitter)`.
    pub jitter: i32,
    pub min_radius: f64,
}

impl Default for SynthCfg {
    fn default() -> Self {
        Self {
            coord_max: 10.0,
            span_eps: 1e-6,
            star_center: Point::new(10.0, 10.0),
            outer_radius: 25.0,
            inner_radius: 10.0,
            jitter: 5,
            min_radius: 3.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonKind {
    Convex,
    Concave,
}

impl PolygonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PolygonKind::Convex => "convex",
            PolygonKind::Concave => "concave",
        }
    }
}

impl fmt::Display for PolygonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a polygon of the requested kind.
///
/// A convex synthesis that cannot reserve its scratch buffers degrades to
/// `Polygon::default_triangle()` (3 vertices regardless of `n`).
/// Invalid `n` is still an error.
pub fn generate<R: Rng + ?Sized>(
    kind: PolygonKind,
    n: usize,
    cfg: &SynthCfg,
    rng: &mut R,
) -> Result<Polygon, Error> {
    match kind {
        PolygonKind::Convex => triangle_on_alloc_failure(convex_polygon(n, cfg, rng)),
        PolygonKind::Concave => star_polygon(n, cfg, rng),
    }
}

fn triangle_on_alloc_failure(res: Result<Polygon, Error>) -> Result<Polygon, Error> {
    match res {
        Err(Error::AllocationFailure { reason }) => {
            tracing::warn!(reason = %reason, "convex synthesis failed; using default triangle");
            Ok(Polygon::default_triangle())
        }
        other => other,
    }
}
