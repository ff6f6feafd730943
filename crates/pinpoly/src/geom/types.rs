//! Validated polygon and batch containers.
//!
//! Bounds are checked once in the constructors; afterwards the containers are
//! read-only, which is what lets worker threads share them by `&` borrow.

use crate::error::Error;
use nalgebra::Vector2;

/// Planar point `(x, y)`.
pub type Point = Vector2<f64>;

pub const MIN_VERTICES: usize = 3;
pub const MAX_VERTICES: usize = 32;

/// Closed polygon; the wrap edge runs from the last vertex back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Pre: `MIN_VERTICES <= vertices.len() <= MAX_VERTICES`, all coordinates finite.
    pub fn new(vertices: Vec<Point>) -> Result<Self, Error> {
        let n = vertices.len();
        if !(MIN_VERTICES..=MAX_VERTICES).contains(&n) {
            return Err(Error::invalid(format!(
                "polygon needs {MIN_VERTICES}..={MAX_VERTICES} vertices, got {n}"
            )));
        }
        if let Some(i) = vertices
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(Error::invalid(format!("vertex {i} is not finite")));
        }
        Ok(Self { vertices })
    }

    /// Fallback used when convex synthesis cannot reserve its buffers.
    pub fn default_triangle() -> Self {
        Self {
            vertices: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(5.0, 10.0),
            ],
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Directed edges `(v[i], v[i+1 mod n])`, wrap edge last.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Axis-aligned extents of a polygon. Bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Batch size limits.
#[derive(Clone, Copy, Debug)]
pub struct BatchCfg {
    pub max_points: usize,
}

impl Default for BatchCfg {
    fn default() -> Self {
        Self { max_points: 32 }
    }
}

/// Ordered query points; results are index-aligned with this order.
#[derive(Clone, Debug, PartialEq)]
pub struct TestBatch {
    points: Vec<Point>,
}

impl TestBatch {
    /// Pre: `1 <= points.len() <= cfg.max_points`.
    pub fn new(points: Vec<Point>, cfg: BatchCfg) -> Result<Self, Error> {
        let m = points.len();
        if m == 0 {
            return Err(Error::invalid("at least one test point is required"));
        }
        if m > cfg.max_points {
            return Err(Error::invalid(format!(
                "too many test points: {m} > {}",
                cfg.max_points
            )));
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed batch.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
