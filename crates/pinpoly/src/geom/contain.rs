use super::types::{BoundingBox, Point, Polygon};

/// One pass over the vertices.
pub fn bounding_box(poly: &Polygon) -> BoundingBox {
    bounds_of(poly.vertices())
}

/// Pre: `v` is non-empty; the first point seeds the fold.
pub(crate) fn bounds_of(v: &[Point]) -> BoundingBox {
    let first = v[0];
    v[1..].iter().fold(
        BoundingBox {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        },
        |b, p| BoundingBox {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        },
    )
}

/// Bbox-pruned point-in-polygon test.
///
/// Pre: `bbox == bounding_box(poly)`. The bbox check only rejects, so the
/// result always equals `ray_cast(poly, p)`.
#[inline]
pub fn contains(poly: &Polygon, bbox: &BoundingBox, p: Point) -> bool {
    if !bbox.contains_point(p) {
        return false;
    }
    ray_cast(poly, p)
}

/// Even-odd rule with a horizontal ray towards +x.
///
/// The straddle test `(a.y > p.y) != (b.y > p.y)` never holds for a horizontal
/// edge, so the division below is safe. Points exactly on an edge may land on
/// either side.
pub fn ray_cast(poly: &Polygon, p: Point) -> bool {
    let mut inside = false;
    for (a, b) in poly.edges() {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}
