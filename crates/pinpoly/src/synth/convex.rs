//! Random convex polygons via Valtr's construction.
//!
//! Model
//! - Per axis, split sorted random coordinates into two monotone chains and
//!   record the telescoping steps. Each axis then sums to zero.
//! - Pair x and y steps under a random permutation, sort the resulting
//!   vectors by angle, and chain them. Angle-sorted vectors that sum to zero
//!   trace a closed convex polygon in CCW order.
//! - Finally rescale so the polygon spans the extents of the drawn pools.

use super::SynthCfg;
use crate::error::Error;
use crate::geom::{bounds_of, BoundingBox, Point, Polygon, MAX_VERTICES};
use rand::seq::SliceRandom;
use rand::Rng;

/// Steps 1–3: per-axis zero-sum displacements plus the target extents.
pub(crate) struct Displacements {
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
    pub target: BoundingBox,
}

fn scratch<T>(n: usize) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|e| Error::allocation(format!("{n} scratch slots: {e}")))?;
    Ok(v)
}

/// Extremes of a sorted pool; a degenerate axis gets its max widened by `1.0`.
fn extremes(sorted: &[f64], span_eps: f64) -> (f64, f64) {
    let min = sorted[0];
    let mut max = sorted[sorted.len() - 1];
    if (max - min).abs() < span_eps {
        max = min + 1.0;
    }
    (min, max)
}

/// Walk the interior of `sorted` once, sending each value to the upper or
/// lower chain. Slot 0 closes the upper chain, slot `n-1` the lower one.
fn chain_steps<R: Rng + ?Sized>(
    sorted: &[f64],
    min: f64,
    max: f64,
    rng: &mut R,
    out: &mut Vec<f64>,
) {
    let n = sorted.len();
    let mut last_top = min;
    let mut last_bot = min;
    out.push(0.0);
    for &v in &sorted[1..n - 1] {
        if rng.gen::<bool>() {
            out.push(v - last_top);
            last_top = v;
        } else {
            out.push(last_bot - v);
            last_bot = v;
        }
    }
    out[0] = max - last_top;
    out.push(last_bot - max);
}

pub(crate) fn draw_displacements<R: Rng + ?Sized>(
    n: usize,
    cfg: &SynthCfg,
    rng: &mut R,
) -> Result<Displacements, Error> {
    let mut xs: Vec<f64> = scratch(n)?;
    let mut ys: Vec<f64> = scratch(n)?;
    for _ in 0..n {
        xs.push(rng.gen_range(0.0..cfg.coord_max));
        ys.push(rng.gen_range(0.0..cfg.coord_max));
    }
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);

    let (min_x, max_x) = extremes(&xs, cfg.span_eps);
    let (min_y, max_y) = extremes(&ys, cfg.span_eps);

    let mut dx = scratch(n)?;
    let mut dy = scratch(n)?;
    chain_steps(&xs, min_x, max_x, rng, &mut dx);
    chain_steps(&ys, min_y, max_y, rng, &mut dy);
    debug_assert!(dx.iter().sum::<f64>().abs() < 1e-9 * (1.0 + max_x - min_x));
    debug_assert!(dy.iter().sum::<f64>().abs() < 1e-9 * (1.0 + max_y - min_y));

    Ok(Displacements {
        dx,
        dy,
        target: BoundingBox {
            min_x,
            max_x,
            min_y,
            max_y,
        },
    })
}

/// Draw a random simple convex polygon with exactly `n` vertices, CCW.
///
/// Pre: `4 <= n <= MAX_VERTICES`.
/// Post: the vertex bbox equals the extents of the drawn coordinate pools.
pub fn convex_polygon<R: Rng + ?Sized>(
    n: usize,
    cfg: &SynthCfg,
    rng: &mut R,
) -> Result<Polygon, Error> {
    if !(4..=MAX_VERTICES).contains(&n) {
        return Err(Error::invalid(format!(
            "convex synthesis needs 4..={MAX_VERTICES} vertices, got {n}"
        )));
    }
    let Displacements { dx, mut dy, target } = draw_displacements(n, cfg, rng)?;

    // Decouple the axis pairing from the per-axis sort order.
    dy.shuffle(rng);

    let mut steps: Vec<Point> = scratch(n)?;
    steps.extend(dx.iter().zip(&dy).map(|(&x, &y)| Point::new(x, y)));
    steps.sort_by(|a, b| a.y.atan2(a.x).total_cmp(&b.y.atan2(b.x)));

    let mut verts: Vec<Point> = scratch(n)?;
    let mut acc = Point::zeros();
    for step in &steps[..n - 1] {
        verts.push(acc);
        acc += *step;
    }
    verts.push(acc);

    let cur = bounds_of(&verts);
    let cur_w = if cur.width() < 1e-10 { 1.0 } else { cur.width() };
    let cur_h = if cur.height() < 1e-10 { 1.0 } else { cur.height() };
    let sx = target.width() / cur_w;
    let sy = target.height() / cur_h;
    for v in &mut verts {
        v.x = target.min_x + (v.x - cur.min_x) * sx;
        v.y = target.min_y + (v.y - cur.min_y) * sy;
    }
    Polygon::new(verts)
}
