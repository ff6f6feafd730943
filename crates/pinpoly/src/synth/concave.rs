use super::SynthCfg;
use crate::error::Error;
use crate::geom::{Point, Polygon, MAX_VERTICES};
use rand::Rng;
use std::f64::consts::TAU;

/// Star-shaped polygon: vertex `i` sits at angle `2πi/n`, alternating outer
/// (even `i`) and inner (odd `i`) radius, each with integer jitter.
///
/// Radii are floored at `cfg.min_radius`. That keeps most draws simple but
/// does not guarantee it.
pub fn star_polygon<R: Rng + ?Sized>(
    n: usize,
    cfg: &SynthCfg,
    rng: &mut R,
) -> Result<Polygon, Error> {
    if !(4..=MAX_VERTICES).contains(&n) {
        return Err(Error::invalid(format!(
            "star polygon needs 4..={MAX_VERTICES} vertices, got {n}"
        )));
    }
    let verts = (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            let base = if i % 2 == 0 {
                cfg.outer_radius
            } else {
                cfg.inner_radius
            };
            let jitter = if cfg.jitter > 0 {
                rng.gen_range(-cfg.jitter..cfg.jitter)
            } else {
                0
            };
            let r = (base + f64::from(jitter)).max(cfg.min_radius);
            cfg.star_center + Point::new(angle.cos(), angle.sin()) * r
        })
        .collect();
    Polygon::new(verts)
}
