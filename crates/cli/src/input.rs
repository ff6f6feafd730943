//! Where the polygon comes from.

use anyhow::{bail, Context, Result};
use pinpoly::geom::{Point, Polygon};
use pinpoly::parse::parse_points;
use pinpoly::synth::{generate, PolygonKind, SynthCfg};
use polars::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};

pub enum PolygonSource {
    /// `[x,y],[x,y],...` on the command line.
    Inline(String),
    /// CSV with `x` and `y` columns.
    Csv(PathBuf),
    Generated {
        kind: PolygonKind,
        vertices: usize,
        seed: u64,
    },
}

impl PolygonSource {
    pub fn load(&self) -> Result<Polygon> {
        match self {
            PolygonSource::Inline(text) => {
                let pts = parse_points(text).context("parsing --polygon")?;
                Ok(Polygon::new(pts)?)
            }
            PolygonSource::Csv(path) => Ok(Polygon::new(read_csv_points(path)?)?),
            PolygonSource::Generated {
                kind,
                vertices,
                seed,
            } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok(generate(*kind, *vertices, &SynthCfg::default(), &mut rng)?)
            }
        }
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            PolygonSource::Generated { seed, .. } => Some(*seed),
            _ => None,
        }
    }
}

impl fmt::Display for PolygonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonSource::Inline(_) => f.write_str("inline"),
            PolygonSource::Csv(path) => write!(f, "csv:{}", path.display()),
            PolygonSource::Generated { kind, vertices, .. } => write!(f, "{kind}:{vertices}"),
        }
    }
}

/// Read `x`,`y` columns (header required, any numeric type) as polygon vertices.
pub fn read_csv_points(path: &Path) -> Result<Vec<Point>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select([
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("reading x,y columns from {}", path.display()))?;
    tracing::debug!(rows = df.height(), path = %path.display(), "polygon_csv");
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    xs.into_iter()
        .zip(ys)
        .enumerate()
        .map(|(row, xy)| match xy {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => bail!("{}: row {} is missing a coordinate", path.display(), row + 1),
        })
        .collect()
}
