//! Plain-text run report.
//!
//! ```text
//! Polygon Points (count: 3):
//! 0.00 0.00
//! 10.00 0.00
//! 5.00 10.00
//!
//! Test Points:
//! 5.00 1.00 => EVET
//! ```
//!
//! The header is written before the parallel phase; test lines follow in the
//! order workers deliver them.

use crate::geom::{Point, Polygon};
use std::io::{self, Write};

pub const INSIDE: &str = "EVET";
pub const OUTSIDE: &str = "HAYIR";

#[inline]
pub fn verdict(inside: bool) -> &'static str {
    if inside {
        INSIDE
    } else {
        OUTSIDE
    }
}

pub fn outcome_line(p: Point, inside: bool) -> String {
    format!("{:.2} {:.2} => {}", p.x, p.y, verdict(inside))
}

pub fn write_header<W: Write + ?Sized>(w: &mut W, poly: &Polygon) -> io::Result<()> {
    writeln!(w, "Polygon Points (count: {}):", poly.vertex_count())?;
    for v in poly.vertices() {
        writeln!(w, "{:.2} {:.2}", v.x, v.y)?;
    }
    writeln!(w)?;
    writeln!(w, "Test Points:")
}

/// `[x, y]` pairs joined by `", "`, with a line break after every `per_line` pairs.
pub fn format_pairs(points: &[Point], per_line: usize) -> String {
    let per_line = per_line.max(1);
    let mut s = String::new();
    for (i, p) in points.iter().enumerate() {
        s.push_str(&format!("[{:.2}, {:.2}]", p.x, p.y));
        if i + 1 < points.len() {
            s.push_str(", ");
        }
        if (i + 1) % per_line == 0 {
            s.push('\n');
        }
    }
    s
}
