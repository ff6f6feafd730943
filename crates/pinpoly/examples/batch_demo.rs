//! Generate a polygon, classify a few points in parallel, print the report.
//!
//! Usage:
//!   cargo run -p pinpoly --example batch_demo -- convex
//!   cargo run -p pinpoly --example batch_demo -- concave

use pinpoly::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let kind = match std::env::args().nth(1).as_deref() {
        Some("concave") => PolygonKind::Concave,
        _ => PolygonKind::Convex,
    };
    let mut rng = StdRng::seed_from_u64(2025);
    let poly = generate(kind, 8, &SynthCfg::default(), &mut rng).unwrap();
    let points = parse_points("[5,5],[1,1],[9,2],[15,15],[-1,5]").unwrap();
    let batch = TestBatch::new(points, BatchCfg::default()).unwrap();

    let sink = LineSink::new(Vec::new());
    let mut header = Vec::new();
    pinpoly::report::write_header(&mut header, &poly).unwrap();
    let out = run_batch(&poly, &batch, &ExecCfg::default(), &sink).unwrap();

    print!("{}", String::from_utf8_lossy(&header));
    print!("{}", String::from_utf8_lossy(&sink.into_inner()));
    println!(
        "tasks: {}/{} completed",
        out.report.completed, out.report.requested
    );
}
