//! Parallel point-in-polygon batch testing.
//!
//! Pipeline
//! - `synth` builds a polygon (random convex via Valtr, or a jittered star).
//! - `geom` holds the validated value types and the bbox-pruned ray-casting test.
//! - `exec` partitions a test batch, runs one scoped thread per partition and
//!   funnels per-point outcome lines through a `ResultSink`.
//! - `report` and `parse` are the textual edges (bracket pairs in, report lines out).
//!
//! API Policy
//! - Workspace-internal. The `cli` crate is the only consumer; breaking changes are fine.

pub mod error;
pub mod exec;
pub mod geom;
pub mod parse;
pub mod report;
pub mod synth;

pub use error::Error;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::exec::{
        partition, run_batch, run_batch_with, BatchOutcome, ExecCfg, ExecReport, LineSink,
        MemorySink, ResultSink, ThreadLauncher,
    };
    pub use crate::geom::{
        bounding_box, contains, BatchCfg, BoundingBox, Point, Polygon, TestBatch,
    };
    pub use crate::parse::parse_points;
    pub use crate::synth::{generate, PolygonKind, SynthCfg};
}
