use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use pinpoly::exec::{run_batch, BatchOutcome, ExecCfg, ExecReport, LineSink};
use pinpoly::geom::{BatchCfg, Polygon, TestBatch};
use pinpoly::parse::parse_points;
use pinpoly::report;
use pinpoly::synth::PolygonKind;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;

use input::PolygonSource;

#[derive(Parser)]
#[command(name = "pinpoly")]
#[command(about = "Parallel point-in-polygon batch tester")]
struct Cmd {
    /// Log per-task progress
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Classify test points against a polygon and write the report
    Run(RunArgs),
    /// Generate a random polygon and print its vertices
    Generate {
        #[arg(long, value_enum, default_value_t = Kind::Convex)]
        kind: Kind,
        #[arg(long, default_value_t = 8)]
        vertices: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["polygon", "polygon_csv", "generate"])
))]
struct RunArgs {
    /// Polygon vertices as `[x,y],[x,y],...`
    #[arg(long)]
    polygon: Option<String>,
    /// CSV file with `x` and `y` columns
    #[arg(long)]
    polygon_csv: Option<PathBuf>,
    /// Generate a random polygon of this kind
    #[arg(long, value_enum)]
    generate: Option<Kind>,
    /// Vertex count for --generate
    #[arg(long, default_value_t = 8)]
    vertices: usize,
    /// Seed for --generate; drawn at random and logged when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Test points as `[x,y],[x,y],...`
    #[arg(long)]
    points: String,
    #[arg(long, default_value = "results.txt")]
    out: PathBuf,
    #[arg(long, default_value_t = 16)]
    workers: usize,
    #[arg(long, default_value_t = 32)]
    max_points: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Convex,
    Concave,
}

impl From<Kind> for PolygonKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Convex => PolygonKind::Convex,
            Kind::Concave => PolygonKind::Concave,
        }
    }
}

#[derive(Serialize)]
struct FailureRow {
    task: usize,
    start: usize,
    end: usize,
    stage: String,
    reason: String,
}

#[derive(Serialize)]
struct RunSummary {
    source: String,
    seed: Option<u64>,
    vertices: usize,
    points: usize,
    workers: usize,
    requested: usize,
    launched: usize,
    completed: usize,
    failures: Vec<FailureRow>,
    uncovered: Vec<[usize; 2]>,
    elapsed_s: f64,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Run(args) => run(args),
        Action::Generate {
            kind,
            vertices,
            seed,
        } => generate(kind, vertices, seed),
        Action::Report => report_block(),
    }
}

fn polygon_source(args: &RunArgs) -> Result<PolygonSource> {
    if let Some(text) = &args.polygon {
        return Ok(PolygonSource::Inline(text.clone()));
    }
    if let Some(path) = &args.polygon_csv {
        return Ok(PolygonSource::Csv(path.clone()));
    }
    if let Some(kind) = args.generate {
        return Ok(PolygonSource::Generated {
            kind: kind.into(),
            vertices: args.vertices,
            seed: args.seed.unwrap_or_else(rand::random),
        });
    }
    bail!("one of --polygon, --polygon-csv or --generate is required")
}

fn run(args: RunArgs) -> Result<()> {
    let source = polygon_source(&args)?;
    let poly = source.load()?;
    let pts = parse_points(&args.points).context("parsing --points")?;
    let batch = TestBatch::new(
        pts,
        BatchCfg {
            max_points: args.max_points,
        },
    )?;
    let cfg = ExecCfg {
        workers: args.workers,
        ..ExecCfg::default()
    };
    tracing::info!(
        source = %source,
        seed = ?source.seed(),
        vertices = poly.vertex_count(),
        points = batch.len(),
        workers = cfg.workers,
        "run"
    );

    let started = Instant::now();
    let outcome = write_report(&args.out, &poly, &batch, &cfg)?;
    let elapsed = started.elapsed().as_secs_f64();

    let r = &outcome.report;
    match coverage_warning(r) {
        None => tracing::info!(completed = r.completed, elapsed_s = elapsed, "done"),
        Some(_) => tracing::warn!(
            completed = r.completed,
            requested = r.requested,
            uncovered = ?r.uncovered,
            "incomplete coverage"
        ),
    }

    let summary = summarize(&source, &poly, &batch, &cfg, &outcome, elapsed);
    let payload = run_payload(&summary, r)?;
    let prov = provenance::write_sidecar(&args.out, payload)?;

    println!(
        "Done in {elapsed:.4} s: {}/{} tasks, report {}, provenance {}",
        r.completed,
        r.requested,
        args.out.display(),
        prov.display()
    );
    Ok(())
}

/// Header first, then one line per point as workers deliver them.
fn write_report(
    out: &Path,
    poly: &Polygon,
    batch: &TestBatch,
    cfg: &ExecCfg,
) -> Result<BatchOutcome> {
    cfg.validate()?;
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut w = BufWriter::new(file);
    report::write_header(&mut w, poly)?;
    let sink = LineSink::new(w);
    let outcome = run_batch(poly, batch, cfg, &sink)?;
    sink.flush()
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(outcome)
}

fn coverage_warning(r: &ExecReport) -> Option<String> {
    if r.is_complete() {
        return None;
    }
    Some(format!(
        "incomplete coverage: {}/{} tasks completed, uncovered {:?}",
        r.completed, r.requested, r.uncovered
    ))
}

fn run_payload(summary: &RunSummary, r: &ExecReport) -> Result<provenance::Payload> {
    let mut payload = provenance::Payload::new(serde_json::to_value(summary)?);
    if let Some(w) = coverage_warning(r) {
        payload = payload.warn(w);
    }
    Ok(payload)
}

fn summarize(
    source: &PolygonSource,
    poly: &Polygon,
    batch: &TestBatch,
    cfg: &ExecCfg,
    outcome: &BatchOutcome,
    elapsed_s: f64,
) -> RunSummary {
    let r = &outcome.report;
    RunSummary {
        source: source.to_string(),
        seed: source.seed(),
        vertices: poly.vertex_count(),
        points: batch.len(),
        workers: cfg.workers,
        requested: r.requested,
        launched: r.launched,
        completed: r.completed,
        failures: r
            .failures
            .iter()
            .map(|f| FailureRow {
                task: f.task,
                start: f.range.start,
                end: f.range.end,
                stage: format!("{:?}", f.stage),
                reason: f.reason.clone(),
            })
            .collect(),
        uncovered: r.uncovered.iter().map(|u| [u.start, u.end]).collect(),
        elapsed_s,
    }
}

fn generate(kind: Kind, vertices: usize, seed: Option<u64>) -> Result<()> {
    let source = PolygonSource::Generated {
        kind: kind.into(),
        vertices,
        seed: seed.unwrap_or_else(rand::random),
    };
    let poly = source.load()?;
    tracing::info!(source = %source, seed = ?source.seed(), "generate");
    println!("{}", report::format_pairs(poly.vertices(), 5));
    Ok(())
}

fn report_block() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "tool_version": pinpoly::VERSION,
        "defaults": {
            "workers": ExecCfg::default().workers,
            "max_points": BatchCfg::default().max_points,
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
