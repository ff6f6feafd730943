use super::*;
use crate::error::Error;
use crate::geom::{bounding_box, contains, BatchCfg, Point, Polygon, TestBatch};
use crate::report::outcome_line;
use crate::synth::{convex_polygon, star_polygon, SynthCfg};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io;
use std::sync::Mutex;
use std::thread::{Scope, ScopedJoinHandle};

/// Refuses to start the listed tasks.
struct FailingLauncher {
    inner: ThreadLauncher,
    fail: Vec<usize>,
}

impl Launcher for FailingLauncher {
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        task: usize,
        f: F,
    ) -> io::Result<ScopedJoinHandle<'scope, TaskResult>>
    where
        F: FnOnce() -> TaskResult + Send + 'scope,
    {
        if self.fail.contains(&task) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected launch failure"));
        }
        self.inner.launch(scope, task, f)
    }
}

/// Starts every task, but one of them panics before doing any work.
struct PanicLauncher {
    inner: ThreadLauncher,
    panic_on: usize,
}

impl Launcher for PanicLauncher {
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        task: usize,
        f: F,
    ) -> io::Result<ScopedJoinHandle<'scope, TaskResult>>
    where
        F: FnOnce() -> TaskResult + Send + 'scope,
    {
        if task == self.panic_on {
            return self.inner.launch(scope, task, move || -> TaskResult {
                drop(f);
                panic!("injected task panic")
            });
        }
        self.inner.launch(scope, task, f)
    }
}

struct BrokenSink;

impl ResultSink for BrokenSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "report closed"))
    }
}

/// Accepts `limit` lines, then fails every write.
struct FailAfterSink {
    accepted: Mutex<Vec<String>>,
    limit: usize,
}

impl ResultSink for FailAfterSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut acc = self.accepted.lock().unwrap();
        if acc.len() >= self.limit {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"));
        }
        acc.push(line.to_owned());
        Ok(())
    }
}

/// Records which thread wrote each line.
#[derive(Default)]
struct ThreadNameSink {
    names: Mutex<Vec<String>>,
}

impl ResultSink for ThreadNameSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        let name = std::thread::current().name().unwrap_or("").to_string();
        self.names.lock().unwrap().push(name);
        Ok(())
    }
}

fn square() -> Polygon {
    Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ])
    .unwrap()
}

/// 32 points on a diagonal through the square; the first 16 are inside.
fn diagonal_batch() -> TestBatch {
    let pts = (0..32)
        .map(|i| {
            let t = 0.5 + i as f64 * 0.6;
            Point::new(t, t)
        })
        .collect();
    TestBatch::new(pts, BatchCfg::default()).unwrap()
}

fn threads(workers: usize) -> (ExecCfg, ThreadLauncher) {
    let cfg = ExecCfg {
        workers,
        ..ExecCfg::default()
    };
    let launcher = ThreadLauncher::from(&cfg);
    (cfg, launcher)
}

#[test]
fn square_batch_verdicts_and_lines() {
    let batch = TestBatch::new(
        vec![Point::new(5.0, 5.0), Point::new(15.0, 15.0)],
        BatchCfg::default(),
    )
    .unwrap();
    let sink = MemorySink::new();
    let out = run_batch(&square(), &batch, &ExecCfg::default(), &sink).unwrap();
    assert_eq!(out.verdicts(), Some(vec![true, false]));
    assert!(out.report.is_complete());
    assert_eq!(out.report.requested, 1);
    let mut lines = sink.into_lines();
    lines.sort();
    assert_eq!(lines, vec!["15.00 15.00 => HAYIR", "5.00 5.00 => EVET"]);
}

#[test]
fn every_point_reaches_the_sink_once() {
    let poly = square();
    let batch = diagonal_batch();
    let sink = MemorySink::new();
    let out = run_batch(&poly, &batch, &ExecCfg::default(), &sink).unwrap();
    assert_eq!(out.report.requested, 16);
    assert_eq!(out.report.completed, 16);

    let mut got = sink.into_lines();
    let bb = bounding_box(&poly);
    let mut want: Vec<String> = batch
        .points()
        .iter()
        .map(|&p| outcome_line(p, contains(&poly, &bb, p)))
        .collect();
    got.sort();
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn launch_failure_leaves_partition_uncovered() {
    let poly = square();
    let bb = bounding_box(&poly);
    let batch = diagonal_batch();
    let (cfg, inner) = threads(4);
    let launcher = FailingLauncher {
        inner,
        fail: vec![1],
    };
    let sink = MemorySink::new();
    let out = run_batch_with(&poly, &bb, &batch, &cfg, &sink, &launcher).unwrap();

    let r = &out.report;
    assert_eq!((r.requested, r.launched, r.completed), (4, 3, 3));
    assert!(!r.is_complete());
    assert_eq!(r.uncovered, vec![8..16]);
    assert_eq!(r.failures.len(), 1);
    assert_eq!(r.failures[0].task, 1);
    assert_eq!(r.failures[0].range, 8..16);
    assert_eq!(r.failures[0].stage, FailureStage::Launch);

    // Results from the other partitions are kept.
    let expected = classify_sequential(&poly, &bb, &batch);
    for (i, slot) in out.results.iter().enumerate() {
        if (8..16).contains(&i) {
            assert_eq!(*slot, None);
        } else {
            assert_eq!(*slot, Some(expected[i]));
        }
    }
    assert_eq!(sink.lines().len(), 24);
    assert_eq!(out.verdicts(), None);
}

#[test]
fn all_launches_failing_covers_nothing() {
    let poly = square();
    let bb = bounding_box(&poly);
    let batch = diagonal_batch();
    let (cfg, inner) = threads(4);
    let launcher = FailingLauncher {
        inner,
        fail: vec![0, 1, 2, 3],
    };
    let out = run_batch_with(&poly, &bb, &batch, &cfg, &MemorySink::new(), &launcher).unwrap();
    assert_eq!(out.report.launched, 0);
    assert_eq!(out.report.completed, 0);
    assert_eq!(out.report.uncovered, vec![0..32]);
    assert!(out.results.iter().all(Option::is_none));
}

#[test]
fn sink_error_leaves_its_task_range_uncovered() {
    let poly = square();
    let bb = bounding_box(&poly);
    let batch = diagonal_batch();
    let (cfg, launcher) = threads(4);
    let out = run_batch_with(&poly, &bb, &batch, &cfg, &BrokenSink, &launcher).unwrap();
    let r = &out.report;
    assert_eq!((r.launched, r.completed), (4, 0));
    assert!(r.failures.iter().all(|f| f.stage == FailureStage::Run));
    assert_eq!(r.uncovered, vec![0..32]);
    assert!(out.results.iter().all(Option::is_none));
}

#[test]
fn line_rejected_by_sink_is_not_covered() {
    let poly = square();
    let bb = bounding_box(&poly);
    let batch = diagonal_batch();
    let (cfg, launcher) = threads(1);
    let sink = FailAfterSink {
        accepted: Mutex::new(Vec::new()),
        limit: 2,
    };
    let out = run_batch_with(&poly, &bb, &batch, &cfg, &sink, &launcher).unwrap();
    assert_eq!(out.report.uncovered, vec![2..32]);
    assert_eq!(sink.accepted.lock().unwrap().len(), 2);
    assert!(out.results[..2].iter().all(Option::is_some));
    assert!(out.results[2].is_none());
}

#[test]
fn panicking_task_is_reported() {
    let poly = square();
    let bb = bounding_box(&poly);
    let batch = diagonal_batch();
    let (cfg, inner) = threads(4);
    let launcher = PanicLauncher { inner, panic_on: 2 };
    let out = run_batch_with(&poly, &bb, &batch, &cfg, &MemorySink::new(), &launcher).unwrap();
    let r = &out.report;
    assert_eq!((r.launched, r.completed), (4, 3));
    assert_eq!(r.failures.len(), 1);
    assert_eq!(r.failures[0].stage, FailureStage::Panic);
    assert_eq!(r.uncovered, vec![16..24]);
}

#[test]
fn zero_workers_rejected_before_running() {
    let cfg = ExecCfg {
        workers: 0,
        ..ExecCfg::default()
    };
    let res = run_batch(&square(), &diagonal_batch(), &cfg, &MemorySink::new());
    assert!(matches!(res, Err(Error::InvalidParameter { .. })));
}

#[test]
fn workers_carry_configured_names() {
    let cfg = ExecCfg {
        workers: 4,
        thread_name: "probe",
        ..ExecCfg::default()
    };
    let sink = ThreadNameSink::default();
    run_batch(&square(), &diagonal_batch(), &cfg, &sink).unwrap();
    let names = sink.names.into_inner().unwrap();
    assert_eq!(names.len(), 32);
    assert!(names.iter().all(|n| n.starts_with("probe-")));
}

fn random_batch(seed: u64, m: usize) -> TestBatch {
    let mut rng = StdRng::seed_from_u64(seed);
    let pts = (0..m)
        .map(|_| Point::new(rng.gen_range(-2.0..12.0), rng.gen_range(-2.0..12.0)))
        .collect();
    TestBatch::new(pts, BatchCfg { max_points: 512 }).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partitions_cover_exactly(m in 0usize..2000, w in 1usize..64) {
        let parts = partition(m, w).unwrap();
        prop_assert!(parts.len() <= w);
        let mut next = 0;
        for r in &parts {
            prop_assert!(!r.is_empty());
            prop_assert_eq!(r.start, next);
            next = r.end;
        }
        prop_assert_eq!(next, m);
    }

    #[test]
    fn parallel_matches_sequential_convex(
        seed in any::<u64>(),
        n in 4usize..=32,
        m in 1usize..=300,
        w in 1usize..=20,
    ) {
        let poly = convex_polygon(n, &SynthCfg::default(), &mut StdRng::seed_from_u64(seed)).unwrap();
        let bb = bounding_box(&poly);
        let batch = random_batch(seed ^ 0x5eed, m);
        let (cfg, launcher) = threads(w);
        let out = run_batch_with(&poly, &bb, &batch, &cfg, &MemorySink::new(), &launcher).unwrap();
        prop_assert!(out.report.is_complete());
        prop_assert_eq!(out.verdicts(), Some(classify_sequential(&poly, &bb, &batch)));
    }

    #[test]
    fn parallel_matches_sequential_star(
        seed in any::<u64>(),
        n in 4usize..=32,
        m in 1usize..=300,
    ) {
        let poly = star_polygon(n, &SynthCfg::default(), &mut StdRng::seed_from_u64(seed)).unwrap();
        let bb = bounding_box(&poly);
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let pts = (0..m)
            .map(|_| Point::new(rng.gen_range(-20.0..40.0), rng.gen_range(-20.0..40.0)))
            .collect();
        let batch = TestBatch::new(pts, BatchCfg { max_points: 512 }).unwrap();
        let sink = MemorySink::new();
        let out = run_batch(&poly, &batch, &ExecCfg::default(), &sink).unwrap();
        prop_assert_eq!(out.verdicts(), Some(classify_sequential(&poly, &bb, &batch)));
        prop_assert_eq!(sink.lines().len(), m);
    }
}
