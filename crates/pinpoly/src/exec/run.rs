use super::partition::partition;
use super::sink::ResultSink;
use crate::error::Error;
use crate::geom::{bounding_box, contains, BoundingBox, Polygon, TestBatch};
use crate::report::outcome_line;
use std::io;
use std::ops::Range;
use std::thread::{self, Scope, ScopedJoinHandle};

/// Executor configuration.
#[derive(Clone, Copy, Debug)]
pub struct ExecCfg {
    /// Upper bound on concurrently running tasks.
    pub workers: usize,
    pub stack_size: Option<usize>,
    pub thread_name: &'static str,
}

impl Default for ExecCfg {
    fn default() -> Self {
        Self {
            workers: 16,
            stack_size: None,
            thread_name: "pinpoly-worker",
        }
    }
}

impl ExecCfg {
    /// Reject settings no batch can run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.workers == 0 {
            return Err(Error::invalid("worker count must be at least 1"));
        }
        Ok(())
    }
}

/// What a worker returns when joined.
pub type TaskResult = io::Result<()>;

/// Starts one task inside a thread scope.
///
/// Split out so tests can inject launch failures; `ThreadLauncher` is the real one.
pub trait Launcher {
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        task: usize,
        f: F,
    ) -> io::Result<ScopedJoinHandle<'scope, TaskResult>>
    where
        F: FnOnce() -> TaskResult + Send + 'scope;
}

/// Named OS threads via `std::thread::Builder`.
#[derive(Clone, Copy, Debug)]
pub struct ThreadLauncher {
    pub stack_size: Option<usize>,
    pub name: &'static str,
}

impl From<&ExecCfg> for ThreadLauncher {
    fn from(cfg: &ExecCfg) -> Self {
        Self {
            stack_size: cfg.stack_size,
            name: cfg.thread_name,
        }
    }
}

impl Launcher for ThreadLauncher {
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        task: usize,
        f: F,
    ) -> io::Result<ScopedJoinHandle<'scope, TaskResult>>
    where
        F: FnOnce() -> TaskResult + Send + 'scope,
    {
        let mut b = thread::Builder::new().name(format!("{}-{task}", self.name));
        if let Some(sz) = self.stack_size {
            b = b.stack_size(sz);
        }
        b.spawn_scoped(scope, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureStage {
    /// The thread never started.
    Launch,
    /// The task returned an I/O error from the sink.
    Run,
    Panic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: usize,
    pub range: Range<usize>,
    pub stage: FailureStage,
    pub reason: String,
}

/// Task accounting for one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecReport {
    /// Non-empty partitions, i.e. tasks that should have run.
    pub requested: usize,
    pub launched: usize,
    pub completed: usize,
    pub failures: Vec<TaskFailure>,
    /// Maximal runs of batch indices without a result. An index counts as
    /// covered only once its line was accepted by the sink.
    pub uncovered: Vec<Range<usize>>,
}

impl ExecReport {
    pub fn is_complete(&self) -> bool {
        self.completed == self.requested && self.uncovered.is_empty()
    }
}

/// Results index-aligned with the batch; `None` marks an uncovered index.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub results: Vec<Option<bool>>,
    pub report: ExecReport,
}

impl BatchOutcome {
    /// All verdicts, if every index was covered.
    pub fn verdicts(&self) -> Option<Vec<bool>> {
        self.results.iter().copied().collect()
    }
}

/// Run the batch on named threads, computing the bbox here.
pub fn run_batch<S: ResultSink + ?Sized>(
    poly: &Polygon,
    batch: &TestBatch,
    cfg: &ExecCfg,
    sink: &S,
) -> Result<BatchOutcome, Error> {
    let bbox = bounding_box(poly);
    run_batch_with(poly, &bbox, batch, cfg, sink, &ThreadLauncher::from(cfg))
}

/// Partition `batch`, run one task per partition, join them all.
///
/// Each task owns a disjoint `&mut` slice of the result vector, so the only
/// lock is the one inside `sink`. Launch failures and failed tasks are
/// recorded in the report; whatever was computed is kept.
pub fn run_batch_with<S, L>(
    poly: &Polygon,
    bbox: &BoundingBox,
    batch: &TestBatch,
    cfg: &ExecCfg,
    sink: &S,
    launcher: &L,
) -> Result<BatchOutcome, Error>
where
    S: ResultSink + ?Sized,
    L: Launcher,
{
    cfg.validate()?;
    let points = batch.points();
    let ranges = partition(points.len(), cfg.workers)?;
    let mut results: Vec<Option<bool>> = vec![None; points.len()];
    let mut report = ExecReport {
        requested: ranges.len(),
        ..ExecReport::default()
    };

    let mut slices = Vec::with_capacity(ranges.len());
    let mut rest: &mut [Option<bool>] = &mut results;
    let mut offset = 0;
    for r in &ranges {
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut(r.start - offset);
        let (head, tail) = tail.split_at_mut(r.len());
        slices.push((r.clone(), head));
        rest = tail;
        offset = r.end;
    }

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(slices.len());
        for (task, (range, out)) in slices.into_iter().enumerate() {
            let pts = &points[range.clone()];
            let work = move || -> TaskResult {
                for (slot, &p) in out.iter_mut().zip(pts) {
                    let inside = contains(poly, bbox, p);
                    sink.write_line(&outcome_line(p, inside))?;
                    *slot = Some(inside);
                }
                Ok(())
            };
            match launcher.launch(scope, task, work) {
                Ok(h) => handles.push((task, range, h)),
                Err(e) => {
                    tracing::warn!(task, start = range.start, end = range.end, error = %e, "task launch failed");
                    report.failures.push(TaskFailure {
                        task,
                        range,
                        stage: FailureStage::Launch,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report.launched = handles.len();

        for (task, range, h) in handles {
            let failure = match h.join() {
                Ok(Ok(())) => {
                    tracing::debug!(task, points = range.len(), "task done");
                    report.completed += 1;
                    continue;
                }
                Ok(Err(e)) => (FailureStage::Run, e.to_string()),
                Err(_) => (FailureStage::Panic, "task panicked".to_string()),
            };
            tracing::warn!(task, stage = ?failure.0, reason = %failure.1, "task failed");
            report.failures.push(TaskFailure {
                task,
                range,
                stage: failure.0,
                reason: failure.1,
            });
        }
    });

    report.failures.sort_by_key(|f| f.task);
    report.uncovered = uncovered(&results);
    Ok(BatchOutcome { results, report })
}

/// Reference path: the same predicate applied in batch order on the caller's thread.
pub fn classify_sequential(poly: &Polygon, bbox: &BoundingBox, batch: &TestBatch) -> Vec<bool> {
    batch
        .points()
        .iter()
        .map(|&p| contains(poly, bbox, p))
        .collect()
}

fn uncovered(results: &[Option<bool>]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, r) in results.iter().enumerate() {
        match (r, start) {
            (None, None) => start = Some(i),
            (Some(_), Some(s)) => {
                out.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(s..results.len());
    }
    out
}
