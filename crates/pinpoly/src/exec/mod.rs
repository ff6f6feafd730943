//! Static-partition parallel execution of the containment test.
//!
//! Model
//! - `partition` splits the batch into at most `ExecCfg::workers` contiguous ranges.
//! - `run_batch_with` spawns one scoped thread per range; each thread writes into
//!   its own `&mut` slice of the result vector and sends one line per point to a
//!   `ResultSink`. The call returns after every launched thread has been joined.
//! - No queue, no work stealing, no cancellation.

mod partition;
mod run;
mod sink;

pub use partition::partition;
pub use run::{
    classify_sequential, run_batch, run_batch_with, BatchOutcome, ExecCfg, ExecReport,
    FailureStage, Launcher, TaskFailure, TaskResult, ThreadLauncher,
};
pub use sink::{LineSink, MemorySink, ResultSink};

#[cfg(test)]
mod tests;
