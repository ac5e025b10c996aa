use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use super::{Cutoffs, SearchParams};
use crate::graph::{FieldGraph, TWO_LINE_HASH};
use crate::weights::WeightTable;

/// Cancellation state for one query. Created fresh for every query and
/// dropped with it, so a finished query never leaks a kill into the next.
#[derive(Debug)]
pub struct SearchShared {
    killed: AtomicBool,
    job_thresh: AtomicUsize,
    nodes: AtomicU64,
}

impl Default for SearchShared {
    fn default() -> Self { Self::new() }
}

impl SearchShared {
    pub fn new() -> Self {
        Self { killed: AtomicBool::new(false), job_thresh: AtomicUsize::new(usize::MAX), nodes: AtomicU64::new(0) }
    }

    /// Job `job` proved a zero failure measure. Jobs after it may stop.
    pub fn kill(&self, job: usize) {
        self.job_thresh.fetch_min(job, Ordering::Relaxed);
        self.killed.store(true, Ordering::Release);
    }

    pub fn is_killed(&self) -> bool { self.killed.load(Ordering::Acquire) }

    /// Anonymous work stops on any kill; work tagged with a job index keeps
    /// going while it is at or before the earliest job that reached zero.
    #[inline]
    pub fn should_stop(&self, job: Option<usize>) -> bool {
        if !self.is_killed() { return false; }
        match job {
            None => true,
            Some(j) => j > self.job_thresh.load(Ordering::Relaxed),
        }
    }

    pub fn job_thresh(&self) -> usize { self.job_thresh.load(Ordering::Relaxed) }

    pub fn add_nodes(&self, n: u64) { self.nodes.fetch_add(n, Ordering::Relaxed); }
    pub fn nodes(&self) -> u64 { self.nodes.load(Ordering::Relaxed) }
}

/// Everything a query reads: immutable inputs plus the shared cancellation state.
pub(crate) struct Ctx<'a> {
    pub graph: &'a FieldGraph,
    pub weights: &'a WeightTable,
    pub cutoffs: &'a Cutoffs,
    pub shared: &'a SearchShared,
    pub params: SearchParams,
}

impl Ctx<'_> {
    #[inline]
    pub fn two_line_hit(&self, field: usize) -> bool {
        self.params.two_line && self.graph.hash(field) == TWO_LINE_HASH
    }
}

/// Single-threaded recursion state. One per thread; the node count is
/// folded into the shared total when the worker is dropped.
pub(crate) struct Worker<'a> {
    pub ctx: &'a Ctx<'a>,
    pub job: Option<usize>,
    pub nodes: u64,
}

impl<'a> Worker<'a> {
    pub fn new(ctx: &'a Ctx<'a>, job: Option<usize>) -> Self { Self { ctx, job, nodes: 0 } }

    #[inline]
    pub fn cancelled(&self) -> bool { self.ctx.shared.should_stop(self.job) }
}

impl Drop for Worker<'_> {
    fn drop(&mut self) { self.ctx.shared.add_nodes(self.nodes); }
}
