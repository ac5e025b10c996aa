//! Branch-and-bound perfect clear search.
//!
//! Both searches walk the same recursion: at each depth either the front of
//! the preview or the held piece is placed, then every shape still in the bag
//! is tried as the next unseen draw. Failure measures are summed over draws
//! and minimised over placements, with the running bound cutting off any
//! placement that can no longer beat the best one found.
pub mod count;
pub mod cutoffs;
pub mod decision;
pub mod dispatch;
pub mod shared;
pub mod tree;

pub use cutoffs::{horizon_len, Cutoffs, Score};
pub use decision::{write_tree, Branch, Decision, Solve, Step, TreeView};
pub use shared::SearchShared;

use std::collections::VecDeque;
use std::fmt;

use crate::error::ConfigError;
use crate::graph::FieldGraph;
use crate::piece::{Bag, Shape};
use crate::weights::WeightTable;
use shared::{Ctx, Worker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Workers splitting the first placement.
    pub threads: usize,
    /// Treat the two-line fingerprint as an immediate success.
    pub two_line: bool,
}

impl Default for SearchParams {
    fn default() -> Self { Self { threads: 1, two_line: false } }
}

/// One position to evaluate: a starting field, the held shape, the known
/// preview (front first) and the shapes not yet seen in the current bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub field: usize,
    pub hold: Shape,
    pub queue: Vec<Shape>,
    pub bag: Bag,
}

impl Query {
    pub fn new(field: usize, hold: Shape, queue: Vec<Shape>, bag: Bag) -> Self { Self { field, hold, queue, bag } }

    /// Known pieces, hold included.
    pub fn see(&self) -> usize { self.queue.len() + 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Minimum failure measure in ticks, capped at the bound searched with.
    pub failures: Score,
    /// Measure of every future, the denominator of the result.
    pub total: Score,
    pub weighted: bool,
    pub nodes: u64,
}

impl SearchResult {
    pub fn successes(&self) -> Score { self.total.saturating_sub(self.failures) }

    /// Bare number for machine consumers: the weighted failure measure, or
    /// the success count.
    pub fn value(&self) -> Score { if self.weighted { self.failures } else { self.successes() } }
}

/// Weighted results print the failure measure in ticks; counts print
/// `successes/total`.
impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weighted { write!(f, "{}", self.failures) } else { write!(f, "{}/{}", self.successes(), self.total) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeResult {
    pub decision: Decision,
    pub total: Score,
    pub weighted: bool,
    pub nodes: u64,
}

impl TreeResult {
    pub fn summary(&self) -> SearchResult {
        SearchResult { failures: self.decision.cost(), total: self.total, weighted: self.weighted, nodes: self.nodes }
    }
}

/// Entry point for queries against one graph and weight table.
#[derive(Clone, Copy)]
pub struct Searcher<'a> {
    graph: &'a FieldGraph,
    weights: &'a WeightTable,
    params: SearchParams,
}

impl<'a> Searcher<'a> {
    pub fn new(graph: &'a FieldGraph, weights: &'a WeightTable, params: SearchParams) -> Self {
        Self { graph, weights, params: SearchParams { threads: params.threads.max(1), ..params } }
    }

    pub fn graph(&self) -> &'a FieldGraph { self.graph }
    pub fn weights(&self) -> &'a WeightTable { self.weights }
    pub fn params(&self) -> SearchParams { self.params }

    /// Per-depth bounds for the query, sized from the pieces already on its
    /// starting board.
    pub fn cutoffs(&self, query: &Query) -> Result<Cutoffs, ConfigError> {
        let placed = self.graph.placed(query.field)?;
        Ok(Cutoffs::new(query.bag.len(), horizon_len(placed, query.see()), self.weights.unit()))
    }

    /// Failure measure of the best strategy over all futures.
    pub fn count(&self, query: &Query) -> Result<SearchResult, ConfigError> {
        let cutoffs = self.cutoffs(query)?;
        Ok(self.count_with(query, &cutoffs, cutoffs.total()))
    }

    /// Whether some strategy never fails: searches with a bound of one whole
    /// failure, so the result is `1/1` or `0/1`.
    pub fn boolean(&self, query: &Query) -> Result<SearchResult, ConfigError> {
        let cutoffs = self.cutoffs(query)?;
        let unit = self.weights.unit();
        let r = self.count_with(query, &cutoffs, unit);
        Ok(SearchResult { failures: r.failures.min(unit), total: unit, ..r })
    }

    /// Counting search under an explicit root bound. The result is exact
    /// when below `bound` and equal to `bound` otherwise.
    pub fn count_with(&self, query: &Query, cutoffs: &Cutoffs, bound: Score) -> SearchResult {
        let shared = SearchShared::new();
        let ctx = self.ctx(cutoffs, &shared);
        let mut q: VecDeque<Shape> = query.queue.iter().copied().collect();
        let failures = {
            let mut w = Worker::new(&ctx, None);
            w.imperfect(query.field, query.hold, &mut q, 0, bound, query.bag)
        };
        SearchResult { failures, total: cutoffs.total(), weighted: self.weights.is_weighted(), nodes: shared.nodes() }
    }

    /// Best strategy as an explicit tree. Its root cost equals the counting
    /// result for the same query.
    pub fn tree(&self, query: &Query) -> Result<TreeResult, ConfigError> {
        let cutoffs = self.cutoffs(query)?;
        let shared = SearchShared::new();
        let ctx = self.ctx(&cutoffs, &shared);
        let mut q: VecDeque<Shape> = query.queue.iter().copied().collect();
        let decision = {
            let mut w = Worker::new(&ctx, None);
            w.tree_imperfect(query.field, query.hold, &mut q, 0, cutoffs.total(), query.bag)
        };
        Ok(TreeResult { decision, total: cutoffs.total(), weighted: self.weights.is_weighted(), nodes: shared.nodes() })
    }

    fn ctx<'c>(&self, cutoffs: &'c Cutoffs, shared: &'c SearchShared) -> Ctx<'c>
    where
        'a: 'c,
    {
        Ctx { graph: self.graph, weights: self.weights, cutoffs, shared, params: self.params }
    }
}
