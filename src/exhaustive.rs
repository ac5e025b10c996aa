// Unpruned reference evaluator: same recursion as the search, no bounds,
// no cancellation, no threads. Exponential; only for small graphs.
use std::collections::VecDeque;

use crate::error::ConfigError;
use crate::graph::FieldGraph;
use crate::piece::{Bag, Shape};
use crate::search::{horizon_len, Cutoffs, Query, Score};
use crate::weights::{WeightRow, WeightTable};

struct Oracle<'a> {
    graph: &'a FieldGraph,
    weights: &'a WeightTable,
    cutoffs: Cutoffs,
    two_line: bool,
}

/// Exact minimum failure measure of `query`, computed by full enumeration.
pub fn failures(graph: &FieldGraph, weights: &WeightTable, query: &Query, two_line: bool) -> Result<Score, ConfigError> {
    let placed = graph.placed(query.field)?;
    let cutoffs = Cutoffs::new(query.bag.len(), horizon_len(placed, query.see()), weights.unit());
    let oracle = Oracle { graph, weights, cutoffs, two_line };
    let mut q: VecDeque<Shape> = query.queue.iter().copied().collect();
    Ok(oracle.imperfect(query.field, query.hold, &mut q, 0, query.bag))
}

impl Oracle<'_> {
    fn two_line_hit(&self, field: usize) -> bool {
        self.two_line && self.graph.hash(field) == crate::graph::TWO_LINE_HASH
    }

    fn imperfect(&self, field: usize, hold: Shape, q: &mut VecDeque<Shape>, depth: usize, bag: Bag) -> Score {
        if depth >= self.cutoffs.horizon() {
            return self.single(field, hold, q, self.weights.row(bag));
        }
        if self.two_line_hit(field) { return 0; }
        let bag = bag.refilled();
        let mut best = self.cutoffs[depth];
        let Some(front) = q.pop_front() else { return best };
        for m in self.graph.placements(field, front, hold) {
            let mut total = 0;
            for p in bag.iter() {
                q.push_back(p);
                total += self.imperfect(m.field, m.hold, q, depth + 1, bag.without(p));
                q.pop_back();
            }
            best = best.min(total);
        }
        q.push_front(front);
        best
    }

    fn single(&self, field: usize, hold: Shape, q: &mut VecDeque<Shape>, row: &WeightRow) -> Score {
        if self.graph.is_terminal(field) { return row.get(hold); }
        if self.two_line_hit(field) { return 0; }
        let Some(front) = q.pop_front() else { return row.fail() };
        let mut best = row.fail();
        for m in self.graph.placements(field, front, hold) {
            best = best.min(self.single(m.field, m.hold, q, row));
        }
        q.push_front(front);
        best
    }
}
