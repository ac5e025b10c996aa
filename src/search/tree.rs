//! Decision-tree search. Same recursion and bounds as the counting search,
//! but each level keeps the winning placement as an owned node.
use std::collections::VecDeque;

use super::decision::{Branch, Decision, Solve, Step};
use super::dispatch::RootSplit;
use super::shared::Worker;
use super::Score;
use crate::piece::{Bag, Shape};
use crate::weights::WeightRow;

impl<'a> Worker<'a> {
    pub(crate) fn tree_imperfect(
        &mut self,
        field: usize,
        hold: Shape,
        q: &mut VecDeque<Shape>,
        depth: usize,
        neg: Score,
        bag: Bag,
    ) -> Decision {
        self.nodes += 1;
        let ctx = self.ctx;
        if depth >= ctx.cutoffs.horizon() {
            return self.tree_horizon(field, hold, q, neg, ctx.weights.row(bag));
        }
        if ctx.two_line_hit(field) {
            return Decision::Solve(Solve { cost: 0, line: Vec::new() });
        }

        let bag = bag.refilled();
        let cap = ctx.cutoffs[depth];
        let Some(front) = q.pop_front() else { return Decision::Capped { cost: neg.min(cap), cap } };
        let best = if depth == 0 {
            RootSplit::<Decision>::tree(ctx, field, front, hold, q, bag, neg)
        } else {
            self.tree_fan_out(field, front, hold, q, depth, neg.min(cap), bag)
        };
        q.push_front(front);
        best
    }

    #[allow(clippy::too_many_arguments)]
    fn tree_fan_out(
        &mut self,
        field: usize,
        front: Shape,
        hold: Shape,
        q: &mut VecDeque<Shape>,
        depth: usize,
        neg: Score,
        bag: Bag,
    ) -> Decision {
        let graph = self.ctx.graph;
        let cap = self.ctx.cutoffs[depth];
        let mut best = Decision::Capped { cost: neg, cap };
        'moves: for m in graph.placements(field, front, hold) {
            let mut b = Branch::new(m.field, m.piece, cap);
            for p in bag.iter() {
                if self.cancelled() { break 'moves; }
                q.push_back(p);
                let child = self.tree_imperfect(m.field, m.hold, q, depth + 1, best.cost() - b.cost, bag.without(p));
                q.pop_back();
                b.cost += child.cost();
                b.children[p.index()] = Some(child);
                if b.cost >= best.cost() { continue 'moves; }
            }
            best = Decision::Branch(Box::new(b));
            if best.cost() == 0 { break; }
        }
        best
    }

    /// Horizon: the cheapest way to place the rest of the preview, kept as
    /// a replayable line. `Capped` when no line beats the bound.
    fn tree_horizon(&mut self, field: usize, hold: Shape, q: &mut VecDeque<Shape>, neg: Score, row: &WeightRow) -> Decision {
        let bound = neg.min(row.fail());
        match self.best_line(field, hold, q, row, bound) {
            Some((cost, mut line)) if cost < bound => {
                line.reverse();
                Decision::Solve(Solve { cost, line })
            }
            _ => Decision::Capped { cost: bound, cap: row.fail() },
        }
    }

    /// Steps come back last placement first.
    fn best_line(
        &mut self,
        field: usize,
        hold: Shape,
        q: &mut VecDeque<Shape>,
        row: &WeightRow,
        bound: Score,
    ) -> Option<(Score, Vec<Step>)> {
        self.nodes += 1;
        let ctx = self.ctx;
        if ctx.graph.is_terminal(field) { return Some((row.get(hold), Vec::new())); }
        if ctx.two_line_hit(field) { return Some((0, Vec::new())); }
        let front = q.pop_front()?;

        let mut best: Option<(Score, Vec<Step>)> = None;
        let mut cur = bound;
        for m in ctx.graph.placements(field, front, hold) {
            if self.cancelled() { break; }
            if let Some((cost, mut line)) = self.best_line(m.field, m.hold, q, row, cur) {
                if cost < cur {
                    line.push(Step { field: m.field, piece: m.piece });
                    cur = cost;
                    best = Some((cost, line));
                    if cost == 0 { break; }
                }
            }
        }
        q.push_front(front);
        best
    }
}
