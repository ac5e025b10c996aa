//! Counting search: the failure measure of the best strategy, no tree.
use std::collections::VecDeque;

use super::dispatch::RootSplit;
use super::shared::Worker;
use super::Score;
use crate::piece::{Bag, Shape, PIECE_SHAPES};
use crate::weights::WeightRow;

/// Per-shape best measures still open in the last-draw search. A shape
/// drops out once it reaches zero.
#[derive(Clone, Copy, Debug, Default)]
struct Open {
    best: [Option<Score>; PIECE_SHAPES],
}

impl Open {
    fn is_empty(&self) -> bool { self.best.iter().all(Option::is_none) }
    fn sum(&self) -> Score { self.best.iter().flatten().sum() }
    fn clear(&mut self) { self.best = [None; PIECE_SHAPES]; }

    fn members(&self) -> Bag { Shape::ALL.into_iter().filter(|p| self.best[p.index()].is_some()).collect() }

    fn improve(&mut self, p: Shape, v: Score) {
        let slot = &mut self.best[p.index()];
        if let Some(cur) = *slot {
            let v = cur.min(v);
            *slot = (v > 0).then_some(v);
        }
    }
}

impl<'a> Worker<'a> {
    /// Best failure measure from `field` at `depth`, never above `neg`.
    /// `q` holds the known pieces front first and is restored on return.
    pub(crate) fn imperfect(
        &mut self,
        field: usize,
        hold: Shape,
        q: &mut VecDeque<Shape>,
        depth: usize,
        neg: Score,
        bag: Bag,
    ) -> Score {
        self.nodes += 1;
        let ctx = self.ctx;
        if depth >= ctx.cutoffs.horizon() {
            return self.perfect_single(field, hold, q, ctx.weights.row(bag)).min(neg);
        }
        if ctx.two_line_hit(field) { return 0; }

        let bag = bag.refilled();
        let neg = neg.min(ctx.cutoffs[depth]);
        let Some(front) = q.pop_front() else { return neg };
        let result = if depth + 2 == ctx.cutoffs.len() && bag.len() > 1 {
            self.last_draw(field, front, hold, q, neg, bag)
        } else if depth == 0 {
            RootSplit::<Score>::count(ctx, field, front, hold, q, bag, neg)
        } else {
            self.fan_out(field, front, hold, q, depth, neg, bag)
        };
        q.push_front(front);
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn fan_out(
        &mut self,
        field: usize,
        front: Shape,
        hold: Shape,
        q: &mut VecDeque<Shape>,
        depth: usize,
        mut neg: Score,
        bag: Bag,
    ) -> Score {
        let graph = self.ctx.graph;
        'moves: for m in graph.placements(field, front, hold) {
            let mut total: Score = 0;
            for p in bag.iter() {
                if self.cancelled() { break 'moves; }
                q.push_back(p);
                total += self.imperfect(m.field, m.hold, q, depth + 1, neg - total, bag.without(p));
                q.pop_back();
                if total >= neg { continue 'moves; }
            }
            neg = total;
            if neg == 0 { break; }
        }
        neg
    }

    /// One placement before the horizon with several shapes left to draw:
    /// every draw shares the same remaining preview, so all of them are
    /// scored in one walk, each against the weights of its own bag.
    fn last_draw(&mut self, field: usize, front: Shape, hold: Shape, q: &mut VecDeque<Shape>, mut neg: Score, bag: Bag) -> Score {
        let weights = self.ctx.weights;
        let graph = self.ctx.graph;
        let rows: [&WeightRow; PIECE_SHAPES] = Shape::ALL.map(|p| weights.row(bag.without(p)));
        let mut open = Open::default();
        for p in bag.iter() {
            open.best[p.index()] = Some(rows[p.index()].fail());
        }
        for m in graph.placements(field, front, hold) {
            if self.cancelled() { break; }
            let mut options = open;
            neg = neg.min(self.perfect_multiple(m.field, m.hold, q, &rows, &mut options));
            if neg == 0 { break; }
        }
        neg
    }

    /// Sum over the open shapes of their best measure. When the preview
    /// runs out the field is one placement from the end: playing the held
    /// piece leaves the drawn shape in hold, playing the drawn shape leaves
    /// the current hold.
    fn perfect_multiple(
        &mut self,
        field: usize,
        hold: Shape,
        q: &mut VecDeque<Shape>,
        rows: &[&WeightRow; PIECE_SHAPES],
        open: &mut Open,
    ) -> Score {
        self.nodes += 1;
        if self.ctx.two_line_hit(field) { open.clear(); }
        if open.is_empty() { return 0; }

        let graph = self.ctx.graph;
        let Some(front) = q.pop_front() else {
            if !graph.edges(field, hold).is_empty() {
                for p in open.members().iter() {
                    open.improve(p, rows[p.index()].get(p));
                }
            }
            for p in open.members().iter() {
                if !graph.edges(field, p).is_empty() {
                    open.improve(p, rows[p.index()].get(hold));
                }
            }
            return open.sum();
        };
        for m in graph.placements(field, front, hold) {
            if self.cancelled() { break; }
            if self.perfect_multiple(m.field, m.hold, q, rows, open) == 0 { break; }
        }
        q.push_front(front);
        open.sum()
    }

    /// Horizon: place the remaining preview with no further draws. Reaching
    /// the perfect clear state scores the row's value for the final hold.
    pub(crate) fn perfect_single(&mut self, field: usize, hold: Shape, q: &mut VecDeque<Shape>, row: &WeightRow) -> Score {
        self.nodes += 1;
        let ctx = self.ctx;
        if ctx.graph.is_terminal(field) { return row.get(hold); }
        if ctx.two_line_hit(field) { return 0; }
        let Some(front) = q.pop_front() else { return row.fail() };

        let mut best = row.fail();
        for m in ctx.graph.placements(field, front, hold) {
            if self.cancelled() { break; }
            best = best.min(self.perfect_single(m.field, m.hold, q, row));
            if best == 0 { break; }
        }
        q.push_front(front);
        best
    }
}
