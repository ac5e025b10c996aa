//! Root splitting: the first placement's successors are handed out as jobs
//! to a pool of workers that share one best result.
use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::decision::{Branch, Decision};
use super::shared::{Ctx, Worker};
use super::Score;
use crate::graph::Placement;
use crate::piece::{Bag, Shape};

/// A finished job result that can compete for the shared slot.
pub(crate) trait Candidate: Send {
    fn cost(&self) -> Score;
}

impl Candidate for Score {
    fn cost(&self) -> Score { *self }
}

impl Candidate for Decision {
    fn cost(&self) -> Score { Decision::cost(self) }
}

struct Slot<T> {
    next_job: usize,
    best: T,
    /// Job that produced `best`, `usize::MAX` while nobody has.
    lead: usize,
}

pub(crate) struct RootSplit<'a, T> {
    ctx: &'a Ctx<'a>,
    moves: Vec<Placement>,
    queue: VecDeque<Shape>,
    bag: Bag,
    /// Prefer the lowest job among equal costs.
    tie_break: bool,
    slot: Mutex<Slot<T>>,
}

impl<'a, T: Candidate> RootSplit<'a, T> {
    #[allow(clippy::too_many_arguments)]
    fn new(
        ctx: &'a Ctx<'a>,
        field: usize,
        front: Shape,
        hold: Shape,
        queue: &VecDeque<Shape>,
        bag: Bag,
        initial: T,
        tie_break: bool,
    ) -> Self {
        Self {
            ctx,
            moves: ctx.graph.placements(field, front, hold).collect(),
            queue: queue.clone(),
            bag,
            tie_break,
            slot: Mutex::new(Slot { next_job: 0, best: initial, lead: usize::MAX }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> { self.slot.lock().unwrap_or_else(PoisonError::into_inner) }

    fn claim(&self) -> Option<(usize, Placement)> {
        let mut slot = self.lock();
        let job = slot.next_job;
        let m = *self.moves.get(job)?;
        slot.next_job += 1;
        Some((job, m))
    }

    /// Bound in force for `job`. Jobs ahead of the current leader get one
    /// extra tick so an equal cost can still take the lead.
    fn bound(&self, job: usize) -> Score {
        let slot = self.lock();
        let cost = slot.best.cost();
        if self.tie_break && job < slot.lead { cost + 1 } else { cost }
    }

    fn offer(&self, job: usize, cand: T) {
        let cost = cand.cost();
        let mut slot = self.lock();
        if cost == 0 {
            self.ctx.shared.kill(job);
        }
        let best = slot.best.cost();
        if cost < best || (self.tie_break && cost == best && job <= slot.lead) {
            debug!("job {} takes the lead at {} (was {})", job, cost, best);
            slot.best = cand;
            slot.lead = job;
        }
    }

    /// Run every job on `threads` workers and return the winner. A job that
    /// returns `None` was cancelled and ends its worker.
    fn run<F>(self, threads: usize, job: F) -> T
    where
        F: Fn(&Self, &mut Worker<'a>, &mut VecDeque<Shape>, usize, Placement) -> Option<T> + Sync,
    {
        let threads = threads.clamp(1, self.moves.len().max(1));
        let work = || {
            let mut w = Worker::new(self.ctx, None);
            let mut q = self.queue.clone();
            while let Some((j, m)) = self.claim() {
                match job(&self, &mut w, &mut q, j, m) {
                    Some(cand) => self.offer(j, cand),
                    None => break,
                }
            }
        };
        if threads == 1 {
            work();
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|_| work());
                    }
                }),
                Err(e) => {
                    warn!("thread pool unavailable ({}), searching on one thread", e);
                    work();
                }
            }
        }
        self.slot.into_inner().unwrap_or_else(PoisonError::into_inner).best
    }
}

impl<'a> RootSplit<'a, Score> {
    /// Depth-zero counting step, split across workers.
    pub(crate) fn count(
        ctx: &'a Ctx<'a>,
        field: usize,
        front: Shape,
        hold: Shape,
        queue: &VecDeque<Shape>,
        bag: Bag,
        neg: Score,
    ) -> Score {
        let split = Self::new(ctx, field, front, hold, queue, bag, neg, false);
        debug!("splitting {} root placements", split.moves.len());
        split.run(ctx.params.threads, |split, w, q, j, m| {
            let mut total: Score = 0;
            for p in split.bag.iter() {
                if w.cancelled() { return None; }
                let bound = split.bound(j);
                if total >= bound { break; }
                q.push_back(p);
                total += w.imperfect(m.field, m.hold, q, 1, bound - total, split.bag.without(p));
                q.pop_back();
            }
            Some(total)
        })
    }
}

impl<'a> RootSplit<'a, Decision> {
    /// Depth-zero tree step. Each job is tagged with its index so the
    /// leader keeps running after a later job proves a zero cost.
    pub(crate) fn tree(
        ctx: &'a Ctx<'a>,
        field: usize,
        front: Shape,
        hold: Shape,
        queue: &VecDeque<Shape>,
        bag: Bag,
        neg: Score,
    ) -> Decision {
        let cap = ctx.cutoffs[0];
        let initial = Decision::Capped { cost: neg.min(cap), cap };
        let split = Self::new(ctx, field, front, hold, queue, bag, initial, true);
        split.run(ctx.params.threads, |split, w, q, j, m| {
            w.job = Some(j);
            let mut b = Branch::new(m.field, m.piece, cap);
            for p in split.bag.iter() {
                if w.cancelled() { return None; }
                let bound = split.bound(j);
                if b.cost >= bound { break; }
                q.push_back(p);
                let child = w.tree_imperfect(m.field, m.hold, q, 1, bound - b.cost, split.bag.without(p));
                q.pop_back();
                b.cost += child.cost();
                b.children[p.index()] = Some(child);
            }
            Some(Decision::Branch(Box::new(b)))
        })
    }
}
