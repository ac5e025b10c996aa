use std::ops::Index;

use crate::graph::PC_PIECES;
use crate::piece::PIECE_SHAPES;

/// Failure measure in fixed-point ticks. One whole failing future is
/// `WeightTable::unit()` ticks: 1 when counting, 2^32 when weighted.
pub type Score = u64;

/// Number of search depths for a board with `placed` pieces on it and
/// `see` known pieces (hold included). The last depth is the horizon.
pub fn horizon_len(placed: u32, see: usize) -> usize {
    (PC_PIECES as i64 + 2 - placed as i64 - see as i64).max(1) as usize
}

/// Per-depth count of distinct future draws, scaled to ticks.
///
/// Entry `d` is the product of the bag sizes seen from depth `d` to the
/// horizon, the bag refilling to seven whenever it runs out. It is both
/// the denominator of the final probability and the initial pruning
/// bound at that depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cutoffs(Vec<Score>);

impl Cutoffs {
    pub fn new(bag_len: usize, len: usize, unit: Score) -> Self {
        let len = len.max(1);
        let mut v = vec![unit; len];
        for i in (0..len - 1).rev() {
            let num = (bag_len + PIECE_SHAPES - i % PIECE_SHAPES) % PIECE_SHAPES;
            let num = if num == 0 { PIECE_SHAPES } else { num };
            v[i] = v[i + 1] * num as Score;
        }
        Self(v)
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Depth at which the unknown future stops being enumerated.
    #[inline]
    pub fn horizon(&self) -> usize { self.0.len() - 1 }

    /// All futures of the query, in ticks.
    pub fn total(&self) -> Score { self.0[0] }

    pub fn as_slice(&self) -> &[Score] { &self.0 }
}

impl Index<usize> for Cutoffs {
    type Output = Score;
    #[inline]
    fn index(&self, depth: usize) -> &Score { &self.0[depth] }
}
