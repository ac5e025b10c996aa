use anyhow::{bail, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{FieldGraph, GraphBuilder, MAX_HASH};
use crate::piece::PIECE_SHAPES;

/// Shape of a random layered graph. Layer 0 is the empty board (index 0,
/// fingerprint 0) and layer `placements` is the perfect clear state alone,
/// so every route from the start to the terminal takes exactly
/// `placements` pieces.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticSpec {
    pub placements: usize,
    pub width: usize,
    pub max_edges: usize,
    /// Chance (percent) that a shape has no successor from a given field.
    pub dead_end_pct: u32,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self { placements: 10, width: 24, max_edges: 3, dead_end_pct: 30, seed: 1 }
    }
}

impl SyntheticSpec {
    pub fn field_count(&self) -> usize {
        2 + self.placements.saturating_sub(1) * self.width
    }

    pub fn build(&self) -> Result<FieldGraph> {
        if self.placements == 0 || self.width == 0 || self.max_edges == 0 {
            bail!("synthetic graph needs at least one placement, field and edge");
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let n = self.field_count();
        let terminal = (n - 1) as u32;
        // First index of layer l (l >= 1)
        let layer_start = |l: usize| 1 + (l - 1) * self.width;
        let mut b = GraphBuilder::with_capacity(n, n * PIECE_SHAPES * self.max_edges);
        for field in 0..n - 1 {
            let layer = if field == 0 { 0 } else { 1 + (field - 1) / self.width };
            let mut succ: [Vec<u32>; PIECE_SHAPES] = Default::default();
            for list in succ.iter_mut() {
                if rng.gen_range(0..100) < self.dead_end_pct { continue; }
                if layer + 1 == self.placements {
                    list.push(terminal);
                    continue;
                }
                let base = layer_start(layer + 1);
                for _ in 0..rng.gen_range(1..=self.max_edges) {
                    list.push((base + rng.gen_range(0..self.width)) as u32);
                }
                list.sort_unstable();
                list.dedup();
            }
            b.push(field as u64, &succ)?;
        }
        b.push(MAX_HASH, &Default::default())?;
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_graph_has_expected_size_and_terminal() {
        let spec = SyntheticSpec { placements: 4, width: 5, ..Default::default() };
        let g = spec.build().unwrap();
        assert_eq!(g.len(), 17);
        assert_eq!(g.hash(g.terminal()), MAX_HASH);
        assert_eq!(g.lookup(0), Some(0));
    }

    #[test]
    fn same_seed_same_graph() {
        let spec = SyntheticSpec { placements: 5, width: 8, seed: 42, ..Default::default() };
        let (a, b) = (spec.build().unwrap(), spec.build().unwrap());
        let mut ea = Vec::new();
        let mut eb = Vec::new();
        a.encode(&mut ea).unwrap();
        b.encode(&mut eb).unwrap();
        assert_eq!(ea, eb);
    }
}
