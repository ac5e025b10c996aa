//! Read-only board-state graph.
//!
//! Every node is a reachable board (a "field") identified by a 40-bit
//! fingerprint of its occupied cells. For each of the seven shapes a node
//! lists the fields reachable by placing that shape. Nodes are sorted by
//! fingerprint, so the empty board is index 0 and the perfect clear state
//! (all bits set once four lines are cleared) is the last index.
use anyhow::{bail, Result};

use crate::error::ConfigError;
use crate::piece::{Shape, PIECE_SHAPES};

pub mod loader;
pub mod synthetic;

pub const HASH_LENGTH: usize = 5;
pub const PTR_LENGTH: usize = 3;
/// Node count of the full perfect clear graph.
pub const NUM_FIELDS: usize = 15_185_706;
pub const MAX_HASH: u64 = 0xFF_FFFF_FFFF;
/// Two cleared lines and nothing above them.
pub const TWO_LINE_HASH: u64 = 0xF_FFFF;
/// Pieces needed to clear four full lines of width ten.
pub const PC_PIECES: u32 = 10;

/// One way of playing a piece: the successor field, the shape that was
/// placed and the shape left in hold afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub field: usize,
    pub piece: Shape,
    pub hold: Shape,
}

/// Compressed adjacency: `offsets[node * 7 + shape]..offsets[node * 7 + shape + 1]`
/// indexes into `edges`.
#[derive(Debug, Clone)]
pub struct FieldGraph {
    hashes: Vec<u64>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl FieldGraph {
    pub fn len(&self) -> usize { self.hashes.len() }
    pub fn is_empty(&self) -> bool { self.hashes.is_empty() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    #[inline]
    pub fn hash(&self, field: usize) -> u64 { self.hashes[field] }

    #[inline]
    pub fn edges(&self, field: usize, shape: Shape) -> &[u32] {
        let slot = field * PIECE_SHAPES + shape.index();
        &self.edges[self.offsets[slot] as usize..self.offsets[slot + 1] as usize]
    }

    /// Index of the perfect clear state.
    #[inline]
    pub fn terminal(&self) -> usize { self.hashes.len() - 1 }

    #[inline]
    pub fn is_terminal(&self, field: usize) -> bool { field == self.terminal() }

    /// Moves available with `front` next in the queue and `hold` in hold:
    /// every successor of `front` first, then (when it differs) every
    /// successor of the held shape, which swaps `front` into hold.
    pub fn placements(&self, field: usize, front: Shape, hold: Shape) -> impl Iterator<Item = Placement> + '_ {
        let played = self.edges(field, front).iter().map(move |&f| Placement { field: f as usize, piece: front, hold });
        let swapped: &[u32] = if front != hold { self.edges(field, hold) } else { &[] };
        let held = swapped.iter().map(move |&f| Placement { field: f as usize, piece: hold, hold: front });
        played.chain(held)
    }

    pub fn placement_count(&self, field: usize, front: Shape, hold: Shape) -> usize {
        let held = if front != hold { self.edges(field, hold).len() } else { 0 };
        self.edges(field, front).len() + held
    }

    /// Binary search by fingerprint.
    pub fn lookup(&self, hash: u64) -> Option<usize> {
        let idx = self.hashes.partition_point(|&h| h < hash);
        (idx < self.hashes.len() && self.hashes[idx] == hash).then_some(idx)
    }

    /// Resolve a requested starting fingerprint, rejecting anything the
    /// search cannot start from.
    pub fn start_field(&self, hash: u64) -> Result<usize, ConfigError> {
        if hash >= MAX_HASH { return Err(ConfigError::FingerprintRange(hash)); }
        let field = self.lookup(hash).ok_or(ConfigError::UnknownFingerprint(hash))?;
        self.placed(field)?;
        Ok(field)
    }

    /// Pieces already on the board, derived from the mino count.
    pub fn placed(&self, field: usize) -> Result<u32, ConfigError> {
        let minos = self.hash(field).count_ones();
        if minos % 4 != 0 { return Err(ConfigError::MinoCount(self.hash(field))); }
        Ok(minos / 4)
    }
}

/// Incremental constructor used by the file loader, the synthetic generator and tests.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    hashes: Vec<u64>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl GraphBuilder {
    pub fn new() -> Self { Self::with_capacity(0, 0) }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        let mut offsets = Vec::with_capacity(nodes * PIECE_SHAPES + 1);
        offsets.push(0);
        Self { hashes: Vec::with_capacity(nodes), offsets, edges: Vec::with_capacity(edges) }
    }

    pub fn len(&self) -> usize { self.hashes.len() }
    pub fn is_empty(&self) -> bool { self.hashes.is_empty() }

    pub fn push(&mut self, hash: u64, successors: &[Vec<u32>; PIECE_SHAPES]) -> Result<()> {
        self.hashes.push(hash);
        for succ in successors {
            self.edges.extend_from_slice(succ);
            let end = match u32::try_from(self.edges.len()) {
                Ok(end) => end,
                Err(_) => bail!("graph exceeds {} edges", u32::MAX),
            };
            self.offsets.push(end);
        }
        Ok(())
    }

    /// Check the table invariants: non-empty, strictly ascending
    /// fingerprints and every edge pointing at an existing node.
    pub fn build(self) -> Result<FieldGraph> {
        if self.hashes.is_empty() { bail!("graph has no fields"); }
        if let Some(w) = self.hashes.windows(2).position(|w| w[0] >= w[1]) {
            bail!("fingerprints not ascending at field {}", w + 1);
        }
        let n = self.hashes.len();
        if let Some(&bad) = self.edges.iter().find(|&&e| e as usize >= n) {
            bail!("edge to field {} but graph has {} fields", bad, n);
        }
        Ok(FieldGraph { hashes: self.hashes, offsets: self.offsets, edges: self.edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> FieldGraph {
        let mut b = GraphBuilder::new();
        let mut succ: [Vec<u32>; PIECE_SHAPES] = Default::default();
        succ[Shape::I.index()] = vec![1, 2];
        succ[Shape::O.index()] = vec![2];
        b.push(0, &succ).unwrap();
        b.push(0xF, &Default::default()).unwrap();
        b.push(MAX_HASH, &Default::default()).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn placements_list_front_then_hold() {
        let g = tiny();
        let moves: Vec<Placement> = g.placements(0, Shape::I, Shape::O).collect();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0], Placement { field: 1, piece: Shape::I, hold: Shape::O });
        assert_eq!(moves[2], Placement { field: 2, piece: Shape::O, hold: Shape::I });
        assert_eq!(g.placements(0, Shape::I, Shape::I).count(), 2);
        assert_eq!(g.placement_count(0, Shape::O, Shape::I), 3);
    }

    #[test]
    fn lookup_and_start_validation() {
        let g = tiny();
        assert_eq!(g.lookup(0xF), Some(1));
        assert_eq!(g.lookup(0xE), None);
        assert_eq!(g.terminal(), 2);
        assert!(matches!(g.start_field(MAX_HASH), Err(ConfigError::FingerprintRange(_))));
        assert!(matches!(g.start_field(0x7), Err(ConfigError::UnknownFingerprint(_))));
        assert_eq!(g.placed(1).unwrap(), 1);
    }

    #[test]
    fn builder_rejects_dangling_edges() {
        let mut b = GraphBuilder::new();
        let mut succ: [Vec<u32>; PIECE_SHAPES] = Default::default();
        succ[0] = vec![5];
        b.push(0, &succ).unwrap();
        assert!(b.build().is_err());
    }
}
