//! Owned decision trees produced by the tree search.
//!
//! A branch owns its children outright; replacing the best branch drops the
//! loser (and its whole subtree) on the spot.
use anyhow::{Context, Result};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::io::Write;

use super::Score;
use crate::graph::FieldGraph;
use crate::piece::{Shape, PIECE_SHAPES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing beat the bound in force; `cost` is that bound, `cap` the
    /// bound the node was opened with.
    Capped { cost: Score, cap: Score },
    Branch(Box<Branch>),
    /// Horizon reached: the replayable line of placements to the end.
    Solve(Solve),
}

/// Placement chosen at a depth above the horizon, with one child per
/// possible next unseen shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub field: usize,
    pub piece: Shape,
    pub cost: Score,
    pub cap: Score,
    pub children: [Option<Decision>; PIECE_SHAPES],
}

impl Branch {
    pub fn new(field: usize, piece: Shape, cap: Score) -> Self {
        Self { field, piece, cost: 0, cap, children: Default::default() }
    }

    pub fn child(&self, drawn: Shape) -> Option<&Decision> { self.children[drawn.index()].as_ref() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub field: usize,
    pub piece: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solve {
    pub cost: Score,
    pub line: Vec<Step>,
}

impl Decision {
    #[inline]
    pub fn cost(&self) -> Score {
        match self {
            Decision::Capped { cost, .. } => *cost,
            Decision::Branch(b) => b.cost,
            Decision::Solve(s) => s.cost,
        }
    }

    /// True when the node carries no improvement over its cap.
    pub fn is_capped(&self) -> bool {
        match self {
            Decision::Capped { .. } => true,
            Decision::Branch(b) => b.cost >= b.cap,
            Decision::Solve(_) => false,
        }
    }

    /// Number of nodes in the tree, solve steps included.
    pub fn size(&self) -> usize {
        match self {
            Decision::Capped { .. } => 1,
            Decision::Branch(b) => 1 + b.children.iter().flatten().map(Decision::size).sum::<usize>(),
            Decision::Solve(s) => 1 + s.line.len(),
        }
    }

    pub fn view<'g>(&'g self, graph: &'g FieldGraph) -> TreeView<'g> { TreeView { graph, node: self } }
}

/// Bracketed rendering of a tree, field indices replaced by fingerprints:
/// branch `[fingerprint,piece,cost,[children]]`, capped `[-1,-1,cap]`,
/// solve `[[cost],[fingerprint,piece],...]`, missing child `null`.
pub struct TreeView<'g> {
    graph: &'g FieldGraph,
    node: &'g Decision,
}

impl Serialize for TreeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node {
            Decision::Branch(b) if b.cost < b.cap => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                seq.serialize_element(&self.graph.hash(b.field))?;
                seq.serialize_element(&b.piece.index())?;
                seq.serialize_element(&b.cost)?;
                let children: Vec<Option<TreeView<'_>>> =
                    b.children.iter().map(|c| c.as_ref().map(|d| d.view(self.graph))).collect();
                seq.serialize_element(&children)?;
                seq.end()
            }
            Decision::Branch(b) => capped(serializer, b.cap),
            Decision::Capped { cap, .. } => capped(serializer, *cap),
            Decision::Solve(s) => {
                let mut seq = serializer.serialize_seq(Some(1 + s.line.len()))?;
                seq.serialize_element(&[s.cost])?;
                for step in &s.line {
                    seq.serialize_element(&(self.graph.hash(step.field), step.piece.index()))?;
                }
                seq.end()
            }
        }
    }
}

fn capped<S: Serializer>(serializer: S, cap: Score) -> Result<S::Ok, S::Error> {
    (-1i64, -1i64, cap).serialize(serializer)
}

/// Write the viewer artifact: the starting fingerprint, then the tree.
pub fn write_tree<W: Write>(mut w: W, graph: &FieldGraph, start: usize, tree: &Decision) -> Result<()> {
    writeln!(w, "init_hash={}", graph.hash(start))?;
    write!(w, "data=")?;
    serde_json::to_writer(&mut w, &tree.view(graph)).context("serialize decision tree")?;
    w.flush()?;
    Ok(())
}
