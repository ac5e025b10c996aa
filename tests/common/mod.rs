#![allow(dead_code)]
use pcodds::graph::synthetic::SyntheticSpec;
use pcodds::graph::{FieldGraph, GraphBuilder, MAX_HASH, TWO_LINE_HASH};
use pcodds::piece::{Bag, Shape, PIECE_SHAPES};
use pcodds::Query;

/// 32 minos: eight pieces down, two to go.
pub const START: u64 = 0xFFFF_FFFF;
pub const B1: u64 = 0x1_0000_0000;
pub const B2: u64 = 0x1_0000_0001;

pub fn succ(list: &[(Shape, &[u32])]) -> [Vec<u32>; PIECE_SHAPES] {
    let mut s: [Vec<u32>; PIECE_SHAPES] = Default::default();
    for (shape, to) in list {
        s[shape.index()] = to.to_vec();
    }
    s
}

/// From the start, playing I reaches a field that T finishes; holding O
/// instead and playing it reaches a field that S finishes.
/// Indices: 0 start, 1 (I played), 2 (O played), 3 terminal.
pub fn fork_graph() -> FieldGraph {
    let mut b = GraphBuilder::new();
    b.push(START, &succ(&[(Shape::I, &[1]), (Shape::O, &[2])])).unwrap();
    b.push(B1, &succ(&[(Shape::T, &[3])])).unwrap();
    b.push(B2, &succ(&[(Shape::S, &[3])])).unwrap();
    b.push(MAX_HASH, &Default::default()).unwrap();
    b.build().unwrap()
}

/// Like the fork, but playing O lands on the two-line field, which is a dead end.
/// Indices: 0 two-line, 1 start, 2 (I played), 3 terminal.
pub fn two_line_graph() -> FieldGraph {
    let mut b = GraphBuilder::new();
    b.push(TWO_LINE_HASH, &Default::default()).unwrap();
    b.push(START, &succ(&[(Shape::I, &[2]), (Shape::O, &[0])])).unwrap();
    b.push(B1, &succ(&[(Shape::T, &[3])])).unwrap();
    b.push(MAX_HASH, &Default::default()).unwrap();
    b.build().unwrap()
}

/// Empty board with no moves at all.
pub fn dead_graph() -> FieldGraph {
    let mut b = GraphBuilder::new();
    b.push(0, &Default::default()).unwrap();
    b.push(MAX_HASH, &Default::default()).unwrap();
    b.build().unwrap()
}

pub fn synthetic(seed: u64) -> FieldGraph {
    SyntheticSpec { placements: 10, width: 8, max_edges: 2, dead_end_pct: 40, seed }.build().unwrap()
}

pub fn bag(s: &str) -> Bag { s.chars().filter_map(Shape::from_char).collect() }

/// Hold O, preview I, S and T still unseen.
pub fn fork_query(field: usize) -> Query { Query::new(field, Shape::O, vec![Shape::I], bag("ST")) }

/// Queries against the synthetic graph's empty board, as (pieces, bag token).
pub const SYNTH_QUERIES: &[(&str, &str)] = &[
    ("TIJLOSZIJ", "7"),
    ("TIJLOSZIJ", "3"),
    ("OSZTIJLOS", "IOT"),
    ("ZTSLJIOTZI", "7"),
    ("IJLOSTZIJL", "JZ"),
    ("SZLJTOIIJLO", "6"),
];
