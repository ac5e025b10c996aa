mod common;

use common::*;
use std::fs::File;
use std::io::Write;

#[test]
fn record_layout_is_big_endian_hash_then_little_endian_edges() {
    let g = fork_graph();
    let mut buf = Vec::new();
    g.encode(&mut buf).unwrap();
    // start: 5-byte hash, then I (1 edge), J, L, O (1 edge), S, T, Z
    assert_eq!(&buf[..5], &[0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&buf[5..9], &[1, 1, 0, 0]);
    assert_eq!(&buf[9..11], &[0, 0]);
    assert_eq!(&buf[11..15], &[1, 2, 0, 0]);
    // 4 records: start 5+7+6, two forks 5+7+3 each, terminal 5+7
    assert_eq!(buf.len(), 18 + 15 + 15 + 12);
}

#[test]
fn decode_reads_what_encode_wrote() {
    use pcodds::graph::MAX_HASH;
    use pcodds::{FieldGraph, Shape};
    let g = synthetic(9);
    let mut buf = Vec::new();
    g.encode(&mut buf).unwrap();
    let back = FieldGraph::decode(buf.as_slice()).unwrap();
    assert_eq!(back.len(), g.len());
    assert_eq!(back.edge_count(), g.edge_count());
    assert_eq!(back.hash(back.terminal()), MAX_HASH);
    for field in [0, 1, g.len() / 2, g.len() - 2] {
        for shape in Shape::ALL {
            assert_eq!(back.edges(field, shape), g.edges(field, shape));
        }
    }
}

#[test]
fn truncated_record_is_an_error() {
    use pcodds::FieldGraph;
    let mut buf = Vec::new();
    fork_graph().encode(&mut buf).unwrap();
    buf.truncate(buf.len() - 3);
    assert!(FieldGraph::decode(buf.as_slice()).is_err());
    assert!(FieldGraph::decode(&buf[..3]).is_err());
}

#[test]
fn load_from_file_and_lookup() {
    use pcodds::FieldGraph;
    let path = "target/graph_file_fork.bin";
    fork_graph().save(path).unwrap();
    let g = FieldGraph::load(path).unwrap();
    assert_eq!(g.len(), 4);
    assert_eq!(g.lookup(B2), Some(2));
    assert_eq!(g.lookup(B2 + 1), None);
    assert_eq!(g.start_field(START).unwrap(), 0);
}

#[test]
fn unsorted_file_is_rejected() {
    use pcodds::FieldGraph;
    let path = "target/graph_file_unsorted.bin";
    let mut f = File::create(path).unwrap();
    for hash in [5u64, 3] {
        f.write_all(&hash.to_be_bytes()[3..]).unwrap();
        f.write_all(&[0u8; 7]).unwrap();
    }
    drop(f);
    assert!(FieldGraph::load(path).is_err());
}
