mod common;

use common::*;

/// Every subset (and the empty one) with a spread of per-shape values.
fn weight_text() -> String {
    let mut text = String::new();
    for bits in 0u8..128 {
        let subset = pcodds::Bag::from_bits(bits).to_string();
        text.push_str(if subset.is_empty() { "null" } else { &subset });
        for shape in 0..7u64 {
            let v = ((bits as u64 * 37 + shape * 11) % 5) << 30;
            text.push_str(&format!(" {}", v));
        }
        text.push('\n');
    }
    text
}

#[test]
fn pruning_never_changes_the_count() {
    use pcodds::repl::parse_query;
    use pcodds::{exhaustive, SearchParams, Searcher, WeightTable};
    let w = WeightTable::unweighted();
    for seed in 1..=5 {
        let g = synthetic(seed);
        let s = Searcher::new(&g, &w, SearchParams::default());
        for (pieces, bag_token) in SYNTH_QUERIES {
            let q = parse_query(0, pieces, bag_token, pieces.len()).unwrap();
            let expected = exhaustive::failures(&g, &w, &q, false).unwrap();
            assert_eq!(s.count(&q).unwrap().failures, expected, "seed {} query {} {}", seed, pieces, bag_token);
        }
    }
}

#[test]
fn pruning_never_changes_the_weighted_measure() {
    use pcodds::repl::parse_query;
    use pcodds::{exhaustive, SearchParams, Searcher, WeightTable};
    let w = WeightTable::parse(&weight_text()).unwrap();
    assert_eq!(w.len(), 128);
    for seed in 1..=4 {
        let g = synthetic(seed);
        let s = Searcher::new(&g, &w, SearchParams { threads: 2, two_line: false });
        for (pieces, bag_token) in SYNTH_QUERIES {
            let q = parse_query(0, pieces, bag_token, pieces.len()).unwrap();
            let expected = exhaustive::failures(&g, &w, &q, false).unwrap();
            assert_eq!(s.count(&q).unwrap().failures, expected, "seed {} query {} {}", seed, pieces, bag_token);
            assert_eq!(s.tree(&q).unwrap().decision.cost(), expected);
        }
    }
}

#[test]
fn explicit_bound_caps_without_changing_smaller_results() {
    use pcodds::repl::parse_query;
    use pcodds::{SearchParams, Searcher, WeightTable};
    let w = WeightTable::unweighted();
    let g = synthetic(2);
    let s = Searcher::new(&g, &w, SearchParams::default());
    for (pieces, bag_token) in SYNTH_QUERIES {
        let q = parse_query(0, pieces, bag_token, pieces.len()).unwrap();
        let cutoffs = s.cutoffs(&q).unwrap();
        let exact = s.count(&q).unwrap().failures;
        for bound in [1, 5, 17, cutoffs.total()] {
            assert_eq!(s.count_with(&q, &cutoffs, bound).failures, exact.min(bound));
        }
        assert_eq!(s.boolean(&q).unwrap().failures, exact.min(1));
    }
}

#[test]
fn repeated_queries_are_identical() {
    use pcodds::repl::parse_query;
    use pcodds::{SearchParams, Searcher, WeightTable};
    let w = WeightTable::unweighted();
    let g = synthetic(4);
    let s = Searcher::new(&g, &w, SearchParams { threads: 3, two_line: false });
    let q = parse_query(0, "TIJLOSZIJ", "7", 9).unwrap();
    let first = s.count(&q).unwrap().failures;
    for _ in 0..5 {
        assert_eq!(s.count(&q).unwrap().failures, first);
    }
}

#[test]
fn out_of_range_fingerprint_is_rejected() {
    use pcodds::config::check_fingerprint;
    use pcodds::error::ConfigError;
    use pcodds::graph::MAX_HASH;
    let g = fork_graph();
    assert!(matches!(g.start_field(MAX_HASH), Err(ConfigError::FingerprintRange(_))));
    assert!(matches!(g.start_field(u64::MAX), Err(ConfigError::FingerprintRange(_))));
    assert!(matches!(g.start_field(0x1234), Err(ConfigError::UnknownFingerprint(_))));
    // present but not a whole number of pieces
    assert!(matches!(g.start_field(B1), Err(ConfigError::MinoCount(_))));
    assert!(check_fingerprint(MAX_HASH).is_err());
    assert_eq!(g.start_field(START).unwrap(), 0);
}
