mod common;

use common::*;

#[test]
fn fork_loses_exactly_one_draw() {
    use pcodds::{SearchParams, Searcher, WeightTable};
    let g = fork_graph();
    let w = WeightTable::unweighted();
    let s = Searcher::new(&g, &w, SearchParams::default());
    let r = s.count(&fork_query(0)).unwrap();
    assert_eq!(r.failures, 1);
    assert_eq!(r.total, 2);
    assert_eq!(r.to_string(), "1/2");
    assert_eq!(r.value(), 1);
}

#[test]
fn boolean_mode_reports_out_of_one() {
    use pcodds::{SearchParams, Searcher, WeightTable};
    let g = fork_graph();
    let w = WeightTable::unweighted();
    let s = Searcher::new(&g, &w, SearchParams::default());
    let r = s.boolean(&fork_query(0)).unwrap();
    assert_eq!(r.to_string(), "0/1");

    // Once the first draw is known to be T, playing I always clears
    let q = pcodds::Query::new(0, pcodds::Shape::O, vec![pcodds::Shape::I], bag("T"));
    assert_eq!(s.boolean(&q).unwrap().to_string(), "1/1");
}

#[test]
fn weighted_rows_follow_the_final_hold() {
    use pcodds::weights::WEIGHT_SCALE;
    use pcodds::{SearchParams, Searcher, WeightTable};
    let g = fork_graph();
    // After drawing T only S is unseen; after drawing S only T is.
    let w = WeightTable::parse("S 0 0 0 100 0 0 0\nT 7 0 0 0 0 0 0\n").unwrap();
    let s = Searcher::new(&g, &w, SearchParams::default());
    let r = s.count(&fork_query(0)).unwrap();
    // Holding O and playing it clears on S with I left in hold (7), T fails.
    assert_eq!(r.failures, WEIGHT_SCALE + 7);
    assert_eq!(r.total, 2 * WEIGHT_SCALE);
    assert_eq!(r.to_string(), (WEIGHT_SCALE + 7).to_string());
}

#[test]
fn missing_weight_rows_count_like_pass_fail() {
    use pcodds::weights::WEIGHT_SCALE;
    use pcodds::{SearchParams, Searcher, WeightTable};
    let g = fork_graph();
    let w = WeightTable::parse("").unwrap();
    let s = Searcher::new(&g, &w, SearchParams::default());
    assert_eq!(s.count(&fork_query(0)).unwrap().failures, WEIGHT_SCALE);
}

#[test]
fn two_line_field_counts_as_success() {
    use pcodds::{SearchParams, Searcher, WeightTable};
    let g = two_line_graph();
    let w = WeightTable::unweighted();
    let plain = Searcher::new(&g, &w, SearchParams::default());
    assert_eq!(plain.count(&fork_query(1)).unwrap().to_string(), "1/2");
    let two_line = Searcher::new(&g, &w, SearchParams { threads: 1, two_line: true });
    assert_eq!(two_line.count(&fork_query(1)).unwrap().to_string(), "2/2");
}

#[test]
fn denominator_is_seven_times_six() {
    use pcodds::repl::parse_query;
    use pcodds::{SearchParams, Searcher, WeightTable};
    let g = dead_graph();
    let w = WeightTable::unweighted();
    let s = Searcher::new(&g, &w, SearchParams::default());
    let q = parse_query(0, "TIJLOSZIJ", "7", 9).unwrap();
    assert_eq!(s.cutoffs(&q).unwrap().as_slice(), &[42, 6, 1]);
    let r = s.count(&q).unwrap();
    assert_eq!(r.to_string(), "0/42");

    let sg = synthetic(3);
    let s = Searcher::new(&sg, &w, SearchParams::default());
    assert_eq!(s.count(&q).unwrap().total, 42);
}

#[test]
fn horizon_on_terminal_reads_the_weight_directly() {
    use pcodds::{Bag, Query, SearchParams, Searcher, Shape, WeightTable};
    let g = fork_graph();
    let w = WeightTable::parse("IJLOSTZ 5 3 9 3 4 10 7\n").unwrap();
    let s = Searcher::new(&g, &w, SearchParams::default());
    let q = Query::new(g.terminal(), Shape::T, vec![Shape::I], Bag::FULL);
    let r = s.count(&q).unwrap();
    assert_eq!(r.failures, 7);
    assert!(r.nodes <= 2, "searched {} nodes", r.nodes);
}

#[test]
fn successes_and_failures_cover_every_future() {
    use pcodds::repl::parse_query;
    use pcodds::{SearchParams, Searcher, WeightTable};
    let w = WeightTable::unweighted();
    for seed in 1..=4 {
        let g = synthetic(seed);
        let s = Searcher::new(&g, &w, SearchParams::default());
        for (pieces, bag_token) in SYNTH_QUERIES {
            let q = parse_query(0, pieces, bag_token, pieces.len()).unwrap();
            let r = s.count(&q).unwrap();
            assert_eq!(r.successes() + r.failures, s.cutoffs(&q).unwrap().total());
        }
    }
}
