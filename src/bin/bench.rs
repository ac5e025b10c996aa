use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use pcodds::graph::synthetic::SyntheticSpec;
use pcodds::repl::parse_query;
use pcodds::{exhaustive, FieldGraph, SearchParams, Searcher, WeightTable};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "pcodds-bench", version, about = "Time one perfect clear query")]
struct Args {
    /// Graph file; a synthetic graph is generated when absent
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Hold followed by the preview
    #[arg(long, default_value = "TIJLOSZIJ")]
    queue: String,

    /// Unseen shapes, or a digit for how many remain in the bag
    #[arg(long, default_value = "7")]
    bag: String,

    /// Threads
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Time the decision-tree search instead of counting
    #[arg(long)]
    decision: bool,

    /// Weight table for a weighted query
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Check the result against the unpruned evaluator (small graphs only)
    #[arg(long)]
    verify: bool,

    /// Synthetic graph: pieces from start to clear
    #[arg(long, default_value_t = 10)]
    placements: usize,

    /// Synthetic graph: fields per layer
    #[arg(long, default_value_t = 24)]
    width: usize,

    /// Synthetic graph seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Print a JSON report instead of log lines
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    queue: String,
    bag: String,
    threads: usize,
    decision: bool,
    failures: u64,
    total: u64,
    result: String,
    nodes: u64,
    millis: u128,
    verified: Option<bool>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let graph = match &args.graph {
        Some(path) => FieldGraph::load(path)?,
        None => {
            let spec = SyntheticSpec { placements: args.placements, width: args.width, seed: args.seed, ..Default::default() };
            info!("generating synthetic graph ({} fields)", spec.field_count());
            spec.build()?
        }
    };
    let weights = match &args.weights {
        Some(path) => WeightTable::load(path)?,
        None => WeightTable::unweighted(),
    };
    let see = args.queue.chars().count();
    let query = parse_query(0, &args.queue, &args.bag, see)?;
    let searcher = Searcher::new(&graph, &weights, SearchParams { threads: args.threads.max(1), two_line: false });

    let t0 = Instant::now();
    let result = if args.decision { searcher.tree(&query)?.summary() } else { searcher.count(&query)? };
    let millis = t0.elapsed().as_millis();

    let verified = if args.verify {
        let expected = exhaustive::failures(&graph, &weights, &query, false)?;
        if expected != result.failures {
            bail!("search found {} failures, exhaustive evaluation found {}", result.failures, expected);
        }
        Some(true)
    } else {
        None
    };

    if args.json {
        let report = Report {
            queue: args.queue.clone(),
            bag: query.bag.to_string(),
            threads: args.threads,
            decision: args.decision,
            failures: result.failures,
            total: result.total,
            result: result.to_string(),
            nodes: result.nodes,
            millis,
            verified,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!("result {} nodes {} time {} ms", result, result.nodes, millis);
        if millis > 0 {
            info!("nps {}", (result.nodes as u128 * 1000) / millis);
        }
        if verified.is_some() {
            info!("verified against exhaustive evaluation");
        }
    }
    Ok(())
}
