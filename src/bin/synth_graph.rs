use anyhow::Result;
use clap::Parser;
use log::info;
use pcodds::graph::synthetic::SyntheticSpec;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "synth-graph", version, about = "Write a random layered graph in the graph file format")]
struct Args {
    /// Output path
    #[arg(long, default_value = "graph.bin")]
    out: PathBuf,

    /// Pieces from the empty board to the clear
    #[arg(long, default_value_t = 10)]
    placements: usize,

    /// Fields per layer
    #[arg(long, default_value_t = 24)]
    width: usize,

    /// Most successors per shape
    #[arg(long, default_value_t = 3)]
    max_edges: usize,

    /// Percent of shapes with no successor
    #[arg(long, default_value_t = 30)]
    dead_end_pct: u32,

    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let spec = SyntheticSpec {
        placements: args.placements,
        width: args.width,
        max_edges: args.max_edges,
        dead_end_pct: args.dead_end_pct,
        seed: args.seed,
    };
    let graph = spec.build()?;
    graph.save(&args.out)?;
    info!("wrote {} fields, {} edges to {}", graph.len(), graph.edge_count(), args.out.display());
    Ok(())
}
