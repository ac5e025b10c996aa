use anyhow::Result;
use clap::Parser;
use log::info;
use pcodds::config::{self, Modes, Settings, DEFAULT_SEE};
use pcodds::repl::Session;
use pcodds::{FieldGraph, WeightTable};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pcodds", about = "Perfect clear odds for a piece preview", disable_version_flag = true)]
struct Args {
    /// Board-state graph file
    #[arg(long, default_value = "graph.bin")]
    graph: PathBuf,

    /// Weight table, read in weighted mode only
    #[arg(long, default_value = "weights.txt")]
    weights: PathBuf,

    /// Where decision mode writes its tree
    #[arg(long, default_value = "tree_data.js")]
    tree_out: PathBuf,

    /// Fingerprint of the starting field
    #[arg(short = 'f', long = "field")]
    field: Option<u64>,

    /// Worker threads (default: all cores)
    #[arg(short = 'm', long = "threads")]
    threads: Option<usize>,

    /// Known pieces per query, hold included
    #[arg(short = 's', long, default_value_t = DEFAULT_SEE)]
    see: usize,

    /// Only ask whether every future clears
    #[arg(short = 'b', long)]
    boolean: bool,

    /// Build the decision tree
    #[arg(short = 'd', long)]
    decision: bool,

    /// Also print each bare result on stdout
    #[arg(short = 'o', long)]
    stdout: bool,

    /// Two cleared lines count as success
    #[arg(short = 't', long)]
    two_line: bool,

    /// Expected value against the weight table
    #[arg(short = 'w', long)]
    weighted: bool,

    /// Print the version and exit
    #[arg(short = 'v', long)]
    version: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let modes = Modes {
        boolean: args.boolean,
        decision: args.decision,
        stdout: args.stdout,
        two_line: args.two_line,
        weighted: args.weighted,
    };
    modes.validate()?;
    info!("pcodds v{}", env!("CARGO_PKG_VERSION"));
    if args.version { return Ok(()); }

    let requested = args.field.map(config::check_fingerprint).transpose()?;
    let threads = config::clamp_threads(args.threads.unwrap_or_else(config::hardware_threads))?;
    let see = config::check_see(args.see)?;

    let weights = if modes.weighted { WeightTable::load(&args.weights)? } else { WeightTable::unweighted() };
    let graph = FieldGraph::load(&args.graph)?;
    let field = graph.start_field(requested.unwrap_or_else(|| graph.hash(0)))?;

    info!("Starting from field {} (hash {})", field, graph.hash(field));
    info!("Max threads is {}", threads);
    info!("Running see {}", see);
    modes.log_banner();

    let settings = Settings { field, see, threads, modes, tree_out: Some(args.tree_out) };
    let mut session = Session::new(&graph, &weights, settings);
    session.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
