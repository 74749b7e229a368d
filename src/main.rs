use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use pqroute::{edge_csv, DenseIds, DijkstraError, Edge, NodeId, RawId, ShortestPathSolver};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "route")]
#[command(about = "Read a from,to,cost CSV edge list and find the minimum-cost path between two node ids.", long_about = None)]
struct Cli {
    /// Path to the .csv file (header row, then from,to,cost per row)
    #[arg(short, long)]
    csv: String,

    /// Node id the path starts at
    #[arg(short, long)]
    start: RawId,

    /// Node id the path ends at
    #[arg(short, long)]
    end: RawId,

    /// Treat every edge as undirected by also adding its reverse
    #[arg(long, default_value_t = false)]
    two_way: bool,

    /// Renumber node ids to 0..n before solving, for inputs whose ids are not consecutive
    #[arg(long, default_value_t = false)]
    remap: bool,

    /// Output CSV (step, node_id, cost_from_start). If omitted, prints the path to stdout.
    #[arg(short, long)]
    out: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let raw_edges = edge_csv::read_edges_from_path(&cli.csv)?;
    info!(
        "Loaded {} edges from {}{}",
        raw_edges.len(),
        cli.csv,
        if cli.two_way { " (mirrored)" } else { "" }
    );

    let (ids, edges, start, end) = if cli.remap {
        let (ids, edges) = DenseIds::from_edges(&raw_edges);
        info!("Remapped {} distinct node ids", ids.len());
        let start = ids.dense(cli.start).ok_or(DijkstraError::InvalidStart);
        let end = ids.dense(cli.end).ok_or(DijkstraError::InvalidEnd);
        (Some(ids), edges, start, end)
    } else {
        let edges = raw_edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                edge.to_edge().ok_or_else(|| {
                    anyhow!("record {}: node id does not fit in u32, try --remap", i + 1)
                })
            })
            .collect::<Result<Vec<Edge>>>()?;
        let start = NodeId::try_from(cli.start).map_err(|_| DijkstraError::InvalidStart);
        let end = NodeId::try_from(cli.end).map_err(|_| DijkstraError::InvalidEnd);
        (None, edges, start, end)
    };
    let context = || format!("routing {} -> {}", cli.start, cli.end);
    let start = start.with_context(context)?;
    let end = end.with_context(context)?;

    let mut solver = ShortestPathSolver::new(edges).two_way(cli.two_way);
    let now = Instant::now();
    let found = solver.solve(start, end).with_context(context)?;
    info!("Solved in {} s", now.elapsed().as_secs_f64());

    let nodes: Vec<RawId> = match &ids {
        Some(ids) => ids.to_original(&found.path),
        None => found.path.iter().map(|&id| RawId::from(id)).collect(),
    };

    if let Some(out_path) = &cli.out {
        edge_csv::write_path_to_path(out_path, &nodes, &found)?;
        println!("Wrote {} path nodes to {}", found.len(), out_path);
    } else {
        let hops: Vec<String> = nodes.iter().map(|id| id.to_string()).collect();
        println!(
            "Path [{} nodes, {} cost]: {}",
            found.len(),
            found.total_cost,
            hops.join(" -> ")
        );
    }

    Ok(())
}
