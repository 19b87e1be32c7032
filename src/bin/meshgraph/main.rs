//! meshgraph CLI - build, inspect and flatten mesh topology graphs.
//!
//! Usage: meshgraph [-v] <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `meshgraph --help` for available commands. Set `RUST_LOG` or pass
//! `-v`/`-vv` for log output.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use meshgraph::algo::selection::grow_selection_by;
use meshgraph::graph::{BuildOptions, DedupStrategy, MeshGraph, NodeId, NodeRef};
use meshgraph::io::{self, records};

#[derive(Parser)]
#[command(name = "meshgraph")]
#[command(author, version, about = "Mesh topology graph CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display graph information
    Info {
        /// Input mesh (.stl, .ply) or graph records (.json)
        input: PathBuf,

        /// Vertex deduplication strategy
        #[arg(short, long, value_enum, default_value = "hashed")]
        dedup: DedupMethod,
    },

    /// Build a graph and write it as JSON records
    Flatten {
        /// Input mesh file
        input: PathBuf,

        /// Output records file
        output: PathBuf,

        /// Vertex deduplication strategy
        #[arg(short, long, value_enum, default_value = "hashed")]
        dedup: DedupMethod,

        /// Check every topological invariant after building
        #[arg(long)]
        validate: bool,
    },

    /// Grow a selection around a vertex and print the selected node ids
    Grow {
        /// Input mesh (.stl, .ply) or graph records (.json)
        input: PathBuf,

        /// Node id of the starting vertex
        #[arg(long)]
        vertex: u32,

        /// Number of rings to grow
        #[arg(short, long, default_value = "1")]
        rings: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DedupMethod {
    /// Hash positions (linear time)
    Hashed,
    /// Compare every pair of positions (quadratic time)
    Linear,
}

impl From<DedupMethod> for DedupStrategy {
    fn from(method: DedupMethod) -> Self {
        match method {
            DedupMethod::Hashed => DedupStrategy::Hashed,
            DedupMethod::Linear => DedupStrategy::LinearScan,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, dedup } => {
            cmd_info(&input, dedup)?;
        }

        Commands::Flatten {
            input,
            output,
            dedup,
            validate,
        } => {
            cmd_flatten(&input, &output, dedup, validate)?;
        }

        Commands::Grow {
            input,
            vertex,
            rings,
        } => {
            cmd_grow(&input, vertex, rings)?;
        }
    }

    Ok(())
}

fn load_graph(input: &Path, options: &BuildOptions) -> Result<MeshGraph, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let graph = io::load_with_options(input, options)?;
    log::debug!("built graph in {:.2?}", start.elapsed());
    Ok(graph)
}

fn cmd_info(input: &Path, dedup: DedupMethod) -> Result<(), Box<dyn std::error::Error>> {
    let options = BuildOptions::default().with_dedup(dedup.into());
    let graph = load_graph(input, &options)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", graph.num_vertices());
    println!("Edges: {}", graph.num_edges());
    println!("Triangles: {}", graph.num_triangles());

    let boundary = graph.boundary_edges().count();
    println!("Boundary edges: {}", boundary);
    println!("Closed: {}", if graph.is_closed() { "yes" } else { "no" });

    let undefined = graph
        .vertex_normals()
        .iter()
        .filter(|n| n.norm_squared() == 0.0)
        .count();
    println!("Vertices without a normal: {}", undefined);

    // Euler characteristic V - E + F
    let chi = graph.num_vertices() as i64 - graph.num_edges() as i64 + graph.num_triangles() as i64;
    println!("Euler characteristic: {}", chi);

    match graph.validate() {
        Ok(()) => println!("Topology: valid"),
        Err(e) => println!("Topology: {}", e),
    }

    Ok(())
}

fn cmd_flatten(
    input: &Path,
    output: &Path,
    dedup: DedupMethod,
    validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = BuildOptions::default()
        .with_dedup(dedup.into())
        .with_validation(validate);

    let start = Instant::now();
    let graph = load_graph(input, &options)?;
    records::save(&graph, output)?;

    println!(
        "Wrote {} records ({} vertices, {} edges, {} triangles) to {} in {:.2?}",
        graph.num_nodes(),
        graph.num_vertices(),
        graph.num_edges(),
        graph.num_triangles(),
        output.display(),
        start.elapsed()
    );

    Ok(())
}

fn cmd_grow(input: &Path, vertex: u32, rings: usize) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(input, &BuildOptions::default())?;

    let start = NodeId::new(vertex)
        .and_then(|id| graph.find(id))
        .ok_or_else(|| format!("no node with id {}", vertex))?;
    let NodeRef::Vertex(v) = start else {
        return Err(format!("node {} is a {}, not a vertex", vertex, start.kind()).into());
    };

    let selection = grow_selection_by(&graph, &[v], rings);
    let ids: Vec<String> = selection
        .iter()
        .map(|&s| graph.vertex(s).id().to_string())
        .collect();

    println!("Selected {} vertices after {} ring(s):", selection.len(), rings);
    println!("{}", ids.join(" "));

    Ok(())
}
