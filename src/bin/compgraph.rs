use anyhow::Result;
use clap::{Parser, Subcommand};
use compgraph::algorithms::{
    InvertedIndexParams, PmiParams, RoadSpeedParams, inverted_index_graph, pmi_graph,
    road_speed_graph, word_count_graph,
};
use compgraph::{Graph, Sources};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compgraph")]
#[command(about = "Run bundled computation graphs over JSON Lines files", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the execution plan to stderr before running
    #[arg(long, global = true)]
    explain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count occurrences of every word
    WordCount {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "text")]
        text_column: String,
        #[arg(long, default_value = "count")]
        count_column: String,
    },
    /// Top documents per word by tf-idf
    InvertedIndex {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short = 'n', long, default_value = "3")]
        top: usize,
    },
    /// Top words per document by pointwise mutual information
    Pmi {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },
    /// Average road speed by weekday and hour
    RoadSpeed {
        /// Travel records: edge_id, enter_time, leave_time
        #[arg(long)]
        times: PathBuf,
        /// Road edges: edge_id, start, end
        #[arg(long)]
        lengths: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn execute(graph: &Graph, sources: &Sources, output: &Path, explain: bool) -> Result<()> {
    if explain {
        eprintln!("{}", graph.explain()?);
    }
    let written = graph.write_jsonl(sources, output)?;
    info!("wrote {} rows to {}", written, output.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::WordCount {
            input,
            output,
            text_column,
            count_column,
        } => {
            let graph = word_count_graph("input", &text_column, &count_column);
            let sources = Sources::new().with_jsonl("input", &input);
            execute(&graph, &sources, &output, cli.explain)
        }
        Commands::InvertedIndex { input, output, top } => {
            let params = InvertedIndexParams {
                n: top,
                ..InvertedIndexParams::default()
            };
            let graph = inverted_index_graph("input", &params);
            let sources = Sources::new().with_jsonl("input", &input);
            execute(&graph, &sources, &output, cli.explain)
        }
        Commands::Pmi { input, output, top } => {
            let params = PmiParams {
                n: top,
                ..PmiParams::default()
            };
            let graph = pmi_graph("input", &params);
            let sources = Sources::new().with_jsonl("input", &input);
            execute(&graph, &sources, &output, cli.explain)
        }
        Commands::RoadSpeed {
            times,
            lengths,
            output,
        } => {
            let graph = road_speed_graph("times", "lengths", &RoadSpeedParams::default());
            let sources = Sources::new()
                .with_jsonl("times", &times)
                .with_jsonl("lengths", &lengths);
            execute(&graph, &sources, &output, cli.explain)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    debug!("compgraph started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
