//! Graph Explorer - browse and search object graphs as a lazy tree
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use graph_explorer::{run_dump, run_find, DumpRequest, FindRequest};

/// Graph Explorer - browse and search object graphs stored as JSON
#[derive(Parser, Debug)]
#[command(name = "gx")]
#[command(about = "Browse and search object graphs stored as JSON", long_about = None)]
struct Args {
    /// JSON document to explore
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Directory holding `.gx/config.toml` (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree as indented text
    Dump {
        /// Levels to expand below the dumped node
        #[arg(long, default_value_t = 2)]
        depth: usize,

        /// Child names leading from the root to the node to dump
        #[arg(long = "path", value_name = "NAME")]
        path: Vec<String>,
    },

    /// Search formatted values and print NDJSON events
    Find {
        text: String,

        #[arg(long)]
        backward: bool,

        #[arg(long)]
        case_sensitive: bool,

        /// Only search subtrees that are already expanded
        #[arg(long)]
        no_expand: bool,

        /// Keep searching after each match, up to N searches
        #[arg(long, default_value_t = 1, value_name = "N")]
        repeat: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Logging goes to a file; failing to set it up is not fatal
    if let Err(e) = gx_core::logging::init() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let config_dir = args
        .config
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Dump { depth, path } => {
            run_dump(&args.file, &config_dir, &DumpRequest { path, depth }, &mut out)?;
        }
        Command::Find {
            text,
            backward,
            case_sensitive,
            no_expand,
            repeat,
        } => {
            let request = FindRequest {
                text,
                backward,
                case_sensitive,
                no_expand,
                repeat,
            };
            run_find(&args.file, &config_dir, &request, &mut out).await?;
        }
    }

    Ok(())
}
