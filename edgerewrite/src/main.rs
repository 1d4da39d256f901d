use clap::{Parser, Subcommand};
use edgerewrite_core::cli;
use edgerewrite_core::conf::load_config;
use edgerewrite_core::logging::{init_cli_logging, init_logging};
use edgerewrite_core::rewrite::DEFAULT_DOCUMENT;
use edgerewrite_core::server;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "config/edgerewrite.toml";

#[derive(Parser, Debug)]
#[command(
    name = "edgerewrite",
    version,
    about = "Edgerewrite: precompressed-object rewriting edge"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the edge server (default)
    Run {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Validate configuration and exit
    Check {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Rewrite a single viewer-request event (JSON) and print the request
    Rewrite {
        /// Event file. Reads stdin when omitted.
        #[arg(long)]
        event: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_DOCUMENT)]
        default_document: String,

        #[arg(long)]
        pretty: bool,
    },

    /// Print key, content type and encoding of every object in a site directory
    Objects {
        #[arg(long)]
        dir: PathBuf,
    },

    /// Write missing .br and .gz variants next to compressible files
    Precompress {
        #[arg(long)]
        dir: PathBuf,

        /// Smallest file (bytes) worth compressing
        #[arg(long, default_value_t = 1024)]
        min_size: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Run {
        config: PathBuf::from(DEFAULT_CONFIG),
    }) {
        Command::Run { config } => {
            init_logging();
            run_server(config)
        }

        Command::Check { config } => {
            init_cli_logging();
            cli::check(&config)
        }

        Command::Rewrite {
            event,
            default_document,
            pretty,
        } => {
            init_cli_logging();
            cli::rewrite(event.as_deref(), &default_document, pretty)
        }

        Command::Objects { dir } => {
            init_cli_logging();
            cli::objects(&dir)
        }

        Command::Precompress { dir, min_size } => {
            init_cli_logging();
            cli::precompress(&dir, min_size)
        }
    };

    if let Err(e) = result {
        eprintln!("edgerewrite: {e:#}");
        std::process::exit(1);
    }
}

fn run_server(config: PathBuf) -> anyhow::Result<()> {
    let cfg = load_config(&config)?;
    server::run(config, cfg)
}
