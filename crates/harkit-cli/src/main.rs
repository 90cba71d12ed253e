use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harkit_cli::OutputFormat;
use harkit_cli::commands;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harkit")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for merging and inspecting HTTP Archive (HAR) files",
    long_about = "harkit reads HAR documents with base64-encoded bodies, merges capture \
                  directories into a single log and extracts payloads and robots flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, json)
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value = "pretty",
        env = "HARKIT_FORMAT"
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every .har file in a directory into one log
    Combine {
        /// Directory holding the HAR files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Write the combined HAR to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the decoded response body of the last entry
    Payload {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the payload to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List entries flagged robots=disallowed
    Robots {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Display a summary of a HAR file
    Info {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate the script for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    tracing::debug!("Output format: {}", cli.format.as_str());

    match cli.command {
        Commands::Combine { dir, output } => commands::combine::execute(&dir, output, cli.format),
        Commands::Payload { file, output } => commands::payload::execute(&file, output),
        Commands::Robots { file } => commands::robots::execute(&file, cli.format),
        Commands::Info { file } => commands::info::execute(&file, cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harkit=debug,harkit_cli=debug,harkit_core=debug")
    } else {
        EnvFilter::new("harkit=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
