//! cssbundle CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cssbundle")]
#[command(version)]
#[command(about = "Bundle stylesheets by inlining @import and @use", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the groups of a project
    Build {
        /// Project configuration (defaults to the nearest _cssbundle.yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only build the named group (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Write output to DIR (overrides output-dir from the configuration)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Minimize the output
        #[arg(long)]
        minimize: bool,

        /// Print the output instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Inline the imports of a single stylesheet
    Flatten {
        /// Stylesheet to flatten
        file: PathBuf,

        /// Compile the result as SCSS
        #[arg(long)]
        compile: bool,

        /// Minimize the output
        #[arg(long)]
        minimize: bool,

        /// Write output to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "cssbundle=debug"
    } else {
        "cssbundle=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            config,
            groups,
            output_dir,
            minimize,
            stdout,
        } => commands::build::execute(commands::build::BuildArgs {
            config,
            groups,
            output_dir,
            minimize,
            stdout,
        }),
        Commands::Flatten {
            file,
            compile,
            minimize,
            output,
        } => commands::flatten::execute(commands::flatten::FlattenArgs {
            file,
            compile,
            minimize,
            output,
        }),
    }
}
