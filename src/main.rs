use clap::{Parser, Subcommand};
use jsmodule::core::JsmError;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "jsmodule")]
#[command(about = "Concatenate self-describing script modules into dependency-ordered bundles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter jsmodule.yaml
    Init {
        /// Skip the prompt and use the directory name
        #[arg(short, long)]
        yes: bool,
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Build bundles declared in jsmodule.yaml
    Build {
        /// Only build the bundle with this output path
        #[arg(short, long)]
        bundle: Option<String>,
        /// Strip pragma:DEBUG spans regardless of configuration
        #[arg(long)]
        strip_debug: bool,
        /// Compile every bundle from scratch
        #[arg(long)]
        no_cache: bool,
    },
    /// Show units, directives and reference counts without writing output
    Inspect {
        /// Only inspect the bundle with this output path
        #[arg(short, long)]
        bundle: Option<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), JsmError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { yes, name } => cli::init::run(name, yes),
        Commands::Build {
            bundle,
            strip_debug,
            no_cache,
        } => cli::build::run(bundle, strip_debug, no_cache),
        Commands::Inspect { bundle, json } => cli::inspect::run(bundle, json),
    };

    // Display error with helpful suggestions
    if let Err(ref e) = result {
        eprintln!("\n{}", jsmodule::core::error_help::format_error_with_help(e));
    }

    result
}
