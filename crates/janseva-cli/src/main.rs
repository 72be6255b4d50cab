//! # janseva CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// JanSeva kiosk workflow CLI.
///
/// Inspects the service catalog and walks complete kiosk flows against
/// the bundled backend stand-ins.
#[derive(Parser, Debug)]
#[command(name = "janseva", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the built-in service catalog.
    Catalog(janseva_cli::catalog::CatalogArgs),
    /// Walk a complete flow end to end.
    Demo(janseva_cli::demo::DemoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog(args) => janseva_cli::catalog::run(&args),
        Commands::Demo(args) => janseva_cli::demo::run(&args),
    }
}
