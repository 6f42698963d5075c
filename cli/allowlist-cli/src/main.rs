#![forbid(unsafe_code)]
#![allow(unreachable_pub)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod data;
mod generate_chunks;
mod proof;
mod root;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "allowlist")]
#[command(about = "Merkle allowlist tools: roots, proofs and chunked proof data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Root(root::Cli),
    Proof(proof::Cli),
    Data(data::Cli),
    GenerateChunks(generate_chunks::Cli),
    Verify(verify::Cli),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Root(args) => root::run(args)?,
        Commands::Proof(args) => proof::run(args)?,
        Commands::Data(args) => data::run(args)?,
        Commands::GenerateChunks(args) => generate_chunks::run(args)?,
        Commands::Verify(args) => verify::run(args)?,
    }

    Ok(())
}
