use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use allowlist_cli::{read_entries, write_chunks, Allowlist, ProofEncoding};

#[derive(Parser, Debug)]
#[command(name = "generate-chunks")]
#[command(
    about = "Generate Merkle data chunk files from a list of Ethereum accounts",
    long_about = "Generate Merkle data chunk files from a list of Ethereum accounts.\n\n\
                  The output directory is deleted and recreated on every run."
)]
pub struct Cli {
    /// CSV file containing the Ethereum accounts to construct the tree from
    #[arg(short, long)]
    file: PathBuf,

    /// How many entries at most each chunk file contains
    #[arg(short, long)]
    chunk_size: usize,

    /// Output directory for chunk files
    #[arg(short, long, default_value = "merkle_chunks")]
    out_dir: PathBuf,

    /// Proof encoding
    #[arg(long, value_enum, default_value_t = ProofEncoding::Joined)]
    format: ProofEncoding,
}

pub fn run(args: Cli) -> Result<()> {
    info!("Reading accounts from {:?}...", args.file);
    let entries = read_entries(&args.file)?;
    let allowlist = Allowlist::from_entries(&entries).context("Failed to build allowlist")?;
    info!("Total accounts: {}", allowlist.len());

    let chunks = allowlist
        .chunks(args.chunk_size, args.format)
        .context("Failed to partition Merkle data")?;
    let written = write_chunks(&args.out_dir, &chunks).context("Failed to write chunk files")?;

    println!(
        "Generated {} chunk files in {}",
        written.len(),
        args.out_dir.display()
    );
    println!("Merkle root: {}", allowlist.root_hex());
    Ok(())
}
