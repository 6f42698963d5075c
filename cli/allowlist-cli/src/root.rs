use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use allowlist_cli::{read_entries, write_file_atomic, Allowlist};

#[derive(Parser, Debug)]
#[command(name = "root")]
#[command(about = "Compute the Merkle root of a list of Ethereum accounts", long_about = None)]
pub struct Cli {
    /// CSV file containing the Ethereum accounts (one per line)
    #[arg(short, long)]
    file: PathBuf,

    /// Also write the root to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: Cli) -> Result<()> {
    info!("Reading accounts from {:?}...", args.file);
    let entries = read_entries(&args.file)?;

    let allowlist = Allowlist::from_entries(&entries).context("Failed to build allowlist")?;
    info!("Total accounts: {}", allowlist.len());

    allowlist
        .ensure_proofs()
        .context("Proof check failed")?;

    let root = allowlist.root_hex();
    println!("{root}");

    if let Some(path) = args.output {
        write_file_atomic(&path, &format!("{root}\n")).context("Failed to write root file")?;
        info!("Wrote Merkle root to {:?}", path);
    }

    Ok(())
}
