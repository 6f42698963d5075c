use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use allowlist_cli::{read_entries, write_file_atomic, Allowlist, ProofEncoding};

#[derive(Parser, Debug)]
#[command(name = "data")]
#[command(about = "Generate a Merkle data file from a list of Ethereum accounts", long_about = None)]
pub struct Cli {
    /// CSV file containing all Ethereum accounts to generate Merkle data from
    #[arg(short, long)]
    file: PathBuf,

    /// Output JSON file (lowercase account -> proof record)
    #[arg(short, long, default_value = "merkle-data.json")]
    output: PathBuf,

    /// Proof encoding
    #[arg(long, value_enum, default_value_t = ProofEncoding::Joined)]
    format: ProofEncoding,
}

pub fn run(args: Cli) -> Result<()> {
    info!("Reading accounts from {:?}...", args.file);
    let entries = read_entries(&args.file)?;
    let allowlist = Allowlist::from_entries(&entries).context("Failed to build allowlist")?;
    info!("Total accounts: {}", allowlist.len());

    let records = allowlist
        .proof_records(args.format)
        .context("Failed to generate proofs")?;
    let json = serde_json::to_string(&records).context("Failed to serialize Merkle data")?;
    write_file_atomic(&args.output, &json).context("Failed to write Merkle data file")?;

    println!("Generated Merkle data file: {}", args.output.display());
    println!("Merkle root: {}", allowlist.root_hex());
    Ok(())
}
