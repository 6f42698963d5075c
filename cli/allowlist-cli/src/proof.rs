use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use allowlist_cli::{
    format_proof, hex_encode, parse_address, read_entries, Allowlist, ProofEncoding,
};

#[derive(Parser, Debug)]
#[command(name = "proof")]
#[command(about = "Print the Merkle proof for a given Ethereum account", long_about = None)]
pub struct Cli {
    /// CSV file containing all Ethereum accounts to construct the tree from
    #[arg(short, long)]
    file: PathBuf,

    /// Ethereum account to get the proof for
    #[arg(short, long)]
    account: String,

    /// Proof encoding
    #[arg(long, value_enum, default_value_t = ProofEncoding::Joined)]
    format: ProofEncoding,
}

pub fn run(args: Cli) -> Result<()> {
    let account = parse_address(&args.account).context("Invalid account")?;

    info!("Reading accounts from {:?}...", args.file);
    let entries = read_entries(&args.file)?;
    let allowlist = Allowlist::from_entries(&entries).context("Failed to build allowlist")?;

    let proof = allowlist
        .proof(&account)
        .with_context(|| format!("No proof for {account}"))?;
    info!("Proof length: {} nodes", proof.len());

    match args.format {
        ProofEncoding::Joined => println!("{}", format_proof(&proof)),
        ProofEncoding::List => {
            let items: Vec<String> = proof.iter().map(hex_encode).collect();
            println!("{}", serde_json::to_string(&items)?);
        }
    }

    Ok(())
}
