use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use allowlist_cli::{lookup_proof, parse_address, parse_hash, parse_proof, verify_proof};

#[derive(Parser, Debug)]
#[command(name = "verify")]
#[command(about = "Check an account's Merkle proof against a root", long_about = None)]
pub struct Cli {
    /// Expected Merkle root (hex format)
    #[arg(short, long)]
    root: String,

    /// Ethereum account to check
    #[arg(short, long)]
    account: String,

    /// Comma-separated proof
    #[arg(short, long, conflicts_with = "chunks_dir", required_unless_present = "chunks_dir")]
    proof: Option<String>,

    /// Directory of chunk files to look the proof up in
    #[arg(long)]
    chunks_dir: Option<PathBuf>,
}

pub fn run(args: Cli) -> Result<()> {
    let root = parse_hash(&args.root).context("Invalid Merkle root")?;
    let account = parse_address(&args.account).context("Invalid account")?;

    let proof = match (&args.proof, &args.chunks_dir) {
        (Some(joined), _) => parse_proof(joined).context("Invalid proof")?,
        (None, Some(dir)) => {
            info!("Looking up {} in {:?}...", account, dir);
            lookup_proof(dir, &account).context("Failed to find proof in chunk files")?
        }
        (None, None) => anyhow::bail!("Either --proof or --chunks-dir is required"),
    };

    if !verify_proof(&account, &proof, &root) {
        anyhow::bail!("Proof for {} does not match root {}", account, args.root);
    }

    println!("valid");
    Ok(())
}
