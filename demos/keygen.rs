//! Generates a threshold key set and prints every node's keys as hex.
//!
//! ```text
//! cargo run --example keygen -- --threshold 13 --total 20 --output keys.txt
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::fmt;

use tbls::{BlstBackend, ThresholdBls, ThresholdScheme};

#[derive(Parser)]
#[command(name = "keygen")]
#[command(about = "Generate a threshold BLS key set")]
struct Cli {
    /// Threshold value
    #[arg(long, default_value_t = 13)]
    threshold: usize,

    /// Total number of nodes
    #[arg(long, default_value_t = 20)]
    total: usize,

    /// Output file for keys; printed to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        threshold,
        total: total_nodes,
        output,
    } = Cli::parse();

    fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let keys = ThresholdBls::<BlstBackend>::default().initialize(
        &mut StdRng::from_entropy(),
        threshold,
        total_nodes,
    )?;

    let mut report = String::new();
    writeln!(report, "BLS Threshold Key Generation")?;
    writeln!(report, "===========================")?;
    writeln!(report, "Threshold: {threshold}")?;
    writeln!(report, "Total Nodes: {total_nodes}\n")?;
    writeln!(report, "Group Public Key: {}\n", keys.group_public_key())?;
    writeln!(report, "Node Keys:")?;
    for node in keys.nodes() {
        writeln!(report, "Node {}:", node.index())?;
        writeln!(report, "  Private Key: {}", hex::encode(node.secret_share_bytes()))?;
        writeln!(report, "  Public Key:  {}\n", node.public_share())?;
    }

    match output {
        Some(path) => {
            std::fs::write(&path, report)?;
            info!(path = %path.display(), "keys written");
        }
        None => print!("{report}"),
    }
    Ok(())
}
