//! Signs a message with a subset of nodes and verifies it on both backends.
//!
//! ```text
//! cargo run --example threshold_example -- --message hello --nodes 1,4,7,9,12,13,15,16,17,18,19,20,2
//! ```

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, error, info};
use tracing_subscriber::fmt;

use tbls::{BlstBackend, ThresholdBls, ThresholdScheme, Verifier};

#[derive(Parser)]
#[command(name = "threshold-example")]
#[command(about = "Threshold BLS signing with dual-backend verification")]
struct Cli {
    /// Message to sign
    #[arg(long)]
    message: String,

    /// Comma-separated list of signing node indices
    #[arg(long, value_delimiter = ',', required = true)]
    nodes: Vec<usize>,

    /// Threshold value for the signature scheme
    #[arg(long, default_value_t = 13)]
    threshold: usize,

    /// Total number of nodes
    #[arg(long, default_value_t = 20)]
    total: usize,

    /// Print the signature, the group key and every signer's public key
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_target(false)
        .with_ansi(false)
        .init();

    let mut rng = StdRng::from_entropy();
    let scheme = ThresholdBls::<BlstBackend>::default();

    info!(
        threshold = cli.threshold,
        total_nodes = cli.total,
        signers = ?cli.nodes,
        "starting threshold signing"
    );

    let keys = scheme.initialize(&mut rng, cli.threshold, cli.total)?;
    let signature = scheme.sign(&keys, cli.message.as_bytes(), &cli.nodes)?;

    debug!(signature = %signature, "recovered group signature");
    debug!(group_public_key = %keys.group_public_key(), "group public key");
    for &index in &cli.nodes {
        let node = keys.node(index)?;
        debug!(index, public_share = %node.public_share(), "participating node");
    }

    let result =
        Verifier::new().verify(cli.message.as_bytes(), &signature, keys.group_public_key())?;
    info!(
        blst = result.backend_a_verdict,
        arkworks = result.backend_b_verdict,
        valid = result.is_valid,
        "verification finished"
    );

    if !result.is_valid {
        error!("signature did not verify");
        std::process::exit(1);
    }
    Ok(())
}
