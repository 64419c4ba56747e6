//! Verifies a hex-encoded signature against a hex-encoded group public key.
//!
//! ```text
//! cargo run --example verify -- --message hello --signature <hex> --pubkey <hex>
//! ```

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::fmt;

use tbls::Verifier;

#[derive(Parser)]
#[command(name = "verify")]
#[command(about = "Verify a threshold BLS signature on both backends")]
struct Cli {
    /// Original message
    #[arg(long)]
    message: String,

    /// Hex-encoded signature
    #[arg(long)]
    signature: String,

    /// Hex-encoded group public key
    #[arg(long)]
    pubkey: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_ansi(false)
        .init();

    let result = Verifier::new().verify_bytes(
        cli.message.as_bytes(),
        &hex::decode(&cli.signature)?,
        &hex::decode(&cli.pubkey)?,
    )?;

    info!(
        blst = result.backend_a_verdict,
        arkworks = result.backend_b_verdict,
        valid = result.is_valid,
        "verification finished"
    );
    if !result.is_valid {
        error!("signature verification failed");
        std::process::exit(1);
    }
    Ok(())
}
