//! qkd-fetch — fetch key material from a KME over mutual TLS and save
//! the decoded binary stream.
//!
//! Issues a fixed number of sequential requests against the key-delivery
//! endpoint, authenticating with the supplied certificate and private
//! key (decrypted once, held only in memory), and concatenates every
//! delivered key into one output file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use qkd_identity::{ClientCredential, KeyFetchSession, SessionConfig};

/// Fetch keys via mutual TLS and save the decoded binary stream.
#[derive(Parser, Debug)]
#[command(
    name = "qkd-fetch",
    version,
    about = "Fetch keys via mutual TLS and save decoded binary stream"
)]
struct Args {
    /// Path to client certificate PEM file
    #[arg(long)]
    cert: PathBuf,

    /// Path to client private key PEM file
    #[arg(long)]
    key: PathBuf,

    /// Password for encrypted private key (optional)
    #[arg(long)]
    password: Option<String>,

    /// URL to request keys from
    #[arg(long)]
    url: String,

    /// Output file for concatenated binary keys
    #[arg(long, default_value = "bin_stream.bin")]
    output: PathBuf,

    /// Number of keys to request
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// Skip peer certificate verification (mutual TLS still applies).
    /// Off by default; enabling this is logged loudly.
    #[arg(long)]
    insecure_skip_verify: bool,
}

fn main() {
    // Default to info so per-item confirmations are visible.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let credential = ClientCredential {
        certificate_path: args.cert,
        private_key_path: args.key,
        password: args.password,
    };

    let mut config = SessionConfig::new(args.url);
    config.request_count = args.count;
    config.insecure_skip_verify = args.insecure_skip_verify;

    let session =
        KeyFetchSession::establish(&credential, config).context("failed to establish session")?;

    let stream = session.fetch_all().context("key fetch aborted")?;
    stream
        .persist(&args.output)
        .context("failed to write output stream")?;

    println!(
        "\nWritten {} bytes to '{}'",
        stream.len(),
        args.output.display()
    );

    Ok(())
}
