//! qkd-certgen — issue a self-signed Ed25519 X.509 certificate from
//! QKD-supplied entropy.
//!
//! Decodes one or more base64 key fragments, derives a deterministic
//! Ed25519 key pair from the first 32 aggregated bytes, and writes
//! `<prefix>_cert.pem` / `<prefix>_key.pem` to the working directory.

use anyhow::{Context, Result};
use clap::Parser;

use qkd_identity::{aggregate, certificate, derivation, subject};

/// Generate an Ed25519 X.509 certificate from QKD keys.
#[derive(Parser, Debug)]
#[command(name = "qkd-certgen", version, about = "Generate Ed25519 X.509 cert from QKD keys")]
struct Args {
    /// Base64-encoded QKD key (can be used multiple times)
    #[arg(long = "key", required = true)]
    key: Vec<String>,

    /// Filename prefix for cert and key
    #[arg(long, default_value = "qkd_ed25519")]
    prefix: String,

    /// Country Name (e.g., RO)
    #[arg(long = "C")]
    country: Option<String>,

    /// State or Province Name
    #[arg(long = "ST")]
    state: Option<String>,

    /// Locality Name
    #[arg(long = "L")]
    locality: Option<String>,

    /// Organization Name
    #[arg(long = "O")]
    organization: Option<String>,

    /// Organizational Unit Name
    #[arg(long = "OU")]
    organizational_unit: Option<String>,

    /// Common Name
    #[arg(long = "CN")]
    common_name: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let subject = subject::SubjectFields {
        country: args.country,
        state: args.state,
        locality: args.locality,
        organization: args.organization,
        organizational_unit: args.organizational_unit,
        common_name: args.common_name,
    }
    .build()
    .context("failed to build subject name")?;

    let entropy = aggregate(&args.key).context("failed to aggregate QKD entropy")?;
    let seed = derivation::SigningSeed::from_entropy(&entropy)?;
    let keypair = derivation::KeyPair::from_seed(&seed);

    let issued = certificate::issue(&keypair, &subject).context("failed to issue certificate")?;
    let (cert_path, key_path) = issued.persist(&args.prefix)?;

    println!(
        "Saved {} and {}",
        cert_path.display(),
        key_path.display()
    );

    Ok(())
}
