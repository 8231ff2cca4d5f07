//! sslutil CLI application.
//!
//! Mints a self-signed root CA (`--action ca`) or signs a leaf certificate with
//! an existing CA (`--action sign`) from a JSON subject description.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use sslutil::commands::{CaRequest, OutputTarget, SignRequest, create_ca_cert, create_signed_cert};
use sslutil::issuer::IssueOptions;
use sslutil::key::{DEFAULT_RSA_BITS, KeyEncoding};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sslutil")]
#[command(about = "Mint a root CA or sign a certificate with it", long_about = None)]
struct Cli {
    /// The action: ca or sign
    #[arg(long)]
    action: Option<String>,

    /// Config JSON file
    #[arg(long)]
    cfg: Option<PathBuf>,

    /// CA certificate PEM (sign only)
    #[arg(long)]
    ca: Option<PathBuf>,

    /// CA private key PEM (sign only)
    #[arg(long = "ca-key")]
    ca_key: Option<PathBuf>,

    /// Output directory for the certificate and key (default: current directory)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Filename prefix for the certificate and key
    #[arg(long, default_value = "ca")]
    prefix: String,

    /// RSA modulus size of the new key
    #[arg(long = "key-bits", default_value_t = DEFAULT_RSA_BITS)]
    key_bits: usize,

    /// Private key PEM format: legacy, pkcs1 or pkcs8
    #[arg(long = "key-format", default_value_t = KeyEncoding::Legacy)]
    key_format: KeyEncoding,
}

enum Action {
    Ca,
    Sign,
}

impl Cli {
    fn action(&self) -> Option<Action> {
        match self.action.as_deref() {
            Some("ca") => Some(Action::Ca),
            Some("sign") => Some(Action::Sign),
            _ => None,
        }
    }

    fn output(&self) -> Result<OutputTarget> {
        let dir = match &self.out {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };
        Ok(OutputTarget {
            dir,
            prefix: self.prefix.clone(),
        })
    }

    fn options(&self) -> IssueOptions {
        IssueOptions {
            key_bits: self.key_bits,
            key_encoding: self.key_format,
        }
    }

    fn config(&self) -> Result<PathBuf> {
        self.cfg.clone().context("--cfg is required")
    }
}

fn run(cli: &Cli, action: Action) -> Result<()> {
    match action {
        Action::Ca => {
            let request = CaRequest {
                config: cli.config()?,
                output: cli.output()?,
                options: cli.options(),
            };
            create_ca_cert(&request).context("Failed to create CA certificate")?;
        }
        Action::Sign => {
            let (Some(ca_cert), Some(ca_key)) = (cli.ca.clone(), cli.ca_key.clone()) else {
                bail!("sign requires both --ca and --ca-key");
            };
            let request = SignRequest {
                config: cli.config()?,
                ca_cert,
                ca_key,
                output: cli.output()?,
                options: cli.options(),
            };
            create_signed_cert(&request).context("Failed to sign certificate")?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }

    let cli = Cli::parse();
    let Some(action) = cli.action() else {
        // Unknown or missing action only prints usage.
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(&cli, action) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            println!("Something error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
