//! The two workflows exposed on the command line: minting a root CA and
//! signing a leaf with an existing one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::config::load_identity;
use crate::error::Result;
use crate::issuer::{IssueOptions, SigningMode, issue};
use crate::key::KeyPair;
use crate::output::{OutputPaths, write_out};

/// Where and under which name the PEM files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub prefix: String,
}

/// Inputs for [`create_ca_cert`].
#[derive(Debug, Clone)]
pub struct CaRequest {
    pub config: PathBuf,
    pub output: OutputTarget,
    pub options: IssueOptions,
}

/// Inputs for [`create_signed_cert`].
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub config: PathBuf,
    pub ca_cert: PathBuf,
    pub ca_key: PathBuf,
    pub output: OutputTarget,
    pub options: IssueOptions,
}

/// Creates a self-signed root CA certificate and writes it with its key.
pub fn create_ca_cert(request: &CaRequest) -> Result<OutputPaths> {
    let mut identity = load_identity(&request.config)?;
    identity.is_ca = true;

    let issued = issue(&SigningMode::SelfSigned, &identity, request.options)?;
    let paths = write_out(&request.output.dir, &request.output.prefix, &issued)?;
    info!(cert = %paths.cert.display(), key = %paths.key.display(), "wrote CA certificate");
    Ok(paths)
}

/// Signs a new leaf certificate with an existing CA and writes it with its key.
///
/// The CA material is read and decoded before anything else, so a malformed
/// CA certificate or key leaves the output directory untouched.
pub fn create_signed_cert(request: &SignRequest) -> Result<OutputPaths> {
    let parent = load_parent(&request.ca_cert, &request.ca_key)?;

    let mut identity = load_identity(&request.config)?;
    identity.is_ca = false;

    let issued = issue(&SigningMode::Parent(parent), &identity, request.options)?;
    let paths = write_out(&request.output.dir, &request.output.prefix, &issued)?;
    info!(cert = %paths.cert.display(), key = %paths.key.display(), "wrote signed certificate");
    Ok(paths)
}

/// Reads a PEM certificate and its PEM private key and pairs them.
pub fn load_parent(cert_path: &Path, key_path: &Path) -> Result<CertificateWithPrivateKey> {
    let cert_pem = fs::read_to_string(cert_path)?;
    let key_pem = fs::read_to_string(key_path)?;

    let key = KeyPair::from_pem(&key_pem)?;
    let cert = Certificate::from_pem(&cert_pem)?;
    debug!(
        cert = %cert_path.display(),
        subject = %cert.subject(),
        key_bits = key.bits(),
        "loaded CA material"
    );
    CertificateWithPrivateKey::new(cert, key)
}
