//! # sslutil - Minimal X.509 Issuing in Pure Rust
//!
//! sslutil mints a self-signed root CA certificate from a JSON subject
//! description, or uses an existing root certificate and key to sign a new
//! leaf certificate. It is built on rustcrypto libraries only.
//!
//! ## What Gets Issued
//!
//! Every certificate carries:
//! - **Subject**: C, ST, L, O and OU attributes, each possibly multi-valued
//! - **Validity**: from the moment of issuance for a whole number of calendar years
//! - **Key**: a fresh RSA key (2048 bits unless configured otherwise)
//! - **Basic Constraints**: `cA` set for roots, clear for leaves
//! - **Key Usage**: digital signature and certificate signing
//! - **Extended Key Usage**: client and server authentication
//! - **Subject Alternative Names**: hosts classified as IP, email, URI or DNS name
//!
//! ## Quick Start
//!
//! ### Minting a Root CA
//!
//! ```rust,no_run
//! use sslutil::cert::params::SubjectIdentity;
//! use sslutil::issuer::{issue, IssueOptions, SigningMode};
//!
//! # fn main() -> Result<(), sslutil::error::SslUtilError> {
//! let identity = SubjectIdentity::builder()
//!     .country(vec!["US".to_string()])
//!     .organization(vec!["Acme".to_string()])
//!     .hosts(vec!["example.com".to_string(), "10.0.0.1".to_string()])
//!     .years(5)
//!     .is_ca(true)
//!     .build();
//!
//! let root = issue(&SigningMode::SelfSigned, &identity, IssueOptions::default())?;
//! println!("{}", root.cert_pem);
//! # Ok(())
//! # }
//! ```
//!
//! ### Signing a Leaf
//!
//! ```rust,no_run
//! use sslutil::cert::Certificate;
//! use sslutil::cert::params::SubjectIdentity;
//! use sslutil::issuer::{issue, IssueOptions, SigningMode};
//! use sslutil::key::KeyPair;
//!
//! # fn main() -> Result<(), sslutil::error::SslUtilError> {
//! let ca_cert = Certificate::from_pem(&std::fs::read_to_string("ca-cert.pem")?)?;
//! let ca_key = KeyPair::from_pem(&std::fs::read_to_string("ca-key.pem")?)?;
//! let mode = SigningMode::from_parts(Some(ca_cert), Some(ca_key))?;
//!
//! let identity = SubjectIdentity::builder()
//!     .hosts(vec!["svc.internal".to_string()])
//!     .build();
//! let leaf = issue(&mode, &identity, IssueOptions::default())?;
//! println!("{}", leaf.cert_pem);
//! # Ok(())
//! # }
//! ```
//!
//! ## Host Classification
//!
//! Each host is classified by the first matching rule: IP literal, RFC 5322
//! mailbox, absolute URI, and otherwise a DNS name kept verbatim. See
//! [`cert::hosts`].
//!
//! ## Error Handling
//!
//! ```rust
//! use sslutil::{cert::Certificate, error::SslUtilError};
//!
//! match Certificate::from_pem("invalid pem data") {
//!     Ok(_) => println!("Certificate decoded"),
//!     Err(SslUtilError::DecodingError(msg)) => println!("Failed to decode: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`cert`]: Certificate templates, extensions, host classification and decoding
//! - [`issuer`]: Self-signed and parent-signed issuance
//! - [`key`]: RSA key generation, import/export and signing
//! - [`config`]: JSON subject description loading
//! - [`output`]: Writing PEM files
//! - [`commands`]: The `ca` and `sign` workflows
//! - [`error`]: Error types

pub mod cert;
pub mod commands;
pub mod config;
pub mod error;
pub mod issuer;
pub mod key;
pub mod output;
pub mod pem_utils;
pub mod tbs_certificate;
