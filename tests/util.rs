#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sslutil::cert::params::SubjectIdentity;
use sslutil::commands::{CaRequest, OutputTarget, SignRequest, create_ca_cert, create_signed_cert};
use sslutil::issuer::{IssueOptions, IssuedCertificate, SigningMode, issue};
use sslutil::key::KeyPair;
use sslutil::output::OutputPaths;

pub const CA_CONFIG: &str = r#"{
    "country": ["US"],
    "organization": ["Acme"],
    "hosts": ["example.com", "10.0.0.1", "admin@example.com"],
    "years": 5
}"#;

pub const LEAF_CONFIG: &str = r#"{"hosts": ["svc.internal"], "years": 1}"#;

pub fn write_config(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).unwrap();
    path
}

/// Runs the `ca` workflow with the root CA description into `dir/out`.
pub fn create_ca_in(dir: &Path) -> OutputPaths {
    let request = CaRequest {
        config: write_config(dir, "ca.json", CA_CONFIG),
        output: OutputTarget {
            dir: dir.join("out"),
            prefix: "ca".to_string(),
        },
        options: IssueOptions::default(),
    };
    create_ca_cert(&request).unwrap()
}

/// Runs the `sign` workflow for the leaf description against `ca`.
pub fn sign_leaf_in(dir: &Path, ca: &OutputPaths) -> OutputPaths {
    let request = SignRequest {
        config: write_config(dir, "leaf.json", LEAF_CONFIG),
        ca_cert: ca.cert.clone(),
        ca_key: ca.key.clone(),
        output: OutputTarget {
            dir: dir.join("out"),
            prefix: "svc".to_string(),
        },
        options: IssueOptions::default(),
    };
    create_signed_cert(&request).unwrap()
}

/// Issues a root CA in memory.
pub fn generate_ca_cert() -> IssuedCertificate {
    let identity = SubjectIdentity::builder()
        .country(vec!["US".to_string()])
        .organization(vec!["Acme".to_string()])
        .hosts(vec![
            "example.com".to_string(),
            "10.0.0.1".to_string(),
            "admin@example.com".to_string(),
        ])
        .years(5)
        .is_ca(true)
        .build();
    issue(&SigningMode::SelfSigned, &identity, IssueOptions::default()).unwrap()
}

/// Issues a leaf in memory, signed by `ca`.
pub fn generate_leaf_cert(ca: &IssuedCertificate, options: IssueOptions) -> IssuedCertificate {
    let mode = SigningMode::from_parts(
        Some(ca.certificate.clone()),
        Some(KeyPair::from_pem(&ca.key_pem).unwrap()),
    )
    .unwrap();
    let identity = SubjectIdentity::builder()
        .hosts(vec!["svc.internal".to_string()])
        .build();
    issue(&mode, &identity, options).unwrap()
}
