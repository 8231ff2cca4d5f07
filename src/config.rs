//! Loading of the JSON subject description.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cert::params::SubjectIdentity;
use crate::error::{Result, SslUtilError};

/// Reads and parses a JSON subject description.
///
/// The returned identity always has `is_ca` unset; the calling workflow decides it.
pub fn load_identity(path: &Path) -> Result<SubjectIdentity> {
    let contents = fs::read_to_string(path)?;
    let identity: SubjectIdentity = serde_json::from_str(&contents)
        .map_err(|e| SslUtilError::ConfigError(format!("{}: {e}", path.display())))?;
    debug!(
        path = %path.display(),
        hosts = identity.hosts.len(),
        years = identity.years,
        "loaded subject description"
    );
    Ok(identity)
}

/// Parses a JSON subject description held in memory.
pub fn parse_identity(json: &str) -> Result<SubjectIdentity> {
    Ok(serde_json::from_str(json)?)
}
