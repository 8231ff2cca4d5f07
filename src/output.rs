//! Persisting issued certificates to disk.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::issuer::IssuedCertificate;

const CERT_FILE_MODE: u32 = 0o644;
const KEY_FILE_MODE: u32 = 0o600;

/// Paths of the files written by [`write_out`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, prefix: &str) -> Self {
        Self {
            cert: dir.join(format!("{prefix}-cert.pem")),
            key: dir.join(format!("{prefix}-key.pem")),
        }
    }
}

/// Writes `<prefix>-cert.pem` and `<prefix>-key.pem` into `dir`, creating it if needed.
pub fn write_out(dir: &Path, prefix: &str, issued: &IssuedCertificate) -> Result<OutputPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        debug!(dir = %dir.display(), "created output directory");
    }

    let paths = OutputPaths::new(dir, prefix);
    write_file(&paths.cert, issued.cert_pem.as_bytes(), CERT_FILE_MODE)?;
    write_file(&paths.key, issued.key_pem.as_bytes(), KEY_FILE_MODE)?;
    Ok(paths)
}

fn write_file(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;

    // The open mode only applies to newly created files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
