use crate::error::{Result, SslUtilError};

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
///
/// Lines are wrapped at 64 columns and terminated with `\n`.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert the first PEM block of `pem_str` to DER‑encoded bytes.
///
/// The block label must be one of `accepted_labels` and the payload must not be empty.
pub fn pem_to_der(pem_str: &str, accepted_labels: &[&str]) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    if !accepted_labels.contains(&pem.tag()) {
        return Err(SslUtilError::DecodingError(format!(
            "unexpected PEM block '{}', expected one of {:?}",
            pem.tag(),
            accepted_labels
        )));
    }
    if pem.contents().is_empty() {
        return Err(SslUtilError::DecodingError(format!(
            "PEM block '{}' is empty",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}
