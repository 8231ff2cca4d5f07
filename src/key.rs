use std::fmt;
use std::str::FromStr;

use der::Encode;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{Result, SslUtilError};
use crate::pem_utils;

/// Modulus size used for every freshly issued key unless overridden.
pub const DEFAULT_RSA_BITS: usize = 2048;

const SUPPORTED_RSA_BITS: [usize; 3] = [2048, 3072, 4096];

/// PEM container used when exporting a private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    /// PKCS#1 DER under a `PRIVATE KEY` label. This is the historical
    /// output format of the tool and the default.
    #[default]
    Legacy,
    /// PKCS#1 DER under an `RSA PRIVATE KEY` label.
    Pkcs1,
    /// PKCS#8 DER under a `PRIVATE KEY` label.
    Pkcs8,
}

impl KeyEncoding {
    /// The PEM label written for this encoding.
    pub fn label(&self) -> &'static str {
        match self {
            KeyEncoding::Legacy | KeyEncoding::Pkcs8 => "PRIVATE KEY",
            KeyEncoding::Pkcs1 => "RSA PRIVATE KEY",
        }
    }
}

impl FromStr for KeyEncoding {
    type Err = SslUtilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(KeyEncoding::Legacy),
            "pkcs1" => Ok(KeyEncoding::Pkcs1),
            "pkcs8" => Ok(KeyEncoding::Pkcs8),
            other => Err(SslUtilError::InvalidInput(format!(
                "unknown key format '{other}', expected legacy, pkcs1 or pkcs8"
            ))),
        }
    }
}

impl fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyEncoding::Legacy => "legacy",
            KeyEncoding::Pkcs1 => "pkcs1",
            KeyEncoding::Pkcs8 => "pkcs8",
        };
        f.write_str(name)
    }
}

/// An RSA key pair used either as the subject key of a new certificate or as
/// the signing key of a parent CA.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    ///
    /// Only 2048, 3072 and 4096 bit moduli are accepted.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        if !SUPPORTED_RSA_BITS.contains(&bits) {
            return Err(SslUtilError::InvalidInput(format!(
                "unsupported RSA key size {bits}, expected one of {SUPPORTED_RSA_BITS:?}"
            )));
        }
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| SslUtilError::KeyGenerationError(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::<Sha256>::new((*self.private).clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| SslUtilError::RsaError(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Exports the private key as DER in the given encoding.
    pub fn to_der(&self, encoding: KeyEncoding) -> Result<Vec<u8>> {
        let der = match encoding {
            KeyEncoding::Legacy | KeyEncoding::Pkcs1 => {
                self.private.to_pkcs1_der()?.as_bytes().to_vec()
            }
            KeyEncoding::Pkcs8 => self.private.to_pkcs8_der()?.as_bytes().to_vec(),
        };
        Ok(der)
    }

    /// Exports the private key as a PEM block in the given encoding.
    pub fn to_pem(&self, encoding: KeyEncoding) -> Result<String> {
        let der = self.to_der(encoding)?;
        Ok(pem_utils::der_to_pem(&der, encoding.label()))
    }

    /// Imports a private key from PKCS#1 DER, falling back to PKCS#8.
    pub fn import_from_der(der: &[u8]) -> Result<Self> {
        match RsaPrivateKey::from_pkcs1_der(der) {
            Ok(private) => Ok(Self::from_private(private)),
            Err(pkcs1_err) => RsaPrivateKey::from_pkcs8_der(der)
                .map(Self::from_private)
                .map_err(|pkcs8_err| {
                    SslUtilError::DecodingError(format!(
                        "private key is neither PKCS#1 ({pkcs1_err}) nor PKCS#8 ({pkcs8_err})"
                    ))
                }),
        }
    }

    /// Imports a private key from a `PRIVATE KEY` or `RSA PRIVATE KEY` PEM block.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem_str, &["PRIVATE KEY", "RSA PRIVATE KEY"])?;
        Self::import_from_der(&der)
    }
}

/// The public half of a [`KeyPair`], or the key embedded in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(pub RsaPublicKey);

impl PublicKey {
    /// Reads an RSA public key out of a SubjectPublicKeyInfo.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let der = spki.to_der()?;
        let public = RsaPublicKey::from_public_key_der(&der).map_err(|e| {
            SslUtilError::DecodingError(format!("unsupported subject public key: {e}"))
        })?;
        Ok(PublicKey(public))
    }

    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned::from_key(self.0.clone())?)
    }

    /// SHA-1 over the subject public key bits, as used for key identifiers.
    pub fn key_identifier(&self) -> Result<Vec<u8>> {
        let spki = self.to_spki()?;
        Ok(Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec())
    }

    /// Checks an RSASSA-PKCS1-v1_5 / SHA-256 signature over `data`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key = VerifyingKey::<Sha256>::new(self.0.clone());
        let signature = Signature::try_from(signature)
            .map_err(|e| SslUtilError::CertificateError(format!("malformed signature: {e}")))?;
        verifying_key
            .verify(data, &signature)
            .map_err(|e| SslUtilError::CertificateError(format!("signature mismatch: {e}")))
    }
}
