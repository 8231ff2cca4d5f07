pub mod extensions;
pub mod hosts;
pub mod params;
pub mod template;

use crate::error::{Result, SslUtilError};
use der::asn1::{Any, AnyRef};
use der::{Decode, Encode};
use extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, SubjectAltName,
    SubjectKeyIdentifier, ToAndFromX509Extension,
};
use hosts::SubjectAltNames;
use params::Validity;
use template::CertificateTemplate;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};
use crate::pem_utils;

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

impl SignatureAlgorithm {
    /// Looks up the algorithm for an AlgorithmIdentifier OID.
    pub fn from_oid(oid: &const_oid::ObjectIdentifier) -> Result<Self> {
        match *oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => {
                Ok(SignatureAlgorithm::Sha256WithRSA)
            }
            _ => Err(SslUtilError::CertificateError(format!(
                "Unsupported signature algorithm {oid}"
            ))),
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA algorithm identifiers carry an explicit NULL parameter.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(Any::from(AnyRef::NULL)),
            },
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats
/// and to read back the fields this tool sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| SslUtilError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, "CERTIFICATE"))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| SslUtilError::DecodingError(format!("malformed certificate: {e}")))?;
        Ok(Certificate { inner })
    }

    /// Decodes the first `CERTIFICATE` block of `pem_str`.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem_str, &["CERTIFICATE"])?;
        Self::from_der(&der)
    }

    /// Creates a new self-signed certificate.
    ///
    /// # Arguments
    /// * `template` - The unsigned certificate fields.
    /// * `key` - The key pair that is both the subject key and the signing key.
    pub fn new_self_signed(template: &CertificateTemplate, key: &KeyPair) -> Result<Self> {
        // For self-signed certificates, the issuer is the same as the subject
        let self_issuer = SelfIssuer {
            name: template.subject.as_x509_name()?,
            key,
        };
        self_issuer.issue(template, key.public_key())
    }

    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    pub fn validity(&self) -> Validity {
        Validity::from_x509(&self.inner.tbs_certificate.validity)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Decodes the extension `E`, if the certificate carries it.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Whether the extension with `oid` is present and marked critical.
    pub fn is_extension_critical(&self, oid: &const_oid::ObjectIdentifier) -> bool {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .any(|ext| ext.extn_id == *oid && ext.critical)
    }

    /// True when Basic Constraints is present with `cA` set.
    pub fn is_ca(&self) -> Result<bool> {
        Ok(self
            .extension::<BasicConstraints>()?
            .is_some_and(|bc| bc.is_ca))
    }

    pub fn subject_alt_names(&self) -> Result<SubjectAltNames> {
        Ok(self
            .extension::<SubjectAltName>()?
            .map(|san| san.names)
            .unwrap_or_default())
    }

    pub fn extended_key_usage(&self) -> Result<Vec<ExtendedKeyUsageOption>> {
        Ok(self
            .extension::<ExtendedKeyUsage>()?
            .map(|eku| eku.usage)
            .unwrap_or_default())
    }

    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .extension::<SubjectKeyIdentifier>()?
            .map(|ski| ski.key_identifier))
    }

    /// Verifies that this certificate was signed by the private half of `issuer_key`.
    pub fn verify_signed_by(&self, issuer_key: &PublicKey) -> Result<()> {
        SignatureAlgorithm::from_oid(&self.inner.signature_algorithm.oid)?;
        let tbs_der = self.inner.tbs_certificate.to_der()?;
        issuer_key.verify(&tbs_der, self.inner.signature.raw_bytes())
    }
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: Name,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Name {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn authority_key_id(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// A certificate together with its private key, usable as a signing parent.
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    cert: Certificate,
    key: KeyPair,
}

impl CertificateWithPrivateKey {
    /// Pairs `cert` with `key`, rejecting a key that does not belong to the certificate.
    pub fn new(cert: Certificate, key: KeyPair) -> Result<Self> {
        if cert.public_key()? != key.public_key() {
            return Err(SslUtilError::InvalidInput(
                "private key does not match the certificate's public key".to_string(),
            ));
        }
        Ok(Self { cert, key })
    }

    pub fn cert(&self) -> &Certificate {
        &self.cert
    }
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Name {
        // The name of the issuer is the subject of the certificate
        self.cert.subject().clone()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn authority_key_id(&self) -> Result<Option<Vec<u8>>> {
        match self.cert.subject_key_identifier()? {
            Some(ski) => Ok(Some(ski)),
            None => Ok(Some(self.key.public_key().key_identifier()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::params::SubjectIdentity;
    use crate::key::DEFAULT_RSA_BITS;

    fn ca_template() -> CertificateTemplate {
        let identity = SubjectIdentity::builder()
            .organization(vec!["Acme".to_string()])
            .is_ca(true)
            .build();
        CertificateTemplate::from_identity(&identity)
    }

    #[test]
    fn test_self_signed_verifies_against_itself() {
        let key = KeyPair::generate_rsa(DEFAULT_RSA_BITS).unwrap();
        let cert = Certificate::new_self_signed(&ca_template(), &key).unwrap();
        assert_eq!(cert.issuer(), cert.subject());
        cert.verify_signed_by(&cert.public_key().unwrap()).unwrap();
        assert!(cert.is_ca().unwrap());
    }

    #[test]
    fn test_verification_fails_for_other_key() {
        let key = KeyPair::generate_rsa(DEFAULT_RSA_BITS).unwrap();
        let other = KeyPair::generate_rsa(DEFAULT_RSA_BITS).unwrap();
        let cert = Certificate::new_self_signed(&ca_template(), &key).unwrap();
        assert!(cert.verify_signed_by(&other.public_key()).is_err());
    }

    #[test]
    fn test_pem_round_trip() {
        let key = KeyPair::generate_rsa(DEFAULT_RSA_BITS).unwrap();
        let cert = Certificate::new_self_signed(&ca_template(), &key).unwrap();
        let pem = cert.to_pem().unwrap();
        let decoded = Certificate::from_pem(&pem).unwrap();
        assert_eq!(decoded, cert);
        assert_eq!(decoded.to_pem().unwrap(), pem);
    }

    #[test]
    fn test_mismatched_parent_key_is_rejected() {
        let key = KeyPair::generate_rsa(DEFAULT_RSA_BITS).unwrap();
        let other = KeyPair::generate_rsa(DEFAULT_RSA_BITS).unwrap();
        let cert = Certificate::new_self_signed(&ca_template(), &key).unwrap();
        assert!(matches!(
            CertificateWithPrivateKey::new(cert.clone(), other),
            Err(SslUtilError::InvalidInput(_))
        ));
        assert!(CertificateWithPrivateKey::new(cert, key).is_ok());
    }
}
