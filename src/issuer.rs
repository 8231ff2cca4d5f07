use der::Encode;
use tracing::{info, warn};
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::cert::params::SubjectIdentity;
use crate::cert::template::CertificateTemplate;
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::{Result, SslUtilError};
use crate::key::{DEFAULT_RSA_BITS, KeyEncoding, KeyPair, PublicKey};
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and sign templates.
pub trait Issuer {
    /// Returns the name written into the `issuer` field.
    fn issuer_name(&self) -> Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the key identifier for the Authority Key Identifier extension,
    /// or `None` when no such extension should be written.
    fn authority_key_id(&self) -> Result<Option<Vec<u8>>>;

    /// Signs `template` for `subject_public_key`.
    ///
    /// # Arguments
    /// * `template` - The unsigned certificate fields.
    /// * `subject_public_key` - The public key the certificate binds to the subject.
    ///
    /// # Returns
    /// The signed `Certificate`.
    fn issue(
        &self,
        template: &CertificateTemplate,
        subject_public_key: PublicKey,
    ) -> Result<Certificate> {
        let tbs_cert = TbsCertificate::from_template(
            template,
            self.issuer_name(),
            subject_public_key,
            self.authority_key_id()?,
        )?;

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| SslUtilError::CertificateError(e.to_string()))?;
        let signature = self.signing_key().sign_data(&tbs_der)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: tbs_cert.signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// Who signs a newly issued certificate.
#[derive(Debug, Clone)]
pub enum SigningMode {
    /// The new certificate is its own issuer, signed with its own fresh key.
    SelfSigned,
    /// The new certificate is issued and signed by an existing CA.
    Parent(CertificateWithPrivateKey),
}

impl SigningMode {
    /// Resolves an optional certificate/key pair into a signing mode.
    ///
    /// Both absent selects [`SigningMode::SelfSigned`], both present selects
    /// [`SigningMode::Parent`]. Supplying only one of them is an error.
    pub fn from_parts(cert: Option<Certificate>, key: Option<KeyPair>) -> Result<Self> {
        match (cert, key) {
            (None, None) => Ok(SigningMode::SelfSigned),
            (Some(cert), Some(key)) => Ok(SigningMode::Parent(CertificateWithPrivateKey::new(
                cert, key,
            )?)),
            (Some(_), None) => Err(SslUtilError::InvalidInput(
                "parent certificate given without its private key".to_string(),
            )),
            (None, Some(_)) => Err(SslUtilError::InvalidInput(
                "parent private key given without its certificate".to_string(),
            )),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            SigningMode::SelfSigned => "self-signed",
            SigningMode::Parent(_) => "parent-signed",
        }
    }
}

/// Knobs for a single issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueOptions {
    pub key_bits: usize,
    pub key_encoding: KeyEncoding,
}

impl Default for IssueOptions {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_RSA_BITS,
            key_encoding: KeyEncoding::default(),
        }
    }
}

/// The result of an issuance: the signed certificate and its new private key,
/// both already PEM encoded.
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub certificate: Certificate,
    pub cert_pem: String,
    pub key_pem: String,
}

/// Issues a certificate for `identity`.
///
/// A template is built from `identity`, a fresh key pair is generated for the
/// subject, and the template is signed according to `mode`. Either both PEM
/// blocks are produced or an error is returned.
pub fn issue(
    mode: &SigningMode,
    identity: &SubjectIdentity,
    options: IssueOptions,
) -> Result<IssuedCertificate> {
    let template = CertificateTemplate::from_identity(identity);
    if template.validity.not_after <= template.validity.not_before {
        warn!(years = identity.years, "certificate validity window is empty");
    }

    let key = KeyPair::generate_rsa(options.key_bits)?;

    let certificate = match mode {
        SigningMode::SelfSigned => Certificate::new_self_signed(&template, &key)?,
        SigningMode::Parent(parent) => {
            if !parent.cert().is_ca()? {
                warn!(
                    issuer = %parent.cert().subject(),
                    "parent certificate is not marked as a CA"
                );
            }
            parent.issue(&template, key.public_key())?
        }
    };

    let cert_pem = certificate.to_pem()?;
    let key_pem = key.to_pem(options.key_encoding)?;

    info!(
        mode = mode.describe(),
        subject = %certificate.subject(),
        is_ca = template.is_ca,
        not_after = %template.validity.not_after,
        "issued certificate"
    );

    Ok(IssuedCertificate {
        certificate,
        cert_pem,
        key_pem,
    })
}
