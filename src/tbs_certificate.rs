use der::asn1::OctetString;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};
use crate::cert::params::{ExtensionParam, Validity};
use crate::cert::template::CertificateTemplate;
use crate::error::{Result, SslUtilError};
use crate::key::PublicKey;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
/// This struct contains all the fields required to generate a valid X.509 certificate.
///
/// # Fields
/// * `serial_number` - The unique identifier for the certificate.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Lays out the TBS fields for `template`.
    ///
    /// # Arguments
    /// * `template` - The unsigned certificate fields.
    /// * `issuer` - The issuer name; the template's own subject when self-signed.
    /// * `subject_public_key` - The freshly generated subject key.
    /// * `authority_key_id` - Key identifier of the signing key, `None` when self-signed.
    pub fn from_template(
        template: &CertificateTemplate,
        issuer: Name,
        subject_public_key: PublicKey,
        authority_key_id: Option<Vec<u8>>,
    ) -> Result<Self> {
        let subject = template.subject.as_x509_name()?;

        let mut extensions = vec![
            ExtensionParam::from_extension(template.key_usage, true)?,
            ExtensionParam::from_extension(
                ExtendedKeyUsage {
                    usage: template.extended_key_usage.clone(),
                },
                false,
            )?,
            ExtensionParam::from_extension(
                BasicConstraints {
                    is_ca: template.is_ca,
                    max_path_length: None,
                },
                true,
            )?,
            ExtensionParam::from_extension(
                SubjectKeyIdentifier {
                    key_identifier: subject_public_key.key_identifier()?,
                },
                false,
            )?,
        ];

        if let Some(key_identifier) = authority_key_id {
            extensions.push(ExtensionParam::from_extension(
                AuthorityKeyIdentifier { key_identifier },
                false,
            )?);
        }

        if !template.subject_alt_names.is_empty() {
            // RFC 5280 4.2.1.6: critical when the subject name is empty.
            extensions.push(ExtensionParam::from_extension(
                SubjectAltName {
                    names: template.subject_alt_names.clone(),
                },
                subject.0.is_empty(),
            )?);
        }

        Ok(Self {
            serial_number: template.serial_number.clone(),
            signature_algorithm: SignatureAlgorithm::Sha256WithRSA,
            issuer,
            validity: template.validity.clone(),
            subject,
            subject_public_key,
            extensions,
        })
    }

    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let serial_number = SerialNumber::new(self.serial_number.as_slice())
            .map_err(|e| SslUtilError::CertificateError(format!("invalid serial number: {e}")))?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.clone(),
            validity: self.validity.to_x509()?,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.to_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }
}
