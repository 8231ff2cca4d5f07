use rand::RngCore;

use super::extensions::{ExtendedKeyUsageOption, KeyUsage, KeyUsages};
use super::hosts::SubjectAltNames;
use super::params::{DistinguishedName, SubjectIdentity, Validity};

/// Size of generated serial numbers, in bytes.
pub const SERIAL_NUMBER_LEN: usize = 16;

/// The unsigned fields of a certificate, derived from a [`SubjectIdentity`].
///
/// A template lives only for the duration of one issuance.
#[derive(Clone, Debug)]
pub struct CertificateTemplate {
    pub serial_number: Vec<u8>,
    pub subject: DistinguishedName,
    pub validity: Validity,
    pub is_ca: bool,
    pub key_usage: KeyUsage,
    pub extended_key_usage: Vec<ExtendedKeyUsageOption>,
    pub subject_alt_names: SubjectAltNames,
}

impl CertificateTemplate {
    /// Builds the template for `identity`.
    ///
    /// This cannot fail: malformed hosts degrade to DNS names, and name
    /// problems only surface when the template is signed.
    pub fn from_identity(identity: &SubjectIdentity) -> Self {
        CertificateTemplate {
            serial_number: random_serial_number(),
            subject: DistinguishedName::from_identity(identity),
            validity: Validity::for_years(identity.years),
            is_ca: identity.is_ca,
            key_usage: KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign),
            extended_key_usage: vec![
                ExtendedKeyUsageOption::ClientAuth,
                ExtendedKeyUsageOption::ServerAuth,
            ],
            subject_alt_names: SubjectAltNames::classify(&identity.hosts),
        }
    }
}

/// A positive, minimally encoded serial drawn from the thread-local CSPRNG.
fn random_serial_number() -> Vec<u8> {
    let mut serial = [0u8; SERIAL_NUMBER_LEN];
    rand::rng().fill_bytes(&mut serial);
    serial[0] &= 0x7f;
    serial[0] |= 0x40;
    serial.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn scenario_identity() -> SubjectIdentity {
        SubjectIdentity::builder()
            .country(vec!["US".to_string()])
            .organization(vec!["Acme".to_string()])
            .hosts(vec![
                "example.com".to_string(),
                "10.0.0.1".to_string(),
                "admin@example.com".to_string(),
            ])
            .years(5)
            .is_ca(true)
            .build()
    }

    #[test]
    fn test_template_fields() {
        let template = CertificateTemplate::from_identity(&scenario_identity());
        assert!(template.is_ca);
        assert_eq!(template.subject.country, vec!["US"]);
        assert_eq!(template.subject.organization, vec!["Acme"]);
        assert_eq!(template.subject_alt_names.dns_names, vec!["example.com"]);
        assert_eq!(
            template.subject_alt_names.ip_addresses,
            vec!["10.0.0.1".parse::<IpAddr>().unwrap()]
        );
        assert_eq!(
            template.subject_alt_names.email_addresses,
            vec!["admin@example.com"]
        );
        assert!(template.subject_alt_names.uris.is_empty());
        assert_eq!(
            template.key_usage,
            KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign)
        );
        assert_eq!(
            template.extended_key_usage,
            vec![
                ExtendedKeyUsageOption::ClientAuth,
                ExtendedKeyUsageOption::ServerAuth
            ]
        );
        assert_eq!(
            template.validity.not_after.year(),
            template.validity.not_before.year() + 5
        );
    }

    #[test]
    fn test_serial_numbers_are_positive_and_distinct() {
        let a = random_serial_number();
        let b = random_serial_number();
        assert_eq!(a.len(), SERIAL_NUMBER_LEN);
        assert_eq!(a[0] & 0xc0, 0x40);
        assert_ne!(a, b);
    }
}
