mod util;

use botan::Certificate as BotanCertificate;
use sslutil::issuer::IssueOptions;
use sslutil::key::KeyEncoding;

fn check_cert(cert_der: &[u8]) -> BotanCertificate {
    // Use botan crate to parse the DER and assert it succeeds
    BotanCertificate::load(cert_der).expect("Botan failed to parse certificate")
}

#[test]
#[ignore]
fn test_botan_ca_cert() {
    let ca = util::generate_ca_cert();
    let cert = check_cert(&ca.certificate.to_der().unwrap());
    assert!(cert.matches_hostname("example.com").unwrap());
}

#[test]
#[ignore]
fn test_botan_leaf_cert() {
    let ca = util::generate_ca_cert();
    let leaf = util::generate_leaf_cert(&ca, IssueOptions::default());
    let cert = check_cert(&leaf.certificate.to_der().unwrap());
    assert!(cert.matches_hostname("svc.internal").unwrap());
}

#[test]
#[ignore]
fn test_botan_rsa_4096() {
    let ca = util::generate_ca_cert();
    let options = IssueOptions {
        key_bits: 4096,
        key_encoding: KeyEncoding::Pkcs8,
    };
    let leaf = util::generate_leaf_cert(&ca, options);
    check_cert(&leaf.certificate.to_der().unwrap());
}
