//! Classification of host strings into subject alternative names.
//!
//! Each host is offered to a fixed chain of classifiers and lands in the first
//! one that accepts it:
//!
//! 1. IP address literal (IPv4 or IPv6)
//! 2. RFC 5322 mailbox (`user@example.com`, `Name <user@example.com>`, with
//!    optional comments), normalised to its bare address
//! 3. absolute URI (anything with a scheme, including `localhost:8080`)
//! 4. DNS name, the raw string, for everything else
//!
//! The order is part of the contract: a string acceptable to several
//! classifiers is decided by the earliest one.

use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// A single classified host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostName {
    Ip(IpAddr),
    Email(String),
    Uri(String),
    Dns(String),
}

type Classifier = fn(&str) -> Option<HostName>;

const CLASSIFIERS: [(&str, Classifier); 3] = [
    ("ip", classify_ip),
    ("email", classify_email),
    ("uri", classify_uri),
];

const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]";
const QUOTED: &str = r#""(?:[^"\\\r\n]|\\.)*""#;
// One level of nesting is enough for the comments seen in practice.
const COMMENT: &str = r"\((?:[^()\\]|\\.|\((?:[^()\\]|\\.)*\))*\)";

fn dot_atom() -> String {
    format!(r"{ATEXT}+(?:\.{ATEXT}+)*")
}

fn addr_spec(tag: &str, cfws: &str) -> String {
    let dot_atom = dot_atom();
    format!(
        r"{cfws}(?P<{tag}_local>{dot_atom}|{QUOTED}){cfws}@{cfws}(?P<{tag}_domain>{dot_atom}|\[[^\[\]\\\r\n]*\]){cfws}"
    )
}

static MAILBOX_REGEX: Lazy<Regex> = Lazy::new(|| {
    let cfws = format!(r"(?:\s|{COMMENT})*");
    // Display names may carry UTF-8 words.
    let phrase = format!(r"(?:{ATEXT}|[^\x00-\x7F]|[\s.]|{QUOTED}|{COMMENT})*");
    let bare = addr_spec("bare", &cfws);
    let angle = addr_spec("angle", &cfws);
    Regex::new(&format!(r"^(?:{bare}|{phrase}<{angle}>{cfws})$")).expect("invalid mailbox regex")
});

static DOT_ATOM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", dot_atom())).expect("invalid dot-atom regex"));

fn classify_ip(host: &str) -> Option<HostName> {
    host.parse::<IpAddr>().ok().map(HostName::Ip)
}

/// Accepts a single mailbox and keeps only its normalised address part.
fn classify_email(host: &str) -> Option<HostName> {
    let captures = MAILBOX_REGEX.captures(host)?;
    let (local, domain) = match (captures.name("bare_local"), captures.name("bare_domain")) {
        (Some(local), Some(domain)) => (local, domain),
        _ => (captures.name("angle_local")?, captures.name("angle_domain")?),
    };
    Some(HostName::Email(format!(
        "{}@{}",
        normalize_local_part(local.as_str()),
        domain.as_str()
    )))
}

/// Drops the quotes around a quoted local part that is a plain dot-atom.
fn normalize_local_part(local: &str) -> String {
    let Some(inner) = local
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return local.to_string();
    };

    let mut unquoted = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => unquoted.extend(chars.next()),
            c => unquoted.push(c),
        }
    }

    if DOT_ATOM_REGEX.is_match(&unquoted) {
        unquoted
    } else {
        local.to_string()
    }
}

fn classify_uri(host: &str) -> Option<HostName> {
    Url::parse(host)
        .ok()
        .map(|_| HostName::Uri(host.to_string()))
}

impl HostName {
    /// Classifies one host string. Never fails: unrecognised input is a DNS name.
    pub fn classify(host: &str) -> Self {
        for (kind, classifier) in CLASSIFIERS {
            if let Some(name) = classifier(host) {
                debug!(host, kind, "classified host");
                return name;
            }
        }
        debug!(host, kind = "dns", "classified host");
        HostName::Dns(host.to_string())
    }
}

/// Subject alternative names grouped by kind, in input order within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltNames {
    pub dns_names: Vec<String>,
    pub email_addresses: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub uris: Vec<String>,
}

impl SubjectAltNames {
    pub fn classify<S: AsRef<str>>(hosts: &[S]) -> Self {
        let mut names = SubjectAltNames::default();
        for host in hosts {
            names.push(HostName::classify(host.as_ref()));
        }
        names
    }

    pub fn push(&mut self, name: HostName) {
        match name {
            HostName::Ip(ip) => self.ip_addresses.push(ip),
            HostName::Email(email) => self.email_addresses.push(email),
            HostName::Uri(uri) => self.uris.push(uri),
            HostName::Dns(dns) => self.dns_names.push(dns),
        }
    }

    pub fn len(&self) -> usize {
        self.dns_names.len() + self.email_addresses.len() + self.ip_addresses.len() + self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_ip_literals() {
        assert_eq!(
            HostName::classify("10.0.0.1"),
            HostName::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_eq!(
            HostName::classify("::1"),
            HostName::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST))
        );
    }

    #[test]
    fn test_mailboxes() {
        assert_eq!(
            HostName::classify("admin@example.com"),
            HostName::Email("admin@example.com".to_string())
        );
        assert_eq!(
            HostName::classify("Site Admin <admin@example.com>"),
            HostName::Email("admin@example.com".to_string())
        );
        assert_eq!(
            HostName::classify("<ops+alerts@example.com>"),
            HostName::Email("ops+alerts@example.com".to_string())
        );
        assert_eq!(
            HostName::classify("root@localhost"),
            HostName::Email("root@localhost".to_string())
        );
    }

    #[test]
    fn test_mailbox_comments_are_dropped() {
        assert_eq!(
            HostName::classify("admin@example.com (Admin)"),
            HostName::Email("admin@example.com".to_string())
        );
        assert_eq!(
            HostName::classify("(ops) admin@example.com"),
            HostName::Email("admin@example.com".to_string())
        );
    }

    #[test]
    fn test_quoted_local_part() {
        assert_eq!(
            HostName::classify("\"john.doe\"@example.com"),
            HostName::Email("john.doe@example.com".to_string())
        );
        // Quotes that are needed stay.
        assert_eq!(
            HostName::classify("\"john doe\"@example.com"),
            HostName::Email("\"john doe\"@example.com".to_string())
        );
    }

    #[test]
    fn test_utf8_display_name() {
        assert_eq!(
            HostName::classify("José <jose@example.com>"),
            HostName::Email("jose@example.com".to_string())
        );
        assert_eq!(
            HostName::classify("\"Doe, Jane\" <jane@example.com>"),
            HostName::Email("jane@example.com".to_string())
        );
    }

    #[test]
    fn test_not_mailboxes() {
        assert!(!matches!(HostName::classify("@example.com"), HostName::Email(_)));
        assert!(!matches!(HostName::classify("user@"), HostName::Email(_)));
        assert!(!matches!(HostName::classify("a@b@c"), HostName::Email(_)));
        assert!(!matches!(HostName::classify("user..name@example.com"), HostName::Email(_)));
    }

    #[test]
    fn test_uris() {
        assert_eq!(
            HostName::classify("spiffe://cluster.local/ns/default/sa/web"),
            HostName::Uri("spiffe://cluster.local/ns/default/sa/web".to_string())
        );
        assert_eq!(
            HostName::classify("https://example.com"),
            HostName::Uri("https://example.com".to_string())
        );
        assert_eq!(
            HostName::classify("localhost:8080"),
            HostName::Uri("localhost:8080".to_string())
        );
    }

    #[test]
    fn test_mailto_is_a_uri_not_a_mailbox() {
        assert_eq!(
            HostName::classify("mailto:admin@example.com"),
            HostName::Uri("mailto:admin@example.com".to_string())
        );
    }

    #[test]
    fn test_dns_fallback_is_verbatim() {
        for host in ["example.com", "*.example.com", "svc.internal", "/relative/path", ""] {
            assert_eq!(HostName::classify(host), HostName::Dns(host.to_string()));
        }
    }

    #[test]
    fn test_each_host_lands_exactly_once() {
        let hosts = [
            "example.com",
            "10.0.0.1",
            "admin@example.com",
            "urn:uuid:6e8bc430-9c3a-11d9-9669-0800200c9a66",
            "www.example.com",
            "fe80::1",
        ];
        let names = SubjectAltNames::classify(&hosts);
        assert_eq!(names.len(), hosts.len());
        assert_eq!(names.dns_names, vec!["example.com", "www.example.com"]);
        assert_eq!(names.email_addresses, vec!["admin@example.com"]);
        assert_eq!(names.ip_addresses.len(), 2);
        assert_eq!(
            names.uris,
            vec!["urn:uuid:6e8bc430-9c3a-11d9-9669-0800200c9a66"]
        );
    }
}
