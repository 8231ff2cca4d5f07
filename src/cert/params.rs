use std::time::SystemTime;

use bon::Builder;
use const_oid::ObjectIdentifier;
use const_oid::db::rfc4519;
use der::asn1::{Any, GeneralizedTime, PrintableStringRef, SetOfVec, UtcTime, Utf8StringRef};
use serde::{Deserialize, Serialize};
use time::macros::datetime;
use tracing::{debug, warn};
use time::{Date, Duration, Month, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::{Result, SslUtilError};

/// Subject identity and validity request, as read from the JSON description.
///
/// # Fields
/// * `country` - Country (C) values.
/// * `organization` - Organization (O) values.
/// * `organizational_unit` - Organizational unit (OU) values.
/// * `province` - State or province (ST) values.
/// * `locality` - Locality (L) values.
/// * `hosts` - Host strings, classified into subject alternative names.
/// * `years` - Validity in calendar years from the moment of issuance.
/// * `is_ca` - Set by the calling workflow, never read from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct SubjectIdentity {
    #[serde(default)]
    #[builder(default)]
    pub country: Vec<String>,
    #[serde(default)]
    #[builder(default)]
    pub organization: Vec<String>,
    #[serde(default)]
    #[builder(default)]
    pub organizational_unit: Vec<String>,
    #[serde(default)]
    #[builder(default)]
    pub province: Vec<String>,
    #[serde(default)]
    #[builder(default)]
    pub locality: Vec<String>,
    #[serde(default)]
    #[builder(default)]
    pub hosts: Vec<String>,
    #[serde(default = "default_years")]
    #[builder(default = default_years())]
    pub years: u32,
    #[serde(skip)]
    #[builder(default)]
    pub is_ca: bool,
}

fn default_years() -> u32 {
    1
}

/// Distinguished name of a certificate subject.
///
/// Every attribute is a list because X.509 allows several values per attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct DistinguishedName {
    #[builder(default)]
    pub country: Vec<String>,
    #[builder(default)]
    pub province: Vec<String>,
    #[builder(default)]
    pub locality: Vec<String>,
    #[builder(default)]
    pub organization: Vec<String>,
    #[builder(default)]
    pub organizational_unit: Vec<String>,
}

impl DistinguishedName {
    pub fn from_identity(identity: &SubjectIdentity) -> Self {
        DistinguishedName {
            country: identity.country.clone(),
            province: identity.province.clone(),
            locality: identity.locality.clone(),
            organization: identity.organization.clone(),
            organizational_unit: identity.organizational_unit.clone(),
        }
    }

    /// True when no attribute carries a value.
    pub fn is_empty(&self) -> bool {
        self.attributes().iter().all(|(_, values)| values.is_empty())
    }

    fn attributes(&self) -> [(ObjectIdentifier, &[String]); 5] {
        [
            (rfc4519::C, self.country.as_slice()),
            (rfc4519::ST, self.province.as_slice()),
            (rfc4519::L, self.locality.as_slice()),
            (rfc4519::O, self.organization.as_slice()),
            (rfc4519::OU, self.organizational_unit.as_slice()),
        ]
    }

    /// Converts the distinguished name to an X.509 name.
    ///
    /// Attributes are emitted in C, ST, L, O, OU order, one RDN per attribute
    /// holding all of its values. Attributes without values are skipped.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut rdns = Vec::new();
        for (oid, values) in self.attributes() {
            let mut unique: Vec<&String> = Vec::with_capacity(values.len());
            for value in values {
                if unique.contains(&value) {
                    debug!(%oid, value = value.as_str(), "dropping repeated name value");
                } else {
                    unique.push(value);
                }
            }
            if unique.is_empty() {
                continue;
            }
            let atvs = unique
                .into_iter()
                .map(|value| attribute(oid, value))
                .collect::<Result<Vec<_>>>()?;
            let set = SetOfVec::try_from(atvs)
                .map_err(|e| SslUtilError::CertificateError(e.to_string()))?;
            rdns.push(RelativeDistinguishedName(set));
        }
        Ok(RdnSequence(rdns))
    }
}

fn attribute(oid: ObjectIdentifier, value: &str) -> Result<AttributeTypeAndValue> {
    let encoded = if oid == rfc4519::C {
        let printable = PrintableStringRef::new(value).map_err(|_| {
            warn!(value, "country is not a PrintableString, refusing to issue");
            SslUtilError::CertificateError(format!(
                "country '{value}' is not a valid PrintableString"
            ))
        })?;
        Any::encode_from(&printable)
    } else {
        let utf8 = Utf8StringRef::new(value)
            .map_err(|e| SslUtilError::CertificateError(e.to_string()))?;
        Any::encode_from(&utf8)
    }
    .map_err(|e| SslUtilError::EncodingError(e.to_string()))?;

    Ok(AttributeTypeAndValue {
        oid,
        value: encoded,
    })
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

/// RFC 5280 value for "no well-defined expiration date".
const MAX_NOT_AFTER: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

impl Validity {
    /// Creates a validity period starting now and lasting `years` calendar years.
    ///
    /// Times are truncated to whole seconds, the precision X.509 encodes.
    pub fn for_years(years: u32) -> Self {
        let now = OffsetDateTime::now_utc();
        let not_before = now - Duration::nanoseconds(i64::from(now.nanosecond()));
        Self {
            not_before,
            not_after: add_years(not_before, years),
        }
    }

    /// Encodes the period, using UTCTime through 2049 and GeneralizedTime afterwards.
    pub fn to_x509(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: encode_time(self.not_before)?,
            not_after: encode_time(self.not_after)?,
        })
    }

    pub fn from_x509(validity: &x509_cert::time::Validity) -> Self {
        Self {
            not_before: OffsetDateTime::from(validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(validity.not_after.to_system_time()),
        }
    }
}

fn add_years(start: OffsetDateTime, years: u32) -> OffsetDateTime {
    let target = i64::from(start.year()) + i64::from(years);
    if target > i64::from(MAX_NOT_AFTER.year()) {
        return MAX_NOT_AFTER;
    }
    let target = target as i32;
    start.replace_year(target).unwrap_or_else(|_| {
        // Feb 29 in a non-leap target year rolls over to Mar 1.
        match Date::from_calendar_date(target, Month::March, 1) {
            Ok(date) => start.replace_date(date),
            Err(_) => MAX_NOT_AFTER,
        }
    })
}

fn encode_time(time: OffsetDateTime) -> Result<x509_cert::time::Time> {
    let system_time = SystemTime::from(time);
    let encoded = if time.year() < 2050 {
        x509_cert::time::Time::UtcTime(UtcTime::from_system_time(system_time)?)
    } else {
        x509_cert::time::Time::GeneralTime(GeneralizedTime::from_system_time(system_time)?)
    };
    Ok(encoded)
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }
}
