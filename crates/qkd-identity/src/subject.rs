//! Distinguished-name assembly for certificate subjects.
//!
//! A subject is built from six optional attribute fields and always
//! carries its attributes in the canonical X.500 order (country, state,
//! locality, organization, organizational unit, common name) regardless
//! of which subset was supplied.

use rcgen::DnType;

use crate::error::{QkdError, Result};

/// The subject attribute types this system supports, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectAttribute {
    Country,
    State,
    Locality,
    Organization,
    OrganizationalUnit,
    CommonName,
}

impl SubjectAttribute {
    /// Map onto the rcgen distinguished-name type.
    pub fn dn_type(self) -> DnType {
        match self {
            SubjectAttribute::Country => DnType::CountryName,
            SubjectAttribute::State => DnType::StateOrProvinceName,
            SubjectAttribute::Locality => DnType::LocalityName,
            SubjectAttribute::Organization => DnType::OrganizationName,
            SubjectAttribute::OrganizationalUnit => DnType::OrganizationalUnitName,
            SubjectAttribute::CommonName => DnType::CommonName,
        }
    }

    /// Short tag used in diagnostics (OpenSSL-style).
    pub fn as_tag(self) -> &'static str {
        match self {
            SubjectAttribute::Country => "C",
            SubjectAttribute::State => "ST",
            SubjectAttribute::Locality => "L",
            SubjectAttribute::Organization => "O",
            SubjectAttribute::OrganizationalUnit => "OU",
            SubjectAttribute::CommonName => "CN",
        }
    }
}

/// Caller-supplied optional attribute fields.
#[derive(Debug, Clone, Default)]
pub struct SubjectFields {
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub common_name: Option<String>,
}

impl SubjectFields {
    /// Build a [`SubjectName`] from the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns `QkdError::EmptySubject` if no attribute was supplied.
    pub fn build(&self) -> Result<SubjectName> {
        let candidates = [
            (SubjectAttribute::Country, &self.country),
            (SubjectAttribute::State, &self.state),
            (SubjectAttribute::Locality, &self.locality),
            (SubjectAttribute::Organization, &self.organization),
            (
                SubjectAttribute::OrganizationalUnit,
                &self.organizational_unit,
            ),
            (SubjectAttribute::CommonName, &self.common_name),
        ];

        // An empty string counts as absent, same as a missing field.
        let attributes: Vec<(SubjectAttribute, String)> = candidates
            .into_iter()
            .filter_map(|(attr, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (attr, v.to_string()))
            })
            .collect();

        if attributes.is_empty() {
            return Err(QkdError::EmptySubject);
        }

        Ok(SubjectName { attributes })
    }
}

/// An ordered, non-empty set of subject attributes. Used as both subject
/// and issuer of the self-signed certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectName {
    attributes: Vec<(SubjectAttribute, String)>,
}

impl SubjectName {
    /// The attributes in canonical order.
    pub fn attributes(&self) -> &[(SubjectAttribute, String)] {
        &self.attributes
    }
}
