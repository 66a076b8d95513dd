use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use interviewselect_core::{Entity, ProfileId, ValueObject};

use crate::error::ValidationError;

/// Profile kind: the discriminant between the two profile variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Freelancer,
    Company,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Freelancer => "freelancer",
            ProfileKind::Company => "company",
        }
    }
}

impl core::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ProfileKind {
    type Err = ValidationError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "freelancer" => Ok(ProfileKind::Freelancer),
            "company" => Ok(ProfileKind::Company),
            _ => Err(ValidationError::UnsupportedKind),
        }
    }
}

/// Email address of the account owning a profile.
///
/// Accepts the simple `local@domain.tld` shape: exactly one `@`, a non-empty
/// local part, no whitespace, and a domain containing a `.` with text on both
/// sides of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl ValueObject for Email {}

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidEmail);
        }

        let mut parts = raw.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ValidationError::InvalidEmail);
        };

        if local.is_empty() {
            return Err(ValidationError::InvalidEmail);
        }

        let dotted = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
        if !dotted {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Freelancer-specific profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f64>,
    /// Insertion order is preserved.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Company-specific profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub organization_name: String,
    #[serde(default)]
    pub team_roles: Vec<String>,
}

/// Variant payload of a profile, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProfileDetails {
    Freelancer(FreelancerDetails),
    Company(CompanyDetails),
}

impl ProfileDetails {
    pub fn kind(&self) -> ProfileKind {
        match self {
            ProfileDetails::Freelancer(_) => ProfileKind::Freelancer,
            ProfileDetails::Company(_) => ProfileKind::Company,
        }
    }
}

/// Canonical profile record.
///
/// Only the builder creates one and only the merger derives a changed copy,
/// so the fields are read-only from outside this crate.
///
/// # Invariants
/// - `id`, `email`, `kind` and `created_at` never change after creation.
/// - `created_at <= updated_at`.
/// - The required name field of the variant is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub(crate) id: ProfileId,
    pub(crate) email: Email,
    #[serde(with = "interviewselect_core::timestamp")]
    pub(crate) created_at: DateTime<Utc>,
    #[serde(with = "interviewselect_core::timestamp")]
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) details: ProfileDetails,
}

impl Profile {
    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn kind(&self) -> ProfileKind {
        self.details.kind()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn details(&self) -> &ProfileDetails {
        &self.details
    }

    pub fn as_freelancer(&self) -> Option<&FreelancerDetails> {
        match &self.details {
            ProfileDetails::Freelancer(f) => Some(f),
            ProfileDetails::Company(_) => None,
        }
    }

    pub fn as_company(&self) -> Option<&CompanyDetails> {
        match &self.details {
            ProfileDetails::Company(c) => Some(c),
            ProfileDetails::Freelancer(_) => None,
        }
    }
}

impl Entity for Profile {
    type Id = ProfileId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
