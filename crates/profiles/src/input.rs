//! Request shapes consumed by the validator, builder and merger.
//!
//! Fields that have a named validation rule are read leniently: a value of
//! the wrong JSON type does not fail deserialization but is surfaced to the
//! validator, which reports it with the rule's own error in check order.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::model::ProfileKind;

/// Profile fields that arrived with the wrong JSON type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MistypedFields {
    pub name: bool,
    pub years_of_experience: bool,
    pub organization_name: bool,
}

impl MistypedFields {
    pub fn any(&self) -> bool {
        self.name || self.years_of_experience || self.organization_name
    }
}

/// Profile fields as they arrive from a caller, before the kind is known.
///
/// Used both for the `profile` object of a registration and for the partial
/// `profile` object of an update. `null` and absent are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawProfileFields")]
pub struct ProfileFields {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub avatar_url: Option<String>,
    pub organization_name: Option<String>,
    pub team_roles: Option<Vec<String>>,
    pub mistyped: MistypedFields,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfileFields {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    years_of_experience: Value,
    #[serde(default)]
    skills: Option<Vec<String>>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    organization_name: Value,
    #[serde(default)]
    team_roles: Option<Vec<String>>,
}

impl From<RawProfileFields> for ProfileFields {
    fn from(raw: RawProfileFields) -> Self {
        let mut mistyped = MistypedFields::default();
        let name = lenient_string(raw.name, &mut mistyped.name);
        let organization_name = lenient_string(raw.organization_name, &mut mistyped.organization_name);
        let years_of_experience = match raw.years_of_experience {
            Value::Null => None,
            Value::Number(n) => n.as_f64(),
            _ => {
                mistyped.years_of_experience = true;
                None
            }
        };

        Self {
            name,
            bio: raw.bio,
            years_of_experience,
            skills: raw.skills,
            avatar_url: raw.avatar_url,
            organization_name,
            team_roles: raw.team_roles,
            mistyped,
        }
    }
}

/// `null` is absent, a string is kept, anything else sets `mistyped`.
fn lenient_string(value: Value, mistyped: &mut bool) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        _ => {
            *mistyped = true;
            None
        }
    }
}

impl ProfileFields {
    pub fn has_freelancer_fields(&self) -> bool {
        self.name.is_some()
            || self.bio.is_some()
            || self.years_of_experience.is_some()
            || self.skills.is_some()
            || self.avatar_url.is_some()
    }

    pub fn has_company_fields(&self) -> bool {
        self.organization_name.is_some() || self.team_roles.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_freelancer_fields() && !self.has_company_fields()
    }

    /// Classify a partial update by the kind its fields belong to.
    pub fn into_update(self) -> Result<ProfileUpdate, ValidationError> {
        match (self.has_freelancer_fields(), self.has_company_fields()) {
            (false, false) => Err(ValidationError::EmptyUpdate),
            (true, true) => Err(ValidationError::KindMismatch),
            (true, false) => Ok(ProfileUpdate::Freelancer(FreelancerPatch {
                name: self.name,
                bio: self.bio,
                years_of_experience: self.years_of_experience,
                skills: self.skills,
                avatar_url: self.avatar_url,
            })),
            (false, true) => Ok(ProfileUpdate::Company(CompanyPatch {
                organization_name: self.organization_name,
                team_roles: self.team_roles,
            })),
        }
    }
}

/// Registration request: account credentials plus the initial profile.
///
/// `kind` stays a raw string here so that an unknown kind is reported as a
/// validation failure rather than a parse failure. It is read from `type`
/// (with `kind` accepted as an alias).
///
/// A non-string `email`, `password` or `type` is read as absent, which the
/// validator rejects with `InvalidEmail`, `WeakPassword` and
/// `UnsupportedKind` respectively.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawRegistrationInput")]
pub struct RegistrationInput {
    pub email: String,
    pub password: Option<String>,
    pub kind: String,
    pub profile: ProfileFields,
}

#[derive(Deserialize)]
struct RawRegistrationInput {
    #[serde(default)]
    email: Value,
    #[serde(default)]
    password: Value,
    #[serde(default, rename = "type", alias = "kind")]
    kind: Value,
    #[serde(default)]
    profile: Option<ProfileFields>,
}

impl From<RawRegistrationInput> for RegistrationInput {
    fn from(raw: RawRegistrationInput) -> Self {
        let mut ignored = false;
        Self {
            email: lenient_string(raw.email, &mut ignored).unwrap_or_default(),
            password: lenient_string(raw.password, &mut ignored),
            kind: lenient_string(raw.kind, &mut ignored).unwrap_or_default(),
            profile: raw.profile.unwrap_or_default(),
        }
    }
}

impl core::fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("kind", &self.kind)
            .field("profile", &self.profile)
            .finish()
    }
}

/// Update request: target id plus a partial profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfileFields>,
}

/// Partial freelancer update (absent = keep existing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreelancerPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: Option<f64>,
    /// Replaces the whole list when present.
    pub skills: Option<Vec<String>>,
    pub avatar_url: Option<String>,
}

/// Partial company update (absent = keep existing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPatch {
    pub organization_name: Option<String>,
    /// Replaces the whole list when present.
    pub team_roles: Option<Vec<String>>,
}

/// A partial update, typed by the profile kind it applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    Freelancer(FreelancerPatch),
    Company(CompanyPatch),
}

impl ProfileUpdate {
    pub fn kind(&self) -> ProfileKind {
        match self {
            ProfileUpdate::Freelancer(_) => ProfileKind::Freelancer,
            ProfileUpdate::Company(_) => ProfileKind::Company,
        }
    }
}
