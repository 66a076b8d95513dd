//! Input validation for registration and update requests.
//!
//! Validation is a predicate gate: it never rewrites the input. A successful
//! check hands the same input back inside a proof type that only this module
//! can construct, so the builder cannot be called on unchecked data.

use crate::error::ValidationError;
use crate::input::{ProfileFields, ProfileUpdate, RegistrationInput, UpdateInput};
use crate::model::{Email, ProfileKind};

/// Minimum password length, counted in characters (Unicode scalar values).
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A registration that passed [`validate_registration`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    input: RegistrationInput,
    email: Email,
    kind: ProfileKind,
}

impl ValidatedRegistration {
    pub fn input(&self) -> &RegistrationInput {
        &self.input
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    /// Password as supplied (present by construction).
    pub fn password(&self) -> &str {
        self.input.password.as_deref().unwrap_or_default()
    }
}

/// An update that passed [`validate_update`]: a non-empty id plus a patch
/// typed by the kind its fields belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedUpdate {
    pub id: String,
    pub update: ProfileUpdate,
}

/// Check a registration request, failing on the first violated rule.
///
/// Order: email, password, kind, then the kind-specific profile fields.
pub fn validate_registration(input: RegistrationInput) -> Result<ValidatedRegistration, ValidationError> {
    let email = Email::parse(&input.email)?;

    match input.password.as_deref() {
        Some(p) if p.chars().count() >= MIN_PASSWORD_LENGTH => {}
        _ => return Err(ValidationError::WeakPassword),
    }

    let kind: ProfileKind = input.kind.parse()?;
    match kind {
        ProfileKind::Freelancer => check_freelancer_fields(&input.profile, true)?,
        ProfileKind::Company => check_company_fields(&input.profile, true)?,
    }

    Ok(ValidatedRegistration { input, email, kind })
}

/// Boundary check for update requests, run before any record is fetched.
///
/// Only the fields that are present are checked; absent ones will be carried
/// over from the stored record by the merger.
pub fn validate_update(input: UpdateInput) -> Result<ValidatedUpdate, ValidationError> {
    let id = match input.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ValidationError::MissingId),
    };

    let fields = input.profile.ok_or(ValidationError::EmptyUpdate)?;
    check_mistyped(&fields)?;
    match fields.into_update()? {
        ProfileUpdate::Freelancer(patch) => {
            check_name(patch.name.as_deref(), false)?;
            check_experience(patch.years_of_experience)?;
            Ok(ValidatedUpdate { id, update: ProfileUpdate::Freelancer(patch) })
        }
        ProfileUpdate::Company(patch) => {
            check_organization_name(patch.organization_name.as_deref(), false)?;
            Ok(ValidatedUpdate { id, update: ProfileUpdate::Company(patch) })
        }
    }
}

fn check_freelancer_fields(fields: &ProfileFields, required: bool) -> Result<(), ValidationError> {
    if fields.mistyped.name {
        return Err(ValidationError::MissingName);
    }
    check_name(fields.name.as_deref(), required)?;
    if fields.mistyped.years_of_experience {
        return Err(ValidationError::InvalidExperience);
    }
    check_experience(fields.years_of_experience)
}

fn check_company_fields(fields: &ProfileFields, required: bool) -> Result<(), ValidationError> {
    if fields.mistyped.organization_name {
        return Err(ValidationError::MissingOrganizationName);
    }
    check_organization_name(fields.organization_name.as_deref(), required)
}

/// An update field of the wrong JSON type fails its rule, whatever the kind.
fn check_mistyped(fields: &ProfileFields) -> Result<(), ValidationError> {
    let mistyped = fields.mistyped;
    if mistyped.name {
        Err(ValidationError::MissingName)
    } else if mistyped.years_of_experience {
        Err(ValidationError::InvalidExperience)
    } else if mistyped.organization_name {
        Err(ValidationError::MissingOrganizationName)
    } else {
        Ok(())
    }
}

fn check_name(name: Option<&str>, required: bool) -> Result<(), ValidationError> {
    match name {
        Some(n) if n.trim().is_empty() => Err(ValidationError::MissingName),
        None if required => Err(ValidationError::MissingName),
        _ => Ok(()),
    }
}

fn check_organization_name(name: Option<&str>, required: bool) -> Result<(), ValidationError> {
    match name {
        Some(n) if n.trim().is_empty() => Err(ValidationError::MissingOrganizationName),
        None if required => Err(ValidationError::MissingOrganizationName),
        _ => Ok(()),
    }
}

fn check_experience(years: Option<f64>) -> Result<(), ValidationError> {
    match years {
        Some(y) if !y.is_finite() || y < 0.0 => Err(ValidationError::InvalidExperience),
        _ => Ok(()),
    }
}
