//! Partial update application (field-by-field coalesce).

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::input::ProfileUpdate;
use crate::model::{CompanyDetails, FreelancerDetails, Profile, ProfileDetails};

/// Apply `update` onto `existing`, returning a new record.
///
/// Present fields replace, absent fields carry over; lists are replaced
/// wholesale. `id`, `email`, `kind` and `created_at` are never touched and
/// `updated_at` is always set to `now`, even when no value actually changed.
///
/// An update typed for the other kind is rejected with
/// [`ValidationError::KindMismatch`] instead of being coalesced onto the
/// wrong shape.
pub fn merge(existing: &Profile, update: &ProfileUpdate, now: DateTime<Utc>) -> Result<Profile, ValidationError> {
    let details = match (&existing.details, update) {
        (ProfileDetails::Freelancer(current), ProfileUpdate::Freelancer(patch)) => {
            let name = patch.name.clone().unwrap_or_else(|| current.name.clone());
            if name.trim().is_empty() {
                return Err(ValidationError::MissingName);
            }
            ProfileDetails::Freelancer(FreelancerDetails {
                name,
                bio: patch.bio.clone().or_else(|| current.bio.clone()),
                years_of_experience: patch.years_of_experience.or(current.years_of_experience),
                skills: patch.skills.clone().unwrap_or_else(|| current.skills.clone()),
                avatar_url: patch.avatar_url.clone().or_else(|| current.avatar_url.clone()),
            })
        }
        (ProfileDetails::Company(current), ProfileUpdate::Company(patch)) => {
            let organization_name = patch
                .organization_name
                .clone()
                .unwrap_or_else(|| current.organization_name.clone());
            if organization_name.trim().is_empty() {
                return Err(ValidationError::MissingOrganizationName);
            }
            ProfileDetails::Company(CompanyDetails {
                organization_name,
                team_roles: patch.team_roles.clone().unwrap_or_else(|| current.team_roles.clone()),
            })
        }
        _ => return Err(ValidationError::KindMismatch),
    };

    Ok(Profile {
        id: existing.id,
        email: existing.email.clone(),
        created_at: existing.created_at,
        // A clock reading older than creation must not break created_at <= updated_at.
        updated_at: now.max(existing.created_at),
        details,
    })
}
