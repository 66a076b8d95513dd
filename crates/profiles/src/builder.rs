//! Profile construction from a validated registration.

use chrono::{DateTime, Utc};

use interviewselect_core::ProfileId;

use crate::model::{CompanyDetails, FreelancerDetails, Profile, ProfileDetails, ProfileKind};
use crate::validation::ValidatedRegistration;

/// Build a new profile with a freshly generated id.
///
/// `now` becomes both `created_at` and `updated_at`; callers normally pass
/// `Utc::now()`.
pub fn build(input: &ValidatedRegistration, now: DateTime<Utc>) -> Profile {
    build_with_id(input, ProfileId::new(), now)
}

/// Build a new profile with a caller-chosen id (deterministic tests, imports).
pub fn build_with_id(input: &ValidatedRegistration, id: ProfileId, now: DateTime<Utc>) -> Profile {
    let fields = &input.input().profile;

    let details = match input.kind() {
        ProfileKind::Freelancer => ProfileDetails::Freelancer(FreelancerDetails {
            name: fields.name.clone().unwrap_or_default(),
            bio: fields.bio.clone(),
            years_of_experience: fields.years_of_experience,
            skills: fields.skills.clone().unwrap_or_default(),
            avatar_url: fields.avatar_url.clone(),
        }),
        ProfileKind::Company => ProfileDetails::Company(CompanyDetails {
            organization_name: fields.organization_name.clone().unwrap_or_default(),
            team_roles: fields.team_roles.clone().unwrap_or_default(),
        }),
    };

    Profile {
        id,
        email: input.email().clone(),
        created_at: now,
        updated_at: now,
        details,
    }
}
