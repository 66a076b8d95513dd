use thiserror::Error;

/// Caller input problems raised by the validator and the merger.
///
/// These are never transient: retrying the same request fails the same way.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least 8 characters long")]
    WeakPassword,

    #[error("invalid user type, supported types: freelancer, company")]
    UnsupportedKind,

    #[error("freelancer profile requires a name")]
    MissingName,

    #[error("years of experience must be a non-negative number")]
    InvalidExperience,

    #[error("company profile requires an organizationName")]
    MissingOrganizationName,

    #[error("missing profile id")]
    MissingId,

    #[error("no profile updates supplied")]
    EmptyUpdate,

    /// The update carries fields of the other profile kind (or of both kinds).
    #[error("profile update does not match the profile kind")]
    KindMismatch,
}

impl ValidationError {
    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::WeakPassword => "weak_password",
            ValidationError::UnsupportedKind => "unsupported_kind",
            ValidationError::MissingName => "missing_name",
            ValidationError::InvalidExperience => "invalid_experience",
            ValidationError::MissingOrganizationName => "missing_organization_name",
            ValidationError::MissingId => "missing_id",
            ValidationError::EmptyUpdate => "empty_update",
            ValidationError::KindMismatch => "kind_mismatch",
        }
    }
}
