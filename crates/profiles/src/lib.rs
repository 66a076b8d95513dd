//! Profiles domain module (freelancers and companies).
//!
//! This crate holds the only non-trivial business logic of the user service:
//! validating registration/update requests, building new profile records and
//! merging partial updates onto existing ones. Everything here is pure and
//! deterministic (no IO, no HTTP, no storage); callers supply the clock.

pub mod builder;
pub mod error;
pub mod input;
pub mod merge;
pub mod model;
pub mod validation;

pub use builder::{build, build_with_id};
pub use error::ValidationError;
pub use input::{
    CompanyPatch, FreelancerPatch, MistypedFields, ProfileFields, ProfileUpdate, RegistrationInput, UpdateInput,
};
pub use merge::merge;
pub use model::{CompanyDetails, Email, FreelancerDetails, Profile, ProfileDetails, ProfileKind};
pub use validation::{
    MIN_PASSWORD_LENGTH, ValidatedRegistration, ValidatedUpdate, validate_registration, validate_update,
};
