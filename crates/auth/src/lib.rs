//! `interviewselect-auth`: identity-provider boundary.
//!
//! The user service never stores credentials itself: account creation and
//! removal go through an [`IdentityProvider`], keyed by email and carrying the
//! profile id as an attached attribute. This crate defines that seam, the
//! Cognito user-pool client used in deployments, and an in-memory provider for
//! development and tests. It is decoupled from HTTP routing and from profile
//! storage.

pub mod cognito;
pub mod identity;
pub mod in_memory;

pub use cognito::{AwsCredentials, CognitoIdentityProvider, CognitoOptions};
pub use identity::{AccountAttributes, IdentityError, IdentityProvider, IdentitySettings, SignUpRequest};
pub use in_memory::{Account, InMemoryIdentityProvider};
