use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use interviewselect_core::ProfileId;

/// Custom attributes attached to an account at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    pub profile_id: ProfileId,
    /// `freelancer` or `company`.
    pub user_type: String,
}

/// Sign-up request forwarded to the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub attributes: AccountAttributes,
}

impl core::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Which identity-provider operations are wired up.
///
/// Sign-up needs an app client; account deletion needs a user pool. Either
/// may be absent in local setups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySettings {
    pub user_pool_id: Option<String>,
    pub app_client_id: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// A required setting is missing (names the setting).
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("an account already exists for {0}")]
    AlreadyExists(String),

    #[error("no account exists for {0}")]
    NotFound(String),

    /// Any other provider failure (network, throttling, rejected request).
    #[error("identity provider failure: {0}")]
    Backend(String),
}

/// Identity-provider collaborator.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create the account for a freshly built profile.
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), IdentityError>;

    /// Remove the account registered under `email`.
    async fn delete_account(&self, email: &str) -> Result<(), IdentityError>;

    /// Whether `delete_account` is available (a user pool is configured).
    fn deletion_enabled(&self) -> bool;
}
