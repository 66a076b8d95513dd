use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::identity::{AccountAttributes, IdentityError, IdentityProvider, IdentitySettings, SignUpRequest};

/// Account as held by the in-memory provider. Passwords are not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub attributes: AccountAttributes,
    pub created_at: DateTime<Utc>,
}

/// In-memory identity provider for tests/dev.
///
/// Honors [`IdentitySettings`] the same way a hosted provider would: no app
/// client means no sign-up, no user pool means no deletion.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    settings: IdentitySettings,
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryIdentityProvider {
    pub fn new(settings: IdentitySettings) -> Self {
        Self {
            settings,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Provider with both sign-up and deletion enabled.
    pub fn fully_configured() -> Self {
        Self::new(IdentitySettings {
            user_pool_id: Some("local-pool".to_string()),
            app_client_id: Some("local-client".to_string()),
        })
    }

    pub fn account(&self, email: &str) -> Option<Account> {
        self.accounts.read().ok()?.get(email).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), IdentityError> {
        if self.settings.app_client_id.is_none() {
            return Err(IdentityError::NotConfigured("COGNITO_APP_CLIENT_ID"));
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| IdentityError::Backend("account map poisoned".to_string()))?;
        if accounts.contains_key(&request.email) {
            return Err(IdentityError::AlreadyExists(request.email));
        }

        tracing::debug!(email = %request.email, profile_id = %request.attributes.profile_id, "account created");
        accounts.insert(
            request.email.clone(),
            Account {
                email: request.email,
                attributes: request.attributes,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete_account(&self, email: &str) -> Result<(), IdentityError> {
        if self.settings.user_pool_id.is_none() {
            return Err(IdentityError::NotConfigured("COGNITO_USER_POOL_ID"));
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| IdentityError::Backend("account map poisoned".to_string()))?;
        match accounts.remove(email) {
            Some(_) => Ok(()),
            None => Err(IdentityError::NotFound(email.to_string())),
        }
    }

    fn deletion_enabled(&self) -> bool {
        self.settings.user_pool_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use interviewselect_core::ProfileId;

    use super::*;

    fn request(email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            attributes: AccountAttributes {
                profile_id: ProfileId::new(),
                user_type: "freelancer".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn sign_up_records_account_with_profile_attribute() {
        let idp = InMemoryIdentityProvider::fully_configured();
        let req = request("a@b.com");
        let profile_id = req.attributes.profile_id;

        idp.sign_up(req).await.unwrap();

        let account = idp.account("a@b.com").unwrap();
        assert_eq!(account.attributes.profile_id, profile_id);
        assert_eq!(account.attributes.user_type, "freelancer");
        assert_eq!(idp.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let idp = InMemoryIdentityProvider::fully_configured();
        idp.sign_up(request("a@b.com")).await.unwrap();

        let err = idp.sign_up(request("a@b.com")).await.unwrap_err();
        assert_eq!(err, IdentityError::AlreadyExists("a@b.com".to_string()));
    }

    #[tokio::test]
    async fn sign_up_requires_app_client() {
        let idp = InMemoryIdentityProvider::new(IdentitySettings::default());
        let err = idp.sign_up(request("a@b.com")).await.unwrap_err();
        assert_eq!(err, IdentityError::NotConfigured("COGNITO_APP_CLIENT_ID"));
        assert!(idp.is_empty());
    }

    #[tokio::test]
    async fn delete_requires_user_pool_and_existing_account() {
        let no_pool = InMemoryIdentityProvider::new(IdentitySettings {
            user_pool_id: None,
            app_client_id: Some("client".to_string()),
        });
        assert!(!no_pool.deletion_enabled());
        assert_eq!(
            no_pool.delete_account("a@b.com").await.unwrap_err(),
            IdentityError::NotConfigured("COGNITO_USER_POOL_ID")
        );

        let idp = InMemoryIdentityProvider::fully_configured();
        assert!(idp.deletion_enabled());
        idp.sign_up(request("a@b.com")).await.unwrap();
        idp.delete_account("a@b.com").await.unwrap();
        assert!(idp.account("a@b.com").is_none());
        assert_eq!(
            idp.delete_account("a@b.com").await.unwrap_err(),
            IdentityError::NotFound("a@b.com".to_string())
        );
    }

    #[test]
    fn sign_up_request_debug_redacts_password() {
        let rendered = format!("{:?}", request("a@b.com"));
        assert!(!rendered.contains("password123"));
    }
}
