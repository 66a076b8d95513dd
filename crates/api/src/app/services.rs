//! Service wiring and the user-service use cases.
//!
//! Handlers stay thin: they parse the request, call one of the methods here
//! and map the result. All collaborator calls (store, identity provider)
//! happen in this module.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use interviewselect_auth::{
    AccountAttributes, CognitoIdentityProvider, IdentityError, IdentityProvider, InMemoryIdentityProvider,
    SignUpRequest,
};
use interviewselect_core::{Entity, ProfileId};
use interviewselect_infra::{
    AppConfig, IdentityBackend, InMemoryProfileStore, PostgresProfileStore, ProfileStore, StoreError,
};
use interviewselect_marketplace::MarketplaceListing;
use interviewselect_profiles::{
    Profile, RegistrationInput, UpdateInput, ValidationError, build, merge, validate_registration,
    validate_update,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No profile is stored under this id. Ids that do not parse land here
    /// too, since nothing can be stored under them.
    #[error("profile not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Collaborators shared by every request handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ProfileStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices").finish_non_exhaustive()
    }
}

impl AppServices {
    pub fn new(store: Arc<dyn ProfileStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Fresh in-memory store plus a fully configured in-memory identity provider.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryProfileStore::new()),
            Arc::new(InMemoryIdentityProvider::fully_configured()),
        )
    }

    /// Wire services from process configuration.
    ///
    /// Either identity provider honors the configured pool/client ids: a
    /// missing app client id disables sign-up, a missing pool id disables
    /// deletion.
    pub async fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let identity: Arc<dyn IdentityProvider> = match config.identity_backend {
            IdentityBackend::Cognito => {
                tracing::info!(region = %config.cognito.region, "using cognito identity provider");
                Arc::new(CognitoIdentityProvider::new(config.identity.clone(), config.cognito.clone())?)
            }
            IdentityBackend::InMemory => {
                tracing::warn!("using in-memory identity provider; accounts are lost on restart");
                Arc::new(InMemoryIdentityProvider::new(config.identity.clone()))
            }
        };

        let store: Arc<dyn ProfileStore> = match (&config.database_url, config.use_persistent_stores) {
            (Some(url), true) => {
                tracing::info!(table = %config.user_table, "using postgres profile store");
                Arc::new(PostgresProfileStore::connect(url, &config.user_table).await?)
            }
            _ => {
                tracing::info!("using in-memory profile store");
                Arc::new(InMemoryProfileStore::new())
            }
        };

        Ok(Self::new(store, identity))
    }

    /// Validate, build, create the identity account, then persist.
    ///
    /// If persisting fails after the account was created, the account is
    /// removed again (when deletion is available) and the store error is
    /// returned.
    #[instrument(skip(self, input), fields(kind = %input.kind), err)]
    pub async fn register_user(&self, input: RegistrationInput) -> Result<Profile, ServiceError> {
        let validated = validate_registration(input)?;
        let profile = build(&validated, Utc::now());

        self.identity
            .sign_up(SignUpRequest {
                email: validated.email().to_string(),
                password: validated.password().to_string(),
                attributes: AccountAttributes {
                    profile_id: *profile.id(),
                    user_type: profile.kind().to_string(),
                },
            })
            .await?;

        if let Err(err) = self.store.insert(&profile).await {
            self.compensate_sign_up(validated.email().as_str()).await;
            return Err(err.into());
        }

        tracing::info!(profile_id = %profile.id(), kind = %profile.kind(), "profile registered");
        Ok(profile)
    }

    async fn compensate_sign_up(&self, email: &str) {
        if !self.identity.deletion_enabled() {
            tracing::warn!("profile insert failed and account deletion is not configured; account left behind");
            return;
        }
        if let Err(e) = self.identity.delete_account(email).await {
            tracing::warn!(error = %e, "failed to remove account after profile insert failure");
        }
    }

    #[instrument(skip(self), err)]
    pub async fn get_profile(&self, id: &str) -> Result<Profile, ServiceError> {
        let not_found = || ServiceError::NotFound(id.to_string());
        let parsed = parse_id(id).ok_or_else(not_found)?;
        self.store.get(&parsed).await?.ok_or_else(not_found)
    }

    /// Validate, fetch, merge and overwrite.
    #[instrument(skip(self, input), fields(profile_id = ?input.id), err)]
    pub async fn update_profile(&self, input: UpdateInput) -> Result<Profile, ServiceError> {
        let validated = validate_update(input)?;
        let not_found = || ServiceError::NotFound(validated.id.clone());
        let id = parse_id(&validated.id).ok_or_else(not_found)?;

        let existing = self.store.get(&id).await?.ok_or_else(not_found)?;
        let updated = merge(&existing, &validated.update, Utc::now())?;
        self.store.put(&updated).await?;

        tracing::info!(profile_id = %id, "profile updated");
        Ok(updated)
    }

    /// Remove the stored profile and, when an email is given and deletion is
    /// configured, the identity account. Deleting an unknown (or unparseable)
    /// id succeeds.
    #[instrument(skip(self, email), err)]
    pub async fn delete_profile(&self, id: &str, email: Option<&str>) -> Result<(), ServiceError> {
        if let Some(parsed) = parse_id(id) {
            self.store.delete(&parsed).await?;
        }

        let email = email.map(str::trim).filter(|e| !e.is_empty());
        if let Some(email) = email {
            if self.identity.deletion_enabled() {
                match self.identity.delete_account(email).await {
                    Ok(()) => {}
                    Err(IdentityError::NotFound(_)) => {
                        tracing::warn!(profile_id = %id, "no identity account to delete");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tracing::info!(profile_id = %id, "profile deleted");
        Ok(())
    }

    pub fn marketplace_listings(&self) -> &'static [MarketplaceListing] {
        interviewselect_marketplace::catalog()
    }
}

fn parse_id(raw: &str) -> Option<ProfileId> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::debug!(error = %e, "profile id does not parse; treating as absent");
            None
        }
    }
}
