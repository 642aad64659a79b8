//! Device-local session: signed-in user, age gate and selected region.
//!
//! One `SessionStore` owns the scalar `w1ne_*` keys. Load it on start, call
//! the mutators on change, and hand the returned [`Session`] to whatever needs
//! the current user or region.

use std::sync::Arc;

use log::{info, warn};

use crate::clock::ClockPort;
use crate::error::{AuthError, StoreError};
use crate::forms::validate_email;
use crate::keys::{AGE_VERIFIED_KEY, MOCK_CODE_KEY, SELECTED_REGION_KEY, SESSION_KEYS, USER_KEY};
use crate::kv_store::{save_json, KeyValueStore};
use crate::models::User;

/// Fixed verification code issued by the mocked email flow.
pub const MOCK_CODE: &str = "123456";

const TRUE: &str = "true";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub region: Option<String>,
    pub age_gate_required: bool,
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockPort>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Restores the session persisted on this device.
    ///
    /// A stored user that is age-verified with a region decides the region.
    /// Otherwise the scalar age flag and region apply. An undecodable user
    /// record is dropped and the age gate shown.
    pub async fn load(&self) -> Result<Session, StoreError> {
        let user_raw = self.scalar(USER_KEY).await?;
        let age_verified = self.scalar(AGE_VERIFIED_KEY).await?.is_some();
        let region = self.scalar(SELECTED_REGION_KEY).await?;

        let Some(user_raw) = user_raw else {
            return Ok(Session {
                user: None,
                age_gate_required: !age_verified,
                region: if age_verified { region } else { None },
            });
        };

        let user: User = match serde_json::from_str(&user_raw) {
            Ok(user) => user,
            Err(e) => {
                warn!("Error parsing stored user: {e}");
                return Ok(Session {
                    user: None,
                    region: None,
                    age_gate_required: true,
                });
            }
        };

        let resolved = match user.region.clone() {
            Some(user_region) if user.age_verified => Some(user_region),
            _ => region.filter(|_| age_verified),
        };

        Ok(Session {
            age_gate_required: resolved.is_none(),
            region: resolved,
            user: Some(user),
        })
    }

    /// Records the age confirmation and region, copying both onto the
    /// signed-in user if there is one.
    pub async fn verify_age(&self, region: &str) -> Result<Session, StoreError> {
        self.store.set(AGE_VERIFIED_KEY, TRUE).await?;
        self.store.set(SELECTED_REGION_KEY, region).await?;

        let mut user = self.stored_user().await?;
        if let Some(user) = user.as_mut() {
            user.age_verified = true;
            user.region = Some(region.to_string());
            self.update(user).await?;
        }

        info!("Age verified for region {region}");
        Ok(Session {
            user,
            region: Some(region.to_string()),
            age_gate_required: false,
        })
    }

    pub async fn update(&self, user: &User) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), USER_KEY, user).await
    }

    /// Sign-out: forgets the user, the age confirmation, the region and any
    /// pending code.
    pub async fn clear(&self) -> Result<Session, StoreError> {
        for key in SESSION_KEYS {
            self.store.delete(key).await?;
        }
        Ok(Session {
            user: None,
            region: None,
            age_gate_required: true,
        })
    }

    /// Mocked email delivery: stores the fixed code and hands it back so the
    /// view can display it.
    pub async fn request_code(&self, email: &str) -> Result<String, AuthError> {
        validate_email(email)?;
        self.store.set(MOCK_CODE_KEY, MOCK_CODE).await?;
        info!("Mock code sent to {email}");
        Ok(MOCK_CODE.to_string())
    }

    /// Signs `email` in if `code` matches the pending code.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<User, AuthError> {
        let expected = self.scalar(MOCK_CODE_KEY).await?;
        if expected.as_deref() != Some(code) {
            return Err(AuthError::InvalidCode);
        }

        let user = User::new(email, self.clock.now_millis());
        self.update(&user).await?;
        Ok(user)
    }

    async fn stored_user(&self) -> Result<Option<User>, StoreError> {
        let Some(raw) = self.scalar(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Error parsing stored user: {e}");
                Ok(None)
            }
        }
    }

    async fn scalar(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(key).await?.map(|stored| stored.value))
    }
}
