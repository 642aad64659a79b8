//! Error taxonomy for the storage core.
//!
//! Missing records are never errors: lookups return `Ok(None)`. Everything
//! else that can go wrong at a boundary has a variant here.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<lmdb::Error> for StoreError {
    fn from(err: lmdb::Error) -> Self {
        StoreError::Database(format!("LMDB error: {err}"))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Form input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in the {0} field")]
    MissingField(&'static str),
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Please upload at least an image or video")]
    MissingMedia,
    #[error("{kind} file too large. Maximum {limit_mb}MB.")]
    MediaTooLarge { kind: &'static str, limit_mb: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Sign in required")]
    SignInRequired,
    #[error("Admin access only")]
    AdminOnly,
    #[error("Master admin access only")]
    MasterAdminOnly,
    #[error("Only the uploader can change this video")]
    NotUploader,
    #[error("You do not manage this venue")]
    NotEntityAdmin,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid code")]
    InvalidCode,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

/// Errors surfaced by the admin console.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Not found: {0}")]
    NotFound(String),
}
