//! Authorization checks applied at the view boundary.
//!
//! Repositories trust their callers; every admin or owner-only action goes
//! through one of these guards first.

use crate::error::AccessError;
use crate::models::{Entity, User, Video};

pub fn require_user(user: Option<&User>) -> Result<&User, AccessError> {
    user.ok_or(AccessError::SignInRequired)
}

pub fn require_admin(user: Option<&User>) -> Result<&User, AccessError> {
    let user = require_user(user)?;
    if !user.is_admin() {
        return Err(AccessError::AdminOnly);
    }
    Ok(user)
}

pub fn require_master_admin(user: Option<&User>) -> Result<&User, AccessError> {
    let user = require_admin(user)?;
    if !user.is_master_admin() {
        return Err(AccessError::MasterAdminOnly);
    }
    Ok(user)
}

pub fn require_uploader(user: Option<&User>, video: &Video) -> Result<(), AccessError> {
    let user = require_user(user)?;
    if user.email != video.uploaded_by {
        return Err(AccessError::NotUploader);
    }
    Ok(())
}

/// Master admins manage every venue; entity admins only the venues naming
/// them as `adminEmail`.
pub fn can_manage_entity(user: &User, entity: &Entity) -> bool {
    user.is_master_admin() || entity.admin_email.as_deref() == Some(user.email.as_str())
}

pub fn require_entity_manager(user: Option<&User>, entity: &Entity) -> Result<(), AccessError> {
    let user = require_admin(user)?;
    if !can_manage_entity(user, entity) {
        return Err(AccessError::NotEntityAdmin);
    }
    Ok(())
}
