//! Admin moderation console.
//!
//! Master admins (`admin@...`) moderate videos and manage every venue.
//! Entity admins (any other email containing `admin`) only see and edit the
//! venues that name them as `adminEmail`.

use std::collections::HashSet;

use log::info;

use crate::access::{can_manage_entity, require_admin, require_entity_manager, require_master_admin};
use crate::entity_repository::EntityRepository;
use crate::error::AdminError;
use crate::forms::EntityForm;
use crate::models::{Entity, User, Video, VideoStatus};
use crate::video_repository::VideoRepository;

#[derive(Clone)]
pub struct AdminConsole {
    entities: EntityRepository,
    videos: VideoRepository,
}

impl AdminConsole {
    pub fn new(entities: EntityRepository, videos: VideoRepository) -> Self {
        Self { entities, videos }
    }

    pub async fn videos(&self, user: Option<&User>) -> Result<Vec<Video>, AdminError> {
        require_master_admin(user)?;
        Ok(self.videos.list_all().await?)
    }

    pub async fn approve_video(&self, user: Option<&User>, video_id: &str) -> Result<Video, AdminError> {
        self.moderate(user, video_id, VideoStatus::Approved).await
    }

    pub async fn reject_video(&self, user: Option<&User>, video_id: &str) -> Result<Video, AdminError> {
        self.moderate(user, video_id, VideoStatus::Rejected).await
    }

    pub async fn delete_video(&self, user: Option<&User>, video_id: &str) -> Result<(), AdminError> {
        let admin = require_master_admin(user)?;
        self.videos.remove(video_id).await?;
        info!("Video {video_id} deleted by {}", admin.email);
        Ok(())
    }

    /// Venues visible to `user`, newest first.
    pub async fn entities(&self, user: Option<&User>) -> Result<Vec<Entity>, AdminError> {
        let admin = require_admin(user)?;
        let mut entities = self.entities.list_global().await?;
        entities.retain(|entity| can_manage_entity(admin, entity));
        Ok(entities)
    }

    pub async fn save_entity(
        &self,
        user: Option<&User>,
        entity: &Entity,
        form: EntityForm,
    ) -> Result<Entity, AdminError> {
        require_entity_manager(user, entity)?;
        let patch = form.into_patch()?;
        Ok(self.entities.save(entity, patch).await?)
    }

    pub async fn verify_entity(&self, user: Option<&User>, entity: &Entity) -> Result<Entity, AdminError> {
        let admin = require_master_admin(user)?;
        Ok(self.entities.verify(entity, &admin.email).await?)
    }

    pub async fn delete_entity(&self, user: Option<&User>, entity: &Entity) -> Result<(), AdminError> {
        require_entity_manager(user, entity)?;
        self.entities.remove(entity).await?;
        info!("Venue {} deleted", entity.key());
        Ok(())
    }

    /// Distinct uploader emails, in feed order.
    pub async fn users(&self, user: Option<&User>) -> Result<Vec<String>, AdminError> {
        require_master_admin(user)?;
        let mut seen = HashSet::new();
        Ok(self
            .videos
            .list_all()
            .await?
            .into_iter()
            .filter(|video| seen.insert(video.uploaded_by.clone()))
            .map(|video| video.uploaded_by)
            .collect())
    }

    async fn moderate(
        &self,
        user: Option<&User>,
        video_id: &str,
        status: VideoStatus,
    ) -> Result<Video, AdminError> {
        require_master_admin(user)?;
        self.videos
            .set_status(video_id, status)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("video {video_id}")))
    }
}
