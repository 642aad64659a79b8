//! Short-video feed, stored under `video:<id>`.
//!
//! Authorization is the caller's job: only the uploader edits, only an admin
//! moderates. See [`crate::access`].

use std::sync::Arc;

use log::info;

use crate::clock::{ClockPort, RandomPort};
use crate::error::StoreError;
use crate::keys::{self, VIDEO_PREFIX};
use crate::kv_store::{load_json, load_prefix, save_json, KeyValueStore};
use crate::models::{User, Video, VideoDraft, VideoStatus};

#[derive(Clone)]
pub struct VideoRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl VideoRepository {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self { store, clock, random }
    }

    /// All videos, newest first.
    pub async fn list_all(&self) -> Result<Vec<Video>, StoreError> {
        let mut videos: Vec<Video> = load_prefix(self.store.as_ref(), VIDEO_PREFIX).await?;
        videos.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(videos)
    }

    pub async fn list_by_status(&self, status: VideoStatus) -> Result<Vec<Video>, StoreError> {
        let mut videos = self.list_all().await?;
        videos.retain(|video| video.status == status);
        Ok(videos)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Video>, StoreError> {
        load_json(self.store.as_ref(), &keys::video_key(id)).await
    }

    /// New uploads always start `pending` with no likes.
    pub async fn create(&self, draft: VideoDraft, uploader: &User) -> Result<Video, StoreError> {
        let now = self.clock.now_millis();
        let video = Video {
            id: format!("video_{}_{}", now, self.random.id_suffix()),
            caption: draft.caption,
            country: draft.country,
            uploaded_by: uploader.email.clone(),
            uploaded_by_name: uploader.display_name().to_string(),
            video_data: draft.video_data,
            thumbnail_data: draft.thumbnail_data,
            tagged_entities: draft.tagged_entities,
            likes: 0,
            status: VideoStatus::Pending,
            timestamp: now,
            updated_at: now,
        };

        save_json(self.store.as_ref(), &keys::video_key(&video.id), &video).await?;
        info!("Video {} uploaded by {}", video.id, video.uploaded_by);
        Ok(video)
    }

    /// Applies an edit by the uploader. The upload `timestamp`, likes and
    /// uploader are kept; the post goes back to `pending` for moderation.
    /// Returns `None` if the video no longer exists.
    pub async fn update(&self, id: &str, draft: VideoDraft) -> Result<Option<Video>, StoreError> {
        let Some(mut video) = self.get(id).await? else {
            return Ok(None);
        };

        video.caption = draft.caption;
        video.country = draft.country;
        video.tagged_entities = draft.tagged_entities;
        if draft.video_data.is_some() {
            video.video_data = draft.video_data;
        }
        if draft.thumbnail_data.is_some() {
            video.thumbnail_data = draft.thumbnail_data;
        }
        video.status = VideoStatus::Pending;
        video.updated_at = self.clock.now_millis();

        save_json(self.store.as_ref(), &keys::video_key(id), &video).await?;
        Ok(Some(video))
    }

    /// Moderation: only the current status is kept, no history.
    pub async fn set_status(&self, id: &str, status: VideoStatus) -> Result<Option<Video>, StoreError> {
        let Some(mut video) = self.get(id).await? else {
            return Ok(None);
        };

        video.status = status;
        save_json(self.store.as_ref(), &keys::video_key(id), &video).await?;
        info!("Video {id} is now {status:?}");
        Ok(Some(video))
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(&keys::video_key(id)).await?;
        Ok(())
    }
}
