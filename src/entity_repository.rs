//! Venue directory, partitioned by country under `entity:<country>:<id>`.

use std::sync::Arc;

use log::{info, warn};

use crate::clock::{ClockPort, RandomPort};
use crate::error::StoreError;
use crate::keys::{self, ENTITY_PREFIX, SUPPORTED_COUNTRIES};
use crate::kv_store::{load_json, load_prefix, save_json, KeyValueStore};
use crate::models::{slugify, Entity, EntityDraft, EntityPatch, EntityType};
use crate::seed;
use crate::venue_search::VenueCandidate;

/// `addedBy` marker for venues created from web search results.
pub const WEB_SOURCE_AUTHOR: &str = "claude-ai";

#[derive(Clone)]
pub struct EntityRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl EntityRepository {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self { store, clock, random }
    }

    /// Every venue in one country partition, in storage order.
    pub async fn list_by_country(&self, country: &str) -> Result<Vec<Entity>, StoreError> {
        load_prefix(self.store.as_ref(), &keys::entity_country_prefix(country)).await
    }

    /// Union of the supported country partitions, country by country.
    pub async fn list_all(&self) -> Result<Vec<Entity>, StoreError> {
        let mut entities = Vec::new();
        for (country, _) in SUPPORTED_COUNTRIES {
            entities.extend(self.list_by_country(country).await?);
        }
        Ok(entities)
    }

    /// Flat scan of the whole `entity:` namespace, newest `addedAt` first.
    /// Includes partitions outside the supported country list.
    pub async fn list_global(&self) -> Result<Vec<Entity>, StoreError> {
        let mut entities: Vec<Entity> = load_prefix(self.store.as_ref(), ENTITY_PREFIX).await?;
        entities.sort_by(|a, b| b.added_at.unwrap_or(0).cmp(&a.added_at.unwrap_or(0)));
        Ok(entities)
    }

    pub async fn get(&self, country: &str, id: &str) -> Result<Option<Entity>, StoreError> {
        load_json(self.store.as_ref(), &keys::entity_key(country, id)).await
    }

    /// Writes `entity` as-is at the key derived from its own country and id.
    pub async fn put(&self, entity: &Entity) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), &entity.key(), entity).await
    }

    /// Creates a hand-entered venue. Callers validate the draft first.
    pub async fn create(&self, draft: EntityDraft, added_by: &str) -> Result<Entity, StoreError> {
        let now = self.clock.now_millis();
        let id = format!(
            "entity_{}_{}_{}",
            draft.country.to_lowercase(),
            now,
            self.random.id_suffix()
        );

        let mut entity = Entity::new(
            &id,
            &draft.name,
            draft.entity_type.unwrap_or_default(),
            &draft.country,
        );
        entity.address = draft.address;
        entity.about = draft.about;
        entity.specialties = draft.specialties;
        entity.contact = draft.contact;
        entity.image_url = draft.image_url;
        entity.admin_email = draft.admin_email;
        entity.added_by = Some(added_by.to_string());
        entity.added_at = Some(now);

        self.put(&entity).await?;
        info!("Created venue {} ({})", entity.name, entity.key());
        Ok(entity)
    }

    /// Merges `patch` into `existing`, stamps `updatedAt` and writes it back.
    ///
    /// When the patch moves the venue to another country the record is
    /// rewritten under the new partition and the old key is deleted, so no
    /// orphaned copy remains.
    pub async fn save(&self, existing: &Entity, patch: EntityPatch) -> Result<Entity, StoreError> {
        let mut entity = existing.clone();

        if let Some(name) = patch.name {
            entity.slug = slugify(&name);
            entity.name = name;
        }
        if let Some(address) = patch.address {
            entity.address = address;
        }
        if let Some(entity_type) = patch.entity_type {
            entity.entity_type = entity_type;
        }
        if let Some(country) = patch.country {
            entity.country = country;
        }
        if let Some(about) = patch.about {
            entity.about = about;
        }
        if let Some(specialties) = patch.specialties {
            entity.specialties = specialties;
        }
        if let Some(contact) = patch.contact {
            entity.contact = contact;
        }
        if let Some(image_url) = patch.image_url {
            entity.image_url = image_url;
        }
        if let Some(admin_email) = patch.admin_email {
            entity.admin_email = admin_email;
        }
        entity.updated_at = Some(self.clock.now_millis());

        self.put(&entity).await?;

        if entity.country != existing.country {
            self.store.delete(&existing.key()).await?;
            info!("Moved venue {} from {} to {}", entity.id, existing.country, entity.country);
        }

        Ok(entity)
    }

    /// Marks the venue verified by `verifier_email`. Admin-only at the view
    /// boundary; no check here.
    pub async fn verify(&self, entity: &Entity, verifier_email: &str) -> Result<Entity, StoreError> {
        let mut verified = entity.clone();
        verified.verified = true;
        verified.verified_at = Some(self.clock.now_millis());
        verified.verified_by = Some(verifier_email.to_string());

        self.put(&verified).await?;
        Ok(verified)
    }

    pub async fn remove(&self, entity: &Entity) -> Result<(), StoreError> {
        self.store.delete(&entity.key()).await?;
        Ok(())
    }

    /// Keeps venues where name, address, about, type or any specialty
    /// contains `query`, ignoring case.
    pub fn search(entities: &[Entity], query: &str) -> Vec<Entity> {
        let query = query.to_lowercase();
        entities
            .iter()
            .filter(|entity| entity.matches_lowercase(&query))
            .cloned()
            .collect()
    }

    pub fn filter_by_type(entities: &[Entity], entity_type: Option<EntityType>) -> Vec<Entity> {
        entities
            .iter()
            .filter(|entity| entity_type.map_or(true, |t| entity.entity_type == t))
            .cloned()
            .collect()
    }

    /// Writes the built-in sample venues for `region` if its partition holds
    /// no keys at all. Returns how many venues were written.
    pub async fn seed_region_if_empty(&self, region: &str) -> Result<usize, StoreError> {
        let existing = self.store.list(&keys::entity_country_prefix(region)).await?;
        if !existing.keys.is_empty() {
            info!("Data already exists for {region}");
            return Ok(0);
        }

        let samples = seed::sample_entities(region, self.clock.now_millis());
        let mut seeded = 0;
        for entity in &samples {
            match self.put(entity).await {
                Ok(()) => {
                    seeded += 1;
                    info!("Seeded: {}", entity.name);
                }
                Err(e) => warn!("Failed to seed {}: {e}", entity.name),
            }
        }
        Ok(seeded)
    }

    /// Turns web search candidates into unverified venues and writes them
    /// through to the region's partition.
    pub async fn add_web_sourced(
        &self,
        region: &str,
        candidates: Vec<VenueCandidate>,
    ) -> Result<Vec<Entity>, StoreError> {
        let mut added = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let id = format!(
                "entity_{}_{}_{}",
                region,
                self.clock.now_millis(),
                self.random.id_suffix()
            );
            let entity = candidate.into_entity(&id, region, self.clock.now_millis());
            self.put(&entity).await?;
            added.push(entity);
        }

        info!("Added {} web-sourced venues to {region}", added.len());
        Ok(added)
    }
}
