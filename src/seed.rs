//! Built-in sample venues for first-run regions.

use crate::models::{Contact, Entity, EntityType};

/// Recorded as `verifiedBy` on sample venues.
pub const SEED_VERIFIER: &str = "w1ne";
pub const SEED_AUTHOR: &str = "seed";

struct Sample {
    id: &'static str,
    name: &'static str,
    slug: &'static str,
    entity_type: EntityType,
    address: &'static str,
    coordinates: Option<(f64, f64)>,
    about: &'static str,
    specialties: &'static [&'static str],
    phone: &'static str,
    email: Option<&'static str>,
    is_paid: bool,
}

const CH: &[Sample] = &[
    Sample {
        id: "entity_ch_zurich_001",
        name: "Weinhandel Zürich",
        slug: "weinhandel-zurich",
        entity_type: EntityType::Retailer,
        address: "Bahnhofstrasse 1, 8001 Zürich",
        coordinates: Some((47.3769, 8.5417)),
        about: "Family-owned wine shop specializing in Swiss and organic wines since 1952.",
        specialties: &["swiss-wine", "organic", "natural"],
        phone: "+41 44 123 4567",
        email: Some("info@weinhandel.ch"),
        is_paid: true,
    },
    Sample {
        id: "entity_ch_geneva_001",
        name: "Cave de Genève",
        slug: "cave-de-geneve",
        entity_type: EntityType::WineBar,
        address: "Rue du Rhône 42, 1204 Genève",
        coordinates: Some((46.2044, 6.1432)),
        about: "Cozy wine bar featuring natural wines and small producer discoveries.",
        specialties: &["natural", "wine-bar", "tastings"],
        phone: "+41 22 987 6543",
        email: Some("hello@cavegeneve.ch"),
        is_paid: false,
    },
    Sample {
        id: "entity_ch_zurich_002",
        name: "Vinorama Zurich",
        slug: "vinorama-zurich",
        entity_type: EntityType::WineBar,
        address: "Niederdorfstrasse 15, 8001 Zürich",
        coordinates: Some((47.3737, 8.5445)),
        about: "Modern wine bar in the heart of old town Zurich, serving natural wines and small plates.",
        specialties: &["natural", "wine-bar", "organic", "small-plates"],
        phone: "+41 44 555 7890",
        email: Some("info@vinorama.ch"),
        is_paid: true,
    },
];

const US: &[Sample] = &[Sample {
    id: "entity_us_sf_001",
    name: "Ferry Plaza Wine Merchant",
    slug: "ferry-plaza-wine",
    entity_type: EntityType::Retailer,
    address: "One Ferry Building, San Francisco, CA 94111",
    coordinates: None,
    about: "Premier wine shop at Ferry Building with curated selection of California and international wines.",
    specialties: &["california", "premium", "tastings"],
    phone: "+1 415 391 9400",
    email: None,
    is_paid: false,
}];

const FR: &[Sample] = &[Sample {
    id: "entity_fr_paris_001",
    name: "La Cave des Papilles",
    slug: "cave-des-papilles",
    entity_type: EntityType::WineBar,
    address: "22 Rue de la Verrerie, 75004 Paris",
    coordinates: None,
    about: "Natural wine bar in the Marais with rotating selection of small producers.",
    specialties: &["natural", "wine-bar", "organic"],
    phone: "+33 1 42 77 76 15",
    email: None,
    is_paid: false,
}];

/// Sample venues for `region`, stamped with `now`. Empty for regions without
/// a built-in set.
pub fn sample_entities(region: &str, now: i64) -> Vec<Entity> {
    let samples = match region {
        "CH" => CH,
        "US" => US,
        "FR" => FR,
        _ => &[],
    };

    samples
        .iter()
        .map(|sample| {
            let mut entity = Entity::new(sample.id, sample.name, sample.entity_type, region);
            entity.slug = sample.slug.to_string();
            entity.address = sample.address.to_string();
            entity.lat = sample.coordinates.map(|(lat, _)| lat);
            entity.lng = sample.coordinates.map(|(_, lng)| lng);
            entity.about = sample.about.to_string();
            entity.specialties = sample.specialties.iter().map(|s| s.to_string()).collect();
            entity.contact = Contact {
                phone: Some(sample.phone.to_string()),
                email: sample.email.map(str::to_string),
                website: None,
            };
            entity.is_paid = sample.is_paid;
            entity.verified = true;
            entity.verified_at = Some(now);
            entity.verified_by = Some(SEED_VERIFIER.to_string());
            entity.added_by = Some(SEED_AUTHOR.to_string());
            entity.added_at = Some(now);
            entity
        })
        .collect()
}
