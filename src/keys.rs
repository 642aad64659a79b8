//! Key namespace. Every key the core writes is built here.

pub const ENTITY_PREFIX: &str = "entity:";
pub const VIDEO_PREFIX: &str = "video:";
pub const BOOKMARK_PREFIX: &str = "bookmark:";
pub const CONVERSATION_PREFIX: &str = "conversation:";

pub const USER_KEY: &str = "w1ne_user";
pub const AGE_VERIFIED_KEY: &str = "w1ne_age_verified";
pub const SELECTED_REGION_KEY: &str = "w1ne_selected_region";
pub const MOCK_CODE_KEY: &str = "w1ne_mock_code";

/// Scalar session keys, in the order they are cleared on sign-out.
pub const SESSION_KEYS: [&str; 4] = [USER_KEY, AGE_VERIFIED_KEY, SELECTED_REGION_KEY, MOCK_CODE_KEY];

/// Countries with a venue partition, in display order.
pub const SUPPORTED_COUNTRIES: [(&str, &str); 6] = [
    ("CH", "Switzerland"),
    ("US", "United States"),
    ("FR", "France"),
    ("IT", "Italy"),
    ("ES", "Spain"),
    ("ZA", "South Africa"),
];

pub fn entity_key(country: &str, id: &str) -> String {
    format!("{ENTITY_PREFIX}{country}:{id}")
}

pub fn entity_country_prefix(country: &str) -> String {
    format!("{ENTITY_PREFIX}{country}:")
}

pub fn video_key(id: &str) -> String {
    format!("{VIDEO_PREFIX}{id}")
}

pub fn bookmark_key(email: &str, entity_id: &str) -> String {
    format!("{BOOKMARK_PREFIX}{email}:{entity_id}")
}

pub fn bookmark_user_prefix(email: &str) -> String {
    format!("{BOOKMARK_PREFIX}{email}:")
}

pub fn conversation_key(id: &str) -> String {
    format!("{CONVERSATION_PREFIX}{id}")
}

pub fn country_name(code: &str) -> Option<&'static str> {
    SUPPORTED_COUNTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
