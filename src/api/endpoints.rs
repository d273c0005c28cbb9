use crate::api::types::EntityId;

pub const COLLECTIONS: &str = "/api/collections";
pub const RESTORE_SESSION: &str = "/auth/restore";

pub fn links_for_collection(collection_id: &EntityId) -> String {
    format!(
        "/api/links?collection_id={}",
        urlencoding::encode(collection_id.as_str())
    )
}

/// Linkwarden favicon endpoint for the origin of `link_url`. Empty when
/// either side is missing or the link URL does not parse.
pub fn favicon_url(linkwarden_base: &str, link_url: &str) -> String {
    let base = linkwarden_base.trim().trim_end_matches('/');
    if base.is_empty() || link_url.is_empty() {
        return String::new();
    }
    let origin = match reqwest::Url::parse(link_url) {
        Ok(url) => url.origin(),
        Err(_) => return String::new(),
    };
    if !origin.is_tuple() {
        return String::new();
    }
    format!(
        "{}/api/v1/getFavicon?url={}",
        base,
        urlencoding::encode(&origin.ascii_serialization())
    )
}
