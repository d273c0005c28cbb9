use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier. Numbers and strings collapse onto one
/// canonical string form, so `5` and `"5"` name the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    UInt(u64),
    Str(String),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self(n.to_string()),
            RawId::UInt(n) => Self(n.to_string()),
            RawId::Str(s) => Self(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: EntityId,
    pub name: String,
    /// `None` for top-level collections.
    pub parent_id: Option<EntityId>,
    pub link_count: Option<u64>,
}

#[derive(Deserialize)]
struct RawCollection {
    id: EntityId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "parentId")]
    parent_id: Option<EntityId>,
    #[serde(default, rename = "_count")]
    count: Option<RawCount>,
}

#[derive(Deserialize)]
struct RawCount {
    #[serde(default)]
    links: Option<u64>,
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCollection::deserialize(deserializer)?;
        Ok(Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            parent_id: raw.parent_id,
            link_count: raw.count.and_then(|c| c.links),
        })
    }
}

impl Collection {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub url: String,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
struct RawLink {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "createdAt", alias = "created_at", alias = "created")]
    created_at: Option<RawTimestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawLink::deserialize(deserializer)?;
        Ok(Self {
            id: raw.id,
            title: raw.title,
            name: raw.name,
            url: raw.url.unwrap_or_default(),
            created_at: raw.created_at.map(|ts| match ts {
                RawTimestamp::Text(s) => s,
                RawTimestamp::Millis(n) => n.to_string(),
            }),
        })
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl Link {
    /// `title`, then `name`, then `url`, then a placeholder.
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .or_else(|| Some(self.url.as_str()).filter(|u| !u.is_empty()))
            .unwrap_or("(no title)")
    }

    /// Creation time in epoch milliseconds; missing or unparsable values
    /// count as the epoch itself.
    pub fn created_millis(&self) -> i64 {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp_millis)
            .unwrap_or(0)
    }
}

/// Accepts RFC 3339 timestamps, bare dates (UTC midnight), naive
/// date-times (taken as UTC) and integer epoch milliseconds.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    raw.parse::<i64>().ok()
}

/// Pulls `response: [...]` out of an API envelope. Anything that is not an
/// array, and any element that does not decode, is dropped.
pub fn parse_response_list<T: DeserializeOwned>(body: Option<&serde_json::Value>) -> Vec<T> {
    body.and_then(|b| b.get("response"))
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            json: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            headers: Vec::new(),
            json: Some(body),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the body was empty or not JSON.
    pub body: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[derive(Debug, Serialize)]
pub struct RestoreRequest<'a> {
    pub base_url: &'a str,
    pub token: &'a str,
}
