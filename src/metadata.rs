//! Video metadata from the legacy v2 API
//! (`http://vimeo.com/api/v2/video/{id}.json`).
//!
//! The endpoint returns a one-element array. A few of its keys carry legacy
//! names and are renamed before decoding. The record is first decoded into
//! [`StandardMetadata`]. When Vimeo adds a field or changes a type, that
//! strict decode fails, and the record is kept as an ordered key/value map
//! instead. Both forms expose the same accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Legacy key → canonical key.
const LEGACY_RENAMES: [(&str, &str); 3] = [
    ("stats_number_of_likes", "likes"),
    ("stats_number_of_plays", "views"),
    ("stats_number_of_comments", "number_of_comments"),
];

/// Strict metadata record with the fields Vimeo is known to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardMetadata {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub upload_date: Option<String>,
    pub thumbnail_small: Option<String>,
    pub thumbnail_medium: Option<String>,
    pub thumbnail_large: Option<String>,
    pub user_id: Option<u64>,
    pub user_name: Option<String>,
    pub user_url: Option<String>,
    pub user_portrait_small: Option<String>,
    pub user_portrait_medium: Option<String>,
    pub user_portrait_large: Option<String>,
    pub user_portrait_huge: Option<String>,
    pub duration: Option<u64>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub tags: Option<String>,
    pub embed_privacy: Option<String>,
    pub likes: Option<u64>,
    pub views: Option<u64>,
    pub number_of_comments: Option<u64>,
}

/// Metadata for one video.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    /// The record matched the known field set.
    Standard(StandardMetadata),
    /// The record had unexpected fields or types; kept verbatim.
    Extended(Map<String, Value>),
}

macro_rules! text_accessors {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<&str> {
                match self {
                    Self::Standard(m) => m.$name.as_deref(),
                    Self::Extended(map) => map.get(stringify!($name)).and_then(Value::as_str),
                }
            }
        )*
    };
}

macro_rules! count_accessors {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<u64> {
                match self {
                    Self::Standard(m) => m.$name,
                    Self::Extended(map) => map.get(stringify!($name)).and_then(as_count),
                }
            }
        )*
    };
}

impl Metadata {
    /// Adapt the raw document returned by the metadata endpoint.
    ///
    /// Accepts either the usual one-element array or a bare object.
    pub fn from_document(document: Value) -> Result<Self> {
        let record = match document {
            Value::Array(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| Error::request("couldn't retrieve meta data: empty response"))?,
            other => other,
        };

        match record {
            Value::Object(map) => Ok(Self::from_record(map)),
            _ => Err(Error::request(
                "couldn't retrieve meta data: record is not an object",
            )),
        }
    }

    /// Rename legacy keys and decode strictly, keeping the map on failure.
    pub fn from_record(mut record: Map<String, Value>) -> Self {
        for (legacy, canonical) in LEGACY_RENAMES {
            if let Some(value) = record.remove(legacy) {
                record.insert(canonical.to_string(), value);
            }
        }

        match serde_json::from_value::<StandardMetadata>(Value::Object(record.clone())) {
            Ok(standard) => Self::Standard(standard),
            Err(e) => {
                tracing::debug!(error = %e, "metadata has unexpected fields, keeping raw record");
                Self::Extended(record)
            }
        }
    }

    /// Returns `true` if the record fell back to the permissive form.
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Extended(_))
    }

    text_accessors!(
        title,
        description,
        url,
        upload_date,
        thumbnail_small,
        thumbnail_medium,
        thumbnail_large,
        user_name,
        user_url,
        user_portrait_small,
        user_portrait_medium,
        user_portrait_large,
        user_portrait_huge,
        tags,
        embed_privacy,
    );

    count_accessors!(
        id,
        user_id,
        duration,
        width,
        height,
        likes,
        views,
        number_of_comments,
    );

    /// Look up any field by name, including ones outside the known set.
    pub fn get(&self, field: &str) -> Option<Value> {
        match self {
            Self::Standard(_) => self.to_json().get(field).filter(|v| !v.is_null()).cloned(),
            Self::Extended(map) => map.get(field).cloned(),
        }
    }

    /// The record as a JSON object.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Standard(m) => serde_json::to_value(m).unwrap_or(Value::Null),
            Self::Extended(map) => Value::Object(map.clone()),
        }
    }
}

/// Counts arrive as numbers, but occasionally as numeric strings.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
