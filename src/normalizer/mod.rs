//! Record normalization.
//!
//! Pure transforms from raw upstream records to the client schema. None of
//! these functions perform I/O or fail: missing or mistyped raw fields fall
//! back to empty values, and records that are not JSON objects are passed
//! through untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{NormalizedPost, NormalizedTag, PostDerived, TagType};

/// Upstream timestamp layout, e.g. `Sat Oct 14 20:11:47 -0500 2023`.
const UPSTREAM_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const VIDEO_TAGS: [&str; 2] = ["animated", "video"];
const TAG_3D: &str = "3d";
const TAG_IRL: &str = "photo_(medium)";
const TAG_SOUND: &str = "sound";

/// Collection key of the post list payload.
pub const POST_COLLECTION: &str = "post";
/// Collection key of the tag list payload.
pub const TAG_COLLECTION: &str = "tag";

/// Attach derived fields to a raw post record.
pub fn normalize_post(mut raw: Map<String, Value>) -> NormalizedPost {
    let tags_array = split_tags(str_field(&raw, "tags"));
    let source_array = split_sources(str_field(&raw, "source"));

    let has_tag = |tag: &str| tags_array.iter().any(|t| t == tag);

    let derived = PostDerived {
        created_at_date: raw
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(parse_created_at),
        has_note_bool: is_literal_true(raw.get("has_notes")),
        has_comments_bool: is_literal_true(raw.get("has_comments")),
        has_children_bool: is_literal_true(raw.get("has_children")),
        is_video: VIDEO_TAGS.into_iter().any(|tag| has_tag(tag)),
        is_3d: has_tag(TAG_3D),
        is_irl: has_tag(TAG_IRL),
        is_sound: has_tag(TAG_SOUND),
        tags_array,
        source_array,
    };

    for key in PostDerived::FIELDS {
        raw.remove(key);
    }

    NormalizedPost { raw, derived }
}

/// Attach the category label to a raw tag record.
pub fn normalize_tag(mut raw: Map<String, Value>) -> NormalizedTag {
    let type_string = TagType::label_for(raw.get("type"));
    raw.remove("type_string");

    NormalizedTag { raw, type_string }
}

/// Normalize the `post` collection of a post list payload.
///
/// Returns `None` when the payload carries no `post` collection.
pub fn normalize_post_payload(payload: Value) -> Option<Value> {
    let Value::Object(mut payload) = payload else {
        return None;
    };
    let posts = payload.remove(POST_COLLECTION)?;

    payload.insert(
        POST_COLLECTION.to_string(),
        normalize_collection(posts, normalize_post),
    );
    Some(Value::Object(payload))
}

/// Normalize the `tag` collection of a tag list payload.
///
/// Payloads without a `tag` collection are returned unchanged.
pub fn normalize_tag_payload(payload: Value) -> Value {
    let Value::Object(mut payload) = payload else {
        return payload;
    };
    if let Some(tags) = payload.remove(TAG_COLLECTION) {
        payload.insert(
            TAG_COLLECTION.to_string(),
            normalize_collection(tags, normalize_tag),
        );
    }
    Value::Object(payload)
}

/// Apply `normalize` to every object record in a collection.
///
/// Accepts an array or a lone object record; anything else is returned as is.
fn normalize_collection<T, F>(collection: Value, normalize: F) -> Value
where
    T: Serialize,
    F: Fn(Map<String, Value>) -> T,
{
    match collection {
        Value::Array(records) => Value::Array(
            records
                .into_iter()
                .map(|record| normalize_record(record, &normalize))
                .collect(),
        ),
        record @ Value::Object(_) => normalize_record(record, &normalize),
        other => {
            tracing::warn!("Skipping normalization of non-collection value: {}", other);
            other
        }
    }
}

fn normalize_record<T, F>(record: Value, normalize: &F) -> Value
where
    T: Serialize,
    F: Fn(Map<String, Value>) -> T,
{
    let Value::Object(raw) = record else {
        tracing::warn!("Skipping normalization of non-object record: {}", record);
        return record;
    };

    // Only fails on non-string map keys, which `Map` rules out.
    serde_json::to_value(normalize(raw)).unwrap_or_else(|e| {
        tracing::warn!("Failed to serialize normalized record: {}", e);
        Value::Null
    })
}

/// Decode HTML entities in the raw tag string, then split on spaces.
pub fn split_tags(raw: &str) -> Vec<String> {
    html_escape::decode_html_entities(raw)
        .split(' ')
        .map(str::to_string)
        .collect()
}

/// Split a pipe-delimited source string and trim each entry.
pub fn split_sources(raw: &str) -> Vec<String> {
    raw.split('|').map(|src| src.trim().to_string()).collect()
}

/// Strict check for the JSON string `"true"`; `"1"` or a JSON boolean do not count.
pub fn is_literal_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if s == "true")
}

/// Parse an upstream timestamp, accepting the native layout, RFC 3339 and RFC 2822.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, UPSTREAM_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|date| date.with_timezone(&Utc))
        .ok()
}

fn str_field<'a>(raw: &'a Map<String, Value>, key: &str) -> &'a str {
    raw.get(key).and_then(Value::as_str).unwrap_or("")
}
