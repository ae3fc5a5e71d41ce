//! Post model for records returned by the post list endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Fields derived from a raw post record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostDerived {
    /// Creation time, `null` when the raw timestamp is missing or unparseable
    #[serde(serialize_with = "serialize_iso_millis")]
    pub created_at_date: Option<DateTime<Utc>>,
    pub tags_array: Vec<String>,
    pub source_array: Vec<String>,
    pub has_note_bool: bool,
    pub has_comments_bool: bool,
    pub has_children_bool: bool,
    pub is_video: bool,
    pub is_3d: bool,
    pub is_irl: bool,
    pub is_sound: bool,
}

impl PostDerived {
    /// Keys this struct contributes to a serialized post.
    pub const FIELDS: [&'static str; 10] = [
        "created_at_date",
        "tags_array",
        "source_array",
        "has_note_bool",
        "has_comments_bool",
        "has_children_bool",
        "is_video",
        "is_3d",
        "is_irl",
        "is_sound",
    ];
}

/// An upstream post record with derived fields attached.
///
/// `raw` never contains any of [`PostDerived::FIELDS`], so the flattened
/// output has no duplicate keys.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedPost {
    #[serde(flatten)]
    pub raw: Map<String, Value>,
    #[serde(flatten)]
    pub derived: PostDerived,
}

fn serialize_iso_millis<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_serializes_flat_with_raw_fields() {
        let mut raw = Map::new();
        raw.insert("id".into(), json!(42));
        raw.insert("tags".into(), json!("3d"));

        let post = NormalizedPost {
            raw,
            derived: PostDerived {
                created_at_date: Some(Utc.with_ymd_and_hms(2023, 10, 15, 1, 11, 47).unwrap()),
                tags_array: vec!["3d".into()],
                is_3d: true,
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["tags"], "3d");
        assert_eq!(value["tags_array"], json!(["3d"]));
        assert_eq!(value["is_3d"], true);
        assert_eq!(value["created_at_date"], "2023-10-15T01:11:47.000Z");
    }

    #[test]
    fn test_missing_date_serializes_null() {
        let post = NormalizedPost {
            raw: Map::new(),
            derived: PostDerived::default(),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert!(value["created_at_date"].is_null());

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for field in PostDerived::FIELDS {
            assert!(keys.contains(&field), "missing {field}");
        }
    }
}
