//! Tag model for records returned by the tag list endpoint.

use serde::Serialize;
use serde_json::{Map, Value};

/// Label used for any type code outside the known categories.
pub const UNIDENTIFIED_TAG_TYPE: &str = "not identified";

/// Tag category as encoded by the upstream `type` field.
///
/// Code 2 is not a category upstream and is left unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    General,
    Artist,
    Copyright,
    Character,
    Metadata,
    Deprecated,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::General => "general",
            TagType::Artist => "artist",
            TagType::Copyright => "copyright",
            TagType::Character => "character",
            TagType::Metadata => "metadata",
            TagType::Deprecated => "deprecated",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TagType::General),
            1 => Some(TagType::Artist),
            3 => Some(TagType::Copyright),
            4 => Some(TagType::Character),
            5 => Some(TagType::Metadata),
            6 => Some(TagType::Deprecated),
            _ => None,
        }
    }

    /// Label for a raw `type` value; anything but a known integral code is unidentified.
    ///
    /// Integral floats such as `1.0` count as their integer code.
    pub fn label_for(raw: Option<&Value>) -> &'static str {
        raw.and_then(integral_code)
            .and_then(Self::from_code)
            .map(|t| t.as_str())
            .unwrap_or(UNIDENTIFIED_TAG_TYPE)
    }
}

fn integral_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// An upstream tag record with its category label attached.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedTag {
    #[serde(flatten)]
    pub raw: Map<String, Value>,
    pub type_string: &'static str,
}
