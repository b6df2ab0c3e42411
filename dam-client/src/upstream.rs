//! Wire shapes returned by the upstream function API.
//!
//! The upstream is loose about JSON types: refs and dimensions show up as
//! numbers or as numeric strings, flags as `0`/`1`, booleans or strings.
//! The lenient helpers below accept all of those.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One row of `do_search`.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    #[serde(rename = "ref", deserialize_with = "required_i64")]
    pub reference: i64,
    #[serde(rename = "field8", default)]
    pub title: Option<String>,
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub file_size: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub resource_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub thumb_width: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub thumb_height: Option<i64>,
}

/// Result of `get_resource_data`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceData {
    #[serde(rename = "ref", deserialize_with = "required_i64")]
    pub reference: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub resource_type: Option<i64>,
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub file_size: Option<i64>,
    #[serde(rename = "image_red_width", default, deserialize_with = "lenient_i64")]
    pub width: Option<i64>,
    #[serde(rename = "image_red_height", default, deserialize_with = "lenient_i64")]
    pub height: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub thumb_width: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub thumb_height: Option<i64>,
}

/// One node of `get_featured_collections`.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    #[serde(rename = "ref", deserialize_with = "required_i64")]
    pub reference: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub parent: Option<i64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_resources: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_children: bool,
}

// ------------------------------------------------------------------ //
//  Lenient field decoding                                             //
// ------------------------------------------------------------------ //

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required_i64<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    as_i64(&value).ok_or_else(|| D::Error::custom(format!("expected numeric ref, got {value}")))
}

fn lenient_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(as_i64))
}

fn lenient_flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        Some(other) => as_i64(&other).is_some_and(|n| n != 0),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_row_accepts_numbers_and_numeric_strings() {
        let rows: Vec<Resource> = serde_json::from_str(
            r#"[
                {"ref": 12, "field8": "Bike", "file_extension": "jpg",
                 "resource_type": 1, "thumb_width": 150, "thumb_height": "100"},
                {"ref": "13", "thumb_width": "", "resource_type": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows[0].reference, 12);
        assert_eq!(rows[0].title.as_deref(), Some("Bike"));
        assert_eq!(rows[0].thumb_height, Some(100));
        assert_eq!(rows[1].reference, 13);
        assert_eq!(rows[1].thumb_width, None);
        assert_eq!(rows[1].resource_type, None);
    }

    #[test]
    fn non_numeric_ref_is_rejected() {
        let res = serde_json::from_str::<Resource>(r#"{"ref": "abc"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn collection_flags_accept_several_encodings() {
        let nodes: Vec<Collection> = serde_json::from_str(
            r#"[
                {"ref": 1, "name": "A", "has_resources": 1, "has_children": 0},
                {"ref": 2, "has_resources": "1", "has_children": true},
                {"ref": 3}
            ]"#,
        )
        .unwrap();

        assert!(nodes[0].has_resources && !nodes[0].has_children);
        assert!(nodes[1].has_resources && nodes[1].has_children);
        assert!(!nodes[2].has_resources && !nodes[2].has_children);
    }

    #[test]
    fn resource_data_reads_full_resolution_dimensions() {
        let data: ResourceData = serde_json::from_str(
            r#"{"ref": 5, "title": "Frame", "image_red_width": "4000",
                "image_red_height": 3000, "file_size": "123456"}"#,
        )
        .unwrap();

        assert_eq!(data.width, Some(4000));
        assert_eq!(data.height, Some(3000));
        assert_eq!(data.file_size, Some(123_456));
        assert_eq!(data.thumb_width, None);
    }
}
