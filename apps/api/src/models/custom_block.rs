//! User-defined section kinds living outside the fixed document slots.
//!
//! A block is addressed by its `route` slug, which is unique within the
//! registry and immutable after creation (a route change is modeled as
//! delete + add so stored items never dangle silently).

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::custom_field::CustomField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Dated entries rendered like the built-in timeline sections.
    Timeline,
    /// A free-form page of fields.
    Page,
}

/// One user-declared input field of a custom block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBlock {
    pub id: Uuid,
    pub name: String,
    pub route: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub fields: Vec<FieldDef>,
}

/// One stored entry of a custom block. Field values are keyed by the
/// declaring `FieldDef` id; photo URLs are opaque strings from object storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBlockItem {
    pub id: Uuid,
    pub block_id: Uuid,
    #[serde(default)]
    pub fields: HashMap<Uuid, String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(BlockKind::Timeline).unwrap(),
            serde_json::json!("timeline")
        );
        assert_eq!(
            serde_json::to_value(BlockKind::Page).unwrap(),
            serde_json::json!("page")
        );
    }

    #[test]
    fn test_block_serializes_kind_as_type() {
        let block = CustomBlock {
            id: Uuid::new_v4(),
            name: "Talks".to_string(),
            route: "talks".to_string(),
            kind: BlockKind::Timeline,
            fields: vec![],
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], serde_json::json!("timeline"));
    }
}
