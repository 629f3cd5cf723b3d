#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed key/value annotation attachable to any section or timeline item.
///
/// `icon` is an opaque key the client resolves against its own icon registry;
/// the server stores and forwards it without validating membership.
/// Insertion order within a collection is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: Uuid,
    pub icon: String,
    pub title: String,
    pub content: String,
}

impl CustomField {
    pub fn new(icon: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        CustomField {
            id: Uuid::new_v4(),
            icon: icon.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}
