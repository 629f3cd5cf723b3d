//! Timeline importer: copies raw timeline records into section items.
//!
//! Importing is a copy, not a move: every produced item gets a freshly
//! generated id (a source record's own id is never reused), so importing
//! the same record twice yields two independent items. Missing fields
//! default silently: empty string for scalars, the lowest tier for
//! proficiency enums, an empty list for custom fields. Nothing here
//! raises a validation error.

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::external::IdGenerator;
use crate::models::items::{
    AwardItem, CertificateItem, EducationItem, HobbyItem, LanguageItem, PortfolioItem,
    ProfileItem, ProjectItem, PublicationItem, ResearchItem, ResearchResultItem, SkillItem,
    StudentItem, WorkItem,
};
use crate::models::section::SectionSlot;

/// Builds a section item of one domain from a raw timeline record.
pub trait FromTimeline: Sized {
    fn from_timeline(record: &Value, id: Uuid) -> Self;
}

/// Imports a batch of raw records into typed section items with fresh ids.
pub fn import_records<T: FromTimeline>(records: &[Value], ids: &dyn IdGenerator) -> Vec<T> {
    records
        .iter()
        .map(|record| T::from_timeline(record, ids.next_id()))
        .collect()
}

/// Slot-dispatched import producing persisted-shape JSON items, for callers
/// that address sections dynamically (the HTTP layer, the sync buffers).
pub fn import_for_slot(slot: SectionSlot, records: &[Value], ids: &dyn IdGenerator) -> Vec<Value> {
    fn to_values<T: FromTimeline + serde::Serialize>(
        records: &[Value],
        ids: &dyn IdGenerator,
    ) -> Vec<Value> {
        import_records::<T>(records, ids)
            .iter()
            .map(|item| serde_json::to_value(item).unwrap_or(Value::Null))
            .collect()
    }

    match slot {
        SectionSlot::Profile => to_values::<ProfileItem>(records, ids),
        SectionSlot::Education => to_values::<EducationItem>(records, ids),
        SectionSlot::Work => to_values::<WorkItem>(records, ids),
        SectionSlot::Project => to_values::<ProjectItem>(records, ids),
        SectionSlot::Award => to_values::<AwardItem>(records, ids),
        SectionSlot::Certificate => to_values::<CertificateItem>(records, ids),
        SectionSlot::Hobby => to_values::<HobbyItem>(records, ids),
        SectionSlot::Language => to_values::<LanguageItem>(records, ids),
        SectionSlot::Skill => to_values::<SkillItem>(records, ids),
        SectionSlot::Student => to_values::<StudentItem>(records, ids),
        SectionSlot::Research => to_values::<ResearchItem>(records, ids),
        SectionSlot::ResearchResult => to_values::<ResearchResultItem>(records, ids),
        SectionSlot::Publication => to_values::<PublicationItem>(records, ids),
        SectionSlot::Portfolio => to_values::<PortfolioItem>(records, ids),
    }
}

fn text(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn enum_field<T: DeserializeOwned + Default>(record: &Value, key: &str) -> T {
    record
        .get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

impl FromTimeline for ProfileItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        ProfileItem {
            id,
            name: text(record, "name"),
            email: text(record, "email"),
            phone: text(record, "phone"),
            address: text(record, "address"),
            website: text(record, "website"),
            avatar_url: text(record, "avatarUrl"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for EducationItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        EducationItem {
            id,
            school: text(record, "school"),
            major: text(record, "major"),
            degree: text(record, "degree"),
            start_at: text(record, "startAt"),
            end_at: text(record, "endAt"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for WorkItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        WorkItem {
            id,
            company: text(record, "company"),
            position: text(record, "position"),
            start_at: text(record, "startAt"),
            end_at: text(record, "endAt"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for ProjectItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        ProjectItem {
            id,
            name: text(record, "name"),
            url: text(record, "url"),
            start_at: text(record, "startAt"),
            end_at: text(record, "endAt"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for AwardItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        AwardItem {
            id,
            name: text(record, "name"),
            institute: text(record, "institute"),
            date: text(record, "date"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for CertificateItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        CertificateItem {
            id,
            name: text(record, "name"),
            institute: text(record, "institute"),
            date: text(record, "date"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for HobbyItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        HobbyItem {
            id,
            name: text(record, "name"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for LanguageItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        LanguageItem {
            id,
            name: text(record, "name"),
            // Unknown or missing level falls back to the lowest tier.
            level: enum_field(record, "level"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for SkillItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        SkillItem {
            id,
            name: text(record, "name"),
            level: enum_field(record, "level"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for StudentItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        StudentItem {
            id,
            school: text(record, "school"),
            status: text(record, "status"),
            start_at: text(record, "startAt"),
            end_at: text(record, "endAt"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for ResearchItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        ResearchItem {
            id,
            name: text(record, "name"),
            institute: text(record, "institute"),
            start_at: text(record, "startAt"),
            end_at: text(record, "endAt"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for ResearchResultItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        ResearchResultItem {
            id,
            name: text(record, "name"),
            url: text(record, "url"),
            date: text(record, "date"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for PublicationItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        PublicationItem {
            id,
            name: text(record, "name"),
            publisher: text(record, "publisher"),
            date: text(record, "date"),
            url: text(record, "url"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

impl FromTimeline for PortfolioItem {
    fn from_timeline(record: &Value, id: Uuid) -> Self {
        PortfolioItem {
            id,
            name: text(record, "name"),
            url: text(record, "url"),
            summary: text(record, "summary"),
            custom_fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::UuidGenerator;
    use crate::models::items::LanguageLevel;
    use serde_json::json;

    #[test]
    fn test_import_copies_fields_and_generates_fresh_id() {
        let source_id = Uuid::new_v4();
        let records = vec![json!({ "id": source_id, "name": "X" })];
        let items: Vec<AwardItem> = import_records(&records, &UuidGenerator);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "X");
        assert_ne!(items[0].id, source_id, "source ids are never reused");
        assert!(items[0].custom_fields.is_empty());
        assert_eq!(items[0].institute, "");
    }

    #[test]
    fn test_reimport_yields_independent_items() {
        let record = json!({ "school": "A", "major": "CS" });
        let first: Vec<EducationItem> = import_records(&[record.clone()], &UuidGenerator);
        let second: Vec<EducationItem> = import_records(&[record], &UuidGenerator);

        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].school, second[0].school);
        assert_eq!(first[0].major, second[0].major);
    }

    #[test]
    fn test_language_level_defaults_to_lowest_tier() {
        let records = vec![json!({ "name": "Korean" })];
        let items: Vec<LanguageItem> = import_records(&records, &UuidGenerator);
        assert_eq!(items[0].level, LanguageLevel::Basic);
    }

    #[test]
    fn test_unrecognized_language_level_defaults_silently() {
        let records = vec![json!({ "name": "Korean", "level": "wizard" })];
        let items: Vec<LanguageItem> = import_records(&records, &UuidGenerator);
        assert_eq!(items[0].level, LanguageLevel::Basic);
    }

    #[test]
    fn test_known_language_level_is_kept() {
        let records = vec![json!({ "name": "English", "level": "fluent" })];
        let items: Vec<LanguageItem> = import_records(&records, &UuidGenerator);
        assert_eq!(items[0].level, LanguageLevel::Fluent);
    }

    #[test]
    fn test_import_for_slot_produces_persisted_shape() {
        let records = vec![json!({ "company": "Acme", "position": "Engineer" })];
        let values = import_for_slot(SectionSlot::Work, &records, &UuidGenerator);

        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["company"], json!("Acme"));
        assert_eq!(values[0]["customFields"], json!([]));
        assert!(values[0].get("id").is_some());
    }

    #[test]
    fn test_import_empty_batch() {
        let values = import_for_slot(SectionSlot::Hobby, &[], &UuidGenerator);
        assert!(values.is_empty());
    }
}
