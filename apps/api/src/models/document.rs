//! The canonical résumé document, the single persistence unit.
//!
//! A document always carries exactly one instance of every fixed section
//! kind (a fixed-key struct, not a dynamic list). It is created with
//! defaults, mutated only through the edit-sync engine's section replace
//! (plus bulk replace on load), and deleted terminally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::items::{
    AwardItem, CertificateItem, EducationItem, HobbyItem, LanguageItem, PortfolioItem,
    ProfileItem, ProjectItem, PublicationItem, ResearchItem, ResearchResultItem, SkillItem,
    StudentItem, WorkItem,
};
use crate::models::metadata::ResumeMetadata;
use crate::models::section::{Section, SectionSlot};

/// Fixed-key map of every section a document carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSections {
    pub profile: Section<ProfileItem>,
    pub education: Section<EducationItem>,
    pub work: Section<WorkItem>,
    pub project: Section<ProjectItem>,
    pub award: Section<AwardItem>,
    pub certificate: Section<CertificateItem>,
    pub hobby: Section<HobbyItem>,
    pub language: Section<LanguageItem>,
    pub skill: Section<SkillItem>,
    pub student: Section<StudentItem>,
    pub research: Section<ResearchItem>,
    pub research_result: Section<ResearchResultItem>,
    pub publication: Section<PublicationItem>,
    pub portfolio: Section<PortfolioItem>,
}

impl Default for ResumeSections {
    fn default() -> Self {
        ResumeSections {
            profile: Section::new(SectionSlot::Profile.default_title()),
            education: Section::new(SectionSlot::Education.default_title()),
            work: Section::new(SectionSlot::Work.default_title()),
            project: Section::new(SectionSlot::Project.default_title()),
            award: Section::new(SectionSlot::Award.default_title()),
            certificate: Section::new(SectionSlot::Certificate.default_title()),
            hobby: Section::new(SectionSlot::Hobby.default_title()),
            language: Section::new(SectionSlot::Language.default_title()),
            skill: Section::new(SectionSlot::Skill.default_title()),
            student: Section::new(SectionSlot::Student.default_title()),
            research: Section::new(SectionSlot::Research.default_title()),
            research_result: Section::new(SectionSlot::ResearchResult.default_title()),
            publication: Section::new(SectionSlot::Publication.default_title()),
            portfolio: Section::new(SectionSlot::Portfolio.default_title()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    /// Absent until the document store assigns an identity on create.
    pub id: Option<Uuid>,
    pub name: String,
    pub is_public: bool,
    pub thumbnail_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub sections: ResumeSections,
    pub metadata: ResumeMetadata,
}

impl ResumeDocument {
    /// A fresh document with defaults; identity is assigned by the store.
    pub fn new(name: impl Into<String>) -> Self {
        ResumeDocument {
            id: None,
            name: name.into(),
            is_public: false,
            thumbnail_url: String::new(),
            created_at: None,
            updated_at: None,
            sections: ResumeSections::default(),
            metadata: ResumeMetadata::default(),
        }
    }

    /// The JSON value of one section slot, in persisted (camelCase) shape.
    pub fn section_value(&self, slot: SectionSlot) -> Value {
        let result = match slot {
            SectionSlot::Profile => serde_json::to_value(&self.sections.profile),
            SectionSlot::Education => serde_json::to_value(&self.sections.education),
            SectionSlot::Work => serde_json::to_value(&self.sections.work),
            SectionSlot::Project => serde_json::to_value(&self.sections.project),
            SectionSlot::Award => serde_json::to_value(&self.sections.award),
            SectionSlot::Certificate => serde_json::to_value(&self.sections.certificate),
            SectionSlot::Hobby => serde_json::to_value(&self.sections.hobby),
            SectionSlot::Language => serde_json::to_value(&self.sections.language),
            SectionSlot::Skill => serde_json::to_value(&self.sections.skill),
            SectionSlot::Student => serde_json::to_value(&self.sections.student),
            SectionSlot::Research => serde_json::to_value(&self.sections.research),
            SectionSlot::ResearchResult => serde_json::to_value(&self.sections.research_result),
            SectionSlot::Publication => serde_json::to_value(&self.sections.publication),
            SectionSlot::Portfolio => serde_json::to_value(&self.sections.portfolio),
        };
        // Serializing an in-memory section cannot fail; the shapes carry no
        // non-string map keys or non-finite floats.
        result.unwrap_or(Value::Null)
    }

    /// Replaces one section slot wholesale from its JSON value.
    ///
    /// This is the edit-sync engine's commit path: last-writer-wins at
    /// section granularity, no version check. A shape mismatch is returned
    /// to the caller (the engine turns it into a notification, never a panic).
    pub fn replace_section_value(
        &mut self,
        slot: SectionSlot,
        value: Value,
    ) -> Result<(), serde_json::Error> {
        ensure_unique_item_ids(&value)?;
        match slot {
            SectionSlot::Profile => self.sections.profile = serde_json::from_value(value)?,
            SectionSlot::Education => self.sections.education = serde_json::from_value(value)?,
            SectionSlot::Work => self.sections.work = serde_json::from_value(value)?,
            SectionSlot::Project => self.sections.project = serde_json::from_value(value)?,
            SectionSlot::Award => self.sections.award = serde_json::from_value(value)?,
            SectionSlot::Certificate => self.sections.certificate = serde_json::from_value(value)?,
            SectionSlot::Hobby => self.sections.hobby = serde_json::from_value(value)?,
            SectionSlot::Language => self.sections.language = serde_json::from_value(value)?,
            SectionSlot::Skill => self.sections.skill = serde_json::from_value(value)?,
            SectionSlot::Student => self.sections.student = serde_json::from_value(value)?,
            SectionSlot::Research => self.sections.research = serde_json::from_value(value)?,
            SectionSlot::ResearchResult => {
                self.sections.research_result = serde_json::from_value(value)?
            }
            SectionSlot::Publication => self.sections.publication = serde_json::from_value(value)?,
            SectionSlot::Portfolio => self.sections.portfolio = serde_json::from_value(value)?,
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// All ids the layout grid may legally reference for this document
    /// (fixed slots; callers extend with custom block routes).
    pub fn known_layout_ids(&self) -> std::collections::HashSet<String> {
        SectionSlot::ALL
            .iter()
            .map(|slot| slot.as_str().to_string())
            .collect()
    }
}

/// Item ids are unique within one section; a replacement carrying the same
/// id twice is rejected before it can reach canonical state.
fn ensure_unique_item_ids(value: &Value) -> Result<(), serde_json::Error> {
    use serde::de::Error;

    let Some(items) = value.get("items").and_then(Value::as_array) else {
        return Ok(());
    };
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    for item in items {
        if let Some(id) = item.get("id").and_then(Value::as_str) {
            if !seen.insert(id) {
                return Err(serde_json::Error::custom(format!("duplicate item id {id}")));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_document_has_every_section() {
        let doc = ResumeDocument::new("My Résumé");
        for slot in SectionSlot::ALL {
            let value = doc.section_value(slot);
            assert!(value.get("sectionConfig").is_some(), "missing slot {slot}");
            assert_eq!(value["items"], json!([]));
        }
        assert!(!doc.is_public);
        assert!(doc.id.is_none());
    }

    #[test]
    fn test_replace_section_value_round_trips() {
        let mut doc = ResumeDocument::new("r");
        let id = Uuid::new_v4();
        let value = json!({
            "sectionConfig": { "title": "Schools", "isShow": false },
            "items": [{ "id": id, "school": "A" }]
        });
        doc.replace_section_value(SectionSlot::Education, value)
            .expect("well-formed section should deserialize");
        assert_eq!(doc.sections.education.section_config.title, "Schools");
        assert!(!doc.sections.education.section_config.is_show);
        assert_eq!(doc.sections.education.items.len(), 1);
        assert_eq!(doc.sections.education.items[0].school, "A");
        assert!(doc.updated_at.is_some());
    }

    #[test]
    fn test_replace_section_value_rejects_duplicate_item_ids() {
        let mut doc = ResumeDocument::new("r");
        let before = doc.clone();
        let id = Uuid::new_v4();
        let value = json!({
            "sectionConfig": { "title": "Schools", "isShow": true },
            "items": [{ "id": id, "school": "A" }, { "id": id, "school": "B" }]
        });
        let err = doc.replace_section_value(SectionSlot::Education, value);
        assert!(err.is_err(), "two items sharing an id must be rejected");
        assert_eq!(doc, before);
    }

    #[test]
    fn test_replace_section_value_rejects_malformed_shape() {
        let mut doc = ResumeDocument::new("r");
        let before = doc.clone();
        let err = doc.replace_section_value(SectionSlot::Work, json!({ "items": "not-a-list" }));
        assert!(err.is_err());
        assert_eq!(doc, before, "failed replace must leave the document untouched");
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let doc = ResumeDocument::new("r");
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("isPublic").is_some());
        assert!(value.get("thumbnailUrl").is_some());
        assert!(value["sections"].get("researchResult").is_some());
    }
}
