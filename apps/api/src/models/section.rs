use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-section display configuration, independent of item content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub title: String,
    pub is_show: bool,
}

impl SectionConfig {
    pub fn new(title: impl Into<String>) -> Self {
        SectionConfig {
            title: title.into(),
            is_show: true,
        }
    }
}

/// One résumé section: an ordered item list plus its display config.
///
/// `items` order is the canonical display/print order. Item ids are unique
/// within one section (enforced by construction: items are only created
/// through the importer or the identity generator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section<T> {
    pub section_config: SectionConfig,
    pub items: Vec<T>,
}

impl<T> Section<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Section {
            section_config: SectionConfig::new(title),
            items: Vec::new(),
        }
    }
}

/// The fixed set of section slots every résumé document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionSlot {
    Profile,
    Education,
    Work,
    Project,
    Award,
    Certificate,
    Hobby,
    Language,
    Skill,
    Student,
    Research,
    ResearchResult,
    Publication,
    Portfolio,
}

impl SectionSlot {
    pub const ALL: [SectionSlot; 14] = [
        SectionSlot::Profile,
        SectionSlot::Education,
        SectionSlot::Work,
        SectionSlot::Project,
        SectionSlot::Award,
        SectionSlot::Certificate,
        SectionSlot::Hobby,
        SectionSlot::Language,
        SectionSlot::Skill,
        SectionSlot::Student,
        SectionSlot::Research,
        SectionSlot::ResearchResult,
        SectionSlot::Publication,
        SectionSlot::Portfolio,
    ];

    /// The camelCase key this slot uses in the persisted document and in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionSlot::Profile => "profile",
            SectionSlot::Education => "education",
            SectionSlot::Work => "work",
            SectionSlot::Project => "project",
            SectionSlot::Award => "award",
            SectionSlot::Certificate => "certificate",
            SectionSlot::Hobby => "hobby",
            SectionSlot::Language => "language",
            SectionSlot::Skill => "skill",
            SectionSlot::Student => "student",
            SectionSlot::Research => "research",
            SectionSlot::ResearchResult => "researchResult",
            SectionSlot::Publication => "publication",
            SectionSlot::Portfolio => "portfolio",
        }
    }

    /// Default display title for a freshly created document.
    pub fn default_title(&self) -> &'static str {
        match self {
            SectionSlot::Profile => "Profile",
            SectionSlot::Education => "Education",
            SectionSlot::Work => "Work Experience",
            SectionSlot::Project => "Projects",
            SectionSlot::Award => "Awards",
            SectionSlot::Certificate => "Certificates",
            SectionSlot::Hobby => "Hobbies",
            SectionSlot::Language => "Languages",
            SectionSlot::Skill => "Skills",
            SectionSlot::Student => "Teaching & Mentoring",
            SectionSlot::Research => "Research",
            SectionSlot::ResearchResult => "Research Results",
            SectionSlot::Publication => "Publications",
            SectionSlot::Portfolio => "Portfolio",
        }
    }
}

impl fmt::Display for SectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionSlot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or(())
    }
}
