//! Document-level metadata: template choice, layout grid, theme, typography
//! and page options. This is presentation configuration the renderer consumes;
//! the engine only stores it and keeps the layout grid consistent with the
//! sections that actually exist.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::section::SectionSlot;

/// Section placement grid: pages → column groups → columns → section ids.
/// Ids are section slot keys or custom block routes.
pub type LayoutGrid = Vec<Vec<Vec<Vec<String>>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssConfig {
    pub value: String,
    pub visible: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        CssConfig {
            value: "* {\n}".to_string(),
            visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// Margin in millimetres.
    pub margin: u32,
    /// Paper format key, e.g. "a4" or "letter".
    pub format: String,
    pub options: PageOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    pub break_line: bool,
    pub page_numbers: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            margin: 14,
            format: "a4".to_string(),
            options: PageOptions {
                break_line: false,
                page_numbers: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background: String,
    pub text: String,
    pub primary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
            primary: "#2563eb".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font: String,
    pub line_height: f32,
    pub hide_icons: bool,
    pub underline_links: bool,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            font: "Inter".to_string(),
            line_height: 1.5,
            hide_icons: false,
            underline_links: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMetadata {
    /// Template identifier. Resolved fail-closed by `template::resolve`:
    /// an unknown id renders with the default template, never an error.
    pub template: String,
    pub layout: LayoutGrid,
    pub css: CssConfig,
    pub page: PageSetup,
    pub theme: Theme,
    pub typography: Typography,
    pub notes: String,
}

impl Default for ResumeMetadata {
    fn default() -> Self {
        ResumeMetadata {
            template: crate::template::DEFAULT_TEMPLATE.to_string(),
            layout: default_layout(),
            css: CssConfig::default(),
            page: PageSetup::default(),
            theme: Theme::default(),
            typography: Typography::default(),
            notes: String::new(),
        }
    }
}

/// One page, one column group, two columns: main content and sidebar.
fn default_layout() -> LayoutGrid {
    let main: Vec<String> = [
        SectionSlot::Profile,
        SectionSlot::Work,
        SectionSlot::Education,
        SectionSlot::Project,
        SectionSlot::Research,
        SectionSlot::ResearchResult,
        SectionSlot::Publication,
        SectionSlot::Student,
    ]
    .iter()
    .map(|s| s.as_str().to_string())
    .collect();

    let side: Vec<String> = [
        SectionSlot::Skill,
        SectionSlot::Language,
        SectionSlot::Award,
        SectionSlot::Certificate,
        SectionSlot::Portfolio,
        SectionSlot::Hobby,
    ]
    .iter()
    .map(|s| s.as_str().to_string())
    .collect();

    vec![vec![vec![main, side]]]
}

/// Drops layout ids that reference no known section or custom block route.
/// An id missing from `known` is treated as absent, never an error.
pub fn sanitize_layout(layout: &LayoutGrid, known: &HashSet<String>) -> LayoutGrid {
    layout
        .iter()
        .map(|page| {
            page.iter()
                .map(|group| {
                    group
                        .iter()
                        .map(|column| {
                            column
                                .iter()
                                .filter(|id| known.contains(id.as_str()))
                                .cloned()
                                .collect()
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}
