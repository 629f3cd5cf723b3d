//! Template metadata resolver.
//!
//! Maps the document's template identifier to a rendering profile: the
//! strategy the renderer should use plus the typography defaults that
//! template ships with. Resolution is pure and fails closed: an unknown
//! identifier resolves to the default template, because a résumé must
//! always be viewable.

use serde::{Deserialize, Serialize};

use crate::models::metadata::{ResumeMetadata, Typography};

pub const DEFAULT_TEMPLATE: &str = "polaris";

/// How the renderer lays a page out. The layout engines themselves live
/// in the renderer; the engine only names the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStrategy {
    SingleColumn,
    TwoColumn,
    Sidebar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProfile {
    /// The identifier actually resolved, which may differ from the
    /// requested one when resolution fell back to the default.
    pub id: String,
    pub strategy: RenderStrategy,
    /// Template-native typography; the renderer overlays the document's
    /// own typography on top of this.
    pub typography: Typography,
}

/// Resolves the metadata's template id to a rendering profile.
pub fn resolve(metadata: &ResumeMetadata) -> TemplateProfile {
    profile_for(&metadata.template)
}

fn profile_for(id: &str) -> TemplateProfile {
    match id {
        "polaris" => TemplateProfile {
            id: "polaris".to_string(),
            strategy: RenderStrategy::SingleColumn,
            typography: Typography::default(),
        },
        "orion" => TemplateProfile {
            id: "orion".to_string(),
            strategy: RenderStrategy::TwoColumn,
            typography: Typography {
                font: "Source Serif Pro".to_string(),
                line_height: 1.4,
                ..Typography::default()
            },
        },
        "carina" => TemplateProfile {
            id: "carina".to_string(),
            strategy: RenderStrategy::Sidebar,
            typography: Typography {
                font: "IBM Plex Sans".to_string(),
                line_height: 1.35,
                hide_icons: true,
                ..Typography::default()
            },
        },
        _ => profile_for(DEFAULT_TEMPLATE),
    }
}
