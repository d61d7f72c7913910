//! Report types returned by the parser and serialized to API clients

use serde::{Deserialize, Serialize};

/// One of the four scored report categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hook,
    Script,
    Visuals,
    Captions,
}

impl Section {
    /// All sections in report order
    pub const ALL: [Section; 4] = [
        Section::Hook,
        Section::Script,
        Section::Visuals,
        Section::Captions,
    ];

    /// Tag name used in the model reply (e.g. `hook` for `<hook>`)
    pub fn tag(&self) -> &'static str {
        match self {
            Section::Hook => "hook",
            Section::Script => "script",
            Section::Visuals => "visuals",
            Section::Captions => "captions",
        }
    }

    /// Whether the section grammar captures a `<what_needs_improvement>` list.
    ///
    /// Visuals only ever reports what works.
    pub fn has_improvement_list(&self) -> bool {
        !matches!(self, Section::Visuals)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Scored findings for a single section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReport {
    /// Score text as written by the model, e.g. "42/50". Not validated.
    pub score: String,
    /// Non-empty trimmed lines from `<what_works>`
    pub what_works: Vec<String>,
    /// Non-empty trimmed lines from `<what_needs_improvement>`; always
    /// `None` for [`Section::Visuals`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_needs_improvement: Option<Vec<String>>,
}

/// Structured ad review
///
/// Every field is independent: a field is present exactly when its tagged
/// block was found in the model reply. An empty report is valid output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<SectionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<SectionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visuals: Option<SectionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<SectionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AdReport {
    /// Get the report for a section, if it was parsed
    pub fn section(&self, section: Section) -> Option<&SectionReport> {
        match section {
            Section::Hook => self.hook.as_ref(),
            Section::Script => self.script.as_ref(),
            Section::Visuals => self.visuals.as_ref(),
            Section::Captions => self.captions.as_ref(),
        }
    }

    /// Present sections in report order
    pub fn sections(&self) -> impl Iterator<Item = (Section, &SectionReport)> {
        Section::ALL
            .into_iter()
            .filter_map(move |section| self.section(section).map(|report| (section, report)))
    }

    /// True when nothing could be extracted
    pub fn is_empty(&self) -> bool {
        self.sections().next().is_none() && self.summary.is_none()
    }
}
