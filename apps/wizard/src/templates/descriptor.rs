//! Declarative layout descriptors.
//!
//! A template is data, not code: which sections appear, where they sit, and
//! a handful of theme tokens. One generic renderer interprets every
//! descriptor, so adding a template means adding a table entry.

use serde::{Deserialize, Serialize};

/// The sections a descriptor can place. Each maps to one slice of the
/// document; sections with empty backing data are omitted at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Interests,
}

/// Visual density token. Affects spacing only, never content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Compact,
    Regular,
    Airy,
}

/// Per-template styling tokens. The renderer copies these into the output
/// tree untouched; interpretation belongs to the presentation layer.
/// Output-only: serialized for the presentation layer, never read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Accent color as a hex string, e.g. `#1f6f8b`.
    pub accent: &'static str,
    /// Font stack token understood by the presentation layer.
    pub font: &'static str,
    pub density: Density,
}

/// A complete template definition.
#[derive(Debug, Clone, Copy)]
pub struct LayoutDescriptor {
    /// Stable identifier; persisted and used for registry lookup.
    pub id: &'static str,
    pub display_name: &'static str,
    /// Bilingual templates render the English and Arabic variants side by
    /// side and are the only valid choice for bilingual documents.
    pub bilingual: bool,
    /// Sections placed in the narrow sidebar column. Empty for
    /// single-column layouts.
    pub sidebar: &'static [SectionKind],
    /// Sections placed in the main column, in order.
    pub main: &'static [SectionKind],
    pub theme: Theme,
}
