//! Template registry — stable id → layout descriptor, with a total lookup.
//!
//! The registry is agnostic to how many templates ship; `project` never
//! fails. Unknown ids produce an explicit "template not found" tree rather
//! than an error, so a stale persisted id can never break rendering.

use std::collections::BTreeMap;

use crate::models::Resume;
use crate::templates::descriptor::{Density, LayoutDescriptor, SectionKind, Theme};
use crate::templates::renderer::{self, Block, Language, Placement, Region, VisualTree};

/// Baseline template used whenever no valid selection exists.
pub const DEFAULT_TEMPLATE: &str = "classic";

const SINGLE_COLUMN: &[SectionKind] = &[
    SectionKind::Header,
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Languages,
    SectionKind::Interests,
];

const MAIN_COLUMN: &[SectionKind] = &[
    SectionKind::Header,
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
];

const SIDE_COLUMN: &[SectionKind] = &[
    SectionKind::Skills,
    SectionKind::Languages,
    SectionKind::Interests,
];

/// The shipped template set. Adding a template is one more row here.
const BUILTIN: &[LayoutDescriptor] = &[
    LayoutDescriptor {
        id: "classic",
        display_name: "Classic",
        bilingual: false,
        sidebar: &[],
        main: SINGLE_COLUMN,
        theme: Theme {
            accent: "#1a1a2e",
            font: "serif",
            density: Density::Regular,
        },
    },
    LayoutDescriptor {
        id: "modern",
        display_name: "Modern",
        bilingual: false,
        sidebar: SIDE_COLUMN,
        main: MAIN_COLUMN,
        theme: Theme {
            accent: "#1f6f8b",
            font: "sans",
            density: Density::Regular,
        },
    },
    LayoutDescriptor {
        id: "elegant",
        display_name: "Elegant",
        bilingual: false,
        sidebar: SIDE_COLUMN,
        main: MAIN_COLUMN,
        theme: Theme {
            accent: "#7d5a50",
            font: "serif",
            density: Density::Airy,
        },
    },
    LayoutDescriptor {
        id: "compact",
        display_name: "Compact",
        bilingual: false,
        sidebar: &[],
        main: SINGLE_COLUMN,
        theme: Theme {
            accent: "#2d2d2d",
            font: "sans",
            density: Density::Compact,
        },
    },
    LayoutDescriptor {
        id: "timeline",
        display_name: "Timeline",
        bilingual: false,
        sidebar: &[SectionKind::Skills, SectionKind::Languages],
        main: &[
            SectionKind::Header,
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Summary,
            SectionKind::Interests,
        ],
        theme: Theme {
            accent: "#c06014",
            font: "sans",
            density: Density::Regular,
        },
    },
    LayoutDescriptor {
        id: "minimal",
        display_name: "Minimal",
        bilingual: false,
        sidebar: &[],
        main: &[
            SectionKind::Header,
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
        ],
        theme: Theme {
            accent: "#444444",
            font: "sans",
            density: Density::Airy,
        },
    },
    LayoutDescriptor {
        id: "bilingual-split",
        display_name: "Bilingual Split",
        bilingual: true,
        sidebar: &[],
        main: SINGLE_COLUMN,
        theme: Theme {
            accent: "#0f4c5c",
            font: "sans",
            density: Density::Compact,
        },
    },
    LayoutDescriptor {
        id: "bilingual-mirror",
        display_name: "Bilingual Mirror",
        bilingual: true,
        sidebar: &[],
        main: MAIN_COLUMN,
        theme: Theme {
            accent: "#5f0f40",
            font: "serif",
            density: Density::Regular,
        },
    },
];

/// Ordered registry of layout descriptors.
pub struct TemplateRegistry {
    templates: BTreeMap<&'static str, LayoutDescriptor>,
}

impl TemplateRegistry {
    /// Registry holding the shipped template set.
    pub fn builtin() -> Self {
        let templates = BUILTIN.iter().map(|d| (d.id, *d)).collect();
        Self { templates }
    }

    pub fn get(&self, id: &str) -> Option<&LayoutDescriptor> {
        self.templates.get(id)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn is_bilingual_capable(&self, id: &str) -> bool {
        self.get(id).map(|d| d.bilingual).unwrap_or(false)
    }

    /// Ids of bilingual-capable templates, in registry order.
    pub fn bilingual_ids(&self) -> Vec<&'static str> {
        self.templates
            .values()
            .filter(|d| d.bilingual)
            .map(|d| d.id)
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.templates.keys().copied()
    }

    /// Total projection: unknown ids fall back to an explicit
    /// "template not found" tree.
    pub fn project(&self, id: &str, doc: &Resume, lang: Language) -> VisualTree {
        match self.get(id) {
            Some(desc) => renderer::render(desc, doc, lang),
            None => not_found_tree(id, lang),
        }
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn not_found_tree(id: &str, lang: Language) -> VisualTree {
    let text = match lang {
        Language::En => format!("Template '{id}' is not available."),
        Language::Ar => format!("القالب '{id}' غير متوفر."),
    };
    VisualTree {
        template_id: id.to_string(),
        rtl: lang.is_rtl(),
        theme: Theme {
            accent: "#888888",
            font: "sans",
            density: Density::Regular,
        },
        regions: vec![Region {
            placement: Placement::Main,
            lang,
            blocks: vec![Block::Notice { text }],
        }],
    }
}
