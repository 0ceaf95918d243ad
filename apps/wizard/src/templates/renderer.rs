//! Generic descriptor renderer.
//!
//! `render` is the single projection function behind every template: pure,
//! deterministic, no I/O, never panics on sparse documents. Sections whose
//! backing data is empty are omitted from the output rather than rendered
//! empty.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Resume, SkillLevel};
use crate::templates::descriptor::{LayoutDescriptor, SectionKind, Theme};

// ────────────────────────────────────────────────────────────────────────────
// Language
// ────────────────────────────────────────────────────────────────────────────

/// Output language of a projection. Affects text and directionality only,
/// never which data is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Localized text for an ongoing role's end date.
    pub fn present_label(self) -> &'static str {
        match self {
            Language::En => "Present",
            Language::Ar => "الحاضر",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    fn section_title(self, kind: SectionKind) -> &'static str {
        match (kind, self) {
            (SectionKind::Header, _) => "",
            (SectionKind::Summary, Language::En) => "Profile",
            (SectionKind::Summary, Language::Ar) => "الملف الشخصي",
            (SectionKind::Experience, Language::En) => "Experience",
            (SectionKind::Experience, Language::Ar) => "الخبرات",
            (SectionKind::Education, Language::En) => "Education",
            (SectionKind::Education, Language::Ar) => "التعليم",
            (SectionKind::Skills, Language::En) => "Skills",
            (SectionKind::Skills, Language::Ar) => "المهارات",
            (SectionKind::Languages, Language::En) => "Languages",
            (SectionKind::Languages, Language::Ar) => "اللغات",
            (SectionKind::Interests, Language::En) => "Interests",
            (SectionKind::Interests, Language::Ar) => "الاهتمامات",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Visual tree
// ────────────────────────────────────────────────────────────────────────────

/// The rendered, template-shaped output handed to the presentation layer.
/// Output-only, like `Theme`: serialized outward, never deserialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualTree {
    pub template_id: String,
    /// Right-to-left layout flag; set for Arabic output.
    pub rtl: bool,
    pub theme: Theme,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Main,
    Sidebar,
}

/// One column of blocks. Bilingual templates emit one main region per
/// language; the region carries its own language tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub placement: Placement,
    pub lang: Language,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        text: String,
    },
    Name {
        full_name: String,
        job_title: String,
    },
    Photo {
        mime_type: String,
        data: String,
    },
    Contact {
        items: Vec<String>,
    },
    Paragraph {
        text: String,
    },
    /// One dated entry (experience or education).
    Timeline {
        title: String,
        subtitle: String,
        period: String,
        description: String,
    },
    /// Ordinal skill rank, rendered as e.g. a four-segment bar.
    Rank {
        label: String,
        level: SkillLevel,
    },
    /// Percentage meter (language proficiency).
    Meter {
        label: String,
        value: u8,
    },
    Tags {
        items: Vec<String>,
    },
    /// Explicit output for degraded projections (unknown template id).
    Notice {
        text: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Projects a document through a descriptor.
pub fn render(desc: &LayoutDescriptor, doc: &Resume, lang: Language) -> VisualTree {
    let regions = if desc.bilingual {
        // Side-by-side variants; the requested language leads.
        let second = match lang {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        };
        vec![
            region(Placement::Main, lang, desc, doc),
            region(Placement::Main, second, desc, doc),
        ]
    } else {
        let mut out = Vec::with_capacity(2);
        if !desc.sidebar.is_empty() {
            out.push(region(Placement::Sidebar, lang, desc, doc));
        }
        out.push(region(Placement::Main, lang, desc, doc));
        out
    };

    VisualTree {
        template_id: desc.id.to_string(),
        rtl: lang.is_rtl(),
        theme: desc.theme,
        regions,
    }
}

fn region(
    placement: Placement,
    lang: Language,
    desc: &LayoutDescriptor,
    doc: &Resume,
) -> Region {
    let sections: &[SectionKind] = match placement {
        Placement::Sidebar => desc.sidebar,
        Placement::Main => desc.main,
    };

    let mut blocks = Vec::new();
    for kind in sections {
        let mut rendered = render_section(*kind, doc, lang);
        if rendered.is_empty() {
            continue; // empty backing data: omit the section entirely
        }
        let title = lang.section_title(*kind);
        if !title.is_empty() {
            blocks.push(Block::Heading {
                text: title.to_string(),
            });
        }
        blocks.append(&mut rendered);
    }

    Region {
        placement,
        lang,
        blocks,
    }
}

fn render_section(kind: SectionKind, doc: &Resume, lang: Language) -> Vec<Block> {
    match kind {
        SectionKind::Header => render_header(doc),
        SectionKind::Summary => {
            let text = doc.personal_info.summary.trim();
            if text.is_empty() {
                vec![]
            } else {
                vec![Block::Paragraph {
                    text: text.to_string(),
                }]
            }
        }
        SectionKind::Experience => doc
            .experience
            .iter()
            .map(|e| Block::Timeline {
                title: e.position.clone(),
                subtitle: join_nonempty(&[&e.company, &e.location]),
                period: format_period(e.start_date, e.end_date, e.current, lang),
                description: e.description.clone(),
            })
            .collect(),
        SectionKind::Education => doc
            .education
            .iter()
            .map(|e| Block::Timeline {
                title: join_nonempty(&[&e.degree, &e.field]),
                subtitle: join_nonempty(&[&e.institution, &e.location]),
                period: e
                    .graduation_date
                    .map(|d| format_date(d, lang))
                    .unwrap_or_default(),
                description: e.description.clone(),
            })
            .collect(),
        SectionKind::Skills => doc
            .skills
            .iter()
            .map(|s| Block::Rank {
                label: s.name.clone(),
                level: s.level,
            })
            .collect(),
        SectionKind::Languages => doc
            .languages
            .iter()
            .map(|l| Block::Meter {
                label: l.name.clone(),
                value: l.level,
            })
            .collect(),
        SectionKind::Interests => {
            if doc.interests.is_empty() {
                vec![]
            } else {
                vec![Block::Tags {
                    items: doc.interests.clone(),
                }]
            }
        }
    }
}

fn render_header(doc: &Resume) -> Vec<Block> {
    let p = &doc.personal_info;
    let mut blocks = Vec::new();

    if let Some(photo) = &p.photo {
        blocks.push(Block::Photo {
            mime_type: photo.mime_type.clone(),
            data: photo.data.clone(),
        });
    }

    let full_name = join_nonempty(&[&p.first_name, &p.last_name]);
    if !full_name.is_empty() || !p.job_title.is_empty() {
        blocks.push(Block::Name {
            full_name,
            job_title: p.job_title.clone(),
        });
    }

    let mut items: Vec<String> = [&p.email, &p.phone, &p.address]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .collect();
    if let Some(site) = p.website.as_deref().filter(|s| !s.trim().is_empty()) {
        items.push(site.to_string());
    }
    if let Some(license) = p.driving_license.as_deref().filter(|s| !s.trim().is_empty()) {
        items.push(license.to_string());
    }
    if !items.is_empty() {
        blocks.push(Block::Contact { items });
    }

    blocks
}

/// Formats a date range. The ongoing-role end is localized text, not logic.
fn format_period(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    current: bool,
    lang: Language,
) -> String {
    let start_text = start.map(|d| format_date(d, lang)).unwrap_or_default();
    let end_text = if current {
        lang.present_label().to_string()
    } else {
        end.map(|d| format_date(d, lang)).unwrap_or_default()
    };

    match (start_text.is_empty(), end_text.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start_text,
        (true, false) => end_text,
        (false, false) => format!("{start_text} – {end_text}"),
    }
}

fn format_date(date: NaiveDate, lang: Language) -> String {
    match lang {
        Language::En => date.format("%b %Y").to_string(),
        Language::Ar => date.format("%m/%Y").to_string(),
    }
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|s| !s.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}
