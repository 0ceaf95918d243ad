//! Wizard step state machine.
//!
//! The transition table is `Step::ALL`, defined once. Display labels are
//! looked up from the step, never the other way around, so localized
//! wording can change without touching the machine.

use serde::{Deserialize, Serialize};

use crate::templates::Language;

/// One stage of the guided editing sequence, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    TemplateSelection,
    Photo,
    Personal,
    Experience,
    Education,
    Skills,
    Languages,
    Summary,
    Finalize,
}

impl Step {
    /// The fixed step sequence. Order here is the only source of truth
    /// for navigation.
    pub const ALL: [Step; 9] = [
        Step::TemplateSelection,
        Step::Photo,
        Step::Personal,
        Step::Experience,
        Step::Education,
        Step::Skills,
        Step::Languages,
        Step::Summary,
        Step::Finalize,
    ];

    pub fn first() -> Step {
        Step::ALL[0]
    }

    /// Zero-based position in the sequence.
    pub fn position(self) -> usize {
        Step::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    /// Localized display label for the navigation rail.
    pub fn label(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Step::TemplateSelection, Language::En) => "Template",
            (Step::TemplateSelection, Language::Ar) => "القالب",
            (Step::Photo, Language::En) => "Photo",
            (Step::Photo, Language::Ar) => "الصورة",
            (Step::Personal, Language::En) => "Personal details",
            (Step::Personal, Language::Ar) => "المعلومات الشخصية",
            (Step::Experience, Language::En) => "Experience",
            (Step::Experience, Language::Ar) => "الخبرات",
            (Step::Education, Language::En) => "Education",
            (Step::Education, Language::Ar) => "التعليم",
            (Step::Skills, Language::En) => "Skills",
            (Step::Skills, Language::Ar) => "المهارات",
            (Step::Languages, Language::En) => "Languages",
            (Step::Languages, Language::Ar) => "اللغات",
            (Step::Summary, Language::En) => "Summary",
            (Step::Summary, Language::Ar) => "الملخص",
            (Step::Finalize, Language::En) => "Finish",
            (Step::Finalize, Language::Ar) => "إنهاء",
        }
    }
}

/// Finite state machine over the fixed step sequence.
///
/// Navigation past either end is a no-op, not an error. `goto` jumps
/// anywhere without completion gating — the navigation rail allows
/// arbitrary forward jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepController {
    current: Step,
}

impl StepController {
    pub fn new(initial: Step) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current.position() == 0
    }

    pub fn is_last(&self) -> bool {
        self.current.position() == Step::ALL.len() - 1
    }

    /// Advances one step. No-op at the last step.
    pub fn next(&mut self) -> Step {
        let pos = self.current.position();
        if pos + 1 < Step::ALL.len() {
            self.current = Step::ALL[pos + 1];
        }
        self.current
    }

    /// Retreats one step. No-op at the first step.
    pub fn previous(&mut self) -> Step {
        let pos = self.current.position();
        if pos > 0 {
            self.current = Step::ALL[pos - 1];
        }
        self.current
    }

    /// Jumps directly to any step.
    pub fn goto(&mut self, step: Step) -> Step {
        self.current = step;
        self.current
    }
}

impl Default for StepController {
    fn default() -> Self {
        Self::new(Step::first())
    }
}
