//! Builder session — the orchestrator behind the wizard UI.
//!
//! Owns the document, the step machine, the selected template, and the
//! view, and mirrors every confirmed change to the persistence gateway.
//! Assistant calls run through here so their failure modes degrade to the
//! documented fallbacks in exactly one place. A busy flag blocks
//! overlapping assistant requests; the second request short-circuits to
//! its fallback instead of racing the first.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assist::{validate_upload_mime, AssistGateway};
use crate::document::{self, ListItem, ListKind, Subtree};
use crate::errors::AppError;
use crate::models::Resume;
use crate::steps::{Step, StepController};
use crate::storage::StateGateway;
use crate::templates::{Language, TemplateRegistry, VisualTree, DEFAULT_TEMPLATE};

/// Top-level screen the user is on. Persisted alongside the step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Landing,
    Selection,
    Builder,
}

pub struct BuilderSession {
    document: Resume,
    controller: StepController,
    template_id: String,
    language: Language,
    view: View,
    gateway: StateGateway,
    registry: TemplateRegistry,
    assist: Arc<dyn AssistGateway>,
    busy: bool,
}

impl BuilderSession {
    /// Rebuilds a session from persisted state, falling back per key.
    pub fn restore(
        gateway: StateGateway,
        registry: TemplateRegistry,
        assist: Arc<dyn AssistGateway>,
    ) -> Self {
        let document = gateway.load_document();
        let controller = StepController::new(gateway.load_step());
        let template_id = gateway.load_template(&registry);
        let view = gateway.load_view();

        Self {
            document,
            controller,
            template_id,
            language: Language::default(),
            view,
            gateway,
            registry,
            assist,
            busy: false,
        }
    }

    // ── queries ─────────────────────────────────────────────────────────────

    pub fn document(&self) -> &Resume {
        &self.document
    }

    pub fn step(&self) -> Step {
        self.controller.current()
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// True while an assistant call is outstanding. The presentation layer
    /// uses this to block input.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ── creation paths ──────────────────────────────────────────────────────

    /// Starts over from the fully populated sample document.
    pub fn start_sample(&mut self) {
        self.adopt_document(Resume::sample());
        self.enter_builder();
    }

    /// Starts from an empty document.
    ///
    /// The bilingual invariant is enforced here, at creation: a bilingual
    /// document always leaves this method paired with a bilingual-capable
    /// template.
    pub fn start_blank(&mut self, bilingual: bool) {
        self.adopt_document(Resume::blank(bilingual));
        self.enter_builder();
    }

    fn adopt_document(&mut self, document: Resume) {
        self.document = document;
        if self.document.is_bilingual && !self.registry.is_bilingual_capable(&self.template_id) {
            let corrected = self
                .registry
                .bilingual_ids()
                .first()
                .copied()
                .unwrap_or(DEFAULT_TEMPLATE)
                .to_string();
            info!(
                "Template '{}' cannot render bilingual documents, switching to '{corrected}'",
                self.template_id
            );
            self.template_id = corrected;
            self.gateway.save_template(&self.template_id);
        }
        self.gateway.save_document(&self.document);
    }

    fn enter_builder(&mut self) {
        self.controller = StepController::default();
        self.gateway.save_step(self.controller.current());
        self.set_view(View::Builder);
    }

    // ── template / language / view ──────────────────────────────────────────

    /// Selects a template. Unknown ids are rejected, and a bilingual
    /// document refuses templates outside the bilingual-capable subset.
    pub fn select_template(&mut self, id: &str) -> Result<(), AppError> {
        if !self.registry.is_known(id) {
            return Err(AppError::UnknownTemplate(id.to_string()));
        }
        if self.document.is_bilingual && !self.registry.is_bilingual_capable(id) {
            return Err(AppError::Validation(format!(
                "Template '{id}' cannot render a bilingual resume"
            )));
        }
        self.template_id = id.to_string();
        self.gateway.save_template(&self.template_id);
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.gateway.save_view(view);
    }

    // ── navigation (each transition persists immediately) ───────────────────

    pub fn next_step(&mut self) -> Step {
        let step = self.controller.next();
        self.gateway.save_step(step);
        step
    }

    pub fn previous_step(&mut self) -> Step {
        let step = self.controller.previous();
        self.gateway.save_step(step);
        step
    }

    pub fn goto_step(&mut self, step: Step) -> Step {
        let step = self.controller.goto(step);
        self.gateway.save_step(step);
        step
    }

    // ── editing (every mutation persists the document) ──────────────────────

    pub fn replace_subtree(&mut self, subtree: Subtree) {
        self.apply(|doc| document::replace_subtree(doc, subtree));
    }

    pub fn add_item(&mut self, item: ListItem) {
        self.apply(|doc| document::add_item(doc, item));
    }

    pub fn remove_item(&mut self, list: ListKind, id: &str) {
        self.apply(|doc| document::remove_item(doc, list, id));
    }

    fn apply(&mut self, op: impl FnOnce(Resume) -> Resume) {
        let doc = std::mem::replace(&mut self.document, Resume::blank(false));
        self.document = op(doc);
        self.gateway.save_document(&self.document);
    }

    // ── assistant operations ────────────────────────────────────────────────

    /// Imports an uploaded file through the assistant.
    ///
    /// The only assistant path whose failure reaches the user: MIME
    /// rejection before any network call, extraction failure afterwards.
    /// On success the extracted document replaces the current one.
    pub async fn import_upload(&mut self, file: Bytes, mime_type: &str) -> Result<(), AppError> {
        validate_upload_mime(mime_type)?;
        if !self.begin_assist() {
            return Err(AppError::Validation(
                "Another assistant request is still running".to_string(),
            ));
        }

        let result = self.assist.parse_document(file, mime_type).await;
        self.busy = false;

        match result {
            Ok(Some(document)) => {
                self.adopt_document(document);
                Ok(())
            }
            Ok(None) => Err(AppError::Extraction(
                "The assistant could not read that file".to_string(),
            )),
            Err(e) => Err(AppError::Extraction(e.to_string())),
        }
    }

    /// Rewrites the document for a persona. Degrades to a no-op: on any
    /// failure the document is left exactly as it was.
    pub async fn optimize(&mut self, persona_id: &str) {
        if !self.begin_assist() {
            warn!("optimize skipped: assistant busy");
            return;
        }

        let result = self
            .assist
            .optimize(&self.document, persona_id, self.language)
            .await;
        self.busy = false;

        match result {
            Ok(document) => {
                let bilingual = self.document.is_bilingual;
                let mut document = document;
                // The persona rewrite must not flip the template family.
                document.is_bilingual = bilingual;
                self.document = document;
                self.gateway.save_document(&self.document);
            }
            Err(e) => warn!("optimize degraded to no-op: {e}"),
        }
    }

    /// Polishes free text into bullets. Degrades to echoing the input as a
    /// single bullet.
    pub async fn refine_bullets(&mut self, role: &str, text: &str) -> Vec<String> {
        if !self.begin_assist() {
            warn!("refine_bullets skipped: assistant busy");
            return vec![text.to_string()];
        }

        let result = self.assist.refine_bullets(role, text, self.language).await;
        self.busy = false;

        match result {
            Ok(bullets) => bullets,
            Err(e) => {
                warn!("refine_bullets degraded to echo: {e}");
                vec![text.to_string()]
            }
        }
    }

    /// Conversational cover-letter rewrite. Degrades to returning the
    /// current text unchanged. On success the cover-letter subtree is
    /// updated and persisted.
    pub async fn chat_cover_letter(&mut self, instruction: &str, current_text: &str) -> String {
        if !self.begin_assist() {
            warn!("chat_cover_letter skipped: assistant busy");
            return current_text.to_string();
        }

        let result = self
            .assist
            .chat_cover_letter(&self.document, instruction, current_text, self.language)
            .await;
        self.busy = false;

        match result {
            Ok(content) => {
                if let Some(letter) = &mut self.document.cover_letter {
                    letter.content = content.clone();
                    self.gateway.save_document(&self.document);
                }
                content
            }
            Err(e) => {
                warn!("chat_cover_letter degraded to echo: {e}");
                current_text.to_string()
            }
        }
    }

    /// Generates a professional summary. Degrades to an empty string; the
    /// editing surface treats that as "nothing to insert".
    pub async fn summarize(&mut self, job_title: &str, skills: &[String]) -> String {
        if !self.begin_assist() {
            warn!("summarize skipped: assistant busy");
            return String::new();
        }

        let result = self.assist.summarize(job_title, skills, self.language).await;
        self.busy = false;

        match result {
            Ok(summary) => summary,
            Err(e) => {
                warn!("summarize degraded to empty: {e}");
                String::new()
            }
        }
    }

    fn begin_assist(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    // ── output ──────────────────────────────────────────────────────────────

    /// Projects the current document through the selected template.
    /// Total: a stale template id renders the explicit fallback tree.
    pub fn render(&self) -> VisualTree {
        self.registry
            .project(&self.template_id, &self.document, self.language)
    }

    /// Explicit reset: clears persisted state and reloads defaults.
    pub fn reset(&mut self) {
        self.gateway.clear();
        self.document = Resume::sample();
        self.controller = StepController::default();
        self.template_id = DEFAULT_TEMPLATE.to_string();
        self.view = View::Landing;
        self.busy = false;
    }

    #[cfg(test)]
    fn force_busy(&mut self) {
        self.busy = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::AssistError;
    use crate::models::{Skill, SkillLevel};
    use async_trait::async_trait;

    /// Every operation fails with a server error.
    struct FailingAssist;

    #[async_trait]
    impl AssistGateway for FailingAssist {
        async fn parse_document(
            &self,
            _file: Bytes,
            _mime_type: &str,
        ) -> Result<Option<Resume>, AssistError> {
            Err(api_error())
        }

        async fn optimize(
            &self,
            _doc: &Resume,
            _persona_id: &str,
            _lang: Language,
        ) -> Result<Resume, AssistError> {
            Err(api_error())
        }

        async fn refine_bullets(
            &self,
            _role: &str,
            _text: &str,
            _lang: Language,
        ) -> Result<Vec<String>, AssistError> {
            Err(api_error())
        }

        async fn chat_cover_letter(
            &self,
            _doc: &Resume,
            _instruction: &str,
            _current_text: &str,
            _lang: Language,
        ) -> Result<String, AssistError> {
            Err(api_error())
        }

        async fn summarize(
            &self,
            _job_title: &str,
            _skills: &[String],
            _lang: Language,
        ) -> Result<String, AssistError> {
            Err(api_error())
        }
    }

    /// Succeeds with scripted results.
    struct ScriptedAssist;

    #[async_trait]
    impl AssistGateway for ScriptedAssist {
        async fn parse_document(
            &self,
            file: Bytes,
            _mime_type: &str,
        ) -> Result<Option<Resume>, AssistError> {
            // Empty upload: extraction finds nothing.
            if file.is_empty() {
                return Ok(None);
            }
            let mut doc = Resume::blank(false);
            doc.personal_info.first_name = "Imported".to_string();
            Ok(Some(doc))
        }

        async fn optimize(
            &self,
            doc: &Resume,
            _persona_id: &str,
            _lang: Language,
        ) -> Result<Resume, AssistError> {
            let mut doc = doc.clone();
            doc.personal_info.summary = "Optimized.".to_string();
            Ok(doc)
        }

        async fn refine_bullets(
            &self,
            _role: &str,
            _text: &str,
            _lang: Language,
        ) -> Result<Vec<String>, AssistError> {
            Ok(vec!["Led a team of 4".to_string(), "Shipped v2".to_string()])
        }

        async fn chat_cover_letter(
            &self,
            _doc: &Resume,
            _instruction: &str,
            _current_text: &str,
            _lang: Language,
        ) -> Result<String, AssistError> {
            Ok("Dear hiring team,".to_string())
        }

        async fn summarize(
            &self,
            job_title: &str,
            _skills: &[String],
            _lang: Language,
        ) -> Result<String, AssistError> {
            Ok(format!("Experienced {job_title}."))
        }
    }

    fn api_error() -> AssistError {
        AssistError::Api {
            status: 500,
            message: "upstream failure".to_string(),
        }
    }

    fn session_with(assist: Arc<dyn AssistGateway>) -> BuilderSession {
        BuilderSession::restore(
            StateGateway::in_memory(),
            TemplateRegistry::builtin(),
            assist,
        )
    }

    fn failing_session() -> BuilderSession {
        session_with(Arc::new(FailingAssist))
    }

    #[test]
    fn test_restore_defaults_on_fresh_store() {
        let s = failing_session();
        assert_eq!(s.view(), View::Landing);
        assert_eq!(s.step(), Step::first());
        assert_eq!(s.template_id(), DEFAULT_TEMPLATE);
        assert_eq!(*s.document(), Resume::sample());
        assert!(!s.is_busy());
    }

    #[test]
    fn test_navigation_is_persisted_across_restore() {
        let gateway = StateGateway::in_memory();
        let mut s = BuilderSession::restore(
            gateway.clone(),
            TemplateRegistry::builtin(),
            Arc::new(FailingAssist),
        );
        s.start_blank(false);
        s.next_step();
        s.next_step();
        s.goto_step(Step::Summary);

        let restored = BuilderSession::restore(
            gateway,
            TemplateRegistry::builtin(),
            Arc::new(FailingAssist),
        );
        assert_eq!(restored.step(), Step::Summary);
        assert_eq!(restored.view(), View::Builder);
        assert_eq!(*restored.document(), Resume::blank(false));
    }

    #[test]
    fn test_start_blank_bilingual_corrects_template() {
        let mut s = failing_session();
        assert_eq!(s.template_id(), DEFAULT_TEMPLATE);
        s.start_blank(true);
        let registry = TemplateRegistry::builtin();
        assert!(registry.is_bilingual_capable(s.template_id()));
    }

    #[test]
    fn test_bilingual_document_rejects_monolingual_template() {
        let mut s = failing_session();
        s.start_blank(true);
        let err = s.select_template("classic").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // Selection unchanged.
        assert!(TemplateRegistry::builtin().is_bilingual_capable(s.template_id()));
    }

    #[test]
    fn test_select_template_unknown_id_rejected() {
        let mut s = failing_session();
        let err = s.select_template("vaporware").unwrap_err();
        assert!(matches!(err, AppError::UnknownTemplate(_)));
        assert_eq!(s.template_id(), DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_edits_persist_document() {
        let gateway = StateGateway::in_memory();
        let mut s = BuilderSession::restore(
            gateway.clone(),
            TemplateRegistry::builtin(),
            Arc::new(FailingAssist),
        );
        s.start_blank(false);
        s.add_item(ListItem::Skill(Skill {
            id: "s1".to_string(),
            name: "Negotiation".to_string(),
            level: SkillLevel::Expert,
        }));

        assert_eq!(gateway.load_document().skills.len(), 1);
        s.remove_item(ListKind::Skills, "s1");
        assert!(gateway.load_document().skills.is_empty());
    }

    #[test]
    fn test_render_is_total_even_with_stale_template() {
        let mut s = failing_session();
        s.template_id = "retired".to_string(); // simulate a stale selection
        let tree = s.render();
        assert_eq!(tree.template_id, "retired");
    }

    #[test]
    fn test_reset_restores_defaults_and_clears_store() {
        let gateway = StateGateway::in_memory();
        let mut s = BuilderSession::restore(
            gateway.clone(),
            TemplateRegistry::builtin(),
            Arc::new(FailingAssist),
        );
        s.start_blank(true);
        s.goto_step(Step::Skills);
        s.reset();

        assert_eq!(s.view(), View::Landing);
        assert_eq!(s.step(), Step::first());
        assert_eq!(*s.document(), Resume::sample());
        assert_eq!(gateway.load_step(), Step::first());
        assert_eq!(gateway.load_document(), Resume::sample());
    }

    // ── assistant fallbacks ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_failed_optimize_leaves_document_unchanged() {
        let mut s = failing_session();
        s.start_sample();
        let before = s.document().clone();
        s.optimize("persona-1").await;
        assert_eq!(*s.document(), before);
        assert!(!s.is_busy());
    }

    #[tokio::test]
    async fn test_failed_refine_bullets_echoes_input() {
        let mut s = failing_session();
        let bullets = s.refine_bullets("Manager", "led a team").await;
        assert_eq!(bullets, vec!["led a team".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_chat_cover_letter_returns_current_text() {
        let mut s = failing_session();
        let text = s.chat_cover_letter("make it warmer", "Dear Sir").await;
        assert_eq!(text, "Dear Sir");
    }

    #[tokio::test]
    async fn test_failed_summarize_returns_empty_string() {
        let mut s = failing_session();
        let summary = s.summarize("Manager", &["Leadership".to_string()]).await;
        assert_eq!(summary, "");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_mime_before_any_call() {
        let mut s = failing_session();
        let before = s.document().clone();
        let err = s
            .import_upload(Bytes::from_static(b"GIF89a"), "image/gif")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(*s.document(), before);
    }

    #[tokio::test]
    async fn test_upload_extraction_failure_leaves_state_unchanged() {
        let mut s = failing_session();
        s.start_sample();
        let before = s.document().clone();
        let err = s
            .import_upload(Bytes::from_static(b"%PDF-1.7"), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert_eq!(*s.document(), before);
        assert!(!s.is_busy());
    }

    #[tokio::test]
    async fn test_upload_null_extraction_is_surfaced() {
        let mut s = session_with(Arc::new(ScriptedAssist));
        let err = s
            .import_upload(Bytes::new(), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_upload_success_replaces_document_wholesale() {
        let gateway = StateGateway::in_memory();
        let mut s = BuilderSession::restore(
            gateway.clone(),
            TemplateRegistry::builtin(),
            Arc::new(ScriptedAssist),
        );
        s.import_upload(Bytes::from_static(b"%PDF-1.7"), "application/pdf")
            .await
            .unwrap();

        assert_eq!(s.document().personal_info.first_name, "Imported");
        assert_eq!(gateway.load_document().personal_info.first_name, "Imported");
    }

    #[tokio::test]
    async fn test_successful_optimize_keeps_bilingual_flag() {
        let mut s = session_with(Arc::new(ScriptedAssist));
        s.start_blank(true);
        s.optimize("persona-1").await;
        assert_eq!(s.document().personal_info.summary, "Optimized.");
        assert!(s.document().is_bilingual);
    }

    #[tokio::test]
    async fn test_chat_cover_letter_updates_subtree_on_success() {
        use crate::models::CoverLetter;

        let mut s = session_with(Arc::new(ScriptedAssist));
        s.start_blank(false);
        s.replace_subtree(Subtree::CoverLetter(Some(CoverLetter {
            company: "Acme".to_string(),
            role: "PM".to_string(),
            content: String::new(),
        })));

        let text = s.chat_cover_letter("write an opener", "").await;
        assert_eq!(text, "Dear hiring team,");
        assert_eq!(
            s.document().cover_letter.as_ref().unwrap().content,
            "Dear hiring team,"
        );
    }

    #[tokio::test]
    async fn test_busy_guard_short_circuits_to_fallback() {
        let mut s = session_with(Arc::new(ScriptedAssist));
        s.force_busy();

        let bullets = s.refine_bullets("Manager", "led a team").await;
        assert_eq!(bullets, vec!["led a team".to_string()]);

        let summary = s.summarize("Manager", &[]).await;
        assert_eq!(summary, "");

        let before = s.document().clone();
        s.optimize("persona-1").await;
        assert_eq!(*s.document(), before);
        assert!(s.is_busy(), "guard must not clear a flag it did not set");
    }
}
