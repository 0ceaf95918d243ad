//! Core engine for the resume-building wizard: the canonical document
//! model, the step state machine, durable-state persistence, template
//! projection, and the assistant-service boundary. The visual layer and
//! the assistant backend consume this crate; neither lives here.

pub mod assist;
pub mod config;
pub mod document;
pub mod errors;
pub mod models;
pub mod session;
pub mod steps;
pub mod storage;
pub mod telemetry;
pub mod templates;

pub use assist::{AssistGateway, HttpAssistGateway};
pub use config::Config;
pub use errors::AppError;
pub use models::Resume;
pub use session::{BuilderSession, View};
pub use steps::{Step, StepController};
pub use storage::{FileStore, KvStore, MemoryStore, StateGateway};
pub use templates::{Language, TemplateRegistry, VisualTree, DEFAULT_TEMPLATE};
