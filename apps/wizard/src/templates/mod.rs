// Template projection: declarative descriptors interpreted by one generic
// renderer. Per-template code is a registry row of section placement and
// theme tokens; rendering logic exists exactly once.

pub mod descriptor;
pub mod registry;
pub mod renderer;

pub use descriptor::{Density, LayoutDescriptor, SectionKind, Theme};
pub use registry::{TemplateRegistry, DEFAULT_TEMPLATE};
pub use renderer::{render, Block, Language, Placement, Region, VisualTree};
