pub mod catalog;
pub mod clock;
pub mod compose;
pub mod render;
pub mod types;

pub use catalog::{CatalogError, CatalogName, TaskCatalog};
pub use clock::ClockError;
pub use render::{RenderError, Report, ReportFormat};
pub use types::*;
