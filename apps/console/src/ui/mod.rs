//! UI layer: the page model, element identifiers and per-feature view-models.

pub mod features;
pub mod ids;
pub mod page;

pub use features::Views;
pub use page::Page;
