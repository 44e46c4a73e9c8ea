//! Typed view layer: an escaped HTML node tree and the renderers for each feature.

pub mod html;
pub mod render;

pub use html::{Element, Fragment, Node};
