//! Bridge between the controller's command queue and the async HTTP client.

pub mod commands;
pub mod runtime;
