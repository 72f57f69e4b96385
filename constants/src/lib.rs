//! Shared tunables for the catalog pre-processor and the night sky engine.

pub mod coordinate_system;
pub mod path;
pub mod render_settings;
pub mod sky;
