//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! runtime sky settings and plugin initialisation for native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the star field material, catalog asset loading,
/// the sky rebuild pipeline, interaction tools and the host bridge.
pub mod app_setup;

/// Application state machine and loading progress transitions.
///
/// Moves from catalog loading through scene creation to runtime execution.
pub mod app_state;

/// Runtime sky tunables adjustable by the host.
pub mod sky_settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
