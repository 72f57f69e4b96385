//! Runtime diagnostics and status reporting.

/// FPS notifications to the host page and the native FPS overlay.
pub mod fps_tracking;

/// Native overlay summarising observer, time, moonlight and visible stars.
pub mod sky_status;
