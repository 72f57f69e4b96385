//! Observer camera for the sky dome.
//!
//! Free look-around from the observer's eye point with smooth interpolation,
//! handing orientation over to the focus controller while a star is focused.

/// Sky camera resource, orientation helpers and controller system.
pub mod sky_camera;
