//! Pure sky model: catalog ingestion, observer and time inputs, the
//! equatorial to horizontal projection and the renderable sky buffer.
//!
//! Nothing in here touches the ECS. The engine wraps these types in
//! resources and calls into them from its systems and background tasks.

/// Validated star catalog shared read-only by every consumer.
pub mod catalog;

/// Moon phase and illumination estimate feeding the limiting magnitude.
pub mod moon;

/// Observer location on the WGS84 ellipsoid.
pub mod observer;

/// Equatorial to horizontal projection onto the sky dome.
pub mod projector;

/// Flat renderable buffer of visible stars.
pub mod sky_buffer;

/// Observation instants, sidereal time and the minute-of-day timeline.
pub mod time;
