//! Startup loading: catalog asset ingestion and one-off scene construction.

/// Loading milestones consumed by the state transitions.
pub mod progress;

/// Ground occluder and star field entity creation.
pub mod scene_creator;
