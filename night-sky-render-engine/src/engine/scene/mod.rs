//! Scene content: the ground occluder and the star field entity.

/// Opaque lower hemisphere hiding everything at or below the horizon.
pub mod ground;

/// Star field entity and its mesh refresh on every published buffer.
pub mod star_field;
