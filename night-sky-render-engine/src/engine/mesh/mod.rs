//! Mesh generation for the star field.

/// Per-star quad mesh with custom vertex attributes for GPU-side billboard expansion.
pub mod star_quad_mesh;
