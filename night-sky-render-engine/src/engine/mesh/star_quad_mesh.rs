use crate::sky::sky_buffer::SkyBuffer;
use bevy::prelude::*;
use bevy::render::mesh::{MeshVertexAttribute, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::VertexFormat;

/// Quad corner in [-1, 1]², expanded to screen space in the vertex shader.
pub const ATTRIBUTE_STAR_CORNER: MeshVertexAttribute =
    MeshVertexAttribute::new("StarCorner", 988_540_917, VertexFormat::Float32x2);

pub const ATTRIBUTE_STAR_ALPHA: MeshVertexAttribute =
    MeshVertexAttribute::new("StarAlpha", 988_540_918, VertexFormat::Float32);

/// Two triangles per star.
pub const VERTICES_PER_STAR: usize = 6;

const QUAD_CORNERS: [[f32; 2]; VERTICES_PER_STAR] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Build the star field mesh for a published buffer.
/// Every vertex of a quad carries the star's dome position and alpha.
pub fn create_star_quad_mesh(buffer: &SkyBuffer) -> Mesh {
    let vertex_count = buffer.len() * VERTICES_PER_STAR;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut alphas = Vec::with_capacity(vertex_count);

    for (centre, &alpha) in buffer.positions().chunks_exact(3).zip(buffer.alphas()) {
        let centre = [centre[0], centre[1], centre[2]];
        for corner in QUAD_CORNERS {
            positions.push(centre);
            corners.push(corner);
            alphas.push(alpha);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(ATTRIBUTE_STAR_CORNER, corners)
    .with_inserted_attribute(ATTRIBUTE_STAR_ALPHA, alphas)
}
