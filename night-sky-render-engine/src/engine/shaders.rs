/// Star field material: screen-aligned glow quads with per-star alpha
use crate::engine::mesh::star_quad_mesh::{ATTRIBUTE_STAR_ALPHA, ATTRIBUTE_STAR_CORNER};
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    RenderPipelineDescriptor, SpecializedMeshPipelineError,
};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::path::STAR_FIELD_SHADER_PATH;
use constants::render_settings::{
    STAR_GLOW_FALLOFF, STAR_POINT_SIZE_MAX_PX, STAR_POINT_SIZE_MIN_PX,
};

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct StarFieldMaterial {
    /// x: quad size in px at alpha 1, y: quad size at alpha 0, z: glow falloff exponent.
    #[uniform(0)]
    pub settings: Vec4,
}

impl Default for StarFieldMaterial {
    fn default() -> Self {
        Self {
            settings: Vec4::new(
                STAR_POINT_SIZE_MAX_PX,
                STAR_POINT_SIZE_MIN_PX,
                STAR_GLOW_FALLOFF,
                0.0,
            ),
        }
    }
}

impl Material for StarFieldMaterial {
    fn vertex_shader() -> ShaderRef {
        STAR_FIELD_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        STAR_FIELD_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_STAR_CORNER.at_shader_location(1),
            ATTRIBUTE_STAR_ALPHA.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        // Quads face the camera by construction.
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
