use crate::engine::mesh::star_quad_mesh::create_star_quad_mesh;
use crate::engine::pipeline::rebuild::PublishedSkyBuffer;
use crate::engine::shaders::StarFieldMaterial;
use crate::sky::sky_buffer::SkyBuffer;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;

#[derive(Component)]
pub struct StarField;

pub fn spawn_star_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StarFieldMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(create_star_quad_mesh(&SkyBuffer::default()))),
        MeshMaterial3d(materials.add(StarFieldMaterial::default())),
        Transform::IDENTITY,
        // Hidden until a non-empty buffer is published.
        Visibility::Hidden,
        StarField,
        // Quads grow in screen space beyond the mesh bounds.
        NoFrustumCulling,
    ));
}

/// Swap in a fresh mesh whenever the published generation moves on. Buffers
/// published before the star field exists are picked up once it is spawned.
pub fn update_star_field_mesh(
    published: Res<PublishedSkyBuffer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut star_fields: Query<(&mut Mesh3d, &mut Visibility), With<StarField>>,
    mut applied_generation: Local<Option<u64>>,
) {
    if *applied_generation == Some(published.generation()) || star_fields.is_empty() {
        return;
    }

    let buffer = published.buffer();
    for (mut mesh, mut visibility) in &mut star_fields {
        mesh.0 = meshes.add(create_star_quad_mesh(buffer));
        *visibility = if buffer.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
    *applied_generation = Some(published.generation());
}
