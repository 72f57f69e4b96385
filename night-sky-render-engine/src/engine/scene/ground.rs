use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::{GROUND_COLOUR, GROUND_RADIUS, GROUND_RINGS, GROUND_SEGMENTS};
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Component)]
pub struct Ground;

pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let ground_material = materials.add(StandardMaterial {
        base_color: GROUND_COLOUR,
        unlit: true,
        // Seen from inside.
        cull_mode: None,
        double_sided: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(create_ground_hemisphere_mesh(
            GROUND_RADIUS,
            GROUND_SEGMENTS,
            GROUND_RINGS,
        ))),
        MeshMaterial3d(ground_material),
        Transform::IDENTITY,
        Ground,
    ));
}

/// Lower hemisphere from the horizon ring (y = 0) down to the nadir.
pub fn create_ground_hemisphere_mesh(radius: f32, segments: u32, rings: u32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(1);
    let row = segments + 1;

    let mut positions = Vec::with_capacity((row * (rings + 1)) as usize);
    let mut normals = Vec::with_capacity(positions.capacity());
    let mut uvs = Vec::with_capacity(positions.capacity());

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let (sin_depth, cos_depth) = (v * FRAC_PI_2).sin_cos();
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let (sin_az, cos_az) = (u * TAU).sin_cos();
            let point = Vec3::new(
                radius * cos_depth * cos_az,
                -radius * sin_depth,
                radius * cos_depth * sin_az,
            );
            positions.push(point.to_array());
            // Inward, towards the observer.
            normals.push((-point / radius).to_array());
            uvs.push([u, v]);
        }
    }

    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * row + segment;
            let b = a + row;
            indices.extend([a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}
