use bevy::prelude::*;

use crate::engine::camera::sky_camera::{SkyCamera, spawn_sky_camera};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::ground::spawn_ground;
use crate::engine::scene::star_field::spawn_star_field;
use crate::engine::shaders::StarFieldMaterial;

/// Build the static scene once the catalog is in. The star field starts empty
/// and fills in when the first buffer is published.
pub fn create_scene_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut star_materials: ResMut<Assets<StarFieldMaterial>>,
    sky_camera: Res<SkyCamera>,
) {
    if loading_progress.scene_created || !loading_progress.catalog_loaded {
        return;
    }

    spawn_ground(&mut commands, &mut meshes, &mut standard_materials);
    spawn_star_field(&mut commands, &mut meshes, &mut star_materials);
    spawn_sky_camera(&mut commands, &sky_camera);

    loading_progress.scene_created = true;
    println!("Sky scene ready");
}
