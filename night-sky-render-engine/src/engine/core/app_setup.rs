use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::path::CATALOG_FILE_EXTENSION;
use constants::render_settings::SKY_CLEAR_COLOUR;

use crate::engine::assets::catalog_asset::{
    CatalogLoader, StarCatalogFile, load_catalog_system, start_loading,
};
use crate::engine::camera::sky_camera::{SkyCamera, camera_controller};
use crate::engine::core::app_state::{
    AppState, FpsText, SkyStatusText, transition_to_assets_loaded, transition_to_running,
    update_loading_frontend,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::scene_creator::create_scene_when_ready;
use crate::engine::pipeline::{SkyPipelinePlugin, SkyPipelineSet};
use crate::engine::scene::star_field::update_star_field_mesh;
use crate::engine::shaders::StarFieldMaterial;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::focus::{FocusToolPlugin, advance_focus, apply_focus_commands};
use crate::tools::star_picking::handle_star_click;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{fps_tracking::fps_text_update_system, sky_status::sky_status_text_system};
#[cfg(not(target_arch = "wasm32"))]
use crate::tools::{focus::clear_focus_on_escape, time_scrub::time_scrub_keyboard};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MaterialPlugin::<StarFieldMaterial> {
            prepass_enabled: false,
            shadows_enabled: false,
            ..default()
        })
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the pre-processed catalog as a loadable JSON asset.
        .add_plugins(JsonAssetPlugin::<StarCatalogFile>::new(&[CATALOG_FILE_EXTENSION]))
        .add_plugins(SkyPipelinePlugin)
        .add_plugins(FocusToolPlugin)
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(SKY_CLEAR_COLOUR));

    app.init_resource::<LoadingProgress>()
        .init_resource::<CatalogLoader>()
        .init_resource::<SkyCamera>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                load_catalog_system,
                create_scene_when_ready,
                transition_to_assets_loaded,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::AssetsLoaded)),
        )
        .add_systems(Update, update_loading_frontend);

    // The star field follows published buffers from the moment it exists.
    app.add_systems(Update, update_star_field_mesh.after(SkyPipelineSet));

    app.add_systems(
        Update,
        (
            handle_star_click.before(apply_focus_commands),
            camera_controller.after(advance_focus),
            fps_notification_system,
        )
            .run_if(in_state(AppState::Running)),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            (
                fps_text_update_system,
                sky_status_text_system.after(SkyPipelineSet),
            ),
        );
        app.add_systems(
            Update,
            (
                time_scrub_keyboard.before(SkyPipelineSet),
                clear_focus_on_escape.before(apply_focus_commands),
            )
                .run_if(in_state(AppState::Running)),
        );
    }

    app
}

#[allow(unused_mut, unused_variables)]
fn setup(mut commands: Commands) {
    println!("=== NIGHT SKY RENDERER ===");

    // The host page draws its own UI in the browser build.
    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.95)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                SkyStatusText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
