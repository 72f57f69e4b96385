use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    AssetsLoaded,
    Running,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Loading => "loading",
            AppState::AssetsLoaded => "assets_loaded",
            AppState::Running => "running",
        }
    }
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct SkyStatusText;

// Transition to AssetsLoaded state
pub fn transition_to_assets_loaded(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.catalog_loaded && loading_progress.scene_created {
        println!("→ Transitioning to AssetsLoaded state");
        next_state.set(AppState::AssetsLoaded);
    }
}

// Final transition to running state
pub fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    println!("→ All systems ready, transitioning to Running state");
    next_state.set(AppState::Running);
}

/// Tell the host page which loading stage the engine is in.
pub fn update_loading_frontend(
    state: Res<State<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if state.is_changed() {
        rpc_interface.send_notification(
            "loading_state",
            serde_json::json!({ "state": state.get().as_str() }),
        );
    }
}
