//! Engine events forwarded to the host page as JSON-RPC notifications.

use crate::engine::pipeline::rebuild::SkyBufferPublished;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::focus::{FocusRejected, StarSelected};
use bevy::prelude::*;
use serde_json::json;

/// `star_selected` with the focused id, or `null` when focus is released.
pub fn notify_star_selected(
    mut events: EventReader<StarSelected>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        rpc_interface.send_notification("star_selected", json!({ "id": event.id }));
    }
}

pub fn notify_focus_rejected(
    mut events: EventReader<FocusRejected>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        rpc_interface.send_notification(
            "focus_rejected",
            json!({
                "id": event.error.id(),
                "reason": event.error.reason(),
                "message": event.error.to_string(),
            }),
        );
    }
}

pub fn notify_sky_rebuilt(
    mut events: EventReader<SkyBufferPublished>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    // Only the newest buffer matters to the host.
    if let Some(event) = events.read().last() {
        rpc_interface.send_notification(
            "sky_rebuilt",
            json!({
                "generation": event.generation,
                "visible_count": event.visible_count,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::focus::FocusError;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .add_event::<StarSelected>()
            .add_event::<FocusRejected>()
            .add_event::<SkyBufferPublished>()
            .add_systems(
                Update,
                (notify_star_selected, notify_focus_rejected, notify_sky_rebuilt),
            );
        app
    }

    #[test]
    fn focus_events_become_notifications() {
        let mut app = app();
        app.world_mut().send_event(StarSelected {
            id: Some("32349".into()),
        });
        app.world_mut().send_event(FocusRejected {
            error: FocusError::NotVisible { id: "7588".into() },
        });
        app.update();

        let rpc = app.world().resource::<WebRpcInterface>();
        let methods: Vec<_> = rpc
            .pending_notifications()
            .iter()
            .map(|n| n.method.as_str())
            .collect();
        assert!(methods.contains(&"star_selected"));
        assert!(methods.contains(&"focus_rejected"));

        let rejected = rpc
            .pending_notifications()
            .iter()
            .find(|n| n.method == "focus_rejected")
            .unwrap();
        assert_eq!(rejected.params["reason"], "not_visible");
    }

    #[test]
    fn only_latest_rebuild_is_reported() {
        let mut app = app();
        app.world_mut().send_event(SkyBufferPublished {
            generation: 1,
            visible_count: 3,
        });
        app.world_mut().send_event(SkyBufferPublished {
            generation: 2,
            visible_count: 5,
        });
        app.update();

        let rpc = app.world().resource::<WebRpcInterface>();
        let rebuilt: Vec<_> = rpc
            .pending_notifications()
            .iter()
            .filter(|n| n.method == "sky_rebuilt")
            .collect();
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt[0].params["generation"], 2);
    }
}
