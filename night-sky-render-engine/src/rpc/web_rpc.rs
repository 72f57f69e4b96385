use crate::engine::core::sky_settings::{SkySettings, SkySettingsPatch};
use crate::engine::pipeline::SkyPipelineSet;
use crate::engine::pipeline::rebuild::PublishedSkyBuffer;
use crate::engine::pipeline::sky_context::{ObservationTimeline, SkyCatalog, SkyContext};
use crate::rpc::notifications::{notify_focus_rejected, notify_sky_rebuilt, notify_star_selected};
use crate::sky::catalog::StarCatalog;
use crate::sky::observer::Observer;
use crate::sky::projector::{Projector, SkyProjection};
use crate::sky::sky_buffer::SkyBuffer;
use crate::sky::time::{ObservationTime, SkyTimeline};
use crate::tools::focus::{FocusCommand, FocusController, FocusError};
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Outgoing traffic to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .before(SkyPipelineSet),
            )
            .add_systems(
                PostUpdate,
                (
                    notify_star_selected,
                    notify_focus_rejected,
                    notify_sky_rebuilt,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available"),
    }

    // Ownership moves to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Engine state the RPC methods read and write.
#[derive(SystemParam)]
pub struct SkyRpcState<'w> {
    sky_context: ResMut<'w, SkyContext>,
    timeline: ResMut<'w, ObservationTimeline>,
    settings: ResMut<'w, SkySettings>,
    sky_catalog: Res<'w, SkyCatalog>,
    published: Res<'w, PublishedSkyBuffer>,
    focus: Res<'w, FocusController>,
    diagnostics: Res<'w, DiagnosticsStore>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut state: SkyRpcState,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut focus_events: EventWriter<FocusCommand>,
) {
    let mut focus_commands = Vec::new();

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) =
                    handle_rpc_request(&request, &mut state, &mut focus_commands)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    Value::Null,
                    -32700,
                    "Parse error",
                    Some(json!({ "detail": parse_error.to_string() })),
                ));
            }
        }
    }

    focus_events.write_batch(focus_commands);
}

/// Run one request. Notifications (no id) are executed but never answered.
fn handle_rpc_request(
    request: &RpcRequest,
    state: &mut SkyRpcState,
    focus_commands: &mut Vec<FocusCommand>,
) -> Option<RpcResponse> {
    let params = &request.params;

    let result = match request.method.as_str() {
        "set_observer" => handle_set_observer(params, &mut state.sky_context),
        "set_observation_time" => handle_set_observation_time(
            params,
            &mut state.sky_context,
            // The exact instant goes straight to the context; the slider only follows it.
            &mut state.timeline.bypass_change_detection().0,
        ),
        "set_observation_minute" => handle_set_observation_minute(params, &mut state.timeline.0),
        "advance_observation_date" => {
            handle_advance_observation_date(params, &mut state.timeline.0)
        }
        "set_moon_illumination" => handle_set_moon_illumination(params, &mut state.sky_context),
        "select_star" => handle_select_star(
            params,
            state.published.buffer(),
            state.sky_catalog.get(),
            focus_commands,
        ),
        "clear_focus" => handle_clear_focus(focus_commands),
        "get_visible_star_ids" => handle_get_visible_star_ids(&state.published),
        "get_star_info" => handle_get_star_info(
            params,
            state.sky_catalog.get(),
            state.published.buffer(),
            &state.sky_context,
            &state.settings,
        ),
        "get_sky_conditions" => Ok(sky_conditions(
            &state.sky_context,
            &state.timeline.0,
            &state.settings,
            &state.published,
            &state.focus,
        )),
        "set_sky_settings" => patched_settings(params, &state.settings).and_then(|updated| {
            state.settings.set_if_neq(updated);
            serde_json::to_value(updated).map_err(|e| RpcError::internal_error(&e.to_string()))
        }),
        "get_fps" => handle_get_fps(&state.diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(json!({ "method": request.method })),
            })
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn parse_params<'de, T: Deserialize<'de>>(params: &'de Value, expected: &str) -> Result<T, RpcError> {
    T::deserialize(params).map_err(|e| RpcError::invalid_params(&format!("{expected}: {e}")))
}

fn handle_set_observer(params: &Value, sky_context: &mut SkyContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct ObserverParams {
        lat: f64,
        lng: f64,
    }

    let p: ObserverParams = parse_params(params, "Expected 'lat' and 'lng'")?;
    let observer =
        Observer::new(p.lat, p.lng).map_err(|e| RpcError::invalid_params(&e.to_string()))?;
    sky_context.set_observer(observer);
    info!("Observer set to {:.4}, {:.4}", observer.lat(), observer.lng());

    Ok(json!({ "lat": observer.lat(), "lng": observer.lng() }))
}

fn handle_set_observation_time(
    params: &Value,
    sky_context: &mut SkyContext,
    timeline: &mut SkyTimeline,
) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct TimeParams {
        time: Option<String>,
        unix_ms: Option<i64>,
        utc_offset_minutes: Option<i32>,
    }

    let p: TimeParams = parse_params(params, "Expected 'time' or 'unix_ms'")?;
    let explicit_offset = p.utc_offset_minutes.map(offset_from_minutes).transpose()?;
    let (time, written_offset) = match (p.time, p.unix_ms) {
        (Some(text), None) => ObservationTime::parse_rfc3339(&text)
            .map(|(time, offset)| (time, Some(offset)))
            .map_err(|e| RpcError::invalid_params(&format!("Invalid RFC 3339 time: {e}")))?,
        (None, Some(millis)) => ObservationTime::from_unix_millis(millis)
            .map(|time| (time, None))
            .ok_or_else(|| RpcError::invalid_params("unix_ms out of range"))?,
        _ => return Err(RpcError::invalid_params("Expected exactly one of 'time' or 'unix_ms'")),
    };

    // The slider reads local wall-clock time in the zone the host wrote the instant in.
    let offset = explicit_offset
        .or(written_offset)
        .unwrap_or(timeline.offset());
    sky_context.set_time(time);
    *timeline = SkyTimeline::at_instant(time.instant(), offset);

    Ok(json!({
        "time": time.instant().to_rfc3339(),
        "timeline": timeline_json(timeline),
    }))
}

fn handle_set_observation_minute(
    params: &Value,
    timeline: &mut SkyTimeline,
) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct MinuteParams {
        minute: i64,
        utc_offset_minutes: Option<i32>,
    }

    let p: MinuteParams = parse_params(params, "Expected 'minute'")?;
    if let Some(minutes) = p.utc_offset_minutes {
        timeline.set_offset(offset_from_minutes(minutes)?);
    }
    timeline.set_minute(p.minute);
    Ok(timeline_json(timeline))
}

fn handle_advance_observation_date(
    params: &Value,
    timeline: &mut SkyTimeline,
) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct DaysParams {
        days: i64,
    }

    let p: DaysParams = parse_params(params, "Expected 'days'")?;
    if !timeline.advance_days(p.days) {
        return Err(RpcError::invalid_params(&format!(
            "Moving {} days leaves the supported calendar",
            p.days
        )));
    }
    Ok(timeline_json(timeline))
}

fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, RpcError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| RpcError::invalid_params("utc_offset_minutes must be within ±24 hours"))
}

fn handle_set_moon_illumination(
    params: &Value,
    sky_context: &mut SkyContext,
) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct MoonParams {
        fraction: Option<f64>,
    }

    let p: MoonParams = parse_params(params, "Expected 'fraction' (number or null)")?;
    if matches!(p.fraction, Some(f) if !f.is_finite()) {
        return Err(RpcError::invalid_params("fraction must be finite"));
    }
    sky_context.set_moon_override(p.fraction);

    Ok(json!({ "moon_illumination": sky_context.moon_illumination() }))
}

/// Checks visibility against the current buffer so the caller gets an
/// immediate answer; the focus controller checks again when it applies.
fn handle_select_star(
    params: &Value,
    buffer: &SkyBuffer,
    catalog: &StarCatalog,
    focus_commands: &mut Vec<FocusCommand>,
) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct SelectParams {
        id: String,
    }

    let p: SelectParams = parse_params(params, "Expected 'id'")?;
    if !buffer.contains(&p.id) {
        let error = if catalog.contains(&p.id) {
            FocusError::NotVisible { id: p.id }
        } else {
            FocusError::UnknownStar { id: p.id }
        };
        return Err(RpcError::star_unavailable(&error));
    }

    let result = json!({ "selected": p.id });
    focus_commands.push(FocusCommand::Select { id: p.id });
    Ok(result)
}

fn handle_clear_focus(focus_commands: &mut Vec<FocusCommand>) -> Result<Value, RpcError> {
    focus_commands.push(FocusCommand::Clear);
    Ok(json!({ "success": true }))
}

fn handle_get_visible_star_ids(published: &PublishedSkyBuffer) -> Result<Value, RpcError> {
    Ok(json!({
        "generation": published.generation(),
        "ids": published.buffer().visible_star_ids(),
    }))
}

fn handle_get_star_info(
    params: &Value,
    catalog: &StarCatalog,
    buffer: &SkyBuffer,
    sky_context: &SkyContext,
    settings: &SkySettings,
) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct StarParams {
        id: String,
    }

    let p: StarParams = parse_params(params, "Expected 'id'")?;
    let star = catalog
        .get(&p.id)
        .ok_or_else(|| RpcError::star_unavailable(&FocusError::UnknownStar { id: p.id.clone() }))?;

    let parameters = sky_context.build_parameters(settings);
    let horizontal = Projector::new(
        &parameters.projection,
        parameters.dome_radius,
        parameters.limiting_magnitude(),
    )
    .map(|projector| {
        let h = projector.horizontal(star);
        json!({
            "altitude_degrees": h.altitude.to_degrees(),
            "azimuth_degrees": h.azimuth.to_degrees(),
        })
    });

    let slot = buffer.slot_of(&p.id);
    Ok(json!({
        "id": &*star.id,
        "name": star.name.as_deref(),
        "ra_hours": star.ra_hours,
        "dec_degrees": star.dec_degrees,
        "mag": star.mag,
        "visible": slot.is_some(),
        "alpha": slot.and_then(|s| buffer.alpha(s)),
        "horizontal": horizontal,
    }))
}

/// Snapshot of everything that shapes the current sky.
pub fn sky_conditions(
    sky_context: &SkyContext,
    timeline: &SkyTimeline,
    settings: &SkySettings,
    published: &PublishedSkyBuffer,
    focus: &FocusController,
) -> Value {
    let parameters = sky_context.build_parameters(settings);
    let projection = match parameters.projection {
        SkyProjection::Unset => "unset",
        SkyProjection::FixedEpoch => "fixed_epoch",
        SkyProjection::Observed { .. } => "observed",
    };

    json!({
        "projection": projection,
        "observer": sky_context.observer(),
        "time": sky_context.time().map(|t| t.instant().to_rfc3339()),
        "timeline": timeline_json(timeline),
        "moon": sky_context.moon_conditions(),
        "moon_override": sky_context.moon_override(),
        "moon_illumination": parameters.moon_illumination,
        "limiting_magnitude": parameters.limiting_magnitude(),
        "visible_count": published.buffer().len(),
        "generation": published.generation(),
        "focus": {
            "phase": focus.phase(),
            "target": focus.target_id(),
        },
        "settings": settings,
    })
}

fn timeline_json(timeline: &SkyTimeline) -> Value {
    json!({
        "date": timeline.date().format("%Y-%m-%d").to_string(),
        "minute_of_day": timeline.minute_of_day(),
        "utc_offset_minutes": timeline.utc_offset_minutes(),
        "label": timeline.weekday_label(),
    })
}

/// Settings with the patch applied. The caller stores them only if they differ.
fn patched_settings(params: &Value, current: &SkySettings) -> Result<SkySettings, RpcError> {
    let patch: SkySettingsPatch = parse_params(params, "Invalid settings patch")?;
    let mut updated = *current;
    updated
        .apply(&patch)
        .map_err(|message| RpcError::invalid_params(&message))?;
    Ok(updated)
}

fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(json!({ "fps": fps }))
}

fn create_error_response(id: Value, code: i32, message: &str, data: Option<Value>) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Notifications go out before responses so the host sees state changes first.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }

    /// Application error for a star that cannot be focused or looked up.
    pub fn star_unavailable(error: &FocusError) -> Self {
        Self {
            code: -32000,
            message: error.to_string(),
            data: Some(json!({ "id": error.id(), "reason": error.reason() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::catalog::CatalogRecord;
    use crate::sky::sky_buffer::{BuildParameters, build_sky_buffer};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn fixture() -> (StarCatalog, SkyBuffer) {
        let catalog = StarCatalog::from_records(vec![
            CatalogRecord::new("up", 2.0, 45.0, 1.0),
            CatalogRecord::new("down", 2.0, -45.0, 1.0),
        ]);
        let buffer = build_sky_buffer(
            &catalog,
            &BuildParameters {
                projection: SkyProjection::FixedEpoch,
                moon_illumination: 0.0,
                base_limiting_magnitude: 5.5,
                dome_radius: 100.0,
            },
        );
        (catalog, buffer)
    }

    fn timeline() -> SkyTimeline {
        SkyTimeline::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            FixedOffset::east_opt(3600).unwrap(),
            0,
        )
    }

    #[test]
    fn select_visible_star_queues_focus() {
        let (catalog, buffer) = fixture();
        let mut commands = Vec::new();
        let result = handle_select_star(&json!({ "id": "up" }), &buffer, &catalog, &mut commands);
        assert!(result.is_ok());
        assert_eq!(commands, vec![FocusCommand::Select { id: "up".into() }]);
    }

    #[test]
    fn select_invisible_star_is_an_application_error() {
        let (catalog, buffer) = fixture();
        let mut commands = Vec::new();

        let error = handle_select_star(&json!({ "id": "down" }), &buffer, &catalog, &mut commands)
            .unwrap_err();
        assert_eq!(error.code, -32000);
        assert_eq!(error.data.unwrap()["reason"], "not_visible");

        let error = handle_select_star(&json!({ "id": "ghost" }), &buffer, &catalog, &mut commands)
            .unwrap_err();
        assert_eq!(error.data.unwrap()["reason"], "unknown_star");
        assert!(commands.is_empty());
    }

    #[test]
    fn observer_is_validated() {
        let mut context = SkyContext::default();
        let error = handle_set_observer(&json!({ "lat": 91.0, "lng": 0.0 }), &mut context)
            .unwrap_err();
        assert_eq!(error.code, -32602);
        assert!(context.observer().is_none());

        let result = handle_set_observer(&json!({ "lat": 51.5, "lng": 359.9 }), &mut context)
            .unwrap();
        assert!((result["lng"].as_f64().unwrap() + 0.1).abs() < 1e-9);
    }

    #[test]
    fn observation_time_moves_the_slider() {
        let mut context = SkyContext::default();
        let mut timeline = timeline();
        handle_set_observation_time(
            &json!({ "unix_ms": 1_706_819_415_000_i64 }),
            &mut context,
            &mut timeline,
        )
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 2, 1, 20, 30, 15).unwrap();
        assert_eq!(context.time().unwrap().instant(), expected);
        // No zone given, so the slider stays on UTC+1: 21:30 local.
        assert_eq!(timeline.minute_of_day(), 21 * 60 + 30);
        assert_eq!(timeline.date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn observation_time_adopts_the_written_offset() {
        let mut context = SkyContext::default();
        let mut timeline = timeline();
        let result = handle_set_observation_time(
            &json!({ "time": "2024-01-15T22:00:00+09:00" }),
            &mut context,
            &mut timeline,
        )
        .unwrap();

        assert_eq!(
            context.time().unwrap().instant(),
            Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap()
        );
        assert_eq!(timeline.minute_of_day(), 22 * 60);
        assert_eq!(timeline.utc_offset_minutes(), 540);
        assert_eq!(result["timeline"]["utc_offset_minutes"], 540);

        // Minutes now move along Tokyo wall-clock time.
        handle_set_observation_minute(&json!({ "minute": 1320 }), &mut timeline).unwrap();
        assert_eq!(
            timeline.observation_time().instant(),
            Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn explicit_offset_overrides_the_slider_zone() {
        let mut timeline = timeline();
        let result = handle_set_observation_minute(
            &json!({ "minute": 1320, "utc_offset_minutes": -300 }),
            &mut timeline,
        )
        .unwrap();
        assert_eq!(result["utc_offset_minutes"], -300);
        assert_eq!(
            timeline.observation_time().instant(),
            Utc.with_ymd_and_hms(2024, 1, 15, 3, 0, 0).unwrap()
        );

        let error = handle_set_observation_minute(
            &json!({ "minute": 0, "utc_offset_minutes": 100_000 }),
            &mut timeline,
        )
        .unwrap_err();
        assert_eq!(error.code, -32602);
    }

    #[test]
    fn out_of_range_date_step_is_rejected() {
        let mut timeline = timeline();
        let error = handle_advance_observation_date(
            &json!({ "days": 200_000_000_000_000_i64 }),
            &mut timeline,
        )
        .unwrap_err();
        assert_eq!(error.code, -32602);
        assert_eq!(timeline.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let result = handle_advance_observation_date(&json!({ "days": -1 }), &mut timeline).unwrap();
        assert_eq!(result["date"], "2024-01-14");
    }

    #[test]
    fn observation_time_needs_exactly_one_form() {
        let mut context = SkyContext::default();
        let mut timeline = timeline();
        assert!(handle_set_observation_time(&json!({}), &mut context, &mut timeline).is_err());
        assert!(
            handle_set_observation_time(
                &json!({ "time": "2024-02-01T00:00:00Z", "unix_ms": 0 }),
                &mut context,
                &mut timeline,
            )
            .is_err()
        );
    }

    #[test]
    fn minute_is_clamped_to_the_day() {
        let mut timeline = timeline();
        let result = handle_set_observation_minute(&json!({ "minute": 5000 }), &mut timeline)
            .unwrap();
        assert_eq!(result["minute_of_day"], 1439);
    }

    #[test]
    fn moon_override_can_be_cleared() {
        let mut context = SkyContext::default();
        let result =
            handle_set_moon_illumination(&json!({ "fraction": 1.5 }), &mut context).unwrap();
        assert_eq!(result["moon_illumination"], 1.0);

        handle_set_moon_illumination(&json!({ "fraction": null }), &mut context).unwrap();
        assert_eq!(context.moon_override(), None);
    }

    #[test]
    fn star_info_reports_visibility() {
        let (catalog, buffer) = fixture();
        let context = SkyContext::default();
        let settings = SkySettings::default();

        let info =
            handle_get_star_info(&json!({ "id": "down" }), &catalog, &buffer, &context, &settings)
                .unwrap();
        assert_eq!(info["visible"], false);
        let altitude = info["horizontal"]["altitude_degrees"].as_f64().unwrap();
        assert!((altitude + 45.0).abs() < 1e-9);
    }

    #[test]
    fn bad_settings_patch_is_rejected() {
        let settings = SkySettings::default();
        assert!(patched_settings(&json!({ "dome_radius": -1.0 }), &settings).is_err());
        assert!(patched_settings(&json!({ "dome_radius": 5000.0 }), &settings).is_err());
        assert!(patched_settings(&json!({ "colour": "red" }), &settings).is_err());

        let updated =
            patched_settings(&json!({ "base_limiting_magnitude": 4.0 }), &settings).unwrap();
        assert_eq!(updated.base_limiting_magnitude, 4.0);
        assert_eq!(updated.dome_radius, settings.dome_radius);
    }

    #[test]
    fn conditions_describe_an_unset_sky() {
        let context = SkyContext::default();
        let settings = SkySettings {
            fixed_epoch_fallback: false,
            ..default()
        };
        let value = sky_conditions(
            &context,
            &timeline(),
            &settings,
            &PublishedSkyBuffer::default(),
            &FocusController::default(),
        );
        assert_eq!(value["projection"], "unset");
        assert_eq!(value["visible_count"], 0);
        assert_eq!(value["focus"]["phase"], "idle");
    }
}
