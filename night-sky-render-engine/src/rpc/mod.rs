//! JSON-RPC 2.0 bridge between the engine and the host page.
//!
//! In the browser build the engine runs in an iframe and talks to its parent
//! through `postMessage`. Native builds compile the same handlers but never
//! receive messages.
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Engine (iframe)
//!        ├─ Request (with id) ──────────────> │ handled in Update
//!        │ <───────────────── Response (id) ──┤
//!        │ <──────── Notification (no id) ────┤ flushed in PostUpdate
//! ```
//!
//! ## Methods
//!
//! ### Observation
//! - `set_observer` `{lat, lng}`: latitude in [-90, 90]; longitude is wrapped.
//! - `set_observation_time` `{time}` (RFC 3339) or `{unix_ms}`, optional `utc_offset_minutes`.
//!   The slider switches to the given offset, else to the one written in `time`.
//! - `set_observation_minute` `{minute, utc_offset_minutes?}`: local minute of the slider
//!   day, clamped to 0..=1439.
//! - `advance_observation_date` `{days}`: moves the slider date, keeps the minute.
//!   `-32602` when the date would leave the calendar.
//! - `set_moon_illumination` `{fraction}`: override in [0, 1], `null` returns to the estimate.
//!
//! ### Focus
//! - `select_star` `{id}`: error `-32000` with `reason` `not_visible` or `unknown_star`.
//! - `clear_focus`
//!
//! ### Queries
//! - `get_visible_star_ids`, `get_star_info` `{id}`, `get_sky_conditions`, `get_fps`
//!
//! ### Settings
//! - `set_sky_settings`: partial update of the runtime tunables; unknown keys are rejected.
//!
//! ## Notifications
//!
//! `loading_state`, `fps_update`, `star_selected`, `focus_rejected`, `sky_rebuilt`.
//!
//! ## Error codes
//!
//! - `-32700`: Parse error
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000`: Star unavailable

pub mod notifications;
pub mod web_rpc;
