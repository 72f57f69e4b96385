use crate::engine::core::app_state::SkyStatusText;
use crate::engine::core::sky_settings::SkySettings;
use crate::engine::pipeline::rebuild::PublishedSkyBuffer;
use crate::engine::pipeline::sky_context::{ObservationTimeline, SkyContext};
use crate::sky::time::SkyTimeline;
use crate::tools::focus::FocusController;
use bevy::prelude::*;

/// Multi-line summary shown in the native overlay.
pub fn sky_status_lines(
    sky_context: &SkyContext,
    timeline: &SkyTimeline,
    settings: &SkySettings,
    visible_count: usize,
    focus_target: Option<&str>,
) -> String {
    let observer = match sky_context.observer() {
        Some(o) => format!("Observer: {:.2}°, {:.2}°", o.lat(), o.lng()),
        None => "Observer: not set".to_string(),
    };

    let minute = timeline.minute_of_day();
    let time = format!(
        "{} {:02}:{:02} (UTC{:+})",
        timeline.weekday_label(),
        minute / 60,
        minute % 60,
        timeline.utc_offset_minutes() as f32 / 60.0
    );

    let moon = match sky_context.moon_conditions() {
        Some(m) if sky_context.moon_override().is_none() => {
            format!("Moon: {} ({:.0}%)", m.phase_name, m.illumination * 100.0)
        }
        _ => format!("Moon: {:.0}%", sky_context.moon_illumination() * 100.0),
    };

    let limit = sky_context.build_parameters(settings).limiting_magnitude();
    let stars = format!("Stars: {visible_count} (limit {limit:.1})");

    let mut lines = vec![observer, time, moon, stars];
    if let Some(id) = focus_target {
        lines.push(format!("Focus: {id}"));
    }
    lines.join("\n")
}

pub fn sky_status_text_system(
    sky_context: Res<SkyContext>,
    timeline: Res<ObservationTimeline>,
    settings: Res<SkySettings>,
    published: Res<PublishedSkyBuffer>,
    focus: Res<FocusController>,
    mut query: Query<&mut Text, With<SkyStatusText>>,
) {
    let status = sky_status_lines(
        &sky_context,
        &timeline.0,
        &settings,
        published.buffer().len(),
        focus.target_id(),
    );
    for mut text in &mut query {
        if text.0 != status {
            text.0.clone_from(&status);
        }
    }
}
