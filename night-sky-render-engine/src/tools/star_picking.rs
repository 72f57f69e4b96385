use crate::engine::camera::sky_camera::SkyViewCamera;
use crate::engine::core::sky_settings::SkySettings;
use crate::engine::pipeline::rebuild::PublishedSkyBuffer;
use crate::sky::sky_buffer::SkyBuffer;
use crate::tools::focus::FocusCommand;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::CLICK_DRAG_THRESHOLD_PX;
use std::f32::consts::PI;

/// Slot of the star closest in angle to the ray, within `max_angle` radians.
/// Exact ties go to the lowest slot.
pub fn pick_star(
    buffer: &SkyBuffer,
    ray_origin: Vec3,
    ray_direction: Vec3,
    max_angle: f32,
) -> Option<usize> {
    let direction = ray_direction.try_normalize()?;
    let min_cos = max_angle.clamp(0.0, PI).cos();

    let mut best: Option<(usize, f32)> = None;
    for (slot, p) in buffer.positions().chunks_exact(3).enumerate() {
        let Some(to_star) = (Vec3::new(p[0], p[1], p[2]) - ray_origin).try_normalize() else {
            continue;
        };
        let cos = to_star.dot(direction);
        if cos < min_cos {
            continue;
        }
        if best.is_none_or(|(_, best_cos)| cos > best_cos) {
            best = Some((slot, cos));
        }
    }

    best.map(|(slot, _)| slot)
}

/// Pick through a screen position. `ray_at` maps a viewport position to a
/// world ray. The pixel tolerance is turned into an angle at the cursor, so it
/// holds for any field of view.
pub fn pick_star_on_screen<F>(
    buffer: &SkyBuffer,
    cursor: Vec2,
    tolerance_px: f32,
    ray_at: F,
) -> Option<usize>
where
    F: Fn(Vec2) -> Option<Ray3d>,
{
    let ray = ray_at(cursor)?;
    let edge = ray_at(cursor + Vec2::new(tolerance_px, 0.0))?;
    let max_angle = ray.direction.as_vec3().angle_between(edge.direction.as_vec3());

    pick_star(buffer, ray.origin, ray.direction.as_vec3(), max_angle)
}

pub fn pick_star_at_viewport(
    buffer: &SkyBuffer,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    cursor: Vec2,
    tolerance_px: f32,
) -> Option<usize> {
    pick_star_on_screen(buffer, cursor, tolerance_px, |point| {
        camera.viewport_to_world(camera_transform, point).ok()
    })
}

/// Where a press and release count as a click. Moving further than the drag
/// threshold is a camera drag instead.
pub fn click_release(press: Option<Vec2>, release: Option<Vec2>) -> Option<Vec2> {
    let (start, end) = (press?, release?);
    (start.distance(end) <= CLICK_DRAG_THRESHOLD_PX).then_some(end)
}

/// Left click without dragging selects the star under the cursor.
/// A miss leaves the current focus alone.
pub fn handle_star_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<SkyViewCamera>>,
    published: Res<PublishedSkyBuffer>,
    settings: Res<SkySettings>,
    mut press_position: Local<Option<Vec2>>,
    mut focus_commands: EventWriter<FocusCommand>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();

    if buttons.just_pressed(MouseButton::Left) {
        *press_position = cursor;
        return;
    }
    if !buttons.just_released(MouseButton::Left) {
        return;
    }

    let Some(end) = click_release(press_position.take(), cursor) else {
        return;
    };

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let buffer = published.buffer();
    let picked = pick_star_at_viewport(
        buffer,
        camera,
        camera_transform,
        end,
        settings.pick_tolerance_px,
    );

    if let Some(id) = picked.and_then(|slot| buffer.id(slot)) {
        focus_commands.write(FocusCommand::Select { id: id.to_string() });
    }
}
