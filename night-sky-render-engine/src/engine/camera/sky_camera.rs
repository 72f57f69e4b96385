use crate::tools::focus::FocusController;
use bevy::math::EulerRot;
use bevy::render::camera::PerspectiveProjection;
use bevy::{input::mouse::MouseMotion, prelude::*};
use constants::render_settings::{
    CAMERA_FAR_PLANE, CAMERA_FOV_DEGREES, EYE_HEIGHT, MAX_PITCH, MIN_PITCH, PITCH_SENSITIVITY,
    YAW_SENSITIVITY,
};

#[derive(Component)]
pub struct SkyViewCamera;

/// Free-look state. Yaw 0 faces west (-Z); positive yaw turns through south
/// (yaw π/2, -X) towards east.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SkyCamera {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for SkyCamera {
    /// Facing south, a little above the horizon.
    fn default() -> Self {
        Self {
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.35,
        }
    }
}

impl SkyCamera {
    pub fn rotation(&self) -> Quat {
        camera_rotation(self.yaw, self.pitch)
    }

    pub fn look_at(&mut self, direction: Vec3) {
        if let Some((yaw, pitch)) = orientation_towards(direction) {
            self.yaw = yaw;
            self.pitch = pitch;
        }
    }
}

pub fn camera_rotation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Yaw and pitch whose camera forward (-Z) points along `direction`.
pub fn orientation_towards(direction: Vec3) -> Option<(f32, f32)> {
    let d = direction.try_normalize()?;
    let pitch = d.y.clamp(-1.0, 1.0).asin();
    let yaw = f32::atan2(-d.x, -d.z);
    Some((yaw, pitch))
}

pub fn spawn_sky_camera(commands: &mut Commands, sky_camera: &SkyCamera) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            far: CAMERA_FAR_PLANE,
            ..default()
        }),
        Transform::from_xyz(0.0, EYE_HEIGHT, 0.0).with_rotation(sky_camera.rotation()),
        SkyViewCamera,
    ));
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<SkyViewCamera>>,
    mut sky_camera: ResMut<SkyCamera>,
    focus: Res<FocusController>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // The focus controller eases on its own; follow it exactly and keep the
    // free-look angles in step so releasing focus does not jump.
    if let Some(focus_rotation) = focus.orientation() {
        camera_transform.rotation = focus_rotation;
        sky_camera.look_at(focus_rotation * Vec3::NEG_Z);
        return;
    }

    if mouse_button.any_pressed([MouseButton::Left, MouseButton::Right])
        && mouse_delta != Vec2::ZERO
    {
        sky_camera.yaw += mouse_delta.x * YAW_SENSITIVITY;
        sky_camera.pitch += mouse_delta.y * PITCH_SENSITIVITY;
    }
    sky_camera.pitch = sky_camera.pitch.clamp(MIN_PITCH, MAX_PITCH);

    let lerp_speed = 12.0 * time.delta_secs();
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(sky_camera.rotation(), lerp_speed.min(1.0));
}
