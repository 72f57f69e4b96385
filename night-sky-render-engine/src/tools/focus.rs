//! Camera focus on a selected star.
//!
//! `Idle` (free look) → select → `Animating` (eased slerp towards the star)
//! → `Locked` (held on the star) → clear → `Idle`. A select while animating
//! restarts from the current orientation towards the new target.

use crate::engine::camera::sky_camera::{SkyViewCamera, camera_rotation, orientation_towards};
use crate::engine::core::sky_settings::SkySettings;
use crate::engine::pipeline::SkyPipelineSet;
use crate::engine::pipeline::rebuild::{PublishedSkyBuffer, SkyBufferPublished};
use crate::engine::pipeline::sky_context::SkyCatalog;
use crate::sky::catalog::StarCatalog;
use crate::sky::sky_buffer::SkyBuffer;
use bevy::prelude::*;
use constants::render_settings::{EYE_HEIGHT, FOCUS_DURATION_SECS};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPhase {
    Idle,
    Animating,
    Locked,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("star {id} is not currently visible")]
    NotVisible { id: String },

    #[error("star {id} is not in the catalog")]
    UnknownStar { id: String },
}

impl FocusError {
    pub fn id(&self) -> &str {
        match self {
            FocusError::NotVisible { id } | FocusError::UnknownStar { id } => id,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            FocusError::NotVisible { .. } => "not_visible",
            FocusError::UnknownStar { .. } => "unknown_star",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetargetOutcome {
    Idle,
    Tracked,
    Lost { id: String },
}

#[derive(Debug, Clone)]
struct FocusTarget {
    id: Arc<str>,
    rotation: Quat,
}

#[derive(Resource, Debug, Clone)]
pub struct FocusController {
    phase: FocusPhase,
    target: Option<FocusTarget>,
    start: Quat,
    eye: Vec3,
    elapsed: f32,
    duration: f32,
}

impl Default for FocusController {
    fn default() -> Self {
        Self::new(FOCUS_DURATION_SECS)
    }
}

impl FocusController {
    pub fn new(duration: f32) -> Self {
        Self {
            phase: FocusPhase::Idle,
            target: None,
            start: Quat::IDENTITY,
            eye: Vec3::new(0.0, EYE_HEIGHT, 0.0),
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.id.as_ref())
    }

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
    }

    /// Aim at `id` from the camera's current pose. Rejected when the star is
    /// not in the current buffer; the state is then left untouched.
    pub fn select(
        &mut self,
        id: &str,
        buffer: &SkyBuffer,
        catalog: &StarCatalog,
        camera: &Transform,
    ) -> Result<(), FocusError> {
        let Some(slot) = buffer.slot_of(id) else {
            let id = id.to_string();
            return Err(if catalog.contains(&id) {
                FocusError::NotVisible { id }
            } else {
                FocusError::UnknownStar { id }
            });
        };

        self.eye = camera.translation;
        let rotation = self.rotation_towards(buffer, slot).unwrap_or(camera.rotation);

        if self.phase == FocusPhase::Locked && self.target_id() == Some(id) {
            if let Some(target) = self.target.as_mut() {
                target.rotation = rotation;
            }
            return Ok(());
        }

        self.start = camera.rotation;
        self.target = Some(FocusTarget {
            id: Arc::from(id),
            rotation,
        });
        self.elapsed = 0.0;
        self.phase = if self.duration > 0.0 {
            FocusPhase::Animating
        } else {
            FocusPhase::Locked
        };
        Ok(())
    }

    /// Back to free look. Returns whether anything was focused.
    pub fn clear(&mut self) -> bool {
        let was_active = self.phase != FocusPhase::Idle;
        self.phase = FocusPhase::Idle;
        self.target = None;
        self.elapsed = 0.0;
        was_active
    }

    pub fn advance(&mut self, delta_secs: f32) {
        if self.phase != FocusPhase::Animating {
            return;
        }
        self.elapsed += delta_secs;
        if self.elapsed >= self.duration {
            self.phase = FocusPhase::Locked;
        }
    }

    /// Camera rotation requested by the controller, `None` while idle.
    pub fn orientation(&self) -> Option<Quat> {
        let target = self.target.as_ref()?;
        match self.phase {
            FocusPhase::Idle => None,
            FocusPhase::Animating => {
                let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
                Some(self.start.slerp(target.rotation, smoothstep(t)))
            }
            FocusPhase::Locked => Some(target.rotation),
        }
    }

    /// Follow the target into a newly published buffer, or let go of it if it
    /// is no longer visible.
    pub fn retarget(&mut self, buffer: &SkyBuffer) -> RetargetOutcome {
        let Some(id) = self.target.as_ref().map(|t| t.id.clone()) else {
            return RetargetOutcome::Idle;
        };

        match buffer.slot_of(&id) {
            Some(slot) => {
                if let Some(rotation) = self.rotation_towards(buffer, slot) {
                    if let Some(target) = self.target.as_mut() {
                        target.rotation = rotation;
                    }
                }
                RetargetOutcome::Tracked
            }
            None => {
                self.clear();
                RetargetOutcome::Lost { id: id.to_string() }
            }
        }
    }

    fn rotation_towards(&self, buffer: &SkyBuffer, slot: usize) -> Option<Quat> {
        let star = Vec3::from_array(buffer.position(slot)?);
        let (yaw, pitch) = orientation_towards(star - self.eye)?;
        Some(camera_rotation(yaw, pitch))
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Focus requests from the UI layer, applied in arrival order.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum FocusCommand {
    Select { id: String },
    Clear,
}

/// Fired on a successful selection and whenever focus is released.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct StarSelected {
    pub id: Option<String>,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct FocusRejected {
    pub error: FocusError,
}

pub fn apply_focus_commands(
    mut focus_commands: EventReader<FocusCommand>,
    mut focus: ResMut<FocusController>,
    published: Res<PublishedSkyBuffer>,
    sky_catalog: Res<SkyCatalog>,
    cameras: Query<&Transform, With<SkyViewCamera>>,
    mut selected: EventWriter<StarSelected>,
    mut rejected: EventWriter<FocusRejected>,
) {
    let mut camera = cameras
        .single()
        .copied()
        .unwrap_or_else(|_| Transform::from_xyz(0.0, EYE_HEIGHT, 0.0));

    for command in focus_commands.read() {
        match command {
            FocusCommand::Select { id } => {
                match focus.select(id, published.buffer(), sky_catalog.get(), &camera) {
                    Ok(()) => {
                        info!("Focusing star {}", id);
                        selected.write(StarSelected {
                            id: Some(id.clone()),
                        });
                    }
                    Err(error) => {
                        warn!("Focus rejected: {}", error);
                        rejected.write(FocusRejected { error });
                    }
                }
            }
            FocusCommand::Clear => {
                if focus.clear() {
                    info!("Focus cleared");
                    selected.write(StarSelected { id: None });
                }
            }
        }

        // Later commands in the same frame start from where this one left the camera.
        if let Some(rotation) = focus.orientation() {
            camera.rotation = rotation;
        }
    }
}

pub fn retarget_focus(
    mut published_events: EventReader<SkyBufferPublished>,
    published: Res<PublishedSkyBuffer>,
    mut focus: ResMut<FocusController>,
    mut selected: EventWriter<StarSelected>,
) {
    if published_events.read().last().is_none() {
        return;
    }

    if let RetargetOutcome::Lost { id } = focus.retarget(published.buffer()) {
        info!("Focused star {} left the visible sky", id);
        selected.write(StarSelected { id: None });
    }
}

pub fn advance_focus(time: Res<Time>, mut focus: ResMut<FocusController>) {
    if focus.phase() == FocusPhase::Animating {
        focus.advance(time.delta_secs());
    }
}

pub fn sync_focus_duration(settings: Res<SkySettings>, mut focus: ResMut<FocusController>) {
    if settings.is_changed() {
        focus.set_duration(settings.focus_duration_secs);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear_focus_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut focus_commands: EventWriter<FocusCommand>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        focus_commands.write(FocusCommand::Clear);
    }
}

pub struct FocusToolPlugin;

impl Plugin for FocusToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FocusController>()
            .add_event::<FocusCommand>()
            .add_event::<StarSelected>()
            .add_event::<FocusRejected>()
            .add_systems(
                Update,
                (
                    sync_focus_duration,
                    apply_focus_commands,
                    retarget_focus,
                    advance_focus,
                )
                    .chain()
                    .after(SkyPipelineSet),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::catalog::CatalogRecord;
    use crate::sky::projector::SkyProjection;
    use crate::sky::sky_buffer::{BuildParameters, build_sky_buffer};

    fn fixture() -> (StarCatalog, SkyBuffer) {
        let catalog = StarCatalog::from_records(vec![
            CatalogRecord::new("a", 1.0, 40.0, 1.0),
            CatalogRecord::new("b", 9.0, 60.0, 1.0),
            CatalogRecord::new("below", 3.0, -20.0, 1.0),
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

    fn camera() -> Transform {
        Transform::from_xyz(0.0, EYE_HEIGHT, 0.0)
    }

    #[test]
    fn select_animates_then_locks() {
        let (catalog, buffer) = fixture();
        let mut focus = FocusController::new(0.8);
        focus.select("a", &buffer, &catalog, &camera()).unwrap();
        assert_eq!(focus.phase(), FocusPhase::Animating);

        focus.advance(0.4);
        assert_eq!(focus.phase(), FocusPhase::Animating);
        focus.advance(0.5);
        assert_eq!(focus.phase(), FocusPhase::Locked);

        let forward = focus.orientation().unwrap() * Vec3::NEG_Z;
        let expected = (Vec3::from_array(buffer.position(0).unwrap()) - camera().translation)
            .normalize();
        assert!(forward.dot(expected) > 0.9999);
    }

    #[test]
    fn invisible_and_unknown_targets_are_rejected() {
        let (catalog, buffer) = fixture();
        let mut focus = FocusController::default();
        assert_eq!(
            focus.select("below", &buffer, &catalog, &camera()),
            Err(FocusError::NotVisible {
                id: "below".into()
            })
        );
        assert_eq!(
            focus.select("nope", &buffer, &catalog, &camera()),
            Err(FocusError::UnknownStar { id: "nope".into() })
        );
        assert_eq!(focus.phase(), FocusPhase::Idle);
    }

    #[test]
    fn rejected_select_keeps_current_lock() {
        let (catalog, buffer) = fixture();
        let mut focus = FocusController::new(0.0);
        focus.select("a", &buffer, &catalog, &camera()).unwrap();
        assert!(focus.select("below", &buffer, &catalog, &camera()).is_err());
        assert_eq!(focus.phase(), FocusPhase::Locked);
        assert_eq!(focus.target_id(), Some("a"));
    }

    #[test]
    fn second_select_cancels_the_first() {
        let (catalog, buffer) = fixture();
        let mut focus = FocusController::new(0.8);
        focus.select("a", &buffer, &catalog, &camera()).unwrap();
        focus.advance(0.2);

        let mut midway = camera();
        midway.rotation = focus.orientation().unwrap();
        focus.select("b", &buffer, &catalog, &midway).unwrap();
        focus.advance(1.0);

        assert_eq!(focus.phase(), FocusPhase::Locked);
        assert_eq!(focus.target_id(), Some("b"));
    }

    #[test]
    fn clear_returns_to_idle() {
        let (catalog, buffer) = fixture();
        let mut focus = FocusController::default();
        assert!(!focus.clear());
        focus.select("a", &buffer, &catalog, &camera()).unwrap();
        assert!(focus.clear());
        assert_eq!(focus.phase(), FocusPhase::Idle);
        assert!(focus.orientation().is_none());
    }

    #[test]
    fn lost_target_releases_focus() {
        let (catalog, buffer) = fixture();
        let mut focus = FocusController::new(0.0);
        focus.select("a", &buffer, &catalog, &camera()).unwrap();
        assert_eq!(focus.retarget(&buffer), RetargetOutcome::Tracked);
        assert_eq!(
            focus.retarget(&SkyBuffer::default()),
            RetargetOutcome::Lost { id: "a".into() }
        );
        assert_eq!(focus.phase(), FocusPhase::Idle);
    }
}
