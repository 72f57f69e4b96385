use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_FAR_PLANE, EYE_HEIGHT, FOCUS_DURATION_SECS, PICK_TOLERANCE_PX,
};
use constants::sky::{BASE_LIMITING_MAGNITUDE, DOME_RADIUS};
use serde::{Deserialize, Serialize};

/// Runtime tunables, seeded from the constants crate and adjustable by the host.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkySettings {
    pub dome_radius: f32,
    pub base_limiting_magnitude: f64,
    pub pick_tolerance_px: f32,
    pub focus_duration_secs: f32,
    /// Project the fixed-epoch sky until an observer is known.
    pub fixed_epoch_fallback: bool,
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            dome_radius: DOME_RADIUS,
            base_limiting_magnitude: BASE_LIMITING_MAGNITUDE,
            pick_tolerance_px: PICK_TOLERANCE_PX,
            focus_duration_secs: FOCUS_DURATION_SECS,
            fixed_epoch_fallback: true,
        }
    }
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkySettingsPatch {
    pub dome_radius: Option<f32>,
    pub base_limiting_magnitude: Option<f64>,
    pub pick_tolerance_px: Option<f32>,
    pub focus_duration_secs: Option<f32>,
    pub fixed_epoch_fallback: Option<bool>,
}

impl SkySettings {
    /// Validate the whole patch before applying any of it.
    pub fn apply(&mut self, patch: &SkySettingsPatch) -> Result<(), String> {
        let positive = |name: &str, value: Option<f32>| match value {
            Some(v) if !(v.is_finite() && v > 0.0) => Err(format!("{name} must be positive")),
            _ => Ok(()),
        };
        // The dome must enclose the eye and stay inside the far clip plane.
        if matches!(patch.dome_radius, Some(v) if !(v > EYE_HEIGHT && v < CAMERA_FAR_PLANE)) {
            return Err(format!(
                "dome_radius must lie between {EYE_HEIGHT} and {CAMERA_FAR_PLANE}"
            ));
        }
        positive("pick_tolerance_px", patch.pick_tolerance_px)?;
        if matches!(patch.focus_duration_secs, Some(v) if !(v.is_finite() && v >= 0.0)) {
            return Err("focus_duration_secs must not be negative".into());
        }
        if matches!(patch.base_limiting_magnitude, Some(v) if !v.is_finite()) {
            return Err("base_limiting_magnitude must be finite".into());
        }

        if let Some(v) = patch.dome_radius {
            self.dome_radius = v;
        }
        if let Some(v) = patch.base_limiting_magnitude {
            self.base_limiting_magnitude = v;
        }
        if let Some(v) = patch.pick_tolerance_px {
            self.pick_tolerance_px = v;
        }
        if let Some(v) = patch.focus_duration_secs {
            self.focus_duration_secs = v;
        }
        if let Some(v) = patch.fixed_epoch_fallback {
            self.fixed_epoch_fallback = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_patch_changes_nothing() {
        let mut settings = SkySettings::default();
        let patch = SkySettingsPatch {
            base_limiting_magnitude: Some(4.0),
            dome_radius: Some(-1.0),
            ..default()
        };
        assert!(settings.apply(&patch).is_err());
        assert_eq!(settings, SkySettings::default());

        for radius in [f32::NAN, EYE_HEIGHT, 0.25, CAMERA_FAR_PLANE, 5000.0] {
            let patch = SkySettingsPatch {
                dome_radius: Some(radius),
                ..default()
            };
            assert!(settings.apply(&patch).is_err(), "radius {radius} accepted");
        }
        assert_eq!(settings, SkySettings::default());
    }

    #[test]
    fn dome_inside_the_clip_range_is_accepted() {
        let mut settings = SkySettings::default();
        let patch = SkySettingsPatch {
            dome_radius: Some(CAMERA_FAR_PLANE * 0.9),
            ..default()
        };
        settings.apply(&patch).unwrap();
        assert_eq!(settings.dome_radius, CAMERA_FAR_PLANE * 0.9);
    }

    #[test]
    fn partial_patch_keeps_other_fields() {
        let mut settings = SkySettings::default();
        let patch: SkySettingsPatch =
            serde_json::from_str(r#"{"base_limiting_magnitude": 6.0}"#).unwrap();
        settings.apply(&patch).unwrap();
        assert_eq!(settings.base_limiting_magnitude, 6.0);
        assert_eq!(settings.dome_radius, DOME_RADIUS);
    }
}
