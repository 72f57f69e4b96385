use crate::engine::core::sky_settings::SkySettings;
use crate::sky::catalog::StarCatalog;
use crate::sky::moon::{MoonConditions, clamp_illumination};
use crate::sky::observer::Observer;
use crate::sky::projector::SkyProjection;
use crate::sky::sky_buffer::BuildParameters;
use crate::sky::time::{ObservationTime, SkyTimeline};
use bevy::prelude::*;
use chrono::{Local, Offset, Utc};

/// Host-owned inputs of the sky. Written by the host bridge and keyboard
/// systems only; the rebuild pipeline reads it.
#[derive(Resource, Debug, Clone, Default)]
pub struct SkyContext {
    observer: Option<Observer>,
    time: Option<ObservationTime>,
    moon_override: Option<f64>,
}

impl SkyContext {
    pub fn observer(&self) -> Option<Observer> {
        self.observer
    }

    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    pub fn time(&self) -> Option<ObservationTime> {
        self.time
    }

    pub fn set_time(&mut self, time: ObservationTime) {
        self.time = Some(time);
    }

    pub fn moon_override(&self) -> Option<f64> {
        self.moon_override
    }

    /// `None` returns to the built-in estimate.
    pub fn set_moon_override(&mut self, fraction: Option<f64>) {
        self.moon_override = fraction.map(clamp_illumination);
    }

    /// Estimated moon at the observation time.
    pub fn moon_conditions(&self) -> Option<MoonConditions> {
        self.time.as_ref().map(MoonConditions::at)
    }

    pub fn moon_illumination(&self) -> f64 {
        self.moon_override
            .or_else(|| self.moon_conditions().map(|moon| moon.illumination))
            .unwrap_or(0.0)
    }

    pub fn projection(&self, fixed_epoch_fallback: bool) -> SkyProjection {
        match (self.observer, self.time) {
            (Some(observer), Some(time)) => SkyProjection::Observed { observer, time },
            _ if fixed_epoch_fallback => SkyProjection::FixedEpoch,
            _ => SkyProjection::Unset,
        }
    }

    pub fn build_parameters(&self, settings: &SkySettings) -> BuildParameters {
        BuildParameters {
            projection: self.projection(settings.fixed_epoch_fallback),
            moon_illumination: self.moon_illumination(),
            base_limiting_magnitude: settings.base_limiting_magnitude,
            dome_radius: settings.dome_radius as f64,
        }
    }
}

/// Read-only catalog shared by the pipeline, picking and the host bridge.
#[derive(Resource, Debug, Clone, Default)]
pub struct SkyCatalog(StarCatalog);

impl SkyCatalog {
    pub fn new(catalog: StarCatalog) -> Self {
        Self(catalog)
    }

    pub fn get(&self) -> &StarCatalog {
        &self.0
    }

    pub fn replace(&mut self, catalog: StarCatalog) {
        self.0 = catalog;
    }
}

/// The observation slider resource.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ObservationTimeline(pub SkyTimeline);

impl Default for ObservationTimeline {
    /// Today, at the current minute of the host's local zone.
    fn default() -> Self {
        let now = Local::now();
        Self(SkyTimeline::at_instant(now.with_timezone(&Utc), now.offset().fix()))
    }
}

/// The timeline owns the observation time while it is in use.
pub fn sync_timeline_to_context(
    timeline: Res<ObservationTimeline>,
    mut sky_context: ResMut<SkyContext>,
) {
    if timeline.is_changed() {
        sky_context.set_time(timeline.0.observation_time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn projection_needs_observer_and_time() {
        let mut context = SkyContext::default();
        assert_eq!(context.projection(false), SkyProjection::Unset);
        assert_eq!(context.projection(true), SkyProjection::FixedEpoch);

        context.set_observer(Observer::new(51.5, -0.1).unwrap());
        assert_eq!(context.projection(true), SkyProjection::FixedEpoch);

        let time = ObservationTime::new(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        context.set_time(time);
        assert!(matches!(
            context.projection(false),
            SkyProjection::Observed { .. }
        ));
    }

    #[test]
    fn moon_override_wins_over_estimate() {
        let mut context = SkyContext::default();
        context.set_time(ObservationTime::new(
            Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap(),
        ));
        assert!(context.moon_illumination() > 0.9);

        context.set_moon_override(Some(2.0));
        assert_eq!(context.moon_illumination(), 1.0);

        context.set_moon_override(None);
        assert!(context.moon_illumination() > 0.9);
    }
}
