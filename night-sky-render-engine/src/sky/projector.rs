//! Equatorial (ra, dec) to horizontal (altitude, azimuth) projection.
//!
//! Azimuth runs from north through east. The dome mapping places north on +X,
//! east on +Z and the zenith on +Y, see `constants::coordinate_system`.

use crate::sky::catalog::CatalogStar;
use crate::sky::observer::Observer;
use crate::sky::time::ObservationTime;
use constants::coordinate_system::horizontal_to_scene;
use std::f64::consts::TAU;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoords {
    /// Radians above the horizon.
    pub altitude: f64,
    /// Radians from north through east, [0, 2π).
    pub azimuth: f64,
}

/// Which sky the builder projects.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SkyProjection {
    /// No observer known. Nothing is projected.
    #[default]
    Unset,
    /// Startup fallback before the observer is known: the catalog seen from the
    /// north celestial pole at sidereal time zero, so altitude equals declination.
    FixedEpoch,
    Observed {
        observer: Observer,
        time: ObservationTime,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedStar {
    pub id: Arc<str>,
    /// Scene-space position on the dome, `|direction| == radius`.
    pub direction: [f64; 3],
    pub alpha: f64,
    pub horizontal: HorizontalCoords,
}

/// Faintest rendered magnitude under the given moonlight.
pub fn limiting_magnitude(base: f64, moon_illumination: f64) -> f64 {
    base - constants::sky::MOON_LIMIT_PENALTY * moon_illumination.clamp(0.0, 1.0)
}

/// Visual weight of a star: brighter (lower magnitude) stars weigh more.
pub fn star_alpha(mag: f64, limiting_magnitude: f64) -> f64 {
    if limiting_magnitude <= 0.0 {
        return 0.0;
    }
    (1.0 - mag / limiting_magnitude).clamp(0.0, 1.0)
}

pub fn equatorial_to_horizontal(
    ra_hours: f64,
    dec_degrees: f64,
    latitude_degrees: f64,
    local_sidereal_hours: f64,
) -> HorizontalCoords {
    let hour_angle = ((local_sidereal_hours - ra_hours) * 15.0).to_radians();
    let (sin_dec, cos_dec) = dec_degrees.to_radians().sin_cos();
    let (sin_lat, cos_lat) = latitude_degrees.to_radians().sin_cos();
    let (sin_h, cos_h) = hour_angle.sin_cos();

    let sin_alt = (sin_dec * sin_lat + cos_dec * cos_lat * cos_h).clamp(-1.0, 1.0);
    let azimuth = f64::atan2(
        -cos_dec * sin_h,
        sin_dec * cos_lat - cos_dec * sin_lat * cos_h,
    );

    HorizontalCoords {
        altitude: sin_alt.asin(),
        azimuth: azimuth.rem_euclid(TAU),
    }
}

/// Projection prepared for one (projection, radius, limiting magnitude) tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    latitude_degrees: f64,
    local_sidereal_hours: f64,
    radius: f64,
    limiting_magnitude: f64,
}

impl Projector {
    /// `None` when no sky can be projected.
    pub fn new(projection: &SkyProjection, radius: f64, limiting_magnitude: f64) -> Option<Self> {
        let (latitude_degrees, local_sidereal_hours) = match projection {
            SkyProjection::Unset => return None,
            SkyProjection::FixedEpoch => (90.0, 0.0),
            SkyProjection::Observed { observer, time } => {
                (observer.lat(), time.local_sidereal_hours(observer.lng()))
            }
        };

        Some(Self {
            latitude_degrees,
            local_sidereal_hours,
            radius,
            limiting_magnitude,
        })
    }

    pub fn horizontal(&self, star: &CatalogStar) -> HorizontalCoords {
        equatorial_to_horizontal(
            star.ra_hours,
            star.dec_degrees,
            self.latitude_degrees,
            self.local_sidereal_hours,
        )
    }

    /// `None` for stars at or below the horizon or too faint to draw.
    pub fn project(&self, star: &CatalogStar) -> Option<ProjectedStar> {
        let horizontal = self.horizontal(star);
        if horizontal.altitude <= 0.0 {
            return None;
        }

        let alpha = star_alpha(star.mag, self.limiting_magnitude);
        if alpha <= 0.0 {
            return None;
        }

        Some(ProjectedStar {
            id: star.id.clone(),
            direction: horizontal_to_scene(horizontal.altitude, horizontal.azimuth, self.radius),
            alpha,
            horizontal,
        })
    }
}
