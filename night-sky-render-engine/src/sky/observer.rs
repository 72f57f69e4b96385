use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ObserverError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("observer coordinates must be finite")]
    NonFinite,
}

/// Observer position in decimal degrees. Replaced wholesale, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observer {
    lat: f64,
    lng: f64,
}

impl Observer {
    /// Longitude is wrapped into [-180, 180). Latitude must already be in range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, ObserverError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(ObserverError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ObserverError::LatitudeOutOfRange(lat));
        }

        Ok(Self {
            lat,
            lng: (lng + 180.0).rem_euclid(360.0) - 180.0,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl<'de> Deserialize<'de> for Observer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            lat: f64,
            lng: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Observer::new(raw.lat, raw.lng).map_err(serde::de::Error::custom)
    }
}
