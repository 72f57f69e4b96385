/// Raw CSV rows and the JSON catalog written for the render engine.
use constants::sky::{DEC_DEGREES_MAX, RA_HOURS_MAX};
use serde::{Deserialize, Serialize};

/// One row of a trimmed Hipparcos/HYG export. Every column is optional so that
/// incomplete rows reach classification instead of failing the whole read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStarRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub hip: Option<String>,
    #[serde(default)]
    pub proper: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub ra: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub dec: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub mag: Option<f64>,
}

/// Catalog entry as consumed by the engine's catalog asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: String,
    pub ra: f64,
    pub dec: f64,
    pub mag: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    pub source: String,
    pub magnitude_ceiling: f64,
    pub stars: Vec<CatalogRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Kept(CatalogRow),
    TooFaint,
    Malformed,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RawStarRow {
    /// Validate a row against the catalog ranges and the magnitude ceiling.
    pub fn classify(&self, magnitude_ceiling: f64) -> RowOutcome {
        let Some(id) = non_empty(&self.id).or_else(|| non_empty(&self.hip)) else {
            return RowOutcome::Malformed;
        };
        let (Some(ra), Some(dec), Some(mag)) = (self.ra, self.dec, self.mag) else {
            return RowOutcome::Malformed;
        };
        if !(ra.is_finite() && dec.is_finite() && mag.is_finite()) {
            return RowOutcome::Malformed;
        }
        if !(0.0..=RA_HOURS_MAX).contains(&ra) || dec.abs() > DEC_DEGREES_MAX {
            return RowOutcome::Malformed;
        }
        if mag > magnitude_ceiling {
            return RowOutcome::TooFaint;
        }

        RowOutcome::Kept(CatalogRow {
            id: id.to_string(),
            ra: if ra == RA_HOURS_MAX { 0.0 } else { ra },
            dec,
            mag,
            name: non_empty(&self.proper).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, ra: Option<f64>, dec: Option<f64>, mag: Option<f64>) -> RawStarRow {
        RawStarRow {
            id: Some(id.to_string()),
            ra,
            dec,
            mag,
            ..Default::default()
        }
    }

    #[test]
    fn missing_coordinates_are_malformed() {
        assert_eq!(
            row("1", None, Some(10.0), Some(1.0)).classify(6.5),
            RowOutcome::Malformed
        );
        assert_eq!(
            row("1", Some(1.0), Some(10.0), None).classify(6.5),
            RowOutcome::Malformed
        );
    }

    #[test]
    fn out_of_range_declination_is_malformed() {
        assert_eq!(
            row("1", Some(1.0), Some(91.0), Some(1.0)).classify(6.5),
            RowOutcome::Malformed
        );
    }

    #[test]
    fn faint_rows_are_dropped() {
        assert_eq!(
            row("1", Some(1.0), Some(10.0), Some(6.6)).classify(6.5),
            RowOutcome::TooFaint
        );
    }

    #[test]
    fn hip_is_used_when_id_is_blank() {
        let raw = RawStarRow {
            id: Some("  ".into()),
            hip: Some("32349".into()),
            proper: Some("Sirius".into()),
            ra: Some(24.0),
            dec: Some(-16.716),
            mag: Some(-1.46),
        };
        let RowOutcome::Kept(kept) = raw.classify(6.5) else {
            panic!("expected row to be kept");
        };
        assert_eq!(kept.id, "32349");
        assert_eq!(kept.ra, 0.0);
        assert_eq!(kept.name.as_deref(), Some("Sirius"));
    }
}
