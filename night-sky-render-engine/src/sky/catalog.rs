use constants::sky::{DEC_DEGREES_MAX, RA_HOURS_MAX};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_CATALOG_REVISION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog asset failed to load: {0}")]
    Load(String),
}

/// Catalog row as it arrives from the asset. Coordinates stay optional until
/// ingestion, which is the only place they are validated.
///
/// Deserialization never fails on a field: numeric ids become strings, numeric
/// strings become numbers and anything else becomes absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    /// Right ascension in hours.
    #[serde(default, deserialize_with = "lenient_number")]
    pub ra: Option<f64>,
    /// Declination in degrees.
    #[serde(default, deserialize_with = "lenient_number")]
    pub dec: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub mag: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Rows of a catalog document. An entry that is not even an object becomes an
/// empty record, which ingestion rejects and counts.
pub fn deserialize_rows<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<CatalogRecord>, D::Error> {
    let rows = Vec::<Value>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| CatalogRecord::deserialize(row).unwrap_or_default())
        .collect())
}

impl CatalogRecord {
    pub fn new(id: impl Into<String>, ra: f64, dec: f64, mag: f64) -> Self {
        Self {
            id: id.into(),
            ra: Some(ra),
            dec: Some(dec),
            mag: Some(mag),
            name: None,
        }
    }

    /// Strongly typed star, or `None` for incomplete or out-of-range rows.
    pub fn validate(&self) -> Option<CatalogStar> {
        let id = self.id.trim();
        if id.is_empty() {
            return None;
        }

        let (ra, dec, mag) = (self.ra?, self.dec?, self.mag?);
        if !(ra.is_finite() && dec.is_finite() && mag.is_finite()) {
            return None;
        }
        if !(0.0..=RA_HOURS_MAX).contains(&ra) || dec.abs() > DEC_DEGREES_MAX {
            return None;
        }

        Some(CatalogStar {
            id: Arc::from(id),
            ra_hours: if ra == RA_HOURS_MAX { 0.0 } else { ra },
            dec_degrees: dec,
            mag,
            name: self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).map(Arc::from),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStar {
    pub id: Arc<str>,
    pub ra_hours: f64,
    pub dec_degrees: f64,
    pub mag: f64,
    pub name: Option<Arc<str>>,
}

/// Immutable, cheaply cloneable catalog. Every ingestion gets a fresh revision
/// so derived buffers can tell catalogs apart without comparing contents.
#[derive(Debug, Clone)]
pub struct StarCatalog {
    stars: Arc<[CatalogStar]>,
    index: Arc<HashMap<Arc<str>, usize>>,
    rejected: usize,
    revision: u64,
}

impl StarCatalog {
    pub fn empty() -> Self {
        Self::from_records(std::iter::empty())
    }

    /// Validate every record once. Rejected rows are counted, not reported.
    /// Duplicate ids keep their first occurrence.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        let mut stars = Vec::new();
        let mut index = HashMap::new();
        let mut rejected = 0;

        for record in records {
            match record.validate() {
                Some(star) if !index.contains_key(&star.id) => {
                    index.insert(star.id.clone(), stars.len());
                    stars.push(star);
                }
                _ => rejected += 1,
            }
        }

        Self {
            stars: stars.into(),
            index: Arc::new(index),
            rejected,
            revision: NEXT_CATALOG_REVISION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn stars(&self) -> &[CatalogStar] {
        &self.stars
    }

    pub fn get(&self, id: &str) -> Option<&CatalogStar> {
        self.index.get(id).map(|&i| &self.stars[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for StarCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_rows_are_skipped_silently() {
        let mut missing_dec = CatalogRecord::new("2", 1.0, 0.0, 2.0);
        missing_dec.dec = None;
        let catalog = StarCatalog::from_records(vec![
            CatalogRecord::new("1", 6.75, -16.7, -1.46),
            missing_dec,
            CatalogRecord::new("3", 25.0, 0.0, 1.0),
            CatalogRecord::new("4", 1.0, -90.5, 1.0),
            CatalogRecord::new("5", f64::NAN, 0.0, 1.0),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.rejected(), 4);
        assert!(catalog.contains("1"));
    }

    #[test]
    fn duplicate_ids_keep_the_first_row() {
        let catalog = StarCatalog::from_records(vec![
            CatalogRecord::new("7", 1.0, 10.0, 1.0),
            CatalogRecord::new("7", 2.0, 20.0, 2.0),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("7").map(|s| s.ra_hours), Some(1.0));
    }

    #[test]
    fn ra_of_twenty_four_hours_wraps() {
        let star = CatalogRecord::new("x", 24.0, 0.0, 0.0).validate().unwrap();
        assert_eq!(star.ra_hours, 0.0);
    }

    #[test]
    fn revisions_are_unique() {
        assert_ne!(StarCatalog::empty().revision(), StarCatalog::empty().revision());
    }

    #[test]
    fn records_deserialize_with_missing_fields() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": "9", "ra": 1.5, "mag": 3.0}"#).unwrap();
        assert_eq!(record.dec, None);
        assert!(record.validate().is_none());
    }

    #[test]
    fn loosely_typed_fields_are_coerced_or_dropped() {
        let record: CatalogRecord = serde_json::from_str(
            r#"{"id": 32349, "ra": "6.7525", "dec": -16.716, "mag": "bright", "name": 7}"#,
        )
        .unwrap();
        assert_eq!(record.id, "32349");
        assert_eq!(record.ra, Some(6.7525));
        assert_eq!(record.mag, None);
        assert_eq!(record.name, None);
    }
}
