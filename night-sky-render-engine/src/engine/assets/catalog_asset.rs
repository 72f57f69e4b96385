use crate::engine::loading::progress::LoadingProgress;
use crate::engine::pipeline::sky_context::SkyCatalog;
use crate::sky::catalog::{CatalogError, CatalogRecord, StarCatalog, deserialize_rows};
use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::CATALOG_ASSET_PATH;
use serde::Deserialize;

/// On-disk catalog written by the pre-processing tool.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct StarCatalogFile {
    #[serde(default)]
    pub source: String,
    /// Magnitude ceiling applied upstream, if any.
    #[serde(default)]
    pub magnitude_ceiling: Option<f64>,
    /// A bad row is rejected on its own; only a non-array fails the document.
    #[serde(deserialize_with = "deserialize_rows")]
    pub stars: Vec<CatalogRecord>,
}

impl StarCatalogFile {
    pub fn parse(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_catalog(&self) -> StarCatalog {
        StarCatalog::from_records(self.stars.iter().cloned())
    }
}

#[derive(Resource, Default)]
pub struct CatalogLoader {
    handle: Option<Handle<StarCatalogFile>>,
}

// Start the loading process
pub fn start_loading(mut catalog_loader: ResMut<CatalogLoader>, asset_server: Res<AssetServer>) {
    println!("Loading star catalog from: {}", CATALOG_ASSET_PATH);
    catalog_loader.handle = Some(asset_server.load(CATALOG_ASSET_PATH));
}

/// Ingest the catalog once it arrives. A failed load leaves an empty sky
/// rather than stalling startup.
pub fn load_catalog_system(
    mut loading_progress: ResMut<LoadingProgress>,
    catalog_loader: Res<CatalogLoader>,
    asset_server: Res<AssetServer>,
    catalog_files: Res<Assets<StarCatalogFile>>,
    mut sky_catalog: ResMut<SkyCatalog>,
) {
    if loading_progress.catalog_loaded {
        return;
    }

    let Some(handle) = &catalog_loader.handle else {
        return;
    };

    if let Some(file) = catalog_files.get(handle) {
        let catalog = file.to_catalog();
        println!(
            "✓ Star catalog loaded: {} stars from '{}' ({} rows rejected)",
            catalog.len(),
            file.source,
            catalog.rejected()
        );
        sky_catalog.replace(catalog);
        loading_progress.catalog_loaded = true;
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        let error = CatalogError::Load(err.to_string());
        error!("{error}; continuing with an empty sky");
        loading_progress.catalog_loaded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pre_processed_catalog() {
        let file = StarCatalogFile::parse(
            r#"{
                "source": "stars.csv",
                "magnitude_ceiling": 6.5,
                "stars": [
                    {"id": "32349", "ra": 6.7525, "dec": -16.716, "mag": -1.46, "name": "Sirius"},
                    {"id": "broken", "ra": 1.0, "mag": 2.0}
                ]
            }"#,
        )
        .unwrap();
        let catalog = file.to_catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.rejected(), 1);
        assert_eq!(catalog.get("32349").and_then(|s| s.name.as_deref()), Some("Sirius"));
    }

    #[test]
    fn one_bad_row_keeps_the_rest() {
        let file = StarCatalogFile::parse(
            r#"{
                "source": "hyg.json",
                "stars": [
                    {"id": "32349", "ra": 6.7525, "dec": -16.716, "mag": -1.46},
                    {"id": "91262", "ra": "not a number", "dec": 38.78, "mag": 0.03},
                    42,
                    {"id": 11767, "ra": "2.5302", "dec": 89.264, "mag": 1.97}
                ]
            }"#,
        )
        .unwrap();
        let catalog = file.to_catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rejected(), 2);
        assert!(catalog.contains("32349"));
        assert!(catalog.contains("11767"));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            StarCatalogFile::parse("{\"stars\": 3}"),
            Err(CatalogError::Json(_))
        ));
    }
}
