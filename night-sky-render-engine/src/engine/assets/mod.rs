//! Asset definitions loaded through the asset server.

/// JSON star catalog asset and its loading systems.
pub mod catalog_asset;
