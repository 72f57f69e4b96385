/// Star catalog asset, relative to the engine's asset root.
pub const CATALOG_ASSET_PATH: &str = "catalog/bright_stars.catalog.json";

/// Extension registered with the JSON asset loader for catalog files.
pub const CATALOG_FILE_EXTENSION: &str = "catalog.json";

/// Star field material shader, relative to the engine's asset root.
pub const STAR_FIELD_SHADER_PATH: &str = "shaders/star_field.wgsl";
