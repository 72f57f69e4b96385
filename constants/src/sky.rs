/// Radius of the celestial dome in scene units. Every projected star sits on this sphere.
pub const DOME_RADIUS: f32 = 100.0;

/// Faintest magnitude rendered under a moonless sky.
pub const BASE_LIMITING_MAGNITUDE: f64 = 5.5;

/// Magnitudes lost to a fully illuminated moon.
pub const MOON_LIMIT_PENALTY: f64 = 2.0;

/// Upstream ceiling applied while converting the raw catalog (trimmed Hipparcos).
pub const CATALOG_MAGNITUDE_CEILING: f64 = 6.5;

/// Length of the observation time slider.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Catalog right ascension range in hours.
pub const RA_HOURS_MAX: f64 = 24.0;

/// Catalog declination bound in degrees.
pub const DEC_DEGREES_MAX: f64 = 90.0;
