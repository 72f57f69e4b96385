/// Horizon-relative scene axes (right-handed, Y up).
///
/// North = +X, zenith = +Y, east = +Z. Azimuth is measured from north through east,
/// so an observer facing north has east on their right.
pub const NORTH_AXIS: [f64; 3] = [1.0, 0.0, 0.0];
pub const ZENITH_AXIS: [f64; 3] = [0.0, 1.0, 0.0];
pub const EAST_AXIS: [f64; 3] = [0.0, 0.0, 1.0];

/// Map horizontal coordinates (radians) onto a dome of the given radius.
pub fn horizontal_to_scene(altitude: f64, azimuth: f64, radius: f64) -> [f64; 3] {
    let (sin_alt, cos_alt) = altitude.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();
    let horizontal = radius * cos_alt;

    let mut output = [0.0; 3];
    for i in 0..3 {
        output[i] = horizontal * cos_az * NORTH_AXIS[i]
            + radius * sin_alt * ZENITH_AXIS[i]
            + horizontal * sin_az * EAST_AXIS[i];
    }
    output
}
