/// Angle unit conversions

/// Converts from degrees to radians.
pub fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts from radians to degrees.
pub fn degrees(radians: f64) -> f64 {
    radians.to_degrees()
}
