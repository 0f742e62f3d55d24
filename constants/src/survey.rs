/// Survey export conventions

/// Image extensions stripped before the numeric suffix is parsed
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".tif", ".tiff"];

/// Key present only in planar EPSG:2177 exports
pub const PLANAR_DISCRIMINANT: &str = "file_name";

/// Key present only in UTM sensor exports
pub const SENSOR_DISCRIMINANT: &str = "ImageName";

/// Planar exports store roll mirrored around this angle (degrees)
pub const PLANAR_ROLL_MIRROR_DEG: f64 = 180.0;
