/// Coordinate reference systems of the supported survey grids

/// UTM zone used when the survey export does not say otherwise
pub const DEFAULT_UTM_ZONE: u8 = 32;

/// Valid UTM zone numbers
pub const UTM_ZONES: std::ops::RangeInclusive<u8> = 1..=60;

/// Northern hemisphere UTM on WGS84, zone appended after `+zone=`
pub const UTM_PROJ_PREFIX: &str = "+proj=utm +ellps=WGS84 +units=m +no_defs +zone=";

/// EPSG:2177, ETRS89 / Poland CS2000 zone 6
pub const EPSG_2177_PROJ: &str = "+proj=tmerc +lat_0=0 +lon_0=18 +k=0.999923 +x_0=6500000 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Geographic WGS84, the target of every conversion
pub const WGS84_GEOGRAPHIC_PROJ: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";
