/// Defaults for the tileset partitioner

/// Children per internal node
pub const BRANCHING_FACTOR: usize = 4;

/// Minimum records per child slice
pub const LEAF_SIZE: usize = 5;

/// Mean earth radius used for haversine distances (metres)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Renderable payload referenced by every node
pub const CONTENT_URI: &str = "box.b3dm";

/// 3D Tiles asset version
pub const ASSET_VERSION: &str = "1.0";

/// Version of the tileset layout produced here
pub const TILESET_VERSION: &str = "0.2";
