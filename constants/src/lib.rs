/// Shared configuration for survey metadata normalisation and tiling
pub mod coordinate_system;
pub mod survey;
pub mod tiling;
