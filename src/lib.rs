pub mod voxel_grid {
	pub mod info;
	pub mod config;
	pub mod atoms;
	pub mod grid;
	pub mod utils;
	pub mod geometry;
	pub mod profile;
	pub mod progress;
	pub mod raster;
	pub mod boundary;
	pub mod distance;
	pub mod classify;
	pub mod surface;
	pub mod surface_area;
	pub mod mrc_output;
}

pub use voxel_grid::atoms::AtomInput;
pub use voxel_grid::config::{ConfigError, SurfaceParams, SurfaceType};
pub use voxel_grid::surface::{MolecularSurface, SurfaceVolume};
