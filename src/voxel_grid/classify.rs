use crate::voxel_grid::config::SurfaceType;
use crate::voxel_grid::grid::Grid3D;

impl Grid3D {
	/// Collapse the accumulated flags into one in/out byte per voxel.
	///
	/// - `vws`, `sas`: in when done, i.e. covered by the rasterized spheres.
	/// - `ms`: in when left solid by the distance map (`isbound`).
	/// - `ses`: in when solid or re-covered by the van der Waals refill.
	pub fn classify(&self, surface_type: SurfaceType) -> Vec<u8> {
		(0..self.total_voxels)
			.map(|index| {
				let done = self.isdone[index];
				let bound = self.isbound[index];
				let inside = match surface_type {
					SurfaceType::Vws | SurfaceType::Sas => done,
					SurfaceType::Ms => bound,
					SurfaceType::Ses => done || bound,
				};
				inside as u8
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn flagged_grid() -> Grid3D {
		// voxel 0: nothing, 1: done, 2: bound, 3: done + bound
		let mut grid = Grid3D::new(1, 1, 4, false, false);
		grid.isdone.set(1, true);
		grid.isbound.set(2, true);
		grid.isdone.set(3, true);
		grid.isbound.set(3, true);
		grid
	}

	#[test]
	fn rasterized_types_follow_done_flag() {
		let grid = flagged_grid();
		assert_eq!(grid.classify(SurfaceType::Vws), vec![0, 1, 0, 1]);
		assert_eq!(grid.classify(SurfaceType::Sas), vec![0, 1, 0, 1]);
	}

	#[test]
	fn ms_follows_solid_flag() {
		assert_eq!(flagged_grid().classify(SurfaceType::Ms), vec![0, 0, 1, 1]);
	}

	#[test]
	fn ses_unions_solid_and_refilled_voxels() {
		assert_eq!(flagged_grid().classify(SurfaceType::Ses), vec![0, 1, 1, 1]);
	}
}
