use crate::voxel_grid::grid::Grid3D;
use crate::voxel_grid::utils::NEIGHBORS;

impl Grid3D {
	/// Flag every occupied voxel that has an unoccupied in-grid 26-neighbour.
	/// Neighbours outside the grid do not count. Returns the number of boundary voxels.
	pub fn build_boundary(&mut self) -> usize {
		let mut count = 0;
		for i in 0..self.len_i {
			for j in 0..self.len_j {
				for k in 0..self.len_k {
					let index = self.ijk_to_index(i, j, k);
					if !self.inout[index] {
						continue;
					}
					if self.has_empty_neighbor(i as isize, j as isize, k as isize) {
						self.isbound.set(index, true);
						count += 1;
					}
				}
			}
		}
		count
	}

	fn has_empty_neighbor(&self, i: isize, j: isize, k: isize) -> bool {
		NEIGHBORS.iter().any(|[di, dj, dk]| {
			self.checked_index(i + di, j + dj, k + dk)
				.is_some_and(|n| !self.inout[n])
		})
	}
}
