use std::mem::size_of;

use bitvec::prelude::BitVec;
use tracing::debug;

use crate::voxel_grid::grid;

/// Neighbour offsets ordered by shell: 6 faces, then 12 edges, then 8 corners.
pub const NEIGHBORS: [[isize; 3]; 26] = [
	[1, 0, 0], [-1, 0, 0],
	[0, 1, 0], [0, -1, 0],
	[0, 0, 1], [0, 0, -1],
	[1, 1, 0], [1, -1, 0],
	[-1, 1, 0], [-1, -1, 0],
	[1, 0, 1], [1, 0, -1],
	[-1, 0, 1], [-1, 0, -1],
	[0, 1, 1], [0, 1, -1],
	[0, -1, 1], [0, -1, -1],
	[1, 1, 1], [1, 1, -1],
	[1, -1, 1], [-1, 1, 1],
	[1, -1, -1], [-1, -1, 1],
	[-1, 1, -1], [-1, -1, -1],
];

/// Index ranges of the face, edge and corner shells within [`NEIGHBORS`].
pub const SHELLS: [std::ops::Range<usize>; 3] = [0..6, 6..18, 18..26];

/// Format large numbers with KB, MB, GB, TB suffixes
pub fn format_bytes(bytes: usize) -> String {
	const KB: usize = 1024;
	const MB: usize = KB * 1024;
	const GB: usize = MB * 1024;
	const TB: usize = GB * 1024;

	if bytes >= TB {
		format!("{:.2} TB", bytes as f64 / TB as f64)
	} else if bytes >= GB {
		format!("{:.2} GB", bytes as f64 / GB as f64)
	} else if bytes >= MB {
		format!("{:.2} MB", bytes as f64 / MB as f64)
	} else if bytes >= KB {
		format!("{:.2} KB", bytes as f64 / KB as f64)
	} else {
		format!("{} bytes", bytes)
	}
}

impl grid::Grid3D {
	/// Bytes held by the flag bit vectors and the numeric layers.
	pub fn memory_bytes(&self) -> usize {
		let flag_bytes = (self.inout.capacity() + self.isdone.capacity() + self.isbound.capacity()) / 8;
		let numeric_bytes = self.distance.capacity() * size_of::<f64>() + self.atom_id.capacity() * size_of::<i32>();
		let struct_overhead = size_of::<Self>() - 3 * size_of::<BitVec>();
		struct_overhead + flag_bytes + numeric_bytes
	}

	/// Log a memory breakdown at debug level
	pub fn report_memory(&self) {
		debug!(
			dims = %format!("{} x {} x {}", self.len_i, self.len_j, self.len_k),
			total_voxels = self.total_voxels,
			distance_layer = self.tracks_distance(),
			atom_layer = self.tracks_atoms(),
			memory = %format_bytes(self.memory_bytes()),
			"Grid3D memory report"
		);
	}

	/// Convert (i, j, k) to a linear index
	#[inline]
	pub fn ijk_to_index(&self, i: usize, j: usize, k: usize) -> usize {
		(i * self.len_j + j) * self.len_k + k
	}

	/// Convert a linear index back to (i, j, k)
	#[inline]
	pub fn index_to_ijk(&self, index: usize) -> (usize, usize, usize) {
		let k = index % self.len_k;
		let j = (index / self.len_k) % self.len_j;
		let i = index / (self.len_j * self.len_k);
		(i, j, k)
	}

	/// Linear index of a signed grid coordinate, or `None` when it falls outside the grid
	#[inline]
	pub fn checked_index(&self, i: isize, j: isize, k: isize) -> Option<usize> {
		if i < 0 || j < 0 || k < 0 {
			return None;
		}
		let (i, j, k) = (i as usize, j as usize, k as usize);
		if i >= self.len_i || j >= self.len_j || k >= self.len_k {
			return None;
		}
		Some(self.ijk_to_index(i, j, k))
	}

	/// Count the number of occupied voxels
	pub fn count_inout(&self) -> usize {
		self.inout.count_ones()
	}

	/// Count voxels carrying the done marker
	pub fn count_done(&self) -> usize {
		self.isdone.count_ones()
	}

	/// Count voxels flagged as boundary
	pub fn count_bound(&self) -> usize {
		self.isbound.count_ones()
	}
}
