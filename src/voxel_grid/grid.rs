use bitvec::vec::BitVec;

/// 3D voxel grid holding the per-voxel surface state as parallel layers.
///
/// Voxels are flattened with K varying fastest: `index = i*len_j*len_k + j*len_k + k`.
#[derive(Clone)]
pub struct Grid3D {
	pub len_i: usize,  // Number of voxels along I (world x)
	pub len_j: usize,  // Number of voxels along J (world y)
	pub len_k: usize,  // Number of voxels along K (world z)
	pub total_voxels: usize, // Total number of voxels IxJxK
	pub inout: BitVec,   // occupied
	pub isdone: BitVec,  // distance finalized / rasterization marker
	pub isbound: BitVec, // boundary voxel of the current pass
	pub distance: Vec<f64>, // squared distance, empty unless distance tracking
	pub atom_id: Vec<i32>,  // owning atom, -1 = unset; empty unless atom tracking
}

impl Grid3D {
	/// Create a new voxel grid with all flags cleared.
	/// Distances start at -1 and atom ids at -1 when their layers are enabled.
	pub fn new(len_i: usize, len_j: usize, len_k: usize, track_distance: bool, track_atoms: bool) -> Self {
		debug_assert!(len_i >= 1 && len_j >= 1 && len_k >= 1);
		let total_voxels = len_i * len_j * len_k;

		Self {
			len_i,
			len_j,
			len_k,
			total_voxels,
			inout: BitVec::repeat(false, total_voxels),
			isdone: BitVec::repeat(false, total_voxels),
			isbound: BitVec::repeat(false, total_voxels),
			distance: if track_distance { vec![-1.0; total_voxels] } else { Vec::new() },
			atom_id: if track_atoms { vec![-1; total_voxels] } else { Vec::new() },
		}
	}

	#[inline]
	pub fn tracks_distance(&self) -> bool {
		!self.distance.is_empty()
	}

	#[inline]
	pub fn tracks_atoms(&self) -> bool {
		!self.atom_id.is_empty()
	}
}
