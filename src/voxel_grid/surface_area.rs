use crate::voxel_grid::surface::SurfaceVolume;

/// Area weights indexed by edge type, in voxel face units.
const EDGE_WEIGHTS: [f64; 10] = [0.0, 0.894, 1.3409, 1.5879, 4.0, 2.6667, 3.3333, 1.79, 2.68, 4.08];

/// Classify a filled voxel by the pattern of its empty face neighbours.
/// Type 0 is fully buried; the other types weight the voxel's share of the surface.
pub fn classify_edge_point(volume: &SurfaceVolume, x: usize, y: usize, z: usize) -> usize {
	let im = neighbor_filled(volume, [x, y, z], 0, false);
	let ip = neighbor_filled(volume, [x, y, z], 0, true);
	let jm = neighbor_filled(volume, [x, y, z], 1, false);
	let jp = neighbor_filled(volume, [x, y, z], 1, true);
	let km = neighbor_filled(volume, [x, y, z], 2, false);
	let kp = neighbor_filled(volume, [x, y, z], 2, true);

	let nb_empty =
		(!im as usize) + (!ip as usize) + (!jm as usize) + (!jp as usize) + (!km as usize) + (!kp as usize);

	match nb_empty {
		0 | 1 => nb_empty,
		2 => {
			if (!im && !ip) || (!jm && !jp) || (!km && !kp) {
				7
			} else {
				2
			}
		}
		3 => {
			if (!im && !ip) || (!jm && !jp) || (!km && !kp) {
				4
			} else {
				3
			}
		}
		4 => {
			if (im && ip) || (jm && jp) || (km && kp) {
				8
			} else {
				5
			}
		}
		5 => 6,
		6 => 9,
		_ => 0,
	}
}

/// Size summary of a classified surface volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeStats {
	pub filled_voxels: usize,
	/// Enclosed volume in cubic angstroms.
	pub volume: f64,
	/// Estimated surface area in square angstroms.
	pub surface_area: f64,
}

impl SurfaceVolume {
	/// Estimate surface area from the edge type histogram.
	pub fn estimate_surface_area_with_edges(&self) -> (f64, [usize; 10]) {
		let mut edges = [0usize; 10];
		for z in 0..self.nz {
			for y in 0..self.ny {
				for x in 0..self.nx {
					if self.data[self.index(x, y, z)] == 0 {
						continue;
					}
					edges[classify_edge_point(self, x, y, z)] += 1;
				}
			}
		}

		let surf: f64 = edges
			.iter()
			.zip(EDGE_WEIGHTS.iter())
			.map(|(&count, &weight)| count as f64 * weight)
			.sum();
		let voxel = self.voxel_size();
		(surf * voxel * voxel, edges)
	}

	pub fn stats(&self) -> VolumeStats {
		let filled_voxels = self.filled_count();
		let voxel = self.voxel_size();
		let (surface_area, _) = self.estimate_surface_area_with_edges();
		VolumeStats {
			filled_voxels,
			volume: filled_voxels as f64 * voxel * voxel * voxel,
			surface_area,
		}
	}
}

fn neighbor_filled(volume: &SurfaceVolume, at: [usize; 3], axis: usize, positive: bool) -> bool {
	let len = [volume.nx, volume.ny, volume.nz][axis];
	let mut pos = at;
	if positive {
		if pos[axis] + 1 >= len {
			return false;
		}
		pos[axis] += 1;
	} else {
		match pos[axis].checked_sub(1) {
			Some(p) => pos[axis] = p,
			None => return false,
		}
	}
	volume.data[volume.index(pos[0], pos[1], pos[2])] != 0
}
