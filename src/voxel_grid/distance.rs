use crate::voxel_grid::grid::Grid3D;
use crate::voxel_grid::utils::{NEIGHBORS, SHELLS};

/// Propagation stops past this multiple of the squared probe radius.
const PROPAGATION_MARGIN: f64 = 1.0404;

/// Grid coordinate of the nearest finalized boundary voxel, one entry per voxel.
/// `u32` axes: a budgeted grid may be long and thin, well past 65536 voxels on one axis.
pub struct BoundPoints {
	points: Vec<[u32; 3]>,
}

impl BoundPoints {
	fn new(total_voxels: usize) -> Self {
		Self {
			points: vec![[0; 3]; total_voxels],
		}
	}

	#[inline]
	pub fn get(&self, index: usize) -> [u32; 3] {
		self.points[index]
	}

	#[inline]
	fn set(&mut self, index: usize, point: [u32; 3]) {
		self.points[index] = point;
	}
}

/// Summary of one distance map run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceStats {
	pub seeds: usize,
	pub rounds: usize,
	/// Occupied voxels left flagged as solid interior.
	pub interior: usize,
}

#[inline]
fn squared_distance(voxel: [usize; 3], point: [u32; 3]) -> f64 {
	let dx = voxel[0] as f64 - point[0] as f64;
	let dy = voxel[1] as f64 - point[1] as f64;
	let dz = voxel[2] as f64 - point[2] as f64;
	dx * dx + dy * dy + dz * dz
}

impl Grid3D {
	/// Squared-distance transform from the boundary voxels into the occupied volume.
	///
	/// `cut_radius` is the probe radius in voxels and bounds how far the front travels;
	/// `cutoff` is the distance at or beyond which an occupied voxel stays solid.
	/// On return `isbound` marks the solid voxels: occupied and either never reached
	/// or reached at squared distance `>= cutoff²`.
	pub fn fast_distance_map(&mut self, cut_radius: f64, cutoff: f64) -> DistanceStats {
		debug_assert!(self.tracks_distance());

		let mut bound_points = BoundPoints::new(self.total_voxels);
		let cut_sq = cut_radius * cut_radius;

		self.isdone.fill(false);
		let mut inlist = Vec::new();
		for index in 0..self.total_voxels {
			if self.inout[index] && self.isbound[index] {
				let (i, j, k) = self.index_to_ijk(index);
				bound_points.set(index, [i as u32, j as u32, k as u32]);
				self.distance[index] = 0.0;
				self.isdone.set(index, true);
				self.isbound.set(index, false);
				inlist.push([i, j, k]);
			}
		}
		let seeds = inlist.len();

		let mut rounds = 0;
		let mut outlist = Vec::new();
		while !inlist.is_empty() {
			outlist.clear();
			self.fast_one_shell(&inlist, &mut bound_points, &mut outlist);
			rounds += 1;

			inlist.clear();
			for &[i, j, k] in &outlist {
				let index = self.ijk_to_index(i, j, k);
				self.isbound.set(index, false);
				if self.distance[index] <= PROPAGATION_MARGIN * cut_sq {
					inlist.push([i, j, k]);
				}
			}
		}

		let cutoff_sq = cutoff * cutoff;
		let track_atoms = self.tracks_atoms();
		let mut interior = 0;
		for index in 0..self.total_voxels {
			self.isbound.set(index, false);
			if !self.inout[index] {
				continue;
			}
			let done = self.isdone[index];
			if !done || self.distance[index] >= cutoff_sq {
				self.isbound.set(index, true);
				interior += 1;
				if track_atoms && done {
					let [bi, bj, bk] = bound_points.get(index);
					let source = self.ijk_to_index(bi as usize, bj as usize, bk as usize);
					self.atom_id[index] = self.atom_id[source];
				}
			}
		}

		DistanceStats {
			seeds,
			rounds,
			interior,
		}
	}

	/// Relax the neighbours of every voxel in `inlist`, one shell at a time.
	fn fast_one_shell(&mut self, inlist: &[[usize; 3]], bound_points: &mut BoundPoints, outlist: &mut Vec<[usize; 3]>) {
		for shell in SHELLS {
			for &[ti, tj, tk] in inlist {
				let bp = bound_points.get(self.ijk_to_index(ti, tj, tk));

				for [di, dj, dk] in &NEIGHBORS[shell.clone()] {
					let (ni, nj, nk) = (ti as isize + di, tj as isize + dj, tk as isize + dk);
					let Some(index) = self.checked_index(ni, nj, nk) else {
						continue;
					};
					if !self.inout[index] {
						continue;
					}
					let voxel = [ni as usize, nj as usize, nk as usize];
					let square = squared_distance(voxel, bp);

					if !self.isdone[index] {
						bound_points.set(index, bp);
						self.distance[index] = square;
						self.isdone.set(index, true);
						self.isbound.set(index, true);
						outlist.push(voxel);
					} else if square < self.distance[index] {
						bound_points.set(index, bp);
						self.distance[index] = square;
						if !self.isbound[index] {
							self.isbound.set(index, true);
							outlist.push(voxel);
						}
					}
				}
			}
		}
	}
}
