use bitvec::vec::BitVec;

use crate::voxel_grid::atoms::AtomInput;
use crate::voxel_grid::geometry::SurfaceGrid;
use crate::voxel_grid::grid::Grid3D;
use crate::voxel_grid::profile::{RadiusProfile, RadiusProfileCache};
use crate::voxel_grid::progress::{Progress, ProgressReporter};

/// The eight sign triples of a sphere's octants.
const OCTANTS: [[isize; 3]; 8] = [
	[-1, -1, -1], [-1, -1, 1], [-1, 1, -1], [-1, 1, 1],
	[1, -1, -1], [1, -1, 1], [1, 1, -1], [1, 1, 1],
];

/// Which occupancy layer a rasterization pass writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
	InOut,
	Done,
}

/// Integer grid centers of every atom.
pub fn atom_centers(atoms: &AtomInput, surface_grid: &SurfaceGrid) -> Vec<[isize; 3]> {
	(0..atoms.len())
		.map(|atom| surface_grid.grid_center(atoms.position(atom)))
		.collect()
}

impl Grid3D {
	/// Paint every atom sphere into the occupancy layer and mark the rasterized volume as done.
	/// Returns the number of occupied voxels.
	pub fn fill_voxels(
		&mut self,
		atoms: &AtomInput,
		centers: &[[isize; 3]],
		profiles: &RadiusProfileCache,
		progress: &ProgressReporter,
	) -> usize {
		self.rasterize_atoms(atoms, centers, profiles, Layer::InOut, progress);
		self.isdone.clone_from(&self.inout);
		self.count_inout()
	}

	/// Clear the done layer and re-carve the raw atomic volume into it.
	/// Returns the number of voxels marked done.
	pub fn fill_voxels_waals(
		&mut self,
		atoms: &AtomInput,
		centers: &[[isize; 3]],
		profiles: &RadiusProfileCache,
		progress: &ProgressReporter,
	) -> usize {
		self.isdone.fill(false);
		self.rasterize_atoms(atoms, centers, profiles, Layer::Done, progress);
		self.count_done()
	}

	/// Rasterize all atoms into `layer`, resolving shared voxels to the nearest atom center.
	pub fn rasterize_atoms(
		&mut self,
		atoms: &AtomInput,
		centers: &[[isize; 3]],
		profiles: &RadiusProfileCache,
		layer: Layer,
		progress: &ProgressReporter,
	) {
		progress.report(Progress::AtomsStart { atoms: atoms.len() });
		for atom in 0..atoms.len() {
			self.fill_atom(atom, centers, profiles.get(atoms.radius(atom)), layer);
			progress.report(Progress::AtomPainted);
		}
	}

	fn fill_atom(
		&mut self,
		atom: usize,
		centers: &[[isize; 3]],
		profile: &RadiusProfile,
		layer: Layer,
	) {
		let [cx, cy, cz] = centers[atom];
		let atom_id = atom as i32;
		let (len_i, len_j, len_k) = (self.len_i as isize, self.len_j as isize, self.len_k as isize);

		let Grid3D {
			inout,
			isdone,
			atom_id: owners,
			..
		} = self;
		let bits: &mut BitVec = match layer {
			Layer::InOut => inout,
			Layer::Done => isdone,
		};
		let track_atoms = !owners.is_empty();

		for i in 0..profile.width {
			for j in 0..profile.width {
				let Some(depth) = profile.column(i, j) else {
					continue;
				};

				for [ii, jj, kk] in OCTANTS {
					let mi = ii * i as isize;
					let mk = kk * j as isize;

					for k in 0..=depth {
						let mj = jj * k as isize;
						let (si, sj, sk) = (cx + mi, cy + mj, cz + mk);

						if si < 0 || sj < 0 || sk < 0 || si >= len_i || sj >= len_j || sk >= len_k {
							continue;
						}
						let index = ((si * len_j + sj) * len_k + sk) as usize;

						if !bits[index] {
							bits.set(index, true);
							if track_atoms {
								owners[index] = atom_id;
							}
						} else if track_atoms {
							let other = owners[index];
							if other < 0 || other == atom_id {
								continue;
							}
							let [ox, oy, oz] = centers[other as usize];
							let (dx, dy, dz) = (si - ox, sj - oy, sk - oz);
							if mi * mi + mj * mj + mk * mk < dx * dx + dy * dy + dz * dz {
								owners[index] = atom_id;
							}
						}
					}
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nalgebra::Vector3;

	use crate::voxel_grid::geometry::bounding_box;

	fn setup(coords: Vec<f32>, radii: Vec<f32>, scale: f64) -> (AtomInput, SurfaceGrid, RadiusProfileCache) {
		let atoms = AtomInput::with_sequential_index(coords, radii).unwrap();
		let (min, max) = bounding_box(atoms.coordinates());
		let surface_grid = SurfaceGrid::from_bounds(min, max, atoms.max_radius() as f64, scale, 0.0);
		let profiles = RadiusProfileCache::build(atoms.radii(), surface_grid.scale_factor, 0.0, false);
		(atoms, surface_grid, profiles)
	}

	#[test]
	fn single_atom_fills_symmetric_ball() {
		let (atoms, surface_grid, profiles) = setup(vec![0.0, 0.0, 0.0], vec![1.5], 2.0);
		let centers = atom_centers(&atoms, &surface_grid);
		let mut grid = surface_grid.build_grid(false, true);
		let filled = grid.fill_voxels(&atoms, &centers, &profiles, &ProgressReporter::new());

		assert!(filled > 0);
		assert_eq!(grid.count_done(), filled);

		let [cx, cy, cz] = centers[0];
		// effective radius 3.5 voxels: 3 along every axis is in, 4 is out
		for (di, dj, dk) in [(3, 0, 0), (-3, 0, 0), (0, 3, 0), (0, -3, 0), (0, 0, 3), (0, 0, -3)] {
			let idx = grid.checked_index(cx + di, cy + dj, cz + dk).unwrap();
			assert!(grid.inout[idx], "expected ({di},{dj},{dk}) inside");
		}
		let idx = grid.checked_index(cx + 4, cy, cz).unwrap();
		assert!(!grid.inout[idx]);

		assert!(grid.atom_id.iter().zip(grid.inout.iter()).all(|(&id, bit)| (id == 0) == *bit));
	}

	#[test]
	fn shared_voxels_go_to_nearest_center() {
		let (atoms, surface_grid, profiles) = setup(vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0], vec![1.5, 1.5], 2.0);
		let centers = atom_centers(&atoms, &surface_grid);
		let mut grid = surface_grid.build_grid(false, true);
		grid.fill_voxels(&atoms, &centers, &profiles, &ProgressReporter::new());

		let [ax, ay, az] = centers[0];
		let [bx, _, _] = centers[1];
		assert_eq!(bx - ax, 4);

		// one voxel off center towards the second atom still belongs to the first
		let idx = grid.checked_index(ax + 1, ay, az).unwrap();
		assert_eq!(grid.atom_id[idx], 0);
		let idx = grid.checked_index(ax + 3, ay, az).unwrap();
		assert_eq!(grid.atom_id[idx], 1);
		// equidistant voxel keeps the earlier atom
		let idx = grid.checked_index(ax + 2, ay, az).unwrap();
		assert_eq!(grid.atom_id[idx], 0);
	}

	#[test]
	fn waals_refill_writes_done_layer_only() {
		let (atoms, surface_grid, profiles) = setup(vec![0.0, 0.0, 0.0], vec![1.0], 2.0);
		let centers = atom_centers(&atoms, &surface_grid);
		let mut grid = surface_grid.build_grid(false, false);
		let done = grid.fill_voxels_waals(&atoms, &centers, &profiles, &ProgressReporter::new());

		assert!(done > 0);
		assert_eq!(grid.count_inout(), 0);
	}

	#[test]
	fn spheres_clipped_at_grid_edge_stay_in_bounds() {
		let atoms = AtomInput::with_sequential_index(vec![0.0, 0.0, 0.0], vec![3.0]).unwrap();
		// grid deliberately too small for the sphere
		let surface_grid = SurfaceGrid::from_bounds(Vector3::zeros(), Vector3::zeros(), 0.0, 2.0, 0.0);
		let profiles = RadiusProfileCache::build(atoms.radii(), 2.0, 0.0, false);
		let centers = atom_centers(&atoms, &surface_grid);
		let mut grid = surface_grid.build_grid(false, false);
		let filled = grid.fill_voxels(&atoms, &centers, &profiles, &ProgressReporter::new());
		assert_eq!(filled, grid.total_voxels);
	}
}
