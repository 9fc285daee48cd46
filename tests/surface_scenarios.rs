use std::collections::VecDeque;

use voxel_surface::{AtomInput, MolecularSurface, SurfaceParams, SurfaceType, SurfaceVolume};

fn atoms(positions: &[[f32; 3]], radius: f32) -> AtomInput {
	let coordinates = positions.iter().flatten().copied().collect();
	AtomInput::with_sequential_index(coordinates, vec![radius; positions.len()]).unwrap()
}

fn three_atoms() -> AtomInput {
	atoms(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [10.0, 10.0, 10.0]], 1.5)
}

/// Voxels with value `value` reachable from `start` through neighbours of the same value.
fn flood(volume: &SurfaceVolume, start: [usize; 3], value: u8, diagonal: bool) -> Vec<bool> {
	let mut seen = vec![false; volume.data.len()];
	let start_index = volume.index(start[0], start[1], start[2]);
	if volume.data[start_index] != value {
		return seen;
	}

	let mut steps = Vec::new();
	for dx in -1isize..=1 {
		for dy in -1isize..=1 {
			for dz in -1isize..=1 {
				let order = dx.abs() + dy.abs() + dz.abs();
				if order == 1 || (diagonal && order > 1) {
					steps.push([dx, dy, dz]);
				}
			}
		}
	}

	seen[start_index] = true;
	let mut queue = VecDeque::from([start]);
	while let Some([x, y, z]) = queue.pop_front() {
		for [dx, dy, dz] in &steps {
			let (nx, ny, nz) = (x as isize + dx, y as isize + dy, z as isize + dz);
			if nx < 0 || ny < 0 || nz < 0 {
				continue;
			}
			let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
			if nx >= volume.nx || ny >= volume.ny || nz >= volume.nz {
				continue;
			}
			let index = volume.index(nx, ny, nz);
			if !seen[index] && volume.data[index] == value {
				seen[index] = true;
				queue.push_back([nx, ny, nz]);
			}
		}
	}
	seen
}

#[test]
fn vws_occupancy_grows_with_scale_factor() {
	let mut surface = MolecularSurface::new(three_atoms());
	let mut previous = 0;
	for scale in [1.0, 2.0, 4.0] {
		let volume = surface
			.volume(&SurfaceParams::new(SurfaceType::Vws).scale_factor(scale))
			.unwrap();
		let filled = volume.filled_count();
		assert!(filled >= previous, "scale {scale}: {filled} < {previous}");
		previous = filled;
	}
}

#[test]
fn sas_with_zero_probe_matches_vws() {
	let mut surface = MolecularSurface::new(three_atoms());
	let vws = surface.volume(&SurfaceParams::new(SurfaceType::Vws)).unwrap();
	let sas = surface
		.volume(&SurfaceParams::new(SurfaceType::Sas).probe_radius(0.0))
		.unwrap();

	assert_eq!((vws.nx, vws.ny, vws.nz), (sas.nx, sas.ny, sas.nz));
	assert_eq!(vws.data, sas.data);
	assert_eq!(vws.atom_index, sas.atom_index);
}

#[test]
fn repeated_runs_are_bit_identical() {
	let params = SurfaceParams::new(SurfaceType::Ses);
	let first = MolecularSurface::new(three_atoms()).volume(&params).unwrap();
	let second = MolecularSurface::new(three_atoms()).volume(&params).unwrap();
	assert_eq!(first.data, second.data);
	assert_eq!(first.atom_index, second.atom_index);

	let mut reused = MolecularSurface::new(three_atoms());
	reused.volume(&SurfaceParams::new(SurfaceType::Ms)).unwrap();
	let third = reused.volume(&params).unwrap();
	assert_eq!(first.data, third.data);
	assert_eq!(first.matrix, third.matrix);
}

#[test]
fn touching_atoms_connect_and_distant_atom_stays_apart() {
	let input = three_atoms();
	let positions: Vec<[f32; 3]> = (0..input.len()).map(|atom| input.position(atom)).collect();
	let volume = MolecularSurface::new(input)
		.volume(&SurfaceParams::new(SurfaceType::Vws).probe_radius(1.4))
		.unwrap();

	let voxels: Vec<[usize; 3]> = positions
		.iter()
		.map(|&p| volume.voxel_of_world(p).unwrap())
		.collect();
	let reached = flood(&volume, voxels[0], 1, false);
	let at = |[x, y, z]: [usize; 3]| volume.index(x, y, z);

	assert!(reached[at(voxels[0])]);
	assert!(reached[at(voxels[1])]);
	assert!(!reached[at(voxels[2])]);
	assert_eq!(volume.data[at(voxels[2])], 1);
}

#[test]
fn single_atom_ms_is_one_solid_without_cavities() {
	let volume = MolecularSurface::new(atoms(&[[0.0, 0.0, 0.0]], 1.0))
		.volume(&SurfaceParams::new(SurfaceType::Ms).scale_factor(4.0))
		.unwrap();

	let filled = volume.filled_count();
	assert!(filled > 0);

	let center = volume.voxel_of_world([0.0, 0.0, 0.0]).unwrap();
	let inside = flood(&volume, center, 1, true);
	assert_eq!(inside.iter().filter(|&&v| v).count(), filled);

	let empty = volume.data.len() - filled;
	let outside = flood(&volume, [0, 0, 0], 0, true);
	assert_eq!(outside.iter().filter(|&&v| v).count(), empty);
}

#[test]
fn ses_contains_vws_and_sas_contains_ses() {
	let mut surface = MolecularSurface::new(three_atoms());
	let vws = surface.volume(&SurfaceParams::new(SurfaceType::Vws)).unwrap();
	let ses = surface.volume(&SurfaceParams::new(SurfaceType::Ses)).unwrap();
	let sas = surface.volume(&SurfaceParams::new(SurfaceType::Sas)).unwrap();

	assert!(ses.filled_count() >= vws.filled_count());
	assert!(sas.filled_count() > ses.filled_count());
	assert_eq!(ses.data.len(), sas.data.len());
	// same inflated grid: every ses voxel is inside the solvent accessible volume
	assert!(ses.data.iter().zip(&sas.data).all(|(&e, &a)| e <= a));
}
