use std::time::Instant;

use nalgebra::{Matrix4, Point3, Vector3};
use tracing::{debug, info, instrument};

use crate::voxel_grid::atoms::AtomInput;
use crate::voxel_grid::config::{ConfigError, Pass, SurfaceParams, SurfaceType};
use crate::voxel_grid::geometry::{self, SurfaceGrid, bounding_box};
use crate::voxel_grid::profile::RadiusProfileCache;
use crate::voxel_grid::progress::{Progress, ProgressReporter};
use crate::voxel_grid::raster::atom_centers;

/// Binary surface volume ready for iso-surface extraction.
///
/// `data` is laid out with x varying fastest; volume x/y/z run along world z/y/x.
#[derive(Debug, Clone)]
pub struct SurfaceVolume {
	pub data: Vec<u8>,
	pub nx: usize,
	pub ny: usize,
	pub nz: usize,
	/// External atom id owning each voxel, -1 where unset.
	pub atom_index: Option<Vec<i32>>,
	/// Volume coordinate to world coordinate transform.
	pub matrix: Matrix4<f64>,
	pub scale_factor: f64,
	pub surface_type: SurfaceType,
	origin: Vector3<f64>,
}

impl SurfaceVolume {
	#[inline]
	pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
		x + self.nx * (y + self.ny * z)
	}

	pub fn filled_count(&self) -> usize {
		self.data.iter().filter(|&&v| v != 0).count()
	}

	/// Edge length of one voxel in angstroms.
	pub fn voxel_size(&self) -> f64 {
		1.0 / self.scale_factor
	}

	/// World position of volume voxel (0, 0, 0).
	pub fn origin(&self) -> Vector3<f64> {
		self.origin
	}

	pub fn world_position(&self, x: f64, y: f64, z: f64) -> Point3<f64> {
		geometry::transform_point(&self.matrix, x, y, z)
	}

	/// Volume coordinate of the voxel nearest to a world position, if it lies in the volume.
	pub fn voxel_of_world(&self, position: [f32; 3]) -> Option<[usize; 3]> {
		let s = self.scale_factor;
		let to_grid = |v: f32, min: f64| (0.5 + s * (v as f64 - min)).floor();
		let i = to_grid(position[0], self.origin.x);
		let j = to_grid(position[1], self.origin.y);
		let k = to_grid(position[2], self.origin.z);
		if i < 0.0 || j < 0.0 || k < 0.0 {
			return None;
		}
		let (x, y, z) = (k as usize, j as usize, i as usize);
		if x >= self.nx || y >= self.ny || z >= self.nz {
			return None;
		}
		Some([x, y, z])
	}
}

/// Surface generator for one atom set.
///
/// Radius profiles are kept between calls and rebuilt whenever the scale factor or
/// probe radius they were computed for changes.
pub struct MolecularSurface {
	atoms: AtomInput,
	inflated: Option<RadiusProfileCache>,
	raw: Option<RadiusProfileCache>,
}

impl MolecularSurface {
	pub fn new(atoms: AtomInput) -> Self {
		Self {
			atoms,
			inflated: None,
			raw: None,
		}
	}

	pub fn atoms(&self) -> &AtomInput {
		&self.atoms
	}

	pub fn volume(&mut self, params: &SurfaceParams) -> Result<SurfaceVolume, ConfigError> {
		self.volume_with_progress(params, &ProgressReporter::new())
	}

	#[instrument(skip_all, fields(surface_type = %params.surface_type, atoms = self.atoms.len()))]
	pub fn volume_with_progress(
		&mut self,
		params: &SurfaceParams,
		progress: &ProgressReporter,
	) -> Result<SurfaceVolume, ConfigError> {
		params.validate()?;
		let started = Instant::now();

		let surface_type = params.surface_type;
		let probe = params.probe_radius;
		let passes = surface_type.passes();

		let (min, max) = bounding_box(self.atoms.coordinates());
		let extra_margin = if surface_type.inflates() { probe } else { 0.0 };
		let surface_grid = SurfaceGrid::from_bounds(
			min,
			max,
			self.atoms.max_radius() as f64,
			params.scale_factor,
			extra_margin,
		);
		let scale = surface_grid.scale_factor;
		let cutoff = params.resolved_cutoff(scale);
		let cut_radius = probe * scale;

		let mut grid = surface_grid.build_grid(passes.contains(&Pass::DistanceMap), params.set_atom_id);
		grid.report_memory();
		let centers = atom_centers(&self.atoms, &surface_grid);

		for (step, &pass) in passes.iter().enumerate() {
			let pass_started = Instant::now();
			progress.pass(pass, step + 1, passes.len(), || match pass {
				Pass::Rasterize | Pass::RasterizeInflated => {
					let inflate = pass == Pass::RasterizeInflated;
					let slot = if inflate { &mut self.inflated } else { &mut self.raw };
					let profiles = cached_profiles(slot, self.atoms.radii(), scale, probe, inflate);
					let filled = grid.fill_voxels(&self.atoms, &centers, profiles, progress);
					debug!(filled, "Rasterized atoms");
				}
				Pass::Boundary => {
					let bound = grid.build_boundary();
					debug!(bound, "Extracted boundary voxels");
				}
				Pass::DistanceMap => {
					let stats = grid.fast_distance_map(cut_radius, cutoff);
					debug!(seeds = stats.seeds, rounds = stats.rounds, interior = stats.interior, "Distance map done");
					progress.report(Progress::DistanceConverged {
						seeds: stats.seeds,
						rounds: stats.rounds,
					});
				}
				Pass::WaalsRefill => {
					let profiles = cached_profiles(&mut self.raw, self.atoms.radii(), scale, probe, false);
					let refilled = grid.fill_voxels_waals(&self.atoms, &centers, profiles, progress);
					debug!(refilled, "Refilled van der Waals volume");
				}
			});
			debug!(%pass, elapsed_ms = pass_started.elapsed().as_millis() as u64, "Pass finished");
		}

		let data = grid.classify(surface_type);
		let atom_index = params.set_atom_id.then(|| {
			grid.atom_id
				.iter()
				.map(|&id| {
					if id < 0 {
						-1
					} else {
						self.atoms.exported_id(id as usize)
					}
				})
				.collect()
		});

		let volume = SurfaceVolume {
			data,
			nx: grid.len_k,
			ny: grid.len_j,
			nz: grid.len_i,
			atom_index,
			matrix: surface_grid.matrix,
			scale_factor: scale,
			surface_type,
			origin: surface_grid.min,
		};

		info!(
			nx = volume.nx,
			ny = volume.ny,
			nz = volume.nz,
			filled = volume.filled_count(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Surface volume computed"
		);
		Ok(volume)
	}
}

fn cached_profiles<'c>(
	slot: &'c mut Option<RadiusProfileCache>,
	radii: &[f32],
	scale_factor: f64,
	probe_radius: f64,
	inflate: bool,
) -> &'c RadiusProfileCache {
	if !slot
		.as_ref()
		.is_some_and(|cache| cache.matches(scale_factor, probe_radius, inflate))
	{
		debug!(scale_factor, probe_radius, inflate, "Building radius profiles");
		*slot = None;
	}
	let cache = slot.get_or_insert_with(|| RadiusProfileCache::build(radii, scale_factor, probe_radius, inflate));
	debug_assert!(cache.covers(radii));
	cache
}
