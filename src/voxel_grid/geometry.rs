use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use tracing::{info, warn};

use crate::voxel_grid::grid::Grid3D;

/// Upper bound on `dim_x * dim_y * dim_z * 3`.
pub const MAX_GRID_BUDGET: f64 = 256.0e6;

/// Voxels a snapped axis can gain over `span * scale` from floor/ceil alignment and the +1.
const SNAP_SLACK: f64 = 4.0;

/// Axis-aligned bounding box of a flat `[x0, y0, z0, x1, ...]` coordinate array.
/// An empty array yields a single point at the origin.
pub fn bounding_box(coordinates: &[f32]) -> (Vector3<f64>, Vector3<f64>) {
	if coordinates.len() < 3 {
		return (Vector3::zeros(), Vector3::zeros());
	}

	let mut min = Vector3::repeat(f64::INFINITY);
	let mut max = Vector3::repeat(f64::NEG_INFINITY);
	for xyz in coordinates.chunks_exact(3) {
		let p = Vector3::new(xyz[0] as f64, xyz[1] as f64, xyz[2] as f64);
		min = min.inf(&p);
		max = max.sup(&p);
	}
	(min, max)
}

/// Computed grid parameters based on atom bounds, radius margin and scale factor.
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
	pub min: Vector3<f64>,
	pub max: Vector3<f64>,
	/// Voxel counts along I, J, K (world x, y, z).
	pub dim: [usize; 3],
	/// Translation applied to atom positions before scaling (`-min`).
	pub tran: Vector3<f64>,
	/// Maps exported volume coordinates (x fastest) to world coordinates.
	pub matrix: Matrix4<f64>,
	pub scale_factor: f64,
	/// Whether the voxel budget forced a lower scale factor.
	pub rescaled: bool,
}

impl SurfaceGrid {
	/// Expand the bounds by the margins, snap them to the voxel lattice and size the grid,
	/// shrinking the scale factor once if the grid would exceed [`MAX_GRID_BUDGET`].
	pub fn from_bounds(
		min: Vector3<f64>,
		max: Vector3<f64>,
		max_radius: f64,
		scale_factor: f64,
		extra_margin: f64,
	) -> Self {
		// margin against boundary/round off effects
		let margin = extra_margin + 3.0 / scale_factor + max_radius;
		let min = min.add_scalar(-margin);
		let max = max.add_scalar(margin);

		let (mut min, mut max, mut dim) = snap(&min, &max, scale_factor);
		let mut scale_factor = scale_factor;
		let mut rescaled = false;

		let size = grid_size(&dim);
		if size > MAX_GRID_BUDGET {
			let span = max - min;
			let reduced = budget_scale(&span, scale_factor, size);
			warn!(
				from = scale_factor,
				to = reduced,
				voxels = size / 3.0,
				"Grid exceeds voxel budget; reducing scale factor"
			);
			scale_factor = reduced;
			(min, max, dim) = snap(&min, &max, scale_factor);
			rescaled = true;
		}

		let tran = -min;
		let matrix = volume_to_world(&tran, scale_factor);

		info!(
			dims = ?dim,
			scale_factor,
			rescaled,
			"Surface grid sized"
		);

		Self {
			min,
			max,
			dim,
			tran,
			matrix,
			scale_factor,
			rescaled,
		}
	}

	pub fn total_voxels(&self) -> usize {
		self.dim[0] * self.dim[1] * self.dim[2]
	}

	/// Instantiate a `Grid3D` using these parameters.
	pub fn build_grid(&self, track_distance: bool, track_atoms: bool) -> Grid3D {
		Grid3D::new(self.dim[0], self.dim[1], self.dim[2], track_distance, track_atoms)
	}

	/// Nearest grid coordinate of a world position.
	#[inline]
	pub fn grid_center(&self, position: [f32; 3]) -> [isize; 3] {
		let s = self.scale_factor;
		[
			(0.5 + s * (position[0] as f64 + self.tran.x)).floor() as isize,
			(0.5 + s * (position[1] as f64 + self.tran.y)).floor() as isize,
			(0.5 + s * (position[2] as f64 + self.tran.z)).floor() as isize,
		]
	}
}

fn grid_size(dim: &[usize; 3]) -> f64 {
	dim[0] as f64 * dim[1] as f64 * dim[2] as f64 * 3.0
}

fn snap(min: &Vector3<f64>, max: &Vector3<f64>, scale_factor: f64) -> (Vector3<f64>, Vector3<f64>, [usize; 3]) {
	let min = min.map(|v| (v * scale_factor).floor() / scale_factor);
	let max = max.map(|v| (v * scale_factor).ceil() / scale_factor);
	let span = max - min;
	let dim = [
		calculate_dimension(span.x, scale_factor),
		calculate_dimension(span.y, scale_factor),
		calculate_dimension(span.z, scale_factor),
	];
	(min, max, dim)
}

fn calculate_dimension(span: f64, scale_factor: f64) -> usize {
	((span * scale_factor).ceil().max(0.0) as usize) + 1
}

/// Reduced scale factor for an over-budget grid.
///
/// Starts from `scale * (budget / size)^(1/3)` and lowers it further when the
/// rounding slack of the re-snapped axes could still push the grid over budget,
/// so the result can be smaller than the plain cube-root shrink.
fn budget_scale(span: &Vector3<f64>, scale_factor: f64, size: f64) -> f64 {
	let bound = |factor: f64| {
		span.iter()
			.map(|s| s * scale_factor * factor + SNAP_SLACK)
			.product::<f64>()
			* 3.0
	};

	let factor = (MAX_GRID_BUDGET / size).cbrt();
	if bound(factor) <= MAX_GRID_BUDGET {
		return scale_factor * factor;
	}

	let (mut lo, mut hi) = (0.0, factor);
	for _ in 0..64 {
		let mid = 0.5 * (lo + hi);
		if bound(mid) <= MAX_GRID_BUDGET {
			lo = mid;
		} else {
			hi = mid;
		}
	}
	scale_factor * lo
}

/// Volume coordinates run (K, J, I) against the grid's (I, J, K); this rotates them back
/// onto world axes, scales voxels to angstroms and shifts by the grid origin.
fn volume_to_world(tran: &Vector3<f64>, scale_factor: f64) -> Matrix4<f64> {
	let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2).to_homogeneous();
	let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(
		-1.0 / scale_factor,
		1.0 / scale_factor,
		1.0 / scale_factor,
	));
	let translation = Matrix4::new_translation(&Vector3::new(
		-scale_factor * tran.z,
		-scale_factor * tran.y,
		-scale_factor * tran.x,
	));
	rotation * scale * translation
}

/// Apply a volume-to-world matrix to a volume coordinate.
pub fn transform_point(matrix: &Matrix4<f64>, x: f64, y: f64, z: f64) -> Point3<f64> {
	matrix.transform_point(&Point3::new(x, y, z))
}
