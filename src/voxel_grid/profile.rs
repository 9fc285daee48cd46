use std::collections::HashMap;

/// Column heights of one rasterized sphere quadrant.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusProfile {
	/// Lateral half-extent in voxels.
	pub width: usize,
	/// `width * width` column heights, -1 outside the disc.
	pub depth: Vec<i32>,
}

impl RadiusProfile {
	/// Profile of a sphere with `effective_radius` voxels.
	pub fn new(effective_radius: f64) -> Self {
		let sq_radius = effective_radius * effective_radius;
		let width = effective_radius.floor() as usize + 1;
		let mut depth = Vec::with_capacity(width * width);

		for j in 0..width {
			for k in 0..width {
				let txz = (j * j + k * k) as f64;
				if txz > sq_radius {
					depth.push(-1);
				} else {
					depth.push((sq_radius - txz).sqrt().floor() as i32);
				}
			}
		}

		Self { width, depth }
	}

	/// Column height at lateral offset `(j, k)`, `None` outside the disc.
	#[inline]
	pub fn column(&self, j: usize, k: usize) -> Option<usize> {
		let d = self.depth[j * self.width + k];
		if d < 0 { None } else { Some(d as usize) }
	}
}

/// Precomputed radius profiles for one `(scale_factor, probe_radius, inflate)` triple.
///
/// The cache is built once and only read afterwards; a parameter change means building a
/// new cache.
#[derive(Debug, Clone)]
pub struct RadiusProfileCache {
	scale_factor: f64,
	probe_radius: f64,
	inflate: bool,
	profiles: HashMap<u32, RadiusProfile>,
}

impl RadiusProfileCache {
	/// Build profiles for every distinct radius in `radii`.
	pub fn build(radii: &[f32], scale_factor: f64, probe_radius: f64, inflate: bool) -> Self {
		let mut profiles = HashMap::new();
		for &r in radii {
			profiles.entry(r.to_bits()).or_insert_with(|| {
				let r = r as f64;
				let effective_radius = if inflate {
					(r + probe_radius) * scale_factor + 0.5
				} else {
					r * scale_factor + 0.5
				};
				RadiusProfile::new(effective_radius)
			});
		}

		Self {
			scale_factor,
			probe_radius,
			inflate,
			profiles,
		}
	}

	/// Whether this cache was built for the given parameters.
	pub fn matches(&self, scale_factor: f64, probe_radius: f64, inflate: bool) -> bool {
		self.inflate == inflate
			&& self.scale_factor == scale_factor
			&& (!inflate || self.probe_radius == probe_radius)
	}

	/// Whether every radius in `radii` has a profile.
	pub fn covers(&self, radii: &[f32]) -> bool {
		radii.iter().all(|r| self.profiles.contains_key(&r.to_bits()))
	}

	pub fn len(&self) -> usize {
		self.profiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.profiles.is_empty()
	}

	/// Profile for `radius`.
	///
	/// # Panics
	///
	/// Panics if the cache was built without this radius.
	pub fn get(&self, radius: f32) -> &RadiusProfile {
		match self.profiles.get(&radius.to_bits()) {
			Some(profile) => profile,
			None => panic!("no radius profile cached for radius {radius}"),
		}
	}
}
