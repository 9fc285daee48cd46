use crate::voxel_grid::config::ConfigError;

/// Atom positions, radii and external ids as parallel flat arrays.
#[derive(Debug, Clone, Default)]
pub struct AtomInput {
	coordinates: Vec<f32>,
	radii: Vec<f32>,
	atom_index: Vec<u32>,
}

impl AtomInput {
	/// Build an input set, checking that `coordinates` holds `3 * n` finite values,
	/// `radii` holds `n` finite non-negative values and `atom_index` holds `n` ids no larger
	/// than `i32::MAX`, so every id survives export next to the -1 "unset" marker.
	pub fn new(coordinates: Vec<f32>, radii: Vec<f32>, atom_index: Vec<u32>) -> Result<Self, ConfigError> {
		let n = radii.len();
		if coordinates.len() != 3 * n {
			return Err(ConfigError::MismatchedInput {
				what: "coordinates",
				expected: 3 * n,
				found: coordinates.len(),
			});
		}
		if atom_index.len() != n {
			return Err(ConfigError::MismatchedInput {
				what: "atom_index",
				expected: n,
				found: atom_index.len(),
			});
		}
		if let Some(index) = coordinates.iter().position(|c| !c.is_finite()) {
			return Err(ConfigError::NonFiniteInput { what: "coordinates", index });
		}
		if let Some(index) = radii.iter().position(|r| !r.is_finite() || *r < 0.0) {
			return Err(ConfigError::NonFiniteInput { what: "radii", index });
		}
		if let Some(index) = atom_index.iter().position(|&id| i32::try_from(id).is_err()) {
			return Err(ConfigError::AtomIdOutOfRange {
				index,
				value: atom_index[index],
			});
		}

		Ok(Self {
			coordinates,
			radii,
			atom_index,
		})
	}

	/// Input with external ids equal to the internal `0..n` order.
	pub fn with_sequential_index(coordinates: Vec<f32>, radii: Vec<f32>) -> Result<Self, ConfigError> {
		let atom_index = (0..radii.len() as u32).collect();
		Self::new(coordinates, radii, atom_index)
	}

	pub fn len(&self) -> usize {
		self.radii.len()
	}

	pub fn is_empty(&self) -> bool {
		self.radii.is_empty()
	}

	#[inline]
	pub fn position(&self, atom: usize) -> [f32; 3] {
		let c = atom * 3;
		[self.coordinates[c], self.coordinates[c + 1], self.coordinates[c + 2]]
	}

	#[inline]
	pub fn radius(&self, atom: usize) -> f32 {
		self.radii[atom]
	}

	pub fn coordinates(&self) -> &[f32] {
		&self.coordinates
	}

	pub fn radii(&self) -> &[f32] {
		&self.radii
	}

	pub fn external_index(&self, atom: usize) -> u32 {
		self.atom_index[atom]
	}

	/// External id as stored in exported ownership maps.
	pub fn exported_id(&self, atom: usize) -> i32 {
		i32::try_from(self.atom_index[atom]).unwrap_or(-1)
	}

	pub fn max_radius(&self) -> f32 {
		self.radii.iter().copied().fold(0.0, f32::max)
	}
}
