use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PROBE_RADIUS: f64 = 1.4;
pub const DEFAULT_SCALE_FACTOR: f64 = 2.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
	#[error("Unknown surface type '{0}' (expected one of vws, ms, ses, sas)")]
	UnknownSurfaceType(String),

	#[error("Probe radius must be finite and non-negative, got {0}")]
	InvalidProbeRadius(f64),

	#[error("Scale factor must be finite and positive, got {0}")]
	InvalidScaleFactor(f64),

	#[error("Cutoff must be finite and non-negative, got {0}")]
	InvalidCutoff(f64),

	#[error("Input array '{what}' has {found} entries, expected {expected}")]
	MismatchedInput {
		what: &'static str,
		expected: usize,
		found: usize,
	},

	#[error("Input array '{what}' holds a non-finite or negative value at index {index}")]
	NonFiniteInput { what: &'static str, index: usize },

	#[error("Atom id {value} at index {index} exceeds the exportable maximum {max}", max = i32::MAX)]
	AtomIdOutOfRange { index: usize, value: u32 },
}

/// Individual passes of the surface pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
	Rasterize,
	RasterizeInflated,
	Boundary,
	DistanceMap,
	WaalsRefill,
}

impl Pass {
	pub fn name(self) -> &'static str {
		match self {
			Pass::Rasterize => "rasterize",
			Pass::RasterizeInflated => "rasterize (probe inflated)",
			Pass::Boundary => "boundary",
			Pass::DistanceMap => "distance map",
			Pass::WaalsRefill => "van der Waals refill",
		}
	}
}

impl fmt::Display for Pass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceType {
	/// Van der Waals surface.
	Vws,
	/// Molecular surface: solvent excluded without the van der Waals refill.
	Ms,
	/// Solvent excluded surface.
	#[default]
	Ses,
	/// Solvent accessible surface.
	Sas,
}

impl SurfaceType {
	pub fn passes(self) -> &'static [Pass] {
		match self {
			SurfaceType::Vws => &[Pass::Rasterize],
			SurfaceType::Sas => &[Pass::RasterizeInflated],
			SurfaceType::Ms => &[Pass::RasterizeInflated, Pass::Boundary, Pass::DistanceMap],
			SurfaceType::Ses => &[
				Pass::RasterizeInflated,
				Pass::Boundary,
				Pass::DistanceMap,
				Pass::WaalsRefill,
			],
		}
	}

	/// Whether atoms are rasterized with probe-inflated radii.
	pub fn inflates(self) -> bool {
		self != SurfaceType::Vws
	}

	pub fn as_str(self) -> &'static str {
		match self {
			SurfaceType::Vws => "vws",
			SurfaceType::Ms => "ms",
			SurfaceType::Ses => "ses",
			SurfaceType::Sas => "sas",
		}
	}
}

impl fmt::Display for SurfaceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SurfaceType {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"vws" => Ok(SurfaceType::Vws),
			"ms" => Ok(SurfaceType::Ms),
			"ses" => Ok(SurfaceType::Ses),
			"sas" => Ok(SurfaceType::Sas),
			_ => Err(ConfigError::UnknownSurfaceType(s.to_string())),
		}
	}
}

/// Parameters for one volume computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceParams {
	pub surface_type: SurfaceType,
	/// Probe radius in angstroms.
	pub probe_radius: f64,
	/// Voxels per angstrom.
	pub scale_factor: f64,
	/// Squared-distance threshold root in voxel units; `None` resolves to
	/// `probe_radius / scale_factor` once the final scale factor is known.
	pub cutoff: Option<f64>,
	pub set_atom_id: bool,
}

impl Default for SurfaceParams {
	fn default() -> Self {
		Self {
			surface_type: SurfaceType::default(),
			probe_radius: DEFAULT_PROBE_RADIUS,
			scale_factor: DEFAULT_SCALE_FACTOR,
			cutoff: None,
			set_atom_id: true,
		}
	}
}

impl SurfaceParams {
	pub fn new(surface_type: SurfaceType) -> Self {
		Self {
			surface_type,
			..Self::default()
		}
	}

	pub fn probe_radius(mut self, probe_radius: f64) -> Self {
		self.probe_radius = probe_radius;
		self
	}

	pub fn scale_factor(mut self, scale_factor: f64) -> Self {
		self.scale_factor = scale_factor;
		self
	}

	pub fn cutoff(mut self, cutoff: f64) -> Self {
		self.cutoff = Some(cutoff);
		self
	}

	pub fn set_atom_id(mut self, set_atom_id: bool) -> Self {
		self.set_atom_id = set_atom_id;
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.probe_radius.is_finite() || self.probe_radius < 0.0 {
			return Err(ConfigError::InvalidProbeRadius(self.probe_radius));
		}
		if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
			return Err(ConfigError::InvalidScaleFactor(self.scale_factor));
		}
		if let Some(cutoff) = self.cutoff {
			if !cutoff.is_finite() || cutoff < 0.0 {
				return Err(ConfigError::InvalidCutoff(cutoff));
			}
		}
		Ok(())
	}

	/// Cutoff to use against a grid built at `scale_factor`.
	pub fn resolved_cutoff(&self, scale_factor: f64) -> f64 {
		self.cutoff.unwrap_or(self.probe_radius / scale_factor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn surface_type_parses_known_names_case_insensitively() {
		assert_eq!("vws".parse::<SurfaceType>(), Ok(SurfaceType::Vws));
		assert_eq!("MS".parse::<SurfaceType>(), Ok(SurfaceType::Ms));
		assert_eq!(" ses ".parse::<SurfaceType>(), Ok(SurfaceType::Ses));
		assert_eq!("sas".parse::<SurfaceType>(), Ok(SurfaceType::Sas));
	}

	#[test]
	fn surface_type_rejects_unknown_name() {
		let err = "vdw".parse::<SurfaceType>().unwrap_err();
		assert_eq!(err, ConfigError::UnknownSurfaceType("vdw".to_string()));
	}

	#[test]
	fn pass_table_matches_surface_type() {
		assert_eq!(SurfaceType::Vws.passes(), &[Pass::Rasterize]);
		assert_eq!(SurfaceType::Sas.passes(), &[Pass::RasterizeInflated]);
		assert_eq!(SurfaceType::Ms.passes().len(), 3);
		assert_eq!(SurfaceType::Ses.passes().last(), Some(&Pass::WaalsRefill));
		assert!(!SurfaceType::Vws.inflates());
		assert!(SurfaceType::Sas.inflates());
	}

	#[test]
	fn validate_rejects_negative_probe_and_non_positive_scale() {
		let params = SurfaceParams::default().probe_radius(-0.1);
		assert_eq!(params.validate(), Err(ConfigError::InvalidProbeRadius(-0.1)));

		let params = SurfaceParams::default().scale_factor(0.0);
		assert_eq!(params.validate(), Err(ConfigError::InvalidScaleFactor(0.0)));

		let params = SurfaceParams::default().cutoff(f64::NAN);
		assert!(matches!(params.validate(), Err(ConfigError::InvalidCutoff(_))));
	}

	#[test]
	fn zero_probe_radius_is_accepted() {
		let params = SurfaceParams::new(SurfaceType::Sas).probe_radius(0.0);
		assert!(params.validate().is_ok());
		assert_eq!(params.probe_radius, 0.0);
	}

	#[test]
	fn cutoff_defaults_to_probe_over_scale() {
		let params = SurfaceParams::default();
		assert!((params.resolved_cutoff(2.0) - 0.7).abs() < 1e-12);
		assert_eq!(params.clone().cutoff(1.5).resolved_cutoff(2.0), 1.5);
	}
}
