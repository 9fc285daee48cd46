use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use voxel_surface::AtomInput;

/// Parse whitespace separated `x y z r` records. Blank lines and `#` comments are skipped;
/// atoms are numbered in file order.
pub fn parse_xyzr(text: &str) -> Result<AtomInput> {
	let mut coordinates = Vec::new();
	let mut radii = Vec::new();

	for (line_no, raw_line) in text.lines().enumerate() {
		let line = raw_line
			.split_once('#')
			.map(|(before, _)| before)
			.unwrap_or(raw_line)
			.trim();
		if line.is_empty() {
			continue;
		}

		let fields: Vec<&str> = line.split_whitespace().collect();
		if fields.len() < 4 {
			bail!("line {}: expected 'x y z r', got '{}'", line_no + 1, line);
		}
		for field in &fields[..3] {
			let value: f32 = field
				.parse()
				.with_context(|| format!("line {}: bad coordinate '{}'", line_no + 1, field))?;
			coordinates.push(value);
		}
		let radius: f32 = fields[3]
			.parse()
			.with_context(|| format!("line {}: bad radius '{}'", line_no + 1, fields[3]))?;
		radii.push(radius);
	}

	Ok(AtomInput::with_sequential_index(coordinates, radii)?)
}

pub fn read_xyzr<P: AsRef<Path>>(path: P) -> Result<AtomInput> {
	let path = path.as_ref();
	let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
	parse_xyzr(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn parses_records_and_skips_comments() {
		let atoms = parse_xyzr("# header\n1 2 3 1.5\n\n4.0 5.0 6.0 1.8 extra # trailing\n").unwrap();
		assert_eq!(atoms.len(), 2);
		assert_eq!(atoms.position(1), [4.0, 5.0, 6.0]);
		assert_eq!(atoms.radius(1), 1.8);
		assert_eq!(atoms.external_index(1), 1);
	}

	#[test]
	fn short_line_is_rejected_with_line_number() {
		let err = parse_xyzr("1 2 3 1.5\n1 2 3\n").unwrap_err();
		assert!(err.to_string().contains("line 2"));
	}

	#[test]
	fn negative_radius_is_rejected() {
		assert!(parse_xyzr("0 0 0 -1\n").is_err());
	}

	#[test]
	fn reads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "0 0 0 1.5").unwrap();
		let atoms = read_xyzr(file.path()).unwrap();
		assert_eq!(atoms.len(), 1);
	}

	#[test]
	fn missing_file_reports_path() {
		let err = read_xyzr("/nonexistent/atoms.xyzr").unwrap_err();
		assert!(format!("{err:#}").contains("/nonexistent/atoms.xyzr"));
	}
}
