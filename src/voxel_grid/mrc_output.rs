use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::voxel_grid::surface::SurfaceVolume;

/// Size of the fixed MRC header in bytes.
pub const MRC_HEADER_LEN: usize = 1024;

/// MRC Header Struct
#[derive(Debug)]
pub struct MRCHeader {
	nx: i32, ny: i32, nz: i32,  // Grid dimensions
	mode: i32,                  // Data mode (0: Byte)
	nxstart: i32, nystart: i32, nzstart: i32,  // Start positions
	mx: i32, my: i32, mz: i32,  // Sampling along X, Y, Z
	x_length: f32, y_length: f32, z_length: f32,  // Physical size
	alpha: f32, beta: f32, gamma: f32,  // Angles
	mapc: i32, mapr: i32, maps: i32,  // Axis mapping
	amin: f32, amax: f32, amean: f32,  // Data range
	ispg: i32, nsymbt: i32,  // Symmetry
	xorigin: f32, yorigin: f32, zorigin: f32,  // World position of the first voxel
	rms: f32,
	nlabl: i32,
	label: [u8; 80],
}

impl MRCHeader {
	/// Header for a surface volume. Columns run along world z, rows along y, sections along x.
	pub fn new(volume: &SurfaceVolume) -> Self {
		let voxel = volume.voxel_size() as f32;
		let origin = volume.origin();
		let filled = volume.filled_count();
		let total = volume.data.len().max(1);

		let mut label = [0u8; 80];
		let text = format!("voxel_surface {} scale {:.4}", volume.surface_type, volume.scale_factor);
		let n = text.len().min(label.len());
		label[..n].copy_from_slice(&text.as_bytes()[..n]);

		MRCHeader {
			nx: volume.nx as i32, ny: volume.ny as i32, nz: volume.nz as i32,
			mode: 0,  // BYTE mode
			nxstart: 0, nystart: 0, nzstart: 0,
			mx: volume.nz as i32, my: volume.ny as i32, mz: volume.nx as i32,
			x_length: volume.nz as f32 * voxel,
			y_length: volume.ny as f32 * voxel,
			z_length: volume.nx as f32 * voxel,
			alpha: 90.0, beta: 90.0, gamma: 90.0,
			mapc: 3, mapr: 2, maps: 1,
			amin: 0.0,
			amax: if filled > 0 { 1.0 } else { 0.0 },
			amean: filled as f32 / total as f32,
			ispg: 0, nsymbt: 0,
			xorigin: origin.x as f32, yorigin: origin.y as f32, zorigin: origin.z as f32,
			rms: 0.0,
			nlabl: 1,
			label,
		}
	}

	/// Serialize the header as 1024 little-endian bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(MRC_HEADER_LEN);
		let i32s = |out: &mut Vec<u8>, values: &[i32]| values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes()));
		i32s(&mut out, &[self.nx, self.ny, self.nz, self.mode]);
		i32s(&mut out, &[self.nxstart, self.nystart, self.nzstart, self.mx, self.my, self.mz]);
		let f32s = |out: &mut Vec<u8>, values: &[f32]| values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes()));
		f32s(&mut out, &[self.x_length, self.y_length, self.z_length, self.alpha, self.beta, self.gamma]);
		i32s(&mut out, &[self.mapc, self.mapr, self.maps]);
		f32s(&mut out, &[self.amin, self.amax, self.amean]);
		i32s(&mut out, &[self.ispg, self.nsymbt]);
		i32s(&mut out, &[0; 25]); // extra
		f32s(&mut out, &[self.xorigin, self.yorigin, self.zorigin]);
		out.extend_from_slice(b"MAP ");
		out.extend_from_slice(&[0x44, 0x41, 0x00, 0x00]); // little-endian machine stamp
		f32s(&mut out, &[self.rms]);
		i32s(&mut out, &[self.nlabl]);
		out.extend_from_slice(&self.label);
		out.resize(MRC_HEADER_LEN, 0);
		out
	}

	/// Write the header to an MRC stream
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
		writer.write_all(&self.to_bytes())
	}
}

impl SurfaceVolume {
	/// Save the volume as an MRC file and report save time
	pub fn write_to_mrc_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let start_time = Instant::now();
		let mut file = BufWriter::new(File::create(path)?);

		MRCHeader::new(self).write_to(&mut file)?;
		// data already holds one 0/1 byte per voxel with x fastest
		file.write_all(&self.data)?;
		file.flush()?;

		info!(
			path = %path.display(),
			elapsed_ms = start_time.elapsed().as_millis() as u64,
			"MRC file saved"
		);
		Ok(())
	}
}
