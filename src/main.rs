mod logging;
mod xyzr;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use voxel_surface::voxel_grid::config::{DEFAULT_PROBE_RADIUS, DEFAULT_SCALE_FACTOR};
use voxel_surface::voxel_grid::info as build_info;
use voxel_surface::voxel_grid::progress::{Progress, ProgressReporter};
use voxel_surface::{MolecularSurface, SurfaceParams, SurfaceType};

/// Voxelize a molecular surface from an XYZR atom file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Input file with one `x y z r` record per atom
	input: PathBuf,

	/// Surface type: vws, ms, ses or sas
	#[arg(short = 't', long = "type", default_value = "ses")]
	surface_type: SurfaceType,

	/// Probe radius in angstroms
	#[arg(short, long, default_value_t = DEFAULT_PROBE_RADIUS)]
	probe: f64,

	/// Voxels per angstrom
	#[arg(short, long, default_value_t = DEFAULT_SCALE_FACTOR)]
	scale: f64,

	/// Distance cutoff in voxels (defaults to probe / scale)
	#[arg(long)]
	cutoff: Option<f64>,

	/// Skip per-voxel atom ownership
	#[arg(long)]
	no_atom_id: bool,

	/// Write the volume to this MRC file
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Increase log verbosity (-v, -vv, -vvv)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Silence all logging and progress output
	#[arg(short, long)]
	quiet: bool,

	/// Also write logs to this file
	#[arg(long)]
	log_file: Option<PathBuf>,
}

impl Cli {
	fn params(&self) -> SurfaceParams {
		let params = SurfaceParams::new(self.surface_type)
			.probe_radius(self.probe)
			.scale_factor(self.scale)
			.set_atom_id(!self.no_atom_id);
		match self.cutoff {
			Some(cutoff) => params.cutoff(cutoff),
			None => params,
		}
	}
}

fn progress_reporter(quiet: bool) -> ProgressReporter<'static> {
	if quiet {
		return ProgressReporter::new();
	}

	let pb = ProgressBar::new(0);
	pb.set_style(
		ProgressStyle::default_bar()
		.template("{msg:>28} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
		.unwrap_or_else(|_| ProgressStyle::default_bar())
		.progress_chars("#>-"),
	);

	ProgressReporter::with_callback(Box::new(move |event| match event {
		Progress::PassStart { pass, step, steps } => {
			pb.set_message(format!("[{step}/{steps}] {pass}"));
			pb.set_position(0);
			pb.set_length(0);
		}
		Progress::AtomsStart { atoms } => pb.set_length(atoms as u64),
		Progress::AtomPainted => pb.inc(1),
		Progress::DistanceConverged { seeds, rounds } => {
			pb.println(format!("distance map: {seeds} seeds, converged after {rounds} rounds"));
		}
		Progress::PassFinish { pass, elapsed } => {
			pb.println(format!("{pass} done in {:.2?}", elapsed));
		}
	}))
}

fn run(cli: &Cli) -> Result<()> {
	let atoms = xyzr::read_xyzr(&cli.input)?;
	info!(atoms = atoms.len(), input = %cli.input.display(), "Loaded atoms");

	let params = cli.params();
	debug!(?params, "Surface parameters");

	let reporter = progress_reporter(cli.quiet);
	let mut surface = MolecularSurface::new(atoms);
	let volume = surface
		.volume_with_progress(&params, &reporter)
		.context("surface computation failed")?;
	drop(reporter);

	let stats = volume.stats();
	println!("Surface type: {}", volume.surface_type);
	println!("Grid: {} x {} x {} (scale {:.4} voxels/A)", volume.nx, volume.ny, volume.nz, volume.scale_factor);
	println!("Filled voxels: {}", stats.filled_voxels);
	println!("Volume: {:.3} A^3", stats.volume);
	println!("Surface area: {:.3} A^2", stats.surface_area);

	if let Some(output) = &cli.output {
		volume
			.write_to_mrc_file(output)
			.with_context(|| format!("failed to write {}", output.display()))?;
		println!("MRC file saved: {}", output.display());
	}

	Ok(())
}

fn main() {
	let cli = Cli::parse();

	if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_ref()) {
		eprintln!("Error: {e:#}");
		std::process::exit(1);
	}

	if !cli.quiet {
		build_info::print_citation();
		build_info::print_compile_info();
	}

	if let Err(e) = run(&cli) {
		eprintln!("Error: {e:#}");
		std::process::exit(1);
	}
}
