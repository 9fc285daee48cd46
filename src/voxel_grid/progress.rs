use std::time::{Duration, Instant};

use crate::voxel_grid::config::Pass;

/// Pipeline events emitted while a surface volume is computed.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
	/// Pass `step` of `steps` (counted from 1) begins.
	PassStart { pass: Pass, step: usize, steps: usize },
	PassFinish { pass: Pass, elapsed: Duration },

	/// A rasterization pass is about to paint `atoms` spheres.
	AtomsStart { atoms: usize },
	AtomPainted,

	/// The distance front stopped moving.
	DistanceConverged { seeds: usize, rounds: usize },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Optional sink for [`Progress`] events; silent without a callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
	callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
		Self {
			callback: Some(callback),
		}
	}

	#[inline]
	pub fn report(&self, event: Progress) {
		if let Some(cb) = &self.callback {
			cb(event);
		}
	}

	/// Run one pipeline pass between its start and finish events.
	pub fn pass<R>(&self, pass: Pass, step: usize, steps: usize, run: impl FnOnce() -> R) -> R {
		self.report(Progress::PassStart { pass, step, steps });
		let started = Instant::now();
		let result = run();
		self.report(Progress::PassFinish {
			pass,
			elapsed: started.elapsed(),
		});
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	#[test]
	fn pass_is_wrapped_in_start_and_finish() {
		let seen = Mutex::new(Vec::new());
		let reporter = ProgressReporter::with_callback(Box::new(|event| {
			let tag = match event {
				Progress::PassStart { pass, step, steps } => format!("start {pass} {step}/{steps}"),
				Progress::PassFinish { pass, .. } => format!("finish {pass}"),
				Progress::AtomPainted => "atom".to_string(),
				other => format!("{other:?}"),
			};
			seen.lock().unwrap().push(tag);
		}));

		let value = reporter.pass(Pass::Boundary, 2, 3, || {
			reporter.report(Progress::AtomPainted);
			7
		});
		drop(reporter);

		assert_eq!(value, 7);
		assert_eq!(
			seen.into_inner().unwrap(),
			vec!["start boundary 2/3", "atom", "finish boundary"]
		);
	}

	#[test]
	fn reporter_without_callback_still_runs_pass() {
		let reporter = ProgressReporter::new();
		reporter.report(Progress::DistanceConverged { seeds: 1, rounds: 1 });
		assert_eq!(reporter.pass(Pass::Rasterize, 1, 1, || 3), 3);
	}
}
