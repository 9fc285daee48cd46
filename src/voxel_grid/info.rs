use std::env;
use std::sync::Once;

/// Print citation information (only prints once)
pub fn print_citation() {
	static PRINT_CITATION_ONCE: Once = Once::new();
	PRINT_CITATION_ONCE.call_once(|| {
		eprintln!("{}", citation());
	});
}

/// Reference for the distance-transform surface method.
pub fn citation() -> &'static str {
	"Citation: D Xu, Y Zhang. PLoS ONE 4(12): e8140, 2009.\n\
	 Generating Triangulated Macromolecular Surfaces by Euclidean Distance Transform.\n\
	 DOI: https://doi.org/10.1371/journal.pone.0008140\n"
}

/// Executable name, version and build stamp.
pub fn compile_info() -> String {
	let program = env::current_exe()
		.ok()
		.and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
		.unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

	format!(
		"{program} {} (built {} {})",
		env!("CARGO_PKG_VERSION"),
		env!("COMPILE_DATE"),
		env!("COMPILE_TIME")
	)
}

/// Print the build banner (only prints once)
pub fn print_compile_info() {
	static PRINT_COMPILE_ONCE: Once = Once::new();
	PRINT_COMPILE_ONCE.call_once(|| eprintln!("{}", compile_info()));
}
