use std::process::Command;

/// Current local time rendered with a `date` format string, or "unknown" where `date` is unavailable.
fn stamp(format: &str) -> String {
	Command::new("date")
		.arg(format)
		.output()
		.ok()
		.filter(|output| output.status.success())
		.map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
		.unwrap_or_else(|| "unknown".to_string())
}

fn main() {
	println!("cargo:rerun-if-changed=build.rs");
	println!("cargo:rustc-env=COMPILE_DATE={}", stamp("+%Y-%m-%d"));
	println!("cargo:rustc-env=COMPILE_TIME={}", stamp("+%H:%M:%S"));
}
