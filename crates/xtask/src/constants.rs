/// Cross-compilation target for the firmware.
pub const TARGET: &str = "thumbv7em-none-eabihf";

/// Chip argument handed to probe-rs.
pub const CHIP: &str = "nRF52840_xxAA";

/// Manifest of the application crate.
pub const APP_MANIFEST: &str = "crates/motlog-app/Cargo.toml";

/// Binary name of the application.
pub const APP_NAME: &str = "motlog-app";
