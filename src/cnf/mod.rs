/// The publicly visible name of the tool
pub const PKG_NAME: &str = "starguard";

/// The log level used when none is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// The exit code used when a statement is refused
pub const EXIT_DENIED: u8 = 1;

/// The exit code used when the input could not be loaded
pub const EXIT_INVALID: u8 = 2;
