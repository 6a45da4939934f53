/// Configuration default values
///
/// All default values for configuration options live here so they can be
/// changed in one place.
// Config file
pub const DEFAULT_CONFIG_FILE: &str = "triple-cache.toml";

// Cache defaults
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;
/// Drain the reclaim queue after every mutation that leaves a stale entry
pub const DEFAULT_RECLAIM_THRESHOLD: usize = 1;

// Demo scenario defaults
pub const DEFAULT_DEMO_NAME: &str = "google";
pub const DEFAULT_DEMO_URL: &str = "http://www.google.com";
pub const DEFAULT_PLACEHOLDER_SIZE: u32 = 16;

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";
