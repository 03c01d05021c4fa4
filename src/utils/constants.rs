/// Source file column names
pub const DATE_COLUMN: &str = "DATE";
pub const TMAX_COLUMN: &str = "TMAX";
pub const TMIN_COLUMN: &str = "TMIN";

/// Raw readings at or below this value are "no observation" sentinels
/// (GHCN-Daily family uses -9999).
pub const SENTINEL_THRESHOLD: f64 = -9990.0;

/// If the maximum magnitude across all raw readings exceeds this, the file
/// is assumed to be encoded in tenths of a degree Celsius.
pub const SCALE_BREAK: f64 = 200.0;

/// Default query window when the caller supplies none (or garbage)
pub const DEFAULT_START_YEAR: i32 = 2020;
pub const DEFAULT_END_YEAR: i32 = 2025;

/// Server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5003;
