//! Protocol-wide constants

/// Smallest currency unit (8 decimal places)
pub const UNIT: u64 = 100_000_000;

/// Basis-point denominator; all ratio configs must sum to this
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Upper bound (and default) for an asset's investable percentage
pub const MAX_INVESTABLE_PCT: u8 = 100;

/// Seconds in a day, used for pool-health runway math
pub const SECONDS_PER_DAY: i64 = 86_400;
