/// Fixed-point scale for every monetary amount (six decimal places).
pub const PRECISION: u64 = 1_000_000;

/// Number of decimal places carried by `PRECISION`.
pub const DECIMALS: usize = 6;

/// Basis-point denominator (100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Platform fee taken from the grand total at settlement (2%).
pub const DEFAULT_FEE_BPS: u16 = 200;

/// Creator's share of the post-fee remainder when the creator is correct (20%).
/// Backers split the other 80%.
pub const DEFAULT_CREATOR_SHARE_BPS: u16 = 2_000;

/// Minimum creator stake to open an analysis pool (1.000000).
pub const DEFAULT_MIN_POOL_STAKE: u64 = PRECISION;

/// Base reputation points for one resolved pool, before the stake multiplier.
pub const BASE_POOL_POINTS: i64 = 100;

/// Multiplier of 1.0x expressed in basis points.
pub const MULTIPLIER_ONE_X: u16 = 10_000;

/// Resolved pools required before the top tier is reachable.
pub const DEFAULT_LEGEND_MIN_POOLS: u32 = 20;
