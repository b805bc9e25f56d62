//! Compile-time configuration constants.
//!
//! Mirrors the teacher `src/config.rs` `pub mod constant` shape; values are
//! taken from `original_source` (300 fixed dispatch cost, 0.00628981
//! liter→bbl factor, 6.62 / 17.5 economics defaults, `locations_reduced.csv`
//! input, `distance_matrix.csv` backup).
pub mod constant {
    /// Per-truck fixed dispatch cost added when a truck is used.
    pub const FIXED_DISPATCH_COST: f64 = 300.0;

    /// Conversion factor from liters to barrels (bbl).
    pub const BBL_PER_LITER: f64 = 0.00628981;

    /// Default diesel price per liter (prompt default).
    pub const DEFAULT_DIESEL_PRICE: f64 = 6.62;

    /// Default truck diesel consumption in km/l (prompt default).
    pub const DEFAULT_TRUCK_CONSUMPTION: f64 = 17.5;

    /// Distance provider name used by the dispatcher (`"haversine"`,
    /// `"osrm"`, or `"bing"`).
    pub const DISTANCE_PROVIDER: &str = "osrm";

    /// Location table CSV path.
    pub const LOCATIONS_CSV_PATH: &str = "data/locations_reduced.csv";

    /// Matrix backup CSV path written by the `fetch-matrix` binary.
    pub const MATRIX_BACKUP_PATH: &str = "data/distance_matrix.csv";

    /// Maximum age (days) before a cached distance matrix is refetched.
    pub const CACHE_MAX_AGE_DAYS: i64 = 30;

    /// Fixed seed for deterministic fixture generation.
    pub const FIXTURE_SEED: u64 = 64;

    /// Number of oil-field sites generated by the fixture fallback.
    pub const FIXTURE_SITE_COUNT: usize = 75;
}
