//! Capacitated vehicle routing for oil-collection runs.
//!
//! A fixed fleet of capacity-limited trucks picks up production from oil
//! fields and hauls it back to a single depot. Two route builders are
//! provided: an exhaustive assignment search that finds the cheapest
//! feasible plan, and a nearest-feasible-neighbor construction that trades
//! optimality for speed.
//!
//! - [`domain`] — locations, trucks, travel matrices, solutions
//! - [`setup`] — location table loading and fleet construction
//! - [`distance`] — distance providers and the SQLite matrix cache
//! - [`evaluation`] — fuel-cost conversion and route cost accounting
//! - [`solver`] — the exact and heuristic route builders
//! - [`report`] — console rendering of solutions
//! - [`fixtures`] — deterministic instance generation

pub mod config;
pub mod distance;
pub mod domain;
pub mod evaluation;
pub mod fixtures;
pub mod report;
pub mod setup;
pub mod solver;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing and environment for the binaries.
pub fn init_tracing_and_env() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();

    dotenv::dotenv().ok();
}
