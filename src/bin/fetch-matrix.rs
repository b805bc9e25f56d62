//! Refreshes the distance matrix backup CSV from the configured provider.

use std::error::Error;

use tracing::info;

use oilfield_vrp::config::constant::{DISTANCE_PROVIDER, LOCATIONS_CSV_PATH, MATRIX_BACKUP_PATH};
use oilfield_vrp::distance::cache::db_connection;
use oilfield_vrp::distance::matrix::{build_distance_matrix, store_backup};
use oilfield_vrp::init_tracing_and_env;
use oilfield_vrp::setup::init::{load_locations, ordered_coords, ordered_names};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env();

    let rows = load_locations(LOCATIONS_CSV_PATH)?;
    let coords = ordered_coords(&rows);
    let names = ordered_names(&rows);

    let pool = db_connection().await?;
    let matrix = build_distance_matrix(DISTANCE_PROVIDER, &coords, &names, &pool).await;
    store_backup(MATRIX_BACKUP_PATH, &names, &matrix)?;

    info!(
        "Distance matrix backup refreshed ({} locations)",
        names.len()
    );
    Ok(())
}
