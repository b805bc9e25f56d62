use std::env;
use std::error::Error;

use csv::WriterBuilder;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::distance::cache::{cache_key, load_cached_matrix, store_cached_matrix};
use crate::distance::providers::{create_dm_bing, create_dm_haversine, create_dm_osrm};
use crate::domain::matrix::Matrix;

/// Builds the distance matrix for the given locations (matrix order: depot
/// first, then sites in id order) from the configured provider.
///
/// Road-network providers go through the SQLite cache; any provider failure
/// degrades to the offline haversine matrix with a warning rather than
/// aborting the run.
pub async fn build_distance_matrix(
    provider: &str,
    coords: &[(f64, f64)],
    names: &[String],
    pool: &SqlitePool,
) -> Matrix {
    if provider == "haversine" {
        info!(
            "Computing haversine distance matrix for {} locations",
            coords.len()
        );
        return create_dm_haversine(coords);
    }

    let key = cache_key(names);
    match load_cached_matrix(pool, &key, provider).await {
        Ok(Some(matrix)) => return matrix,
        Ok(None) => {}
        Err(e) => warn!("Distance cache lookup failed: {}", e),
    }

    match fetch_from_provider(provider, coords).await {
        Ok(matrix) => {
            info!(
                "Retrieved {} distance matrix ({} locations)",
                provider,
                matrix.size()
            );
            if let Err(e) = store_cached_matrix(pool, &key, provider, &matrix).await {
                warn!("Failed to store distance matrix in cache: {}", e);
            }
            matrix
        }
        Err(e) => {
            error!("Distance provider '{}' failed: {}", provider, e);
            warn!("Falling back to haversine distances");
            create_dm_haversine(coords)
        }
    }
}

async fn fetch_from_provider(
    provider: &str,
    coords: &[(f64, f64)],
) -> Result<Matrix, Box<dyn Error>> {
    match provider {
        "osrm" => create_dm_osrm(coords).await,
        "bing" => {
            let api_key = env::var("BING_MAPS_KEY")
                .map_err(|_| "DISTANCE_PROVIDER is 'bing' but BING_MAPS_KEY not found in .env")?;
            create_dm_bing(coords, &api_key).await
        }
        other => Err(format!("unknown distance provider '{}'", other).into()),
    }
}

/// Writes a matrix backup CSV: a Name column plus one column per location.
pub fn store_backup(path: &str, names: &[String], matrix: &Matrix) -> Result<(), Box<dyn Error>> {
    if names.len() != matrix.size() {
        return Err(format!(
            "backup: {} names for a {}-location matrix",
            names.len(),
            matrix.size()
        )
        .into());
    }

    let mut wtr = WriterBuilder::new().delimiter(b';').from_path(path)?;
    let mut header = vec!["Name".to_string()];
    header.extend_from_slice(names);
    wtr.write_record(&header)?;

    for (name, row) in names.iter().zip(matrix.to_rows()) {
        let mut record = vec![name.clone()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    info!("Stored distance matrix backup at {}", path);
    Ok(())
}
