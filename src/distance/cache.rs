use std::error::Error;
use std::str::FromStr;

use chrono::Utc;
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tracing::{info, warn};

use crate::config::constant::CACHE_MAX_AGE_DAYS;
use crate::domain::matrix::Matrix;

/// Opens the SQLite cache at `DATABASE_URL` (or a default file next to the
/// binary) and creates the schema if missing.
pub async fn db_connection() -> Result<SqlitePool, Box<dyn Error>> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        warn!("DATABASE_URL not set, using default SQLite file");
        "sqlite:oilfield_vrp.sqlite".to_string()
    });
    connect(&database_url).await
}

pub async fn connect(database_url: &str) -> Result<SqlitePool, Box<dyn Error>> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    info!("Connected to SQLite database at {database_url}");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS distance_matrices (
            key TEXT NOT NULL,
            provider TEXT NOT NULL,
            matrix TEXT NOT NULL,
            fetched_at INTEGER NOT NULL,
            PRIMARY KEY (key, provider)
        )
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Cache key for a location set: the ordered names, joined.
pub fn cache_key(names: &[String]) -> String {
    names.join(";")
}

/// Returns the cached matrix for this key/provider pair, unless it is absent
/// or older than the configured maximum age.
pub async fn load_cached_matrix(
    pool: &SqlitePool,
    key: &str,
    provider: &str,
) -> Result<Option<Matrix>, Box<dyn Error>> {
    let row: Option<(String, i64)> = sqlx::query_as(
        "SELECT matrix, fetched_at FROM distance_matrices WHERE key = ? AND provider = ?",
    )
    .bind(key)
    .bind(provider)
    .fetch_optional(pool)
    .await?;

    let Some((payload, fetched_at)) = row else {
        return Ok(None);
    };

    let age = Utc::now().timestamp() - fetched_at;
    if age > CACHE_MAX_AGE_DAYS * 24 * 60 * 60 {
        info!(
            "Cached distance matrix expired (fetched at {}), refetching",
            fetched_at
        );
        return Ok(None);
    }

    let rows: Vec<Vec<f64>> = serde_json::from_str(&payload)?;
    let matrix = Matrix::from_rows(rows)?;
    info!(
        "Using cached {} distance matrix ({} locations)",
        provider,
        matrix.size()
    );
    Ok(Some(matrix))
}

pub async fn store_cached_matrix(
    pool: &SqlitePool,
    key: &str,
    provider: &str,
    matrix: &Matrix,
) -> Result<(), Box<dyn Error>> {
    let payload = serde_json::to_string(&matrix.to_rows())?;
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO distance_matrices (key, provider, matrix, fetched_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(key)
    .bind(provider)
    .bind(payload)
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await?;
    info!(
        "Stored {} distance matrix in cache under key '{}'",
        provider, key
    );
    Ok(())
}
