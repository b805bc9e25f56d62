use std::env;
use std::error::Error;

use reqwest::Client;
use serde_json::Value;
use tracing::{trace, warn};

use crate::domain::matrix::Matrix;

/// Fetches a driving-distance matrix from an OSRM `table` service.
///
/// `OSRM_BASE_URL` overrides the public demo server. Distances come back in
/// meters and are converted to kilometers.
pub async fn create_dm_osrm(coords: &[(f64, f64)]) -> Result<Matrix, Box<dyn Error>> {
    if coords.is_empty() {
        return Err("osrm: no coordinates to query".into());
    }

    let base_url = env::var("OSRM_BASE_URL")
        .unwrap_or_else(|_| "https://router.project-osrm.org/table/v1/driving".to_string());

    // OSRM wants longitude,latitude in that order
    let coord_str = coords
        .iter()
        .map(|(lat, lon)| format!("{},{}", lon, lat))
        .collect::<Vec<String>>()
        .join(";");

    let url = format!("{}/{}?annotations=distance", base_url, coord_str);
    if url.len() > 8000 {
        warn!(
            "OSRM URL too long ({} chars), consider self-hosted OSRM or batching",
            url.len()
        );
        return Err("osrm: request URL exceeds 8000 characters".into());
    }

    trace!("osrm: sending GET to {}", url);
    let client = Client::new();
    let response = client
        .get(&url)
        .header("User-Agent", "oilfield-vrp/0.1")
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(format!("osrm: request failed with status {}", response.status()).into());
    }

    let json: Value = response.json().await?;
    parse_osrm_table(&json, coords.len())
}

fn parse_osrm_table(json: &Value, expected: usize) -> Result<Matrix, Box<dyn Error>> {
    let distances = json["distances"]
        .as_array()
        .ok_or("osrm: response has no 'distances' table")?;
    if distances.len() != expected {
        return Err(format!(
            "osrm: response has {} rows, expected {}",
            distances.len(),
            expected
        )
        .into());
    }

    let mut rows = Vec::with_capacity(distances.len());
    for (i, row) in distances.iter().enumerate() {
        let row = row
            .as_array()
            .ok_or_else(|| format!("osrm: row {} is not an array", i))?;
        let mut parsed = Vec::with_capacity(row.len());
        for (j, cell) in row.iter().enumerate() {
            // Convert meters to kilometers; null means unroutable.
            let meters = cell
                .as_f64()
                .ok_or_else(|| format!("osrm: no route between locations {} and {}", i, j))?;
            parsed.push(meters / 1000.0);
        }
        rows.push(parsed);
    }

    Ok(Matrix::from_rows(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_table_converts_to_km() {
        let json = json!({
            "distances": [[0.0, 1500.0], [1600.0, 0.0]]
        });
        let dm = parse_osrm_table(&json, 2).unwrap();
        assert!((dm.get(0, 1) - 1.5).abs() < 1e-9);
        assert!((dm.get(1, 0) - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_parse_table_rejects_null_cell() {
        let json = json!({
            "distances": [[0.0, null], [1600.0, 0.0]]
        });
        assert!(parse_osrm_table(&json, 2).is_err());
    }

    #[test]
    fn test_parse_table_rejects_missing_table() {
        assert!(parse_osrm_table(&json!({"code": "Ok"}), 2).is_err());
    }

    #[test]
    fn test_parse_table_rejects_row_count_mismatch() {
        let json = json!({
            "distances": [[0.0, 1.0], [1.0, 0.0]]
        });
        assert!(parse_osrm_table(&json, 3).is_err());
    }
}
