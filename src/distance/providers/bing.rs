use std::error::Error;
use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::trace;

use crate::domain::matrix::Matrix;

/// Origins are split into blocks of this size; one request per block, fired
/// concurrently and stitched back together in order.
const CHUNK: usize = 10;

#[derive(Debug, Clone, Serialize)]
struct Point {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    origins: Vec<Point>,
    destinations: Vec<Point>,
    #[serde(rename = "travelMode")]
    travel_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(rename = "resourceSets")]
    resource_sets: Vec<ResourceSet>,
}

#[derive(Debug, Deserialize)]
struct ResourceSet {
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    results: Vec<CellResult>,
}

#[derive(Debug, Deserialize)]
struct CellResult {
    #[serde(rename = "originIndex")]
    origin_index: usize,
    #[serde(rename = "destinationIndex")]
    destination_index: usize,
    #[serde(rename = "travelDistance")]
    travel_distance: f64,
}

/// Fetches a driving-distance matrix from the Bing Maps Distance Matrix API.
///
/// Distances come back in kilometers already.
pub async fn create_dm_bing(
    coords: &[(f64, f64)],
    api_key: &str,
) -> Result<Matrix, Box<dyn Error>> {
    if coords.is_empty() {
        return Err("bing: no coordinates to query".into());
    }

    let destinations: Vec<Point> = coords
        .iter()
        .map(|&(latitude, longitude)| Point {
            latitude,
            longitude,
        })
        .collect();
    let client = Arc::new(Client::new());

    let mut tasks = Vec::new();
    for block in destinations.chunks(CHUNK) {
        let client = Arc::clone(&client);
        let api_key = api_key.to_string();
        let origins = block.to_vec();
        let destinations = destinations.clone();
        tasks.push(task::spawn(async move {
            fetch_block(&client, origins, destinations, &api_key).await
        }));
    }

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(coords.len());
    for handle in join_all(tasks).await {
        let block_rows = handle?.map_err(|e| -> Box<dyn Error> { e.into() })?;
        rows.extend(block_rows);
    }

    Ok(Matrix::from_rows(rows)?)
}

async fn fetch_block(
    client: &Client,
    origins: Vec<Point>,
    destinations: Vec<Point>,
    api_key: &str,
) -> Result<Vec<Vec<f64>>, String> {
    let url = format!(
        "https://dev.virtualearth.net/REST/v1/Routes/DistanceMatrix?key={}",
        api_key
    );
    let payload = MatrixRequest {
        origins,
        destinations,
        travel_mode: "driving",
    };

    trace!(
        "bing: sending POST for {} origins x {} destinations",
        payload.origins.len(),
        payload.destinations.len()
    );
    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| format!("bing: request failed: {}", e))?;
    if !response.status().is_success() {
        return Err(format!(
            "bing: request failed with status {}",
            response.status()
        ));
    }

    let body: MatrixResponse = response
        .json()
        .await
        .map_err(|e| format!("bing: invalid response body: {}", e))?;
    block_rows(&body, payload.origins.len(), payload.destinations.len())
}

fn block_rows(
    response: &MatrixResponse,
    origin_count: usize,
    destination_count: usize,
) -> Result<Vec<Vec<f64>>, String> {
    let results = &response
        .resource_sets
        .first()
        .ok_or_else(|| "bing: response has no resource sets".to_string())?
        .resources
        .first()
        .ok_or_else(|| "bing: response has no resources".to_string())?
        .results;

    let mut rows = vec![vec![0.0; destination_count]; origin_count];
    let mut filled = 0usize;
    for cell in results {
        if cell.origin_index >= origin_count || cell.destination_index >= destination_count {
            return Err(format!(
                "bing: result cell ({}, {}) out of range",
                cell.origin_index, cell.destination_index
            ));
        }
        rows[cell.origin_index][cell.destination_index] = cell.travel_distance;
        filled += 1;
    }
    if filled != origin_count * destination_count {
        return Err(format!(
            "bing: expected {} result cells, got {}",
            origin_count * destination_count,
            filled
        ));
    }

    Ok(rows)
}
