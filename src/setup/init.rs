use std::error::Error;
use std::io::Read;

use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::config::constant::{FIXED_DISPATCH_COST, FIXTURE_SITE_COUNT};
use crate::domain::types::{Location, Site, Truck};
use crate::evaluation::cost::liter_to_bbl;
use crate::fixtures::data_generator::generate_location_records;
use crate::setup::init_types::LocationRecord;

/// Reads the location table from a semicolon-separated CSV file.
pub fn load_locations(path: &str) -> Result<Vec<LocationRecord>, Box<dyn Error>> {
    let reader = ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_path(path)?;
    parse_locations(reader)
}

fn parse_locations<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<LocationRecord>, Box<dyn Error>> {
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: LocationRecord = record?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err("location table is empty".into());
    }
    Ok(rows)
}

/// Loads the location table, falling back to a deterministic generated
/// instance when the CSV cannot be read.
pub fn load_locations_or_fixture(path: &str) -> Vec<LocationRecord> {
    match load_locations(path) {
        Ok(rows) => {
            info!("Loaded {} locations from {}", rows.len(), path);
            rows
        }
        Err(err) => {
            warn!(
                "Failed to read location table at {}: {}. Falling back to a generated instance.",
                path, err
            );
            generate_location_records(FIXTURE_SITE_COUNT)
        }
    }
}

/// Separates the depot from the oil fields.
///
/// Sites receive dense ids `0..N-1` in table order. Fails when the table has
/// no depot row, more than one, or a site without positive production.
pub fn split_locations(rows: &[LocationRecord]) -> Result<(Vec<Site>, Location), Box<dyn Error>> {
    let mut sites = Vec::new();
    let mut depot: Option<Location> = None;

    for row in rows {
        if row.depot == 0 {
            if row.production <= 0.0 {
                return Err(format!(
                    "site '{}' has non-positive production {}",
                    row.name, row.production
                )
                .into());
            }
            sites.push(Site {
                id: sites.len(),
                name: row.name.clone(),
                demand: row.production,
            });
        } else {
            if depot.is_some() {
                return Err("location table has more than one depot row".into());
            }
            depot = Some(Location {
                id: 0,
                name: row.name.clone(),
            });
        }
    }

    let depot = depot.ok_or("location table has no depot row")?;
    info!(
        "Split locations into depot '{}' and {} oil fields",
        depot.name,
        sites.len()
    );
    Ok((sites, depot))
}

/// Coordinates in matrix order: depot first, then sites in id order.
pub fn ordered_coords(rows: &[LocationRecord]) -> Vec<(f64, f64)> {
    matrix_order(rows).map(|r| (r.latitude, r.longitude)).collect()
}

/// Location names in matrix order: depot first, then sites in id order.
pub fn ordered_names(rows: &[LocationRecord]) -> Vec<String> {
    matrix_order(rows).map(|r| r.name.clone()).collect()
}

fn matrix_order(rows: &[LocationRecord]) -> impl Iterator<Item = &LocationRecord> {
    let depot = rows.iter().filter(|r| r.depot != 0);
    let sites = rows.iter().filter(|r| r.depot == 0);
    depot.chain(sites)
}

/// Builds the fleet: `num_trucks` identical trucks stationed at the depot,
/// capacity converted from liters to bbl.
pub fn setup_trucks(num_trucks: usize, capacity_liters: f64, depot: &Location) -> Vec<Truck> {
    let capacity = liter_to_bbl(capacity_liters);
    info!(
        "Setting up {} trucks of {:.2} bbl each at depot '{}'",
        num_trucks, capacity, depot.name
    );
    (0..num_trucks)
        .map(|id| Truck::new(id, depot, capacity, FIXED_DISPATCH_COST))
        .collect()
}

/// Precondition for the exact solver: the fleet must be able to carry the
/// whole production, otherwise the assignment search cannot complete.
pub fn validate_capacity(trucks: &[Truck], sites: &[Site]) -> Result<(), Box<dyn Error>> {
    let fleet: f64 = trucks.iter().map(|t| t.capacity).sum();
    let demand: f64 = sites.iter().map(|s| s.demand).sum();
    if fleet < demand {
        return Err(format!(
            "total fleet capacity {:.2} bbl is below total production {:.2} bbl",
            fleet, demand
        )
        .into());
    }
    Ok(())
}
