use itertools::Itertools;

use crate::config::constant::BBL_PER_LITER;
use crate::domain::matrix::{Matrix, DEPOT_ROW};
use crate::domain::types::Truck;

/// Converts a volume in liters to oil barrels.
pub fn liter_to_bbl(volume: f64) -> f64 {
    volume * BBL_PER_LITER
}

/// Converts a distance matrix (km) into a cost matrix.
///
/// Each leg costs `distance * (diesel_price / truck_consumption)`: the liters
/// burned over the leg times the price per liter.
pub fn distance_to_cost(diesel_price: f64, truck_consumption: f64, dm: &Matrix) -> Matrix {
    let ratio = diesel_price / truck_consumption;
    dm.map(|distance| distance * ratio)
}

/// Traversal cost of a truck's route, recomputed from scratch:
/// depot -> route[0] -> ... -> route[last] -> depot.
///
/// The solvers keep `var_cost` incrementally; this is the reference value
/// used by debug-build invariant checks and tests.
pub fn route_cost(truck: &Truck, cost_matrix: &Matrix) -> f64 {
    let route = &truck.route;
    if route.is_empty() {
        return 0.0;
    }

    let legs: f64 = route
        .iter()
        .tuple_windows()
        .map(|(a, b)| cost_matrix.get(a.row(), b.row()))
        .sum();

    cost_matrix.get(DEPOT_ROW, route[0].row())
        + legs
        + cost_matrix.get(route[route.len() - 1].row(), DEPOT_ROW)
}

/// Total cost of a fleet state: `fixed_cost + var_cost` summed over trucks
/// that actually drive. Trucks with an empty route are unused and contribute
/// nothing.
pub fn total_cost(trucks: &[Truck]) -> f64 {
    trucks
        .iter()
        .filter(|t| !t.route.is_empty())
        .map(|t| t.fixed_cost + t.var_cost)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Location, Site};

    fn depot() -> Location {
        Location {
            id: 0,
            name: "Depot".to_string(),
        }
    }

    fn site(id: usize, demand: f64) -> Site {
        Site {
            id,
            name: format!("Field {}", id),
            demand,
        }
    }

    #[test]
    fn test_liter_to_bbl_reference_value() {
        assert!((liter_to_bbl(1000.0) - 6.28981).abs() < 1e-9);
        assert_eq!(liter_to_bbl(0.0), 0.0);
    }

    #[test]
    fn test_distance_to_cost_applies_ratio() {
        let dm = Matrix::from_rows(vec![vec![0.0, 35.0], vec![70.0, 0.0]]).unwrap();
        let cm = distance_to_cost(6.62, 17.5, &dm);
        // 35 km at 17.5 km/l burns 2 l -> 13.24
        assert!((cm.get(0, 1) - 13.24).abs() < 1e-9);
        assert!((cm.get(1, 0) - 26.48).abs() < 1e-9);
        assert_eq!(cm.get(0, 0), 0.0);
    }

    #[test]
    fn test_route_cost_traverses_depot_to_depot() {
        let cm = Matrix::from_rows(vec![
            vec![0.0, 10.0, 9.0],
            vec![10.0, 0.0, 4.0],
            vec![8.0, 4.0, 0.0],
        ])
        .unwrap();
        let mut truck = Truck::new(0, &depot(), 10.0, 300.0);
        assert_eq!(route_cost(&truck, &cm), 0.0);

        truck.route.push(site(0, 2.0));
        truck.route.push(site(1, 3.0));
        // depot -> A (10) -> B (4) -> depot (8)
        assert!((route_cost(&truck, &cm) - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_cost_skips_unused_trucks() {
        let d = depot();
        let mut used = Truck::new(0, &d, 10.0, 300.0);
        used.route.push(site(0, 2.0));
        used.var_cost = 22.0;
        let idle = Truck::new(1, &d, 10.0, 300.0);

        assert!((total_cost(&[used, idle]) - 322.0).abs() < 1e-9);
        assert_eq!(total_cost(&[]), 0.0);
    }
}
