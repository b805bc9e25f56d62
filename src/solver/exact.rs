//! Exhaustive assignment search.
//!
//! Explores every way to distribute the oil fields over the fleet by
//! depth-first recursion: at each level one unvisited field is appended to
//! one truck's route, the truck's running cost is updated incrementally, and
//! the step is undone exactly on backtrack. Assignments that would overrun a
//! truck's remaining capacity are skipped; there is no cost-bound cutoff, so
//! every feasible complete assignment is evaluated and compared.
//!
//! The search is exponential in the number of fields (branching factor is
//! roughly the fleet size per level, depth is the field count). That is a
//! deliberate design limitation: instances here are small, and the optional
//! node budget caps runaway searches by returning the best solution found so
//! far.

use tracing::{debug, info, warn};

use crate::domain::matrix::{Matrix, DEPOT_ROW};
use crate::domain::solution::Solution;
use crate::domain::types::{Site, Truck};
use crate::evaluation::cost::{route_cost, total_cost};

/// Exact solver over a precomputed cost matrix.
///
/// Precondition: total fleet capacity must cover total production
/// (`setup::validate_capacity`); otherwise some fields can never be placed
/// and the search degenerates.
pub struct ExactSolver<'a> {
    cost_matrix: &'a Matrix,
    node_budget: Option<u64>,
}

struct SearchState {
    trucks: Vec<Truck>,
    visited: Vec<bool>,
    visited_count: usize,
    best: Solution,
    nodes: u64,
    out_of_budget: bool,
}

impl<'a> ExactSolver<'a> {
    pub fn new(cost_matrix: &'a Matrix) -> Self {
        Self {
            cost_matrix,
            node_budget: None,
        }
    }

    /// Caps the number of explored search nodes. When the cap is hit the
    /// search unwinds and returns the best solution found so far.
    pub fn with_node_budget(mut self, node_budget: u64) -> Self {
        self.node_budget = Some(node_budget);
        self
    }

    /// Finds the cheapest complete assignment of `sites` to `trucks`.
    ///
    /// Trucks and sites are tried in input order and ties are broken by
    /// first-found (strict `<` improvement), so results are reproducible.
    pub fn solve(&self, trucks: Vec<Truck>, sites: &[Site]) -> Solution {
        let mut state = SearchState {
            trucks,
            visited: vec![false; sites.len()],
            visited_count: 0,
            best: Solution::unsolved(),
            nodes: 0,
            out_of_budget: false,
        };

        self.explore(&mut state, sites);

        info!(
            "Exact search explored {} nodes, best total cost {:.2}",
            state.nodes, state.best.total_cost
        );
        if state.out_of_budget {
            warn!(
                "Node budget of {} exhausted, returning best solution found so far",
                self.node_budget.unwrap_or(0)
            );
        }
        state.best
    }

    fn explore(&self, state: &mut SearchState, sites: &[Site]) {
        state.nodes += 1;
        if let Some(budget) = self.node_budget {
            if state.nodes > budget {
                state.out_of_budget = true;
                return;
            }
        }

        if state.visited_count == sites.len() {
            let cost = total_cost(&state.trucks);
            if cost < state.best.total_cost {
                debug!("New best assignment with total cost {:.2}", cost);
                state.best = Solution {
                    trucks: state.trucks.clone(),
                    total_cost: cost,
                };
            }
            return;
        }

        for truck_idx in 0..state.trucks.len() {
            for site in sites {
                if state.visited[site.id] {
                    continue;
                }
                if state.trucks[truck_idx].remaining - site.demand < 0.0 {
                    continue;
                }

                state.visited[site.id] = true;
                state.visited_count += 1;
                self.assign(&mut state.trucks[truck_idx], site);

                self.explore(state, sites);

                state.visited[site.id] = false;
                state.visited_count -= 1;
                self.unassign(&mut state.trucks[truck_idx], site);

                if state.out_of_budget {
                    return;
                }
            }
        }
    }

    /// Appends `site` to the route, updating the running cost incrementally:
    /// drop the old closing edge, add the edge into the site and the new
    /// closing edge back to the depot.
    fn assign(&self, truck: &mut Truck, site: &Site) {
        if truck.route.is_empty() {
            truck.var_cost += self.cost_matrix.get(DEPOT_ROW, site.row());
            truck.var_cost += self.cost_matrix.get(site.row(), DEPOT_ROW);
        } else {
            let last = truck.route[truck.route.len() - 1].row();
            truck.var_cost -= self.cost_matrix.get(last, DEPOT_ROW);
            truck.var_cost += self.cost_matrix.get(last, site.row());
            truck.var_cost += self.cost_matrix.get(site.row(), DEPOT_ROW);
        }
        truck.route.push(site.clone());
        truck.remaining -= site.demand;

        debug_assert!(
            (truck.var_cost - route_cost(truck, self.cost_matrix)).abs() < 1e-6,
            "incremental route cost drifted from recomputed value"
        );
    }

    /// Reverses `assign` exactly. When the route empties the running cost is
    /// reset to zero instead of algebraically reversed, so float error cannot
    /// accumulate across backtracks.
    fn unassign(&self, truck: &mut Truck, site: &Site) {
        if truck.route.len() == 1 {
            truck.var_cost = 0.0;
        } else {
            let prev = truck.route[truck.route.len() - 2].row();
            truck.var_cost += self.cost_matrix.get(prev, DEPOT_ROW);
            truck.var_cost -= self.cost_matrix.get(prev, site.row());
            truck.var_cost -= self.cost_matrix.get(site.row(), DEPOT_ROW);
        }
        truck.route.pop();
        truck.remaining += site.demand;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constant::FIXED_DISPATCH_COST;
    use crate::distance::providers::create_dm_haversine;
    use crate::domain::types::Location;
    use crate::evaluation::cost::distance_to_cost;
    use crate::fixtures::data_generator::generate_location_records;
    use crate::setup::init::{ordered_coords, setup_trucks, split_locations};
    use itertools::Itertools;
    use proptest::prelude::*;

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

    /// Matrix over [depot, A, B] with the reference costs:
    /// D->A=10, A->D=10, D->B=9, B->D=8, A->B=4, B->A=4.
    fn reference_matrix() -> Matrix {
        Matrix::from_rows(vec![
            vec![0.0, 10.0, 9.0],
            vec![10.0, 0.0, 4.0],
            vec![8.0, 4.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_scenario_prefers_single_route() {
        let cm = reference_matrix();
        let d = depot();
        let trucks = vec![
            Truck::new(0, &d, 6.0, 300.0),
            Truck::new(1, &d, 6.0, 300.0),
        ];
        let sites = vec![site(0, 2.0), site(1, 3.0)];

        let solution = ExactSolver::new(&cm).solve(trucks, &sites);

        // D->A->B->D on one truck (300 + 10 + 4 + 8) beats two round trips
        // (320 + 318).
        assert!((solution.total_cost - 322.0).abs() < 1e-9);
        let used: Vec<&Truck> = solution
            .trucks
            .iter()
            .filter(|t| !t.route.is_empty())
            .collect();
        assert_eq!(used.len(), 1);
        let ids: Vec<usize> = used[0].route.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_zero_sites_costs_nothing() {
        let cm = Matrix::from_rows(vec![vec![0.0]]).unwrap();
        let d = depot();
        let trucks = vec![Truck::new(0, &d, 6.0, 300.0)];

        let solution = ExactSolver::new(&cm).solve(trucks, &[]);

        assert!(solution.is_solved());
        assert_eq!(solution.total_cost, 0.0);
        assert!(solution.trucks.iter().all(|t| t.route.is_empty()));
    }

    #[test]
    fn test_exact_fit_site_fills_truck() {
        let cm = Matrix::from_rows(vec![vec![0.0, 5.0], vec![5.0, 0.0]]).unwrap();
        let d = depot();
        let trucks = vec![Truck::new(0, &d, 4.0, 300.0)];
        let sites = vec![site(0, 4.0)];

        let solution = ExactSolver::new(&cm).solve(trucks, &sites);

        assert!((solution.total_cost - 310.0).abs() < 1e-9);
        assert_eq!(solution.trucks[0].route.len(), 1);
        assert!(solution.trucks[0].remaining.abs() < 1e-9);
    }

    #[test]
    fn test_solver_is_deterministic() {
        let rows = generate_location_records(5);
        let (sites, d) = split_locations(&rows).unwrap();
        let dm = create_dm_haversine(&ordered_coords(&rows));
        let cm = distance_to_cost(6.62, 17.5, &dm);
        let make_trucks = || setup_trucks(2, 20_000.0, &d);

        let first = ExactSolver::new(&cm).solve(make_trucks(), &sites);
        let second = ExactSolver::new(&cm).solve(make_trucks(), &sites);

        assert_eq!(first.total_cost, second.total_cost);
        for (a, b) in first.trucks.iter().zip(&second.trucks) {
            let ids_a: Vec<usize> = a.route.iter().map(|s| s.id).collect();
            let ids_b: Vec<usize> = b.route.iter().map(|s| s.id).collect();
            assert_eq!(ids_a, ids_b);
        }
    }

    #[test]
    fn test_matches_brute_force_optimum() {
        let rows = generate_location_records(5);
        let (sites, d) = split_locations(&rows).unwrap();
        let dm = create_dm_haversine(&ordered_coords(&rows));
        let cm = distance_to_cost(6.62, 17.5, &dm);
        let trucks = setup_trucks(2, 20_000.0, &d);

        let expected = brute_force_optimum(&trucks, &sites, &cm);
        let solution = ExactSolver::new(&cm).solve(trucks, &sites);

        assert!(solution.is_solved());
        assert!((solution.total_cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_node_budget_zero_finds_nothing() {
        let cm = reference_matrix();
        let d = depot();
        let trucks = vec![Truck::new(0, &d, 6.0, 300.0)];
        let sites = vec![site(0, 2.0), site(1, 3.0)];

        let solution = ExactSolver::new(&cm).with_node_budget(0).solve(trucks, &sites);
        assert!(!solution.is_solved());
    }

    #[test]
    fn test_ample_node_budget_matches_unbudgeted_run() {
        let cm = reference_matrix();
        let d = depot();
        let make_trucks = || {
            vec![
                Truck::new(0, &d, 6.0, 300.0),
                Truck::new(1, &d, 6.0, 300.0),
            ]
        };
        let sites = vec![site(0, 2.0), site(1, 3.0)];

        let unbudgeted = ExactSolver::new(&cm).solve(make_trucks(), &sites);
        let budgeted = ExactSolver::new(&cm)
            .with_node_budget(1_000_000)
            .solve(make_trucks(), &sites);

        assert_eq!(unbudgeted.total_cost, budgeted.total_cost);
    }

    /// Reference optimum by direct enumeration: every site-to-truck
    /// assignment, with each truck's stop order optimized over all
    /// permutations.
    fn brute_force_optimum(trucks: &[Truck], sites: &[Site], cm: &Matrix) -> f64 {
        let fleet = trucks.len();
        let mut best = f64::INFINITY;

        for assignment in (0..sites.len())
            .map(|_| 0..fleet)
            .multi_cartesian_product()
        {
            let mut groups: Vec<Vec<&Site>> = vec![Vec::new(); fleet];
            for (site_idx, &truck_idx) in assignment.iter().enumerate() {
                groups[truck_idx].push(&sites[site_idx]);
            }

            let mut total = 0.0;
            let mut feasible = true;
            for (truck, group) in trucks.iter().zip(&groups) {
                if group.is_empty() {
                    continue;
                }
                let demand: f64 = group.iter().map(|s| s.demand).sum();
                if demand > truck.capacity {
                    feasible = false;
                    break;
                }
                let cheapest_order = group
                    .iter()
                    .permutations(group.len())
                    .map(|perm| path_cost(&perm, cm))
                    .fold(f64::INFINITY, f64::min);
                total += truck.fixed_cost + cheapest_order;
            }

            if feasible && total < best {
                best = total;
            }
        }

        best
    }

    fn path_cost(route: &[&&Site], cm: &Matrix) -> f64 {
        let mut cost = cm.get(DEPOT_ROW, route[0].row());
        for pair in route.windows(2) {
            cost += cm.get(pair[0].row(), pair[1].row());
        }
        cost + cm.get(route[route.len() - 1].row(), DEPOT_ROW)
    }

    proptest! {
        #[test]
        fn prop_every_site_served_exactly_once(
            demands in prop::collection::vec(1.0f64..20.0, 1..5),
        ) {
            let n = demands.len();
            let size = n + 1;
            let mut rows = vec![vec![0.0; size]; size];
            for (i, row) in rows.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = (i as f64 - j as f64).abs();
                }
            }
            let cm = Matrix::from_rows(rows).unwrap();

            let d = depot();
            let sites: Vec<Site> = demands
                .iter()
                .enumerate()
                .map(|(id, &demand)| site(id, demand))
                .collect();
            let total: f64 = demands.iter().sum();
            let trucks = vec![
                Truck::new(0, &d, total, FIXED_DISPATCH_COST),
                Truck::new(1, &d, total, FIXED_DISPATCH_COST),
            ];

            let solution = ExactSolver::new(&cm).solve(trucks, &sites);
            prop_assert!(solution.is_solved());

            let mut seen = vec![0usize; n];
            for truck in &solution.trucks {
                prop_assert!(truck.remaining >= -1e-9);
                for s in &truck.route {
                    seen[s.id] += 1;
                }
            }
            prop_assert!(seen.iter().all(|&count| count == 1));
        }
    }
}
