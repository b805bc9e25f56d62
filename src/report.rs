use std::fmt::Write as _;
use std::time::Duration;

use colored::Colorize;

use crate::domain::solution::Solution;
use crate::domain::types::Site;

/// Renders a solution as the console report: one block per used truck, a
/// line for idle trucks, the optimized total and the solver wall time.
pub fn render_solution(solution: &Solution, elapsed: Duration) -> String {
    let mut out = String::new();

    if !solution.is_solved() {
        let _ = writeln!(
            out,
            "{}",
            "No solution exists for the given fleet and production volumes.".red()
        );
        return out;
    }

    let mut unused: Vec<String> = Vec::new();
    for truck in &solution.trucks {
        if truck.route.is_empty() {
            unused.push((truck.id + 1).to_string());
            continue;
        }

        let _ = writeln!(out, "{}", format!("Truck {}", truck.id + 1).green());
        let mut route = format!("Route: {}", truck.start.name);
        for site in &truck.route {
            let _ = write!(route, " -> {}", site.name);
        }
        let _ = write!(route, " -> {}", truck.end.name);
        let _ = writeln!(out, "{}", route);
        let _ = writeln!(out, "Load carried: {:.2} bbl", truck.load());
        let _ = writeln!(out, "Cost: $ {:.2}", truck.fixed_cost + truck.var_cost);
        let _ = writeln!(out);
    }

    if !unused.is_empty() {
        let label = if unused.len() == 1 {
            "Unused truck"
        } else {
            "Unused trucks"
        };
        let _ = writeln!(
            out,
            "{}",
            format!("{}: {}.", label, unused.join(", ")).cyan()
        );
    }

    let _ = writeln!(
        out,
        "{}",
        format!("Optimized total cost: $ {:.2}", solution.total_cost).yellow()
    );
    let _ = writeln!(
        out,
        "{}",
        format!("Solver time: {:.3}s", elapsed.as_secs_f64()).blue()
    );

    out
}

/// Red warning block for fields the heuristic left unserved.
pub fn render_unserved(unserved: &[&Site]) -> String {
    if unserved.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = unserved.iter().map(|s| s.name.as_str()).collect();
    format!(
        "{}\n",
        format!("Unserved fields (fleet capacity exhausted): {}.", names.join(", ")).red()
    )
}
