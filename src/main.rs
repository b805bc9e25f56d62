use std::error::Error;
use std::io::{self, Write};
use std::time::Instant;

use colored::Colorize;
use tracing::info;

use oilfield_vrp::config::constant::{
    DEFAULT_DIESEL_PRICE, DEFAULT_TRUCK_CONSUMPTION, DISTANCE_PROVIDER, LOCATIONS_CSV_PATH,
};
use oilfield_vrp::distance::cache::db_connection;
use oilfield_vrp::distance::matrix::build_distance_matrix;
use oilfield_vrp::evaluation::cost::distance_to_cost;
use oilfield_vrp::init_tracing_and_env;
use oilfield_vrp::report::{render_solution, render_unserved};
use oilfield_vrp::setup::init::{
    load_locations_or_fixture, ordered_coords, ordered_names, setup_trucks, split_locations,
    validate_capacity,
};
use oilfield_vrp::solver::exact::ExactSolver;
use oilfield_vrp::solver::heuristic::{unserved_sites, HeuristicSolver};

fn prompt(label: &str) -> Result<String, Box<dyn Error>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_usize(label: &str) -> Result<usize, Box<dyn Error>> {
    let input = prompt(label)?;
    input
        .parse()
        .map_err(|_| format!("'{input}' is not a whole number").into())
}

fn prompt_f64(label: &str, default: Option<f64>) -> Result<f64, Box<dyn Error>> {
    let input = prompt(label)?;
    if input.is_empty() {
        if let Some(value) = default {
            return Ok(value);
        }
    }
    input
        .parse()
        .map_err(|_| format!("'{input}' is not a number").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env();

    let truck_count = prompt_usize("Insert the number of available trucks: ")?;
    let truck_capacity = prompt_f64(
        "Insert the capacity of the available trucks (liters): ",
        None,
    )?;
    let truck_consumption = prompt_f64(
        &format!(
            "Insert the diesel consumption (km/l) of the available trucks [{DEFAULT_TRUCK_CONSUMPTION}]: "
        ),
        Some(DEFAULT_TRUCK_CONSUMPTION),
    )?;
    let diesel_price = prompt_f64(
        &format!("Insert the current diesel price per liter [{DEFAULT_DIESEL_PRICE}]: "),
        Some(DEFAULT_DIESEL_PRICE),
    )?;

    println!("{}", "VRP Solver Strategies:".blue());
    println!();
    println!("1 - Exact Search");
    println!("2 - Heuristic Search");
    println!("0 - Quit");
    println!();
    let strategy = prompt("Insert the number of the desired solver: ")?;
    if strategy != "1" && strategy != "2" {
        return Ok(());
    }

    let rows = load_locations_or_fixture(LOCATIONS_CSV_PATH);
    let (sites, depot) = split_locations(&rows)?;
    let trucks = setup_trucks(truck_count, truck_capacity, &depot);

    let pool = db_connection().await?;
    let coords = ordered_coords(&rows);
    let names = ordered_names(&rows);
    let distance_matrix = build_distance_matrix(DISTANCE_PROVIDER, &coords, &names, &pool).await;
    let cost_matrix = distance_to_cost(diesel_price, truck_consumption, &distance_matrix);

    let started = Instant::now();
    let (solution, unserved_report) = match strategy.as_str() {
        "1" => {
            validate_capacity(&trucks, &sites)?;
            let solution = ExactSolver::new(&cost_matrix).solve(trucks, &sites);
            (solution, String::new())
        }
        _ => {
            let solution =
                HeuristicSolver::new(&cost_matrix, &distance_matrix).solve(trucks, &sites);
            let unserved = unserved_sites(&solution, &sites);
            let report = render_unserved(&unserved);
            (solution, report)
        }
    };
    let elapsed = started.elapsed();

    info!("Solver finished in {:.3}s", elapsed.as_secs_f64());
    println!();
    print!("{}", render_solution(&solution, elapsed));
    print!("{unserved_report}");

    Ok(())
}
