pub mod exact;
pub mod heuristic;
