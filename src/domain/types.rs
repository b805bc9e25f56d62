/// A named stop on the road network. The depot is the single distinguished
/// `Location` every truck starts from and returns to.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: usize,
    pub name: String,
}

/// An oil field with production waiting for pickup.
///
/// Site ids are dense `0..N-1` in input-table order, so a slice of sites is
/// indexable by id. `demand` is in barrels (bbl).
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: usize,
    pub name: String,
    pub demand: f64,
}

impl Site {
    /// Matrix row/column of this site (row 0 is the depot, row `id + 1` is
    /// site `id`).
    pub fn row(&self) -> usize {
        self.id + 1
    }
}

/// Mutable per-truck search state.
///
/// `var_cost` is maintained incrementally by the solvers and always equals
/// the traversal cost of the current route; `remaining` always equals
/// `capacity` minus the demand already loaded.
#[derive(Debug, Clone)]
pub struct Truck {
    pub id: usize,
    pub start: Location,
    pub end: Location,
    pub route: Vec<Site>,
    pub fixed_cost: f64,
    pub var_cost: f64,
    /// Nominal cargo capacity in bbl.
    pub capacity: f64,
    /// Capacity still available in bbl.
    pub remaining: f64,
}

impl Truck {
    pub fn new(id: usize, depot: &Location, capacity: f64, fixed_cost: f64) -> Self {
        Self {
            id,
            start: depot.clone(),
            end: depot.clone(),
            route: Vec::new(),
            fixed_cost,
            var_cost: 0.0,
            capacity,
            remaining: capacity,
        }
    }

    /// Cargo currently on board, in bbl.
    pub fn load(&self) -> f64 {
        self.capacity - self.remaining
    }
}
