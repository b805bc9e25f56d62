pub mod bing;
pub mod haversine;
pub mod osrm;

pub use bing::create_dm_bing;
pub use haversine::create_dm_haversine;
pub use osrm::create_dm_osrm;
