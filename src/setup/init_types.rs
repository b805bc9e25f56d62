use serde::Deserialize;

/// One row of the semicolon-separated location table.
///
/// `depot` is a 0/1 flag; exactly one row per table must carry 1.
/// `production` is the pickup demand in bbl and is ignored for the depot row.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Depot")]
    pub depot: u8,
    #[serde(rename = "Production")]
    pub production: f64,
}
