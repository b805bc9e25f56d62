use crate::domain::matrix::Matrix;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two (lat, lon) points.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1 = from.0.to_radians();
    let lat2 = to.0.to_radians();
    let delta_lat = (to.0 - from.0).to_radians();
    let delta_lon = (to.1 - from.1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Offline distance matrix: pairwise great-circle distances.
///
/// Used directly as a provider and as the fallback when a road-network
/// provider is unreachable.
pub fn create_dm_haversine(coords: &[(f64, f64)]) -> Matrix {
    let n = coords.len();
    let mut dm = Matrix::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = haversine_km(coords[i], coords[j]);
            dm.set(i, j, d);
            dm.set(j, i, d);
        }
    }
    dm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = (-12.5, -38.3);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        // 2 * pi * 6371 / 360 = 111.19 km
        let d = haversine_km((0.0, 0.0), (0.0, 1.0));
        assert!((d - 111.19).abs() < 0.01);
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let coords = [(-12.5, -38.3), (-12.6, -38.1), (-12.4, -38.5)];
        let dm = create_dm_haversine(&coords);
        assert_eq!(dm.size(), 3);
        for i in 0..3 {
            assert_eq!(dm.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(dm.get(i, j), dm.get(j, i));
            }
        }
        assert!(dm.get(0, 1) > 0.0);
    }
}
