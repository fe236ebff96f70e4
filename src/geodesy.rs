//! Distances between geographic positions

/// Mean radius of the Earth in meters (IUGG)
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Great-circle distance in meters between two positions given in degrees
///
/// Uses the haversine formula, which stays well conditioned for the
/// short hops between consecutive position fixes.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * a.sqrt().min(1.0).asin()
}
