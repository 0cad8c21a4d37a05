//! Great-circle distance on a spherical Earth.

/// Earth radius used for all distance calculations, in metres.
///
/// A spherical approximation; good enough at city scale.
pub const EARTH_RADIUS_M: f64 = 6_378_100.0;

/// Haversine distance in metres between two points given in decimal degrees.
///
/// Symmetric, and zero when the points coincide.
///
/// # Examples
///
/// ```
/// use angels_server::domain::distance;
///
/// let d = distance(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111_319.5).abs() < 1.0);
/// ```
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let la1 = lat1.to_radians();
    let la2 = lat2.to_radians();
    let d_lat = la2 - la1;
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + la1.cos() * la2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
