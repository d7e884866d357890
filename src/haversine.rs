//! Great-circle distance between coordinates.
//!
//! Ignores roads entirely; capacity thresholds are defined against this
//! metric so the formula must stay exactly as written.

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two (lat, lon) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whole travel minutes for `km` at `speed_km_per_min`, truncated toward zero.
pub fn estimated_minutes(km: f64, speed_km_per_min: f64) -> i64 {
    (km / speed_km_per_min) as i64
}
