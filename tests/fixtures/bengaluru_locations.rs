//! Bengaluru neighbourhood locations for realistic test fixtures.
//!
//! Coordinates are approximate neighbourhood centres.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

// ============================================================================
// Depots
// ============================================================================

pub const KORAMANGALA_HUB: Location = Location::new("Koramangala Hub", 12.9352, 77.6245);
pub const YESHWANTPUR_HUB: Location = Location::new("Yeshwantpur Hub", 13.0280, 77.5409);

// ============================================================================
// Delivery neighbourhoods (all within ~25 km of Koramangala)
// ============================================================================

pub const NEIGHBOURHOODS: &[Location] = &[
    Location::new("Indiranagar", 12.9784, 77.6408),
    Location::new("MG Road", 12.9756, 77.6050),
    Location::new("Jayanagar", 12.9299, 77.5826),
    Location::new("HSR Layout", 12.9116, 77.6474),
    Location::new("Whitefield", 12.9698, 77.7500),
    Location::new("Electronic City", 12.8452, 77.6602),
    Location::new("Hebbal", 13.0358, 77.5970),
    Location::new("Malleshwaram", 13.0031, 77.5643),
    Location::new("Banashankari", 12.9255, 77.5468),
    Location::new("Marathahalli", 12.9591, 77.6974),
    Location::new("BTM Layout", 12.9166, 77.6101),
    Location::new("Bellandur", 12.9304, 77.6784),
    Location::new("Rajajinagar", 12.9915, 77.5560),
    Location::new("Kengeri", 12.9081, 77.4823),
    Location::new("Yelahanka", 13.1005, 77.5963),
];

// ============================================================================
// Far-off towns (single round trip from Koramangala exceeds 100 km)
// ============================================================================

pub const OUTSTATION: &[Location] = &[
    Location::new("Tumakuru", 13.3379, 77.1173),
    Location::new("Mysuru", 12.2958, 76.6394),
];
