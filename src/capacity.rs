//! Per-agent route capacity.
//!
//! Admission is judged on the full round trip (warehouse → stops →
//! warehouse) in the order the sequencer will drive it, never on the sum of
//! each stop's standalone distance from the warehouse.

use serde::{Deserialize, Serialize};

use crate::haversine::{estimated_minutes, haversine_km};
use crate::sequencer::visiting_order;
use crate::traits::Stop;

pub const MAX_DISTANCE_KM: f64 = 100.0;
pub const MAX_TIME_MINUTES: i64 = 600;
/// 1 km every 5 minutes.
pub const AVG_SPEED_KM_PER_MIN: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityLimits {
    /// Maximum round-trip distance per agent per day.
    pub max_distance_km: f64,
    /// Maximum round-trip travel minutes per agent per day.
    pub max_time_minutes: i64,
    /// Average travel speed used to turn distance into minutes.
    pub avg_speed_km_per_min: f64,
}

impl Default for CapacityLimits {
    fn default() -> Self {
        Self {
            max_distance_km: MAX_DISTANCE_KM,
            max_time_minutes: MAX_TIME_MINUTES,
            avg_speed_km_per_min: AVG_SPEED_KM_PER_MIN,
        }
    }
}

impl CapacityLimits {
    pub fn minutes_for(&self, km: f64) -> i64 {
        estimated_minutes(km, self.avg_speed_km_per_min)
    }

    pub fn cost_of(&self, distance_km: f64) -> RouteCost {
        RouteCost {
            distance_km,
            minutes: self.minutes_for(distance_km),
        }
    }

    pub fn within(&self, cost: &RouteCost) -> bool {
        cost.distance_km <= self.max_distance_km && cost.minutes <= self.max_time_minutes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCost {
    pub distance_km: f64,
    pub minutes: i64,
}

/// Round-trip distance visiting `stops` in the given order.
pub fn round_trip_km<T: Stop>(origin: (f64, f64), stops: &[T]) -> f64 {
    let mut total = 0.0;
    let mut current = origin;
    for stop in stops {
        let next = stop.location();
        total += haversine_km(current, next);
        current = next;
    }
    total + haversine_km(current, origin)
}

/// Running route of a single agent during planning.
#[derive(Debug, Clone)]
pub struct RouteLoad {
    origin: (f64, f64),
    stops: Vec<(f64, f64)>,
    cost: RouteCost,
}

impl RouteLoad {
    pub fn new(origin: (f64, f64)) -> Self {
        Self {
            origin,
            stops: Vec::new(),
            cost: RouteCost::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn cost(&self) -> RouteCost {
        self.cost
    }

    /// Route cost with `candidate` added, sequenced nearest-neighbour.
    pub fn cost_with(&self, limits: &CapacityLimits, candidate: (f64, f64)) -> RouteCost {
        let mut stops = Vec::with_capacity(self.stops.len() + 1);
        stops.extend_from_slice(&self.stops);
        stops.push(candidate);

        let ordered: Vec<(f64, f64)> = visiting_order(self.origin, &stops)
            .into_iter()
            .map(|i| stops[i])
            .collect();
        limits.cost_of(round_trip_km(self.origin, &ordered))
    }

    /// The new route cost if `candidate` fits within `limits`.
    pub fn admits(&self, limits: &CapacityLimits, candidate: (f64, f64)) -> Option<RouteCost> {
        let cost = self.cost_with(limits, candidate);
        limits.within(&cost).then_some(cost)
    }

    /// Record an admitted stop with the cost returned by [`admits`](Self::admits).
    pub fn push(&mut self, candidate: (f64, f64), cost: RouteCost) {
        self.stops.push(candidate);
        self.cost = cost;
    }
}
