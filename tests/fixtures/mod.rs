//! Test fixtures for delivery-planner.
//!
//! Provides:
//! - Real Bengaluru locations for realistic passes
//! - Builders for warehouses, agents and orders
//! - A planner wired to a shared in-memory store and a pinned service day

#![allow(dead_code)]

pub mod bengaluru_locations;

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use delivery_planner::capacity::round_trip_km;
use delivery_planner::models::{Agent, AgentId, NewAssignment, Order, OrderId, Warehouse, WarehouseId};
use delivery_planner::{AllocationStore, FixedClock, MemoryStore, Planner, PlannerConfig};

/// Kilometers per degree of latitude on the haversine sphere.
pub const KM_PER_DEGREE: f64 = 111.19492664455873;

pub fn service_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

pub fn next_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()
}

pub fn warehouse(id: i64, lat: f64, lon: f64) -> Warehouse {
    Warehouse {
        id: WarehouseId(id),
        name: format!("warehouse-{}", id),
        lat,
        lon,
    }
}

/// Agent checked in at 08:00 on the service day.
pub fn agent(id: i64, warehouse: i64) -> Agent {
    Agent {
        id: AgentId(id),
        name: format!("agent-{}", id),
        warehouse_id: Some(WarehouseId(warehouse)),
        checked_in_at: Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap(),
    }
}

/// Agent whose last check-in was the day before the service day.
pub fn stale_agent(id: i64, warehouse: i64) -> Agent {
    Agent {
        checked_in_at: Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap(),
        ..agent(id, warehouse)
    }
}

/// Builder for test orders with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestOrder {
    order: Order,
}

impl TestOrder {
    pub fn new(id: i64, warehouse: i64) -> Self {
        Self {
            order: Order {
                id: OrderId(id),
                warehouse_id: WarehouseId(warehouse),
                lat: 0.0,
                lon: 0.0,
                delivery_address: format!("{} Test Street", id),
                scheduled_for: service_day(),
                assigned: false,
                agent_id: None,
                distance_km: 0.0,
                estimated_minutes: 0,
            },
        }
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.order.lat = lat;
        self.order.lon = lon;
        self
    }

    /// `km` due north of `origin`; negative goes south.
    pub fn north_of(self, origin: (f64, f64), km: f64) -> Self {
        self.at(origin.0 + km / KM_PER_DEGREE, origin.1)
    }

    pub fn scheduled_for(mut self, day: NaiveDate) -> Self {
        self.order.scheduled_for = day;
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.order.delivery_address = address.to_string();
        self
    }

    pub fn build(self) -> Order {
        self.order
    }
}

pub type TestPlanner = Planner<Arc<MemoryStore>, FixedClock>;

/// Planner over `store` pinned to the service day.
pub fn planner(store: &Arc<MemoryStore>, config: PlannerConfig) -> TestPlanner {
    Planner::with_clock(Arc::clone(store), FixedClock(service_day()), config).unwrap()
}

/// Seed `store` with a warehouse, its agents and its orders.
pub fn seed(store: &MemoryStore, warehouse: &Warehouse, agents: &[Agent], orders: &[Order]) {
    store.insert_warehouse(warehouse.clone());
    for agent in agents {
        store.insert_agent(agent.clone());
    }
    for order in orders {
        store.insert_order(order.clone());
    }
}

/// Round-trip distance of an agent's committed route for `day`, read back
/// from the store.
pub fn committed_route_km(store: &MemoryStore, warehouse: &Warehouse, agent: AgentId, day: NaiveDate) -> f64 {
    let stops: Vec<(f64, f64)> = store
        .assignments_for(agent, day)
        .iter()
        .filter_map(|row| store.order(row.order_id))
        .map(|order| order.location())
        .collect();
    round_trip_km(warehouse.location(), &stops)
}

/// Assignment rows for `count` fresh orders, committed to `agent` on `day`.
pub fn commit_orders(store: &MemoryStore, agent: AgentId, first_id: i64, count: u32, km_each: f64, day: NaiveDate) {
    let mut rows = Vec::new();
    for (i, seq) in (0..count).zip(1u32..) {
        let id = first_id + i64::from(i);
        store.insert_order(TestOrder::new(id, 1).scheduled_for(day).build());
        rows.push(NewAssignment {
            agent_id: agent,
            order_id: OrderId(id),
            assigned_on: day,
            distance_km: km_each,
            estimated_minutes: (km_each / 0.2) as i64,
            sequence_number: seq,
        });
    }
    store.commit_agent_route(agent, &rows).unwrap();
}
