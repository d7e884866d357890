//! Records exchanged with the store.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(WarehouseId);
record_id!(AgentId);
record_id!(OrderId);
record_id!(AssignmentId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Warehouse {
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub warehouse_id: Option<WarehouseId>,
    pub checked_in_at: DateTime<Utc>,
}

impl Agent {
    /// Eligible for a warehouse pass on `day`.
    pub fn is_checked_in(&self, warehouse: WarehouseId, day: NaiveDate) -> bool {
        self.warehouse_id == Some(warehouse) && self.checked_in_at.date_naive() == day
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub warehouse_id: WarehouseId,
    pub lat: f64,
    pub lon: f64,
    pub delivery_address: String,
    pub scheduled_for: NaiveDate,
    pub assigned: bool,
    pub agent_id: Option<AgentId>,
    /// Distance from the warehouse, recomputed on every pass.
    #[serde(default)]
    pub distance_km: f64,
    /// Travel minutes from the warehouse, recomputed on every pass.
    #[serde(default)]
    pub estimated_minutes: i64,
}

impl Order {
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Row written by a route commit; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub agent_id: AgentId,
    pub order_id: OrderId,
    pub assigned_on: NaiveDate,
    pub distance_km: f64,
    pub estimated_minutes: i64,
    /// 1-based position in the sequenced route.
    pub sequence_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub agent_id: AgentId,
    pub order_id: OrderId,
    pub assigned_on: NaiveDate,
    pub distance_km: f64,
    pub estimated_minutes: i64,
    pub sequence_number: u32,
}

impl Assignment {
    pub fn from_new(id: AssignmentId, row: &NewAssignment) -> Self {
        Self {
            id,
            agent_id: row.agent_id,
            order_id: row.order_id,
            assigned_on: row.assigned_on,
            distance_km: row.distance_km,
            estimated_minutes: row.estimated_minutes,
            sequence_number: row.sequence_number,
        }
    }
}

/// Aggregate of an agent's committed assignments for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentTotals {
    pub count: u32,
    pub total_distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub agent_id: AgentId,
    pub date: NaiveDate,
    pub total_orders: u32,
    pub total_distance_km: f64,
    pub total_pay: f64,
}
