//! Seams between the planner core and its collaborators.
//!
//! The store is the system of record: the planner reads candidate agents and
//! orders from it and hands back finished routes to persist. Implement
//! [`AllocationStore`] over whatever database backs the service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::StoreError;
use crate::models::{
    Agent, AgentId, AssignmentTotals, NewAssignment, Order, OrderId, Payout, WarehouseId,
};

/// Anything with a position that can be visited on a route.
pub trait Stop {
    /// Location coordinates (lat, lon) in degrees.
    fn location(&self) -> (f64, f64);
}

impl Stop for Order {
    fn location(&self) -> (f64, f64) {
        Order::location(self)
    }
}

impl Stop for (f64, f64) {
    fn location(&self) -> (f64, f64) {
        *self
    }
}

impl<T: Stop + ?Sized> Stop for &T {
    fn location(&self) -> (f64, f64) {
        (**self).location()
    }
}

/// Source of the current service day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Pinned day, for tests and replays of a past day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// External store consumed by the planner.
///
/// `commit_agent_route` and `postpone_orders` must each be atomic: either
/// every contained write lands or none does.
pub trait AllocationStore {
    /// Agents affiliated with `warehouse` that checked in on `day`.
    fn list_checked_in_agents(
        &self,
        warehouse: WarehouseId,
        day: NaiveDate,
    ) -> Result<Vec<Agent>, StoreError>;

    /// Orders of `warehouse` scheduled for `day` and not yet assigned.
    fn list_unassigned_orders(
        &self,
        warehouse: WarehouseId,
        day: NaiveDate,
    ) -> Result<Vec<Order>, StoreError>;

    /// Insert the assignment rows and mark each order assigned to `agent`.
    fn commit_agent_route(&self, agent: AgentId, rows: &[NewAssignment]) -> Result<(), StoreError>;

    /// Move each order's `scheduled_for` to `new_day`.
    fn postpone_orders(&self, orders: &[OrderId], new_day: NaiveDate) -> Result<(), StoreError>;

    fn sum_assignments(&self, agent: AgentId, day: NaiveDate) -> Result<AssignmentTotals, StoreError>;

    /// Insert or replace the payout keyed by (agent, date).
    fn upsert_payout(&self, payout: &Payout) -> Result<(), StoreError>;
}

impl<S: AllocationStore + ?Sized> AllocationStore for Arc<S> {
    fn list_checked_in_agents(
        &self,
        warehouse: WarehouseId,
        day: NaiveDate,
    ) -> Result<Vec<Agent>, StoreError> {
        (**self).list_checked_in_agents(warehouse, day)
    }

    fn list_unassigned_orders(
        &self,
        warehouse: WarehouseId,
        day: NaiveDate,
    ) -> Result<Vec<Order>, StoreError> {
        (**self).list_unassigned_orders(warehouse, day)
    }

    fn commit_agent_route(&self, agent: AgentId, rows: &[NewAssignment]) -> Result<(), StoreError> {
        (**self).commit_agent_route(agent, rows)
    }

    fn postpone_orders(&self, orders: &[OrderId], new_day: NaiveDate) -> Result<(), StoreError> {
        (**self).postpone_orders(orders, new_day)
    }

    fn sum_assignments(&self, agent: AgentId, day: NaiveDate) -> Result<AssignmentTotals, StoreError> {
        (**self).sum_assignments(agent, day)
    }

    fn upsert_payout(&self, payout: &Payout) -> Result<(), StoreError> {
        (**self).upsert_payout(payout)
    }
}
