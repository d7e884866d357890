//! In-memory [`AllocationStore`].
//!
//! Each transactional operation validates and stages all of its writes
//! before touching shared state, so a failed call leaves the store exactly
//! as it was. Faults can be injected per operation to exercise abort paths.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::error::StoreError;
use crate::models::{
    Agent, AgentId, Assignment, AssignmentId, AssignmentTotals, NewAssignment, Order, OrderId,
    Payout, Warehouse, WarehouseId,
};
use crate::traits::AllocationStore;

/// Store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ListAgents,
    ListOrders,
    /// Fail the route commit for this agent after its rows are staged.
    CommitRoute(AgentId),
    Postpone,
    SumAssignments,
    UpsertPayout,
}

#[derive(Debug, Default)]
struct Tables {
    warehouses: BTreeMap<WarehouseId, Warehouse>,
    agents: BTreeMap<AgentId, Agent>,
    orders: BTreeMap<OrderId, Order>,
    assignments: Vec<Assignment>,
    payouts: BTreeMap<(AgentId, NaiveDate), Payout>,
    next_assignment_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<HashSet<Fault>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_warehouse(&self, warehouse: Warehouse) {
        self.tables.lock().warehouses.insert(warehouse.id, warehouse);
    }

    pub fn insert_agent(&self, agent: Agent) {
        self.tables.lock().agents.insert(agent.id, agent);
    }

    pub fn insert_order(&self, order: Order) {
        self.tables.lock().orders.insert(order.id, order);
    }

    pub fn warehouses(&self) -> Vec<Warehouse> {
        self.tables.lock().warehouses.values().cloned().collect()
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.tables.lock().orders.get(&id).cloned()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.tables.lock().orders.values().cloned().collect()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.tables.lock().assignments.clone()
    }

    /// An agent's route for `day`, in visiting order.
    pub fn assignments_for(&self, agent: AgentId, day: NaiveDate) -> Vec<Assignment> {
        let mut rows: Vec<Assignment> = self
            .tables
            .lock()
            .assignments
            .iter()
            .filter(|a| a.agent_id == agent && a.assigned_on == day)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.sequence_number);
        rows
    }

    pub fn payouts(&self) -> Vec<Payout> {
        self.tables.lock().payouts.values().cloned().collect()
    }

    pub fn payout(&self, agent: AgentId, day: NaiveDate) -> Option<Payout> {
        self.tables.lock().payouts.get(&(agent, day)).cloned()
    }

    pub fn inject(&self, fault: Fault) {
        self.faults.lock().insert(fault);
    }

    pub fn clear_faults(&self) {
        self.faults.lock().clear();
    }

    fn check(&self, fault: Fault) -> Result<(), StoreError> {
        if self.faults.lock().contains(&fault) {
            return Err(StoreError::Unavailable(format!("injected fault: {:?}", fault)));
        }
        Ok(())
    }
}

impl AllocationStore for MemoryStore {
    fn list_checked_in_agents(
        &self,
        warehouse: WarehouseId,
        day: NaiveDate,
    ) -> Result<Vec<Agent>, StoreError> {
        self.check(Fault::ListAgents)?;
        Ok(self
            .tables
            .lock()
            .agents
            .values()
            .filter(|agent| agent.is_checked_in(warehouse, day))
            .cloned()
            .collect())
    }

    fn list_unassigned_orders(
        &self,
        warehouse: WarehouseId,
        day: NaiveDate,
    ) -> Result<Vec<Order>, StoreError> {
        self.check(Fault::ListOrders)?;
        Ok(self
            .tables
            .lock()
            .orders
            .values()
            .filter(|o| o.warehouse_id == warehouse && o.scheduled_for == day && !o.assigned)
            .cloned()
            .collect())
    }

    fn commit_agent_route(&self, agent: AgentId, rows: &[NewAssignment]) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();

        let mut staged_orders: Vec<Order> = Vec::with_capacity(rows.len());
        let mut staged_rows: Vec<Assignment> = Vec::with_capacity(rows.len());
        let mut next_id = tables.next_assignment_id;

        for row in rows {
            if row.agent_id != agent {
                return Err(StoreError::Constraint(format!(
                    "row for order {} names agent {}, expected {}",
                    row.order_id, row.agent_id, agent
                )));
            }
            let order = tables
                .orders
                .get(&row.order_id)
                .ok_or_else(|| StoreError::NotFound(format!("order {}", row.order_id)))?;
            if order.assigned || staged_orders.iter().any(|o| o.id == row.order_id) {
                return Err(StoreError::Constraint(format!("order {} is already assigned", order.id)));
            }
            if order.scheduled_for != row.assigned_on {
                return Err(StoreError::Constraint(format!(
                    "order {} is scheduled for {}, not {}",
                    order.id, order.scheduled_for, row.assigned_on
                )));
            }
            let duplicate = tables.assignments.iter().any(|a| {
                a.agent_id == row.agent_id && a.order_id == row.order_id && a.assigned_on == row.assigned_on
            });
            if duplicate {
                return Err(StoreError::Constraint(format!(
                    "assignment ({}, {}, {}) already exists",
                    row.agent_id, row.order_id, row.assigned_on
                )));
            }

            let mut updated = order.clone();
            updated.assigned = true;
            updated.agent_id = Some(agent);
            staged_orders.push(updated);

            next_id += 1;
            staged_rows.push(Assignment::from_new(AssignmentId(next_id), row));
        }

        self.check(Fault::CommitRoute(agent))?;

        for order in staged_orders {
            tables.orders.insert(order.id, order);
        }
        tables.assignments.extend(staged_rows);
        tables.next_assignment_id = next_id;
        Ok(())
    }

    fn postpone_orders(&self, orders: &[OrderId], new_day: NaiveDate) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();

        for id in orders {
            let order = tables
                .orders
                .get(id)
                .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
            if order.assigned {
                return Err(StoreError::Constraint(format!("order {} is already assigned", id)));
            }
        }

        self.check(Fault::Postpone)?;

        for id in orders {
            if let Some(order) = tables.orders.get_mut(id) {
                order.scheduled_for = new_day;
            }
        }
        Ok(())
    }

    fn sum_assignments(&self, agent: AgentId, day: NaiveDate) -> Result<AssignmentTotals, StoreError> {
        self.check(Fault::SumAssignments)?;
        let tables = self.tables.lock();
        let mut totals = AssignmentTotals::default();
        for row in tables
            .assignments
            .iter()
            .filter(|a| a.agent_id == agent && a.assigned_on == day)
        {
            totals.count += 1;
            totals.total_distance_km += row.distance_km;
        }
        Ok(totals)
    }

    fn upsert_payout(&self, payout: &Payout) -> Result<(), StoreError> {
        self.check(Fault::UpsertPayout)?;
        self.tables
            .lock()
            .payouts
            .insert((payout.agent_id, payout.date), payout.clone());
        Ok(())
    }
}
