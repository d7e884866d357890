//! Warehouse allocation passes against a store.
//!
//! A pass runs fetch → plan → commit → postpone under the warehouse's lock.
//! Planning happens entirely in memory, so a fetch failure leaves the store
//! untouched. Route commits are one transaction per agent; the first failed
//! commit aborts the rest of the pass, including postponement.
//!
//! An agent's route is final once committed. Agents that already hold rows
//! for the day sit out later passes, so a retry after a failed commit only
//! plans for the agents that were never dispatched.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::allocation::{self, AgentRoute, LeftoverOrder};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result, StoreError};
use crate::lock::WarehouseLocks;
use crate::models::{Agent, AgentId, OrderId, Payout, Warehouse, WarehouseId};
use crate::payout;
use crate::persist;
use crate::traits::{AllocationStore, Clock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    Completed,
    /// Nobody checked in; orders were left untouched.
    NoAgents,
    /// Nothing scheduled and unassigned for the day.
    NoOrders,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    pub warehouse_id: WarehouseId,
    pub day: NaiveDate,
    pub status: PassStatus,
    /// Committed routes, in agent order.
    pub routes: Vec<AgentRoute>,
    /// Orders pushed to `postponed_to`.
    pub leftovers: Vec<LeftoverOrder>,
    pub postponed_to: Option<NaiveDate>,
}

impl AllocationOutcome {
    fn skipped(warehouse_id: WarehouseId, day: NaiveDate, status: PassStatus) -> Self {
        Self {
            warehouse_id,
            day,
            status,
            routes: Vec::new(),
            leftovers: Vec::new(),
            postponed_to: None,
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|route| route.stops.len()).sum()
    }

    pub fn postponed_count(&self) -> usize {
        self.leftovers.len()
    }
}

/// Entry point for callers: runs allocation passes and payout computation
/// against one store.
///
/// Share a single `Planner` between threads; the warehouse locks live in it.
#[derive(Debug)]
pub struct Planner<S, C = SystemClock> {
    store: S,
    clock: C,
    config: PlannerConfig,
    locks: WarehouseLocks,
}

impl<S: AllocationStore> Planner<S, SystemClock> {
    pub fn new(store: S, config: PlannerConfig) -> Result<Self> {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S: AllocationStore, C: Clock> Planner<S, C> {
    /// Fails with [`PlannerError::Config`] when `config` does not validate.
    pub fn with_clock(store: S, clock: C, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            config,
            locks: WarehouseLocks::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Run one full pass for `warehouse` on today's orders.
    pub fn allocate(&self, warehouse: &Warehouse) -> Result<AllocationOutcome> {
        let day = self.clock.today();
        self.locks
            .with_lock(warehouse.id, || self.run_pass(warehouse, day))
            .inspect_err(|err| {
                tracing::error!(
                    warehouse_id = %warehouse.id,
                    %day,
                    error = %err,
                    retryable = err.is_retryable(),
                    "Allocation pass aborted"
                );
            })
    }

    /// Like [`Planner::allocate`], but returns `None` instead of waiting when
    /// a pass for `warehouse` is already running.
    pub fn try_allocate(&self, warehouse: &Warehouse) -> Option<Result<AllocationOutcome>> {
        let day = self.clock.today();
        let outcome = self.locks.try_with_lock(warehouse.id, || self.run_pass(warehouse, day));
        if outcome.is_none() {
            tracing::debug!(warehouse_id = %warehouse.id, "Pass already running, skipped");
        }
        outcome
    }

    /// Run passes for every warehouse concurrently.
    ///
    /// A failed warehouse does not stop the others; results come back in
    /// input order.
    pub fn allocate_all(&self, warehouses: &[Warehouse]) -> Vec<(WarehouseId, Result<AllocationOutcome>)>
    where
        S: Sync,
        C: Sync,
    {
        warehouses
            .par_iter()
            .map(|warehouse| (warehouse.id, self.allocate(warehouse)))
            .collect()
    }

    /// Recompute and store `agent`'s payout for today.
    pub fn compute_payout(&self, agent: AgentId) -> Result<Payout> {
        payout::compute_payout(&self.store, &self.config.payout, agent, self.clock.today())
    }

    fn run_pass(&self, warehouse: &Warehouse, day: NaiveDate) -> Result<AllocationOutcome> {
        let warehouse_id = warehouse.id;
        let fetch_err = |what: &'static str| {
            move |source: StoreError| PlannerError::Fetch {
                warehouse: warehouse_id,
                what,
                source,
            }
        };

        tracing::info!(
            warehouse_id = %warehouse.id,
            %day,
            strategy = %self.config.strategy,
            "Allocation pass started"
        );

        let agents = self
            .store
            .list_checked_in_agents(warehouse.id, day)
            .map_err(fetch_err("agents"))?;
        if agents.is_empty() {
            tracing::info!(warehouse_id = %warehouse.id, "No checked-in agents, skipping");
            return Ok(AllocationOutcome::skipped(warehouse.id, day, PassStatus::NoAgents));
        }

        let orders = self
            .store
            .list_unassigned_orders(warehouse.id, day)
            .map_err(fetch_err("orders"))?;
        if orders.is_empty() {
            tracing::info!(warehouse_id = %warehouse.id, "No unassigned orders, skipping");
            return Ok(AllocationOutcome::skipped(warehouse.id, day, PassStatus::NoOrders));
        }

        let available = self.undispatched(warehouse.id, agents, day)?;
        let plan = allocation::plan(warehouse, &available, orders, &self.config.limits, self.config.strategy);

        for route in &plan.routes {
            persist::commit_route(&self.store, warehouse.id, route, day)?;
        }

        let leftover_ids: Vec<OrderId> = plan.leftovers.iter().map(|l| l.order.id).collect();
        let postponed_to = persist::postpone(&self.store, warehouse.id, &leftover_ids, day)?;

        let outcome = AllocationOutcome {
            warehouse_id: warehouse.id,
            day,
            status: PassStatus::Completed,
            routes: plan.routes,
            leftovers: plan.leftovers,
            postponed_to,
        };
        tracing::info!(
            warehouse_id = %warehouse.id,
            agents = available.len(),
            routes = outcome.routes.len(),
            assigned = outcome.assigned_count(),
            postponed = outcome.postponed_count(),
            "Allocation pass finished"
        );
        Ok(outcome)
    }

    /// Drop agents that already committed a route for `day`.
    fn undispatched(&self, warehouse: WarehouseId, agents: Vec<Agent>, day: NaiveDate) -> Result<Vec<Agent>> {
        let mut available = Vec::with_capacity(agents.len());
        for agent in agents {
            let totals = self
                .store
                .sum_assignments(agent.id, day)
                .map_err(|source| PlannerError::Fetch {
                    warehouse,
                    what: "routes",
                    source,
                })?;
            if totals.count > 0 {
                tracing::info!(
                    warehouse_id = %warehouse,
                    agent_id = %agent.id,
                    committed_stops = totals.count,
                    "Agent already dispatched today, skipping"
                );
                continue;
            }
            available.push(agent);
        }
        Ok(available)
    }
}
