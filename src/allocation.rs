//! In-memory allocation planning for one warehouse pass.
//!
//! Orders are annotated with their distance from the warehouse, sorted
//! closest first, and handed to agents by the configured
//! [`AllocationStrategy`]. Every strategy admits an order only when the
//! agent's full round trip stays within [`CapacityLimits`]. Each agent's
//! final set is then put into nearest-neighbour visiting order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capacity::{CapacityLimits, RouteCost, RouteLoad};
use crate::haversine::haversine_km;
use crate::models::{Agent, AgentId, Order, Warehouse};
use crate::sequencer::sequence;

/// How orders are spread over agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Fill one agent at a time, in agent order. An agent stops taking
    /// orders at the first one that does not fit; the next agent resumes
    /// from that order.
    SequentialFill,
    /// Offer each order to agents in rotation, starting just after the agent
    /// that took the previous order. The first agent that admits it wins.
    RoundRobin,
    /// Give each order to the admitting agent with the fewest orders so far.
    /// Equal loads go to the agent listed first.
    #[default]
    LeastLoaded,
}

impl AllocationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStrategy::SequentialFill => "sequential_fill",
            AllocationStrategy::RoundRobin => "round_robin",
            AllocationStrategy::LeastLoaded => "least_loaded",
        }
    }
}

impl fmt::Display for AllocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential_fill" | "sequential" => Ok(AllocationStrategy::SequentialFill),
            "round_robin" => Ok(AllocationStrategy::RoundRobin),
            "least_loaded" => Ok(AllocationStrategy::LeastLoaded),
            other => Err(format!("unknown allocation strategy '{}'", other)),
        }
    }
}

/// Why an order was left for the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeftoverReason {
    /// Its solo round trip already exceeds a limit; no agent can ever take it.
    OutOfRange,
    /// It fits an empty route but every agent was out of room.
    NoCapacity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentRoute {
    pub agent_id: AgentId,
    /// Stops in visiting order.
    pub stops: Vec<Order>,
    /// Round-trip cost of `stops` in this order.
    pub cost: RouteCost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeftoverOrder {
    pub order: Order,
    pub reason: LeftoverReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationPlan {
    /// One route per agent that received at least one order, in agent order.
    pub routes: Vec<AgentRoute>,
    /// Orders no agent could admit, closest first.
    pub leftovers: Vec<LeftoverOrder>,
}

impl AllocationPlan {
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|route| route.stops.len()).sum()
    }
}

/// Fill in each order's distance and travel minutes from the warehouse.
pub fn annotate(warehouse: &Warehouse, orders: &mut [Order], limits: &CapacityLimits) {
    let origin = warehouse.location();
    for order in orders.iter_mut() {
        let dist = haversine_km(origin, order.location());
        order.distance_km = dist;
        order.estimated_minutes = limits.minutes_for(dist);
    }
}

struct Draft<'a> {
    agent: &'a Agent,
    load: RouteLoad,
    orders: Vec<Order>,
}

impl Draft<'_> {
    fn take(&mut self, order: Order, cost: RouteCost) {
        tracing::debug!(
            agent_id = %self.agent.id,
            order_id = %order.id,
            distance_km = order.distance_km,
            route_km = cost.distance_km,
            "Order admitted"
        );
        self.load.push(order.location(), cost);
        self.orders.push(order);
    }
}

/// Build the full plan for one warehouse pass without touching any store.
pub fn plan(
    warehouse: &Warehouse,
    agents: &[Agent],
    mut orders: Vec<Order>,
    limits: &CapacityLimits,
    strategy: AllocationStrategy,
) -> AllocationPlan {
    annotate(warehouse, &mut orders, limits);
    orders.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    let origin = warehouse.location();
    let mut drafts: Vec<Draft<'_>> = agents
        .iter()
        .map(|agent| Draft {
            agent,
            load: RouteLoad::new(origin),
            orders: Vec::new(),
        })
        .collect();

    let rejected = match strategy {
        AllocationStrategy::SequentialFill => sequential_fill(&mut drafts, orders, limits),
        AllocationStrategy::RoundRobin => round_robin(&mut drafts, orders, limits),
        AllocationStrategy::LeastLoaded => least_loaded(&mut drafts, orders, limits),
    };

    let empty_route = RouteLoad::new(origin);
    let leftovers = rejected
        .into_iter()
        .map(|order| {
            let reason = if empty_route.admits(limits, order.location()).is_some() {
                LeftoverReason::NoCapacity
            } else {
                tracing::warn!(
                    warehouse_id = %warehouse.id,
                    order_id = %order.id,
                    distance_km = order.distance_km,
                    "Order is beyond a single round trip"
                );
                LeftoverReason::OutOfRange
            };
            LeftoverOrder { order, reason }
        })
        .collect();

    let routes = drafts
        .into_iter()
        .filter(|draft| !draft.orders.is_empty())
        .map(|draft| AgentRoute {
            agent_id: draft.agent.id,
            cost: draft.load.cost(),
            stops: sequence(origin, draft.orders),
        })
        .collect();

    AllocationPlan { routes, leftovers }
}

fn sequential_fill(drafts: &mut [Draft<'_>], orders: Vec<Order>, limits: &CapacityLimits) -> Vec<Order> {
    let mut pending = orders.into_iter().peekable();
    for draft in drafts.iter_mut() {
        while let Some(order) = pending.peek() {
            let Some(cost) = draft.load.admits(limits, order.location()) else {
                break;
            };
            if let Some(order) = pending.next() {
                draft.take(order, cost);
            }
        }
    }
    pending.collect()
}

fn round_robin(drafts: &mut [Draft<'_>], orders: Vec<Order>, limits: &CapacityLimits) -> Vec<Order> {
    let agent_count = drafts.len();
    let mut rejected = Vec::new();
    if agent_count == 0 {
        return orders;
    }

    let mut cursor = 0;
    for order in orders {
        let location = order.location();
        let found = (0..agent_count)
            .map(|offset| (cursor + offset) % agent_count)
            .find_map(|i| drafts[i].load.admits(limits, location).map(|cost| (i, cost)));

        match found {
            Some((i, cost)) => {
                drafts[i].take(order, cost);
                cursor = (i + 1) % agent_count;
            }
            None => rejected.push(order),
        }
    }
    rejected
}

fn least_loaded(drafts: &mut [Draft<'_>], orders: Vec<Order>, limits: &CapacityLimits) -> Vec<Order> {
    let mut rejected = Vec::new();
    for order in orders {
        let location = order.location();
        let mut best: Option<(usize, RouteCost)> = None;

        for (i, draft) in drafts.iter().enumerate() {
            // Only a strictly lighter agent can displace the current pick.
            if let Some((picked, _)) = best {
                if drafts[picked].load.len() <= draft.load.len() {
                    continue;
                }
            }
            if let Some(cost) = draft.load.admits(limits, location) {
                best = Some((i, cost));
            }
        }

        match best {
            Some((i, cost)) => drafts[i].take(order, cost),
            None => rejected.push(order),
        }
    }
    rejected
}
