//! Writes that turn a plan into committed state.
//!
//! Each call maps to exactly one store transaction. A failure is returned
//! as-is; the store has already rolled back, and nothing here retries a
//! subset.

use chrono::{Days, NaiveDate};

use crate::allocation::AgentRoute;
use crate::error::{PlannerError, Result, StoreError};
use crate::models::{AgentId, NewAssignment, Order, OrderId, WarehouseId};
use crate::traits::AllocationStore;

/// Assignment rows for a sequenced route, numbered from 1 in visiting order.
pub fn assignment_rows(agent: AgentId, stops: &[Order], day: NaiveDate) -> Vec<NewAssignment> {
    stops
        .iter()
        .zip(1u32..)
        .map(|(order, sequence_number)| NewAssignment {
            agent_id: agent,
            order_id: order.id,
            assigned_on: day,
            distance_km: order.distance_km,
            estimated_minutes: order.estimated_minutes,
            sequence_number,
        })
        .collect()
}

/// Commit one agent's route as a single transaction. Returns the row count.
pub fn commit_route<S>(
    store: &S,
    warehouse: WarehouseId,
    route: &AgentRoute,
    day: NaiveDate,
) -> Result<usize>
where
    S: AllocationStore + ?Sized,
{
    let rows = assignment_rows(route.agent_id, &route.stops, day);
    if rows.is_empty() {
        return Ok(0);
    }

    store
        .commit_agent_route(route.agent_id, &rows)
        .map_err(|source| PlannerError::Commit {
            warehouse,
            agent: route.agent_id,
            source,
        })?;

    tracing::info!(
        warehouse_id = %warehouse,
        agent_id = %route.agent_id,
        stops = rows.len(),
        route_km = route.cost.distance_km,
        route_minutes = route.cost.minutes,
        "Route committed"
    );
    Ok(rows.len())
}

/// Push `orders` to the day after `day` in one transaction.
///
/// Returns the new day, or `None` when there was nothing to postpone.
pub fn postpone<S>(
    store: &S,
    warehouse: WarehouseId,
    orders: &[OrderId],
    day: NaiveDate,
) -> Result<Option<NaiveDate>>
where
    S: AllocationStore + ?Sized,
{
    if orders.is_empty() {
        return Ok(None);
    }

    let postpone_err = |source| PlannerError::Postpone {
        warehouse,
        count: orders.len(),
        source,
    };
    let next_day = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| postpone_err(StoreError::Constraint(format!("no service day after {}", day))))?;

    store.postpone_orders(orders, next_day).map_err(postpone_err)?;

    tracing::warn!(
        warehouse_id = %warehouse,
        count = orders.len(),
        %next_day,
        "Orders postponed"
    );
    Ok(Some(next_day))
}
