//! Daily commission from committed assignments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{AgentId, AssignmentTotals, Payout};
use crate::traits::AllocationStore;

/// Commission brackets by daily order count, checked highest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutTiers {
    pub high_volume_min_orders: u32,
    pub high_volume_rate: f64,
    pub mid_volume_min_orders: u32,
    pub mid_volume_rate: f64,
    /// Paid for any non-zero count below the mid bracket.
    pub flat_pay: f64,
}

impl Default for PayoutTiers {
    fn default() -> Self {
        Self {
            high_volume_min_orders: 50,
            high_volume_rate: 42.0,
            mid_volume_min_orders: 25,
            mid_volume_rate: 35.0,
            flat_pay: 500.0,
        }
    }
}

impl PayoutTiers {
    pub fn pay_for(&self, orders: u32) -> f64 {
        if orders >= self.high_volume_min_orders {
            f64::from(orders) * self.high_volume_rate
        } else if orders >= self.mid_volume_min_orders {
            f64::from(orders) * self.mid_volume_rate
        } else if orders > 0 {
            self.flat_pay
        } else {
            0.0
        }
    }

    pub fn payout(&self, agent: AgentId, date: NaiveDate, totals: AssignmentTotals) -> Payout {
        Payout {
            agent_id: agent,
            date,
            total_orders: totals.count,
            total_distance_km: totals.total_distance_km,
            total_pay: self.pay_for(totals.count),
        }
    }
}

/// Recompute and upsert `agent`'s payout for `day`.
///
/// Reads only committed assignment rows; running it again the same day
/// replaces the stored payout.
pub fn compute_payout<S>(store: &S, tiers: &PayoutTiers, agent: AgentId, day: NaiveDate) -> Result<Payout>
where
    S: AllocationStore + ?Sized,
{
    let to_err = |source| PlannerError::Payout { agent, source };

    let totals = store.sum_assignments(agent, day).map_err(to_err)?;
    let payout = tiers.payout(agent, day, totals);
    store.upsert_payout(&payout).map_err(to_err)?;

    tracing::info!(
        agent_id = %agent,
        %day,
        total_orders = payout.total_orders,
        total_pay = payout.total_pay,
        "Payout computed"
    );
    Ok(payout)
}
