use thiserror::Error;

use crate::models::{AgentId, WarehouseId};

/// Failure reported by an [`AllocationStore`](crate::traits::AllocationStore).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out")]
    Timeout,

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Transient failures; nothing was committed so the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("failed to fetch {what} for warehouse {warehouse}: {source}")]
    Fetch {
        warehouse: WarehouseId,
        what: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("failed to commit route for agent {agent} in warehouse {warehouse}: {source}")]
    Commit {
        warehouse: WarehouseId,
        agent: AgentId,
        #[source]
        source: StoreError,
    },

    #[error("failed to postpone {count} orders for warehouse {warehouse}: {source}")]
    Postpone {
        warehouse: WarehouseId,
        count: usize,
        #[source]
        source: StoreError,
    },

    #[error("failed to compute payout for agent {agent}: {source}")]
    Payout {
        agent: AgentId,
        #[source]
        source: StoreError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PlannerError {
    pub fn is_retryable(&self) -> bool {
        match self {
            PlannerError::Fetch { source, .. }
            | PlannerError::Commit { source, .. }
            | PlannerError::Postpone { source, .. }
            | PlannerError::Payout { source, .. } => source.is_retryable(),
            PlannerError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
