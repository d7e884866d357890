//! delivery-planner core
//!
//! Assigns a warehouse's same-day orders to its checked-in agents under
//! round-trip capacity limits, sequences each agent's stops, and computes
//! tiered daily payouts. Persistence goes through [`traits::AllocationStore`].

pub mod traits;
pub mod models;
pub mod error;
pub mod config;
pub mod haversine;
pub mod sequencer;
pub mod capacity;
pub mod allocation;
pub mod persist;
pub mod payout;
pub mod lock;
pub mod engine;
pub mod memory_store;

pub use allocation::AllocationStrategy;
pub use config::PlannerConfig;
pub use engine::{AllocationOutcome, PassStatus, Planner};
pub use error::{PlannerError, Result, StoreError};
pub use memory_store::MemoryStore;
pub use traits::{AllocationStore, Clock, FixedClock, SystemClock};
