//! Planner configuration.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::allocation::AllocationStrategy;
use crate::capacity::CapacityLimits;
use crate::error::{PlannerError, Result};
use crate::payout::PayoutTiers;

pub const ENV_STRATEGY: &str = "PLANNER_STRATEGY";
pub const ENV_MAX_DISTANCE_KM: &str = "PLANNER_MAX_DISTANCE_KM";
pub const ENV_MAX_TIME_MINUTES: &str = "PLANNER_MAX_TIME_MINUTES";
pub const ENV_AVG_SPEED_KM_PER_MIN: &str = "PLANNER_AVG_SPEED_KM_PER_MIN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub limits: CapacityLimits,
    pub strategy: AllocationStrategy,
    pub payout: PayoutTiers,
}

impl PlannerConfig {
    pub fn with_strategy(mut self, strategy: AllocationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_limits(mut self, limits: CapacityLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Defaults overridden by any `PLANNER_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(strategy) = parse_var(&lookup, ENV_STRATEGY)? {
            config.strategy = strategy;
        }
        if let Some(km) = parse_var(&lookup, ENV_MAX_DISTANCE_KM)? {
            config.limits.max_distance_km = km;
        }
        if let Some(minutes) = parse_var(&lookup, ENV_MAX_TIME_MINUTES)? {
            config.limits.max_time_minutes = minutes;
        }
        if let Some(speed) = parse_var(&lookup, ENV_AVG_SPEED_KM_PER_MIN)? {
            config.limits.avg_speed_km_per_min = speed;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if !(limits.max_distance_km.is_finite() && limits.max_distance_km > 0.0) {
            return Err(PlannerError::Config(format!(
                "max_distance_km must be positive, got {}",
                limits.max_distance_km
            )));
        }
        if limits.max_time_minutes <= 0 {
            return Err(PlannerError::Config(format!(
                "max_time_minutes must be positive, got {}",
                limits.max_time_minutes
            )));
        }
        if !(limits.avg_speed_km_per_min.is_finite() && limits.avg_speed_km_per_min > 0.0) {
            return Err(PlannerError::Config(format!(
                "avg_speed_km_per_min must be positive, got {}",
                limits.avg_speed_km_per_min
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| PlannerError::Config(format!("{}={:?}: {}", key, raw, err))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.strategy, AllocationStrategy::LeastLoaded);
        assert_eq!(config.limits, CapacityLimits::default());
        assert_eq!(config.payout, PayoutTiers::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (ENV_STRATEGY, "round_robin"),
            (ENV_MAX_DISTANCE_KM, "80.5"),
            (ENV_MAX_TIME_MINUTES, " 480 "),
        ]))
        .unwrap();
        assert_eq!(config.strategy, AllocationStrategy::RoundRobin);
        assert_eq!(config.limits.max_distance_km, 80.5);
        assert_eq!(config.limits.max_time_minutes, 480);
        assert_eq!(config.limits.avg_speed_km_per_min, 0.2);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = PlannerConfig::from_lookup(lookup(&[(ENV_MAX_TIME_MINUTES, "lots")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_TIME_MINUTES), "got {}", err);

        let err = PlannerConfig::from_lookup(lookup(&[(ENV_STRATEGY, "fastest")])).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_speed() {
        let err = PlannerConfig::from_lookup(lookup(&[(ENV_AVG_SPEED_KM_PER_MIN, "0")])).unwrap_err();
        assert!(err.to_string().contains("avg_speed_km_per_min"));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{ "strategy": "sequential_fill", "limits": { "max_distance_km": 60.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.strategy, AllocationStrategy::SequentialFill);
        assert_eq!(config.limits.max_distance_km, 60.0);
        assert_eq!(config.limits.max_time_minutes, 600);
        assert_eq!(config.payout.flat_pay, 500.0);
    }
}
