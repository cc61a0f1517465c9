//! Population counters
//!
//! Worlds report entity and query counts to a [`Monitor`]. Reporting is
//! fire-and-forget and never affects ECS behavior.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

/// Number of live entities across worlds sharing the monitor
pub const ENTITY_MONITOR: &str = "ecs/entities";

/// Number of live queries across worlds sharing the monitor
pub const QUERY_MONITOR: &str = "ecs/queries";

/// Counter sink
pub trait Monitor {
    fn increment(&self, id: &str, amount: u64);

    fn decrement(&self, id: &str, amount: u64);

    /// Overwrite the counter with an absolute value
    fn update(&self, id: &str, value: u64);
}

/// Discards everything (default)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl Monitor for NoopMonitor {
    fn increment(&self, _id: &str, _amount: u64) {}

    fn decrement(&self, _id: &str, _amount: u64) {}

    fn update(&self, _id: &str, _value: u64) {}
}

/// Keeps counters in memory; clones share the same counters
#[derive(Debug, Default, Clone)]
pub struct CountingMonitor {
    counters: Rc<RefCell<AHashMap<String, i64>>>,
}

impl CountingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `id` (0 if never touched)
    pub fn get(&self, id: &str) -> i64 {
        self.counters.borrow().get(id).copied().unwrap_or(0)
    }

    pub fn reset(&self) {
        self.counters.borrow_mut().clear();
    }

    fn apply(&self, id: &str, f: impl FnOnce(&mut i64)) {
        let mut counters = self.counters.borrow_mut();
        f(counters.entry(id.to_string()).or_insert(0));
    }
}

impl Monitor for CountingMonitor {
    fn increment(&self, id: &str, amount: u64) {
        self.apply(id, |value| *value += amount as i64);
    }

    fn decrement(&self, id: &str, amount: u64) {
        self.apply(id, |value| *value -= amount as i64);
    }

    fn update(&self, id: &str, value: u64) {
        self.apply(id, |current| *current = value as i64);
    }
}

/// Emits every counter change as a `tracing` event
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMonitor;

#[cfg(feature = "tracing")]
impl Monitor for TracingMonitor {
    fn increment(&self, id: &str, amount: u64) {
        tracing::debug!(target: "gadget_ecs::monitor", monitor = id, amount, "increment");
    }

    fn decrement(&self, id: &str, amount: u64) {
        tracing::debug!(target: "gadget_ecs::monitor", monitor = id, amount, "decrement");
    }

    fn update(&self, id: &str, value: u64) {
        tracing::debug!(target: "gadget_ecs::monitor", monitor = id, value, "update");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_monitor_shares_counters() {
        let monitor = CountingMonitor::new();
        let clone = monitor.clone();

        clone.increment(ENTITY_MONITOR, 3);
        clone.decrement(ENTITY_MONITOR, 1);
        assert_eq!(monitor.get(ENTITY_MONITOR), 2);

        monitor.update(QUERY_MONITOR, 7);
        assert_eq!(clone.get(QUERY_MONITOR), 7);

        monitor.reset();
        assert_eq!(clone.get(ENTITY_MONITOR), 0);
    }
}
