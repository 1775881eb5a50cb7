//! # Bus configuration.
//!
//! Provides [`BusConfig`], the construction-time settings of an [`EventBus`](crate::EventBus).
//!
//! ## Sentinel values
//! - `history_capacity = 0` → clamped to 1 (the ledger always retains at
//!   least the last event)
//! - `recent_limit = 0` → clamped to 1 (a history query can always return
//!   something when asked to)

use std::time::Duration;

/// Construction-time configuration for an event bus.
///
/// Defines:
/// - **History bounds**: ledger capacity and the per-query result cap
/// - **Initial state**: whether the bus starts enabled
///
/// ## Field semantics
/// - `history_capacity`: ring size of the history ledger; the oldest entry is
///   evicted synchronously once the ledger would exceed it (min 1; clamped)
/// - `recent_limit`: upper bound on how many records one `history(count)`
///   call may return, regardless of the caller's `count` (min 1; clamped)
/// - `start_enabled`: initial position of the enable toggle; a disabled bus
///   silently discards publishes but still accepts subscriptions
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Maximum number of records retained by the history ledger.
    ///
    /// Enforced synchronously at enqueue time: the ledger never exceeds this
    /// length, and eviction is strictly oldest-first.
    pub history_capacity: usize,

    /// Maximum number of records a single history query returns.
    ///
    /// Caller-supplied counts are clamped to this value so a diagnostics
    /// surface cannot be asked for an unbounded response.
    pub recent_limit: usize,

    /// Whether the bus accepts publishes immediately after construction.
    pub start_enabled: bool,
}

impl BusConfig {
    /// Returns the history capacity clamped to a minimum of 1.
    #[inline]
    pub fn history_capacity_clamped(&self) -> usize {
        self.history_capacity.max(1)
    }

    /// Returns the per-query result cap clamped to a minimum of 1.
    #[inline]
    pub fn recent_limit_clamped(&self) -> usize {
        self.recent_limit.max(1)
    }

    /// Threshold above which an operation is worth a performance alert.
    ///
    /// Not used by the bus itself; a shared default for publishers of
    /// [`Payload::PerformanceAlert`](crate::Payload::PerformanceAlert).
    #[inline]
    pub fn slow_operation_threshold() -> Duration {
        Duration::from_millis(500)
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `history_capacity = 1000` (bounds memory under sustained load)
    /// - `recent_limit = 100` (bounds a single diagnostics response)
    /// - `start_enabled = true`
    fn default() -> Self {
        Self {
            history_capacity: 1000,
            recent_limit: 100,
            start_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BusConfig::default();
        assert_eq!(cfg.history_capacity, 1000);
        assert_eq!(cfg.recent_limit, 100);
        assert!(cfg.start_enabled);
    }

    #[test]
    fn test_zero_values_clamp_to_one() {
        let cfg = BusConfig {
            history_capacity: 0,
            recent_limit: 0,
            start_enabled: true,
        };
        assert_eq!(cfg.history_capacity_clamped(), 1);
        assert_eq!(cfg.recent_limit_clamped(), 1);
    }
}
