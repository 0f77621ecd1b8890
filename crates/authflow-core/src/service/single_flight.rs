//! Per-operation mutual exclusion.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::Operation;

/// Set of operation kinds currently running.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    active: Mutex<HashSet<Operation>>,
}

impl InFlight {
    /// Mark `operation` as running. Returns `None` if one of the same kind is
    /// already in flight.
    pub(crate) fn begin(&self, operation: Operation) -> Option<FlightGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(operation) {
            return None;
        }
        Some(FlightGuard {
            flights: self,
            operation,
        })
    }

    pub(crate) fn is_active(&self, operation: Operation) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&operation)
    }
}

/// Releases the operation when dropped, including when the future running it
/// is cancelled.
#[derive(Debug)]
pub(crate) struct FlightGuard<'a> {
    flights: &'a InFlight,
    operation: Operation,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flights
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_is_exclusive() {
        let flights = InFlight::default();
        let guard = flights.begin(Operation::Login).unwrap();
        assert!(flights.begin(Operation::Login).is_none());
        assert!(flights.begin(Operation::Register).is_some());

        drop(guard);
        assert!(!flights.is_active(Operation::Login));
        assert!(flights.begin(Operation::Login).is_some());
    }
}
