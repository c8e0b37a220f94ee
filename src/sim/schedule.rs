//! Deferred simulation events
//!
//! Events are keyed off timestamps from the session clock and run at the top
//! of the first tick at or after their due time. Nothing here blocks.

use serde::{Deserialize, Serialize};

/// A state change to apply later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Start merging the road after the question with this serial was answered
    BeginMerge { serial: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    due_ms: f64,
    event: Deferred,
}

/// Pending deferred events, in scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, event: Deferred) {
        self.pending.push(Entry { due_ms, event });
    }

    /// Drop everything pending (run start and end)
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelled {} deferred events", self.pending.len());
        }
        self.pending.clear();
    }

    /// Remove and return events due at `now_ms`
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.pending.retain(|entry| {
            if entry.due_ms <= now_ms {
                due.push(entry.event);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_once_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2000.0, Deferred::BeginMerge { serial: 1 });

        assert!(scheduler.take_due(1999.0).is_empty());
        assert_eq!(
            scheduler.take_due(2000.0),
            vec![Deferred::BeginMerge { serial: 1 }]
        );
        assert!(scheduler.take_due(5000.0).is_empty());
    }

    #[test]
    fn test_keeps_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10.0, Deferred::BeginMerge { serial: 1 });
        scheduler.schedule(20.0, Deferred::BeginMerge { serial: 2 });
        scheduler.schedule(30.0, Deferred::BeginMerge { serial: 3 });

        let due = scheduler.take_due(25.0);
        assert_eq!(
            due,
            vec![
                Deferred::BeginMerge { serial: 1 },
                Deferred::BeginMerge { serial: 2 }
            ]
        );
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_all_drops_pending() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10.0, Deferred::BeginMerge { serial: 1 });
        scheduler.cancel_all();
        assert!(scheduler.is_empty());
        assert!(scheduler.take_due(100.0).is_empty());
    }
}
