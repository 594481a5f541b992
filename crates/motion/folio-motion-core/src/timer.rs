//! Deterministic timer queue driven by `advance(dt)`.
//!
//! Timers fire in `(due, scheduling order)` order and report the exact time
//! they were due, even when one `advance` call covers several of them.

use serde::{Deserialize, Serialize};

use crate::ids::{ScopeId, TimerId};

/// Smallest accepted interval; shorter ones are raised to it.
pub const MIN_INTERVAL_MS: f64 = 1.0;

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    owner: Option<ScopeId>,
    due_ms: f64,
    interval_ms: Option<f64>,
    seq: u64,
    payload: T,
}

/// A timer that came due during `advance`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fired<T> {
    pub id: TimerId,
    pub due_ms: f64,
    pub payload: T,
}

#[derive(Clone, Debug)]
pub struct Timers<T> {
    now_ms: f64,
    next_id: u32,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(
        &mut self,
        owner: Option<ScopeId>,
        due_ms: f64,
        interval_ms: Option<f64>,
        payload: T,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            id,
            owner,
            due_ms,
            interval_ms,
            seq,
            payload,
        });
        id
    }

    /// One-shot timer `delay_ms` from now.
    pub fn after(&mut self, delay_ms: f64, owner: Option<ScopeId>, payload: T) -> TimerId {
        let due = self.now_ms + delay_ms.max(0.0);
        self.push(owner, due, None, payload)
    }

    /// Repeating timer; first fires `first_ms` from now, then every `interval_ms`.
    pub fn every(
        &mut self,
        first_ms: f64,
        interval_ms: f64,
        owner: Option<ScopeId>,
        payload: T,
    ) -> TimerId {
        let due = self.now_ms + first_ms.max(0.0);
        self.push(owner, due, Some(interval_ms.max(MIN_INTERVAL_MS)), payload)
    }

    /// Returns false when the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every timer owned by `owner`; returns how many were removed.
    pub fn cancel_owner(&mut self, owner: ScopeId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != Some(owner));
        before - self.entries.len()
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn next_due(&self, id: TimerId) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.due_ms)
    }

    fn earliest(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)
    }

    /// Move time forward, returning every timer due in `(now, now + dt]`
    /// (or at `now` for zero delays), earliest first.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Fired<T>> {
        let target = self.now_ms + dt_ms.max(0.0);
        let mut fired = Vec::new();
        while let Some(idx) = self.earliest() {
            if self.entries[idx].due_ms > target {
                break;
            }
            let due = self.entries[idx].due_ms;
            self.now_ms = due;
            let entry = &self.entries[idx];
            fired.push(Fired {
                id: entry.id,
                due_ms: due,
                payload: entry.payload.clone(),
            });
            let interval = entry.interval_ms;
            match interval {
                Some(interval) => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    let entry = &mut self.entries[idx];
                    entry.due_ms += interval;
                    entry.seq = seq;
                }
                None => {
                    self.entries.swap_remove(idx);
                }
            }
        }
        self.now_ms = target;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order_with_exact_times() {
        let mut t: Timers<&'static str> = Timers::new();
        t.after(300.0, None, "b");
        t.after(100.0, None, "a");
        let tick = t.every(150.0, 100.0, None, "tick");
        let fired = t.advance(400.0);
        let seen: Vec<(f64, &str)> = fired.iter().map(|f| (f.due_ms, f.payload)).collect();
        assert_eq!(
            seen,
            vec![
                (100.0, "a"),
                (150.0, "tick"),
                (250.0, "tick"),
                (300.0, "b"),
                (350.0, "tick"),
            ]
        );
        assert_eq!(t.next_due(tick), Some(450.0));
        assert_eq!(t.now(), 400.0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut t: Timers<u8> = Timers::new();
        let id = t.after(10.0, None, 1);
        assert!(t.cancel(id));
        assert!(!t.cancel(id));
        assert!(t.advance(100.0).is_empty());
    }

    #[test]
    fn cancel_owner_only_touches_that_scope() {
        let mut t: Timers<u8> = Timers::new();
        t.after(10.0, Some(ScopeId(1)), 1);
        t.every(10.0, 10.0, Some(ScopeId(1)), 2);
        t.after(10.0, Some(ScopeId(2)), 3);
        assert_eq!(t.cancel_owner(ScopeId(1)), 2);
        let fired = t.advance(10.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].payload, 3);
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut t: Timers<u8> = Timers::new();
        t.advance(50.0);
        t.after(0.0, None, 9);
        let fired = t.advance(0.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].due_ms, 50.0);
    }
}
