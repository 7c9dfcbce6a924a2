//! Deferred one-shot callbacks, fired against the simulation clock.
//!
//! A min-heap of (fire time, sequence) pairs. Actions due at the same time
//! fire in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hecs::Entity;

use gemfire_core::constants::TIMER_EPSILON;
use gemfire_core::enums::ResolveCause;

/// Work that runs after a delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Resolve a projectile, provided it is still in activation `cycle`.
    ResolveProjectile {
        entity: Entity,
        cycle: u32,
        cause: ResolveCause,
    },
}

#[derive(Debug)]
struct Scheduled {
    fire_at: f64,
    seq: u64,
    action: Deferred,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay_secs` after `now`.
    pub fn schedule(&mut self, now: f64, delay_secs: f64, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled {
            fire_at: now + delay_secs.max(0.0),
            seq,
            action,
        });
    }

    /// Pop the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<Deferred> {
        if self.heap.peek()?.fire_at > now + TIMER_EPSILON {
            return None;
        }
        self.heap.pop().map(|s| s.action)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
