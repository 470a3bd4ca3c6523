//! Virtual clock and deferred actions
//!
//! Every delayed effect (invincibility end, ghost fade, boss explosions,
//! level transitions) is a `Deferred` entry keyed by the tick clock. Entries
//! are drained at the end of the tick in which they come due, in fire-time
//! order; entries with the same fire time keep the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec2;

use super::actor::ActorId;

/// Simulated milliseconds since the level was loaded
pub type Millis = u64;

/// An action scheduled on the virtual clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Invincibility pulse sequence finished
    EndInvincibility { actor: ActorId },
    /// Boss damage flash ends
    EndBossFlash { actor: ActorId },
    /// Projectile time-to-live elapsed
    ExpireProjectile { id: u32 },
    /// Dash after-image finished fading
    FadeGhost { id: u32 },
    /// One burst of the boss clear sequence
    BossExplosion { origin: Vec2, burst: u32 },
    /// Boss sequence forces the goal-reached transition
    BossClear,
    /// Stage-clear banner done, move to next level
    AdvanceLevel,
    /// Terminal banner done, wait for a confirmation input
    AwaitConfirm,
}

#[derive(Debug, Clone)]
struct Scheduled {
    fire_at: Millis,
    seq: u64,
    action: Deferred,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    // BinaryHeap is a max-heap; invert so the earliest entry pops first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Monotonic clock with a priority queue of deferred actions
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Millis,
    next_seq: u64,
    queue: BinaryHeap<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Advance the clock; never moves backwards
    pub fn advance(&mut self, dt_ms: Millis) {
        self.now = self.now.saturating_add(dt_ms);
    }

    /// Schedule an action `delay` ms from now
    pub fn schedule_in(&mut self, delay: Millis, action: Deferred) {
        self.schedule_at(self.now.saturating_add(delay), action);
    }

    /// Schedule an action at an absolute time (past times fire on next drain)
    pub fn schedule_at(&mut self, fire_at: Millis, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            fire_at,
            seq,
            action,
        });
    }

    /// Pop the earliest action that is due, if any
    pub fn pop_due(&mut self) -> Option<Deferred> {
        if self.queue.peek()?.fire_at > self.now {
            return None;
        }
        self.queue.pop().map(|s| s.action)
    }

    /// Fire time of the earliest pending action
    pub fn next_fire_time(&self) -> Option<Millis> {
        self.queue.peek().map(|s| s.fire_at)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// True if an action matching the predicate is still queued
    pub fn has_pending(&self, mut pred: impl FnMut(&Deferred) -> bool) -> bool {
        self.queue.iter().any(|s| pred(&s.action))
    }
}
