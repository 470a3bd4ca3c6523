//! Stamina meter gating the dash

use serde::{Deserialize, Serialize};

use super::clock::Millis;
use crate::tuning::Tuning;

/// HUD colour state of the stamina bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarState {
    Ok,
    Exhausted,
}

/// Result of one meter tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaminaTick {
    /// Value after this tick
    pub value: f32,
    /// Dash was paid for this tick (boosted speed applies)
    pub boosted: bool,
    /// Meter hit zero on this tick and entered the cooldown
    pub exhausted: bool,
}

/// Bounded stamina budget with drain, regen and exhaustion cooldown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamina {
    value: f32,
    max: f32,
    drain: f32,
    regen: f32,
    cooldown_ms: Millis,
    /// No drain or regen before this time
    blocked_until: Millis,
}

impl Stamina {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            value: tuning.stamina_max,
            max: tuning.stamina_max,
            drain: tuning.stamina_drain,
            regen: tuning.stamina_regen,
            cooldown_ms: tuning.exhaustion_cooldown_ms,
            blocked_until: 0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn blocked_until(&self) -> Millis {
        self.blocked_until
    }

    /// True during the post-depletion cooldown
    pub fn is_exhausted(&self, now: Millis) -> bool {
        now < self.blocked_until
    }

    /// Advance the meter by one tick
    pub fn tick(&mut self, dash_held: bool, now: Millis) -> StaminaTick {
        let recovering = now >= self.blocked_until;
        let mut boosted = false;
        let mut exhausted = false;

        if dash_held && self.value > 0.0 && recovering {
            boosted = true;
            self.value -= self.drain;
            if self.value <= 0.0 {
                self.value = 0.0;
                self.blocked_until = now + self.cooldown_ms;
                exhausted = true;
            }
        } else if recovering && self.value < self.max {
            self.value = (self.value + self.regen).min(self.max);
        }

        StaminaTick {
            value: self.value,
            boosted,
            exhausted,
        }
    }

    /// Width of the HUD bar for a given full width
    pub fn bar_width(&self, max_width: f32) -> f32 {
        max_width * (self.value / self.max)
    }

    pub fn bar_state(&self, now: Millis) -> BarState {
        if self.is_exhausted(now) {
            BarState::Exhausted
        } else {
            BarState::Ok
        }
    }
}
