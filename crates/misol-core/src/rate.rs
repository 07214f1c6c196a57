//! Precipitation intensity from the accumulated rain counter

use crate::decode::RAIN_MM_PER_TICK;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How a counter that went backwards is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterReset {
    /// Treat the new value as a fresh baseline; the rate becomes unknown
    #[default]
    Rebaseline,
    /// Report no rain for the interval
    Clamp,
    /// Assume the 16-bit counter rolled over
    Wrap,
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    counter: u16,
    at: Instant,
}

/// Rain rate over a fixed minimum interval
///
/// The baseline only moves when at least `interval` has passed since it was
/// taken, so frames arriving in between leave both the baseline and the
/// reported rate untouched.
#[derive(Debug, Clone)]
pub struct PrecipitationRate {
    interval: Duration,
    policy: CounterReset,
    baseline: Option<Baseline>,
    rate: Option<f32>,
}

impl PrecipitationRate {
    pub fn new(interval: Duration, policy: CounterReset) -> Self {
        Self {
            interval,
            policy,
            baseline: None,
            rate: None,
        }
    }

    /// Feed the counter from a new frame, returning the current rate in mm/h
    pub fn update(&mut self, counter: u16, now: Instant) -> Option<f32> {
        let Some(base) = self.baseline else {
            self.baseline = Some(Baseline { counter, at: now });
            return self.rate;
        };

        let elapsed = now.saturating_duration_since(base.at);
        if elapsed < self.interval || elapsed.is_zero() {
            return self.rate;
        }

        let ticks = if counter >= base.counter {
            Some(counter - base.counter)
        } else {
            match self.policy {
                CounterReset::Rebaseline => None,
                CounterReset::Clamp => Some(0),
                CounterReset::Wrap => Some(counter.wrapping_sub(base.counter)),
            }
        };

        let hours = elapsed.as_secs_f32() / 3600.0;
        self.rate = ticks.map(|t| f32::from(t) * RAIN_MM_PER_TICK / hours);
        self.baseline = Some(Baseline { counter, at: now });
        self.rate
    }

    /// Most recently computed rate
    pub fn rate(&self) -> Option<f32> {
        self.rate
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn reset(&mut self) {
        self.baseline = None;
        self.rate = None;
    }
}
