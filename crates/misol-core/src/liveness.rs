//! Communication liveness tracking

use std::time::{Duration, Instant};

/// Silence after which the station is considered disconnected
pub const COMMUNICATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    AwaitingFirstFrame,
    Synced,
}

#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    timeout: Duration,
    last_packet: Option<Instant>,
}

impl LivenessMonitor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_packet: None,
        }
    }

    pub fn state(&self) -> LinkState {
        if self.last_packet.is_some() {
            LinkState::Synced
        } else {
            LinkState::AwaitingFirstFrame
        }
    }

    /// Any received bytes count, whether or not they form a valid frame
    pub fn record_activity(&mut self, now: Instant) {
        self.last_packet = Some(now);
    }

    /// True exactly once per silence longer than the timeout
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        match self.last_packet {
            Some(last) if now.saturating_duration_since(last) > self.timeout => {
                self.last_packet = None;
                true
            }
            _ => false,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for LivenessMonitor {
    fn default() -> Self {
        Self::new(COMMUNICATION_TIMEOUT)
    }
}
