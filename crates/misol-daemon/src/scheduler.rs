//! Poll loop driving the station

use anyhow::Result;
use misol_core::{ByteSource, Sink};
use misol_station::{PollSummary, WeatherStation};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Polls the station at a fixed cadence until shut down
pub struct Scheduler<S, K> {
    station: WeatherStation<S, K>,
    poll_interval: Duration,
    totals: PollTotals,
}

/// Counters accumulated over the lifetime of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollTotals {
    pub polls: u64,
    pub bytes: u64,
    pub frames: u64,
    pub discarded: u64,
    pub timeouts: u64,
}

impl PollTotals {
    fn add(&mut self, summary: &PollSummary) {
        self.polls += 1;
        self.bytes += summary.bytes as u64;
        self.frames += summary.frames as u64;
        self.discarded += summary.discarded as u64;
        if summary.timed_out {
            self.timeouts += 1;
        }
    }
}

impl<S: ByteSource, K: Sink> Scheduler<S, K> {
    pub fn new(station: WeatherStation<S, K>, poll_interval: Duration) -> Self {
        Self {
            station,
            poll_interval,
            totals: PollTotals::default(),
        }
    }

    /// Run the poll loop until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> Result<PollTotals>
    where
        F: Future<Output = ()>,
    {
        info!(poll_interval_ms = self.poll_interval.as_millis() as u64, "Scheduler started");

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = self.station.poll(Instant::now());
                    if summary.frames > 0 || summary.timed_out {
                        debug!(?summary, "Poll cycle");
                    }
                    self.totals.add(&summary);
                }
                _ = &mut shutdown => break,
            }
        }

        info!(
            polls = self.totals.polls,
            frames = self.totals.frames,
            discarded = self.totals.discarded,
            timeouts = self.totals.timeouts,
            "Scheduler stopped"
        );
        Ok(self.totals)
    }

    pub fn totals(&self) -> PollTotals {
        self.totals
    }

    pub fn station(&self) -> &WeatherStation<S, K> {
        &self.station
    }
}
