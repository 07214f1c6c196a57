//! Poll-driven weather station
//!
//! Each call to [`WeatherStation::poll`] runs one cycle: liveness check,
//! drain the transport, cut frames, classify, decode, derive, publish.

use misol_core::{
    classify, decode, format_hex_pretty, ByteSource, Channel, Derived, DerivedEngine, Field,
    FrameAssembler, LinkState, LivenessMonitor, Reading, Sink, StationSettings, Value,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What happened during one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Bytes drained from the transport
    pub bytes: usize,
    /// Frames decoded and published
    pub frames: usize,
    /// Bytes thrown away while searching for a frame
    pub discarded: usize,
    /// The link timed out and every channel was reset
    pub timed_out: bool,
}

pub struct WeatherStation<S, K> {
    source: S,
    sink: K,
    assembler: FrameAssembler,
    liveness: LivenessMonitor,
    engine: DerivedEngine,
    received: Vec<u8>,
}

impl<S: ByteSource, K: Sink> WeatherStation<S, K> {
    pub fn new(source: S, sink: K, settings: StationSettings) -> Self {
        Self {
            source,
            sink,
            assembler: FrameAssembler::new(),
            liveness: LivenessMonitor::default(),
            engine: DerivedEngine::new(settings),
            received: Vec::with_capacity(64),
        }
    }

    /// Override the communication timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.liveness = LivenessMonitor::new(timeout);
        self
    }

    /// Run one read-decode-publish cycle
    pub fn poll(&mut self, now: Instant) -> PollSummary {
        let mut summary = PollSummary::default();
        let available = self.source.available();

        if available == 0 {
            if self.liveness.check_timeout(now) {
                self.reset_all();
                summary.timed_out = true;
            } else {
                while let Some(frame) = self.assembler.flush() {
                    self.handle_frame(&frame, now, &mut summary);
                }
            }
            self.finish_cycle(&mut summary);
            return summary;
        }

        self.liveness.record_activity(now);
        self.received.clear();
        for _ in 0..available {
            match self.source.read() {
                Some(byte) => self.received.push(byte),
                None => break,
            }
        }
        summary.bytes = self.received.len();
        debug!(available, "Received: {}", format_hex_pretty(&self.received));

        self.assembler.extend(&self.received);
        while let Some(frame) = self.assembler.next_frame() {
            self.handle_frame(&frame, now, &mut summary);
        }
        self.finish_cycle(&mut summary);
        summary
    }

    fn handle_frame(&mut self, frame: &[u8], now: Instant, summary: &mut PollSummary) {
        // The assembler only yields frames whose body checksum holds
        let kind = classify(frame);
        let reading = decode(frame, kind);
        let derived = self.engine.derive(&reading, now);
        debug!(
            ?kind,
            temperature = ?reading.get(Field::Temperature),
            humidity = ?reading.get(Field::Humidity),
            wind_speed = ?reading.get(Field::WindSpeed),
            wind_direction = derived.wind_direction,
            rain_counter = reading.rain_counter,
            precipitation_intensity = ?derived.precipitation_intensity,
            low_battery = reading.low_battery,
            "Decoded frame"
        );

        for (channel, value) in outputs(&reading, &derived) {
            self.publish(channel, value);
        }
        summary.frames += 1;
    }

    fn reset_all(&mut self) {
        info!(
            timeout_secs = self.liveness.timeout().as_secs(),
            "No data from station, resetting all values"
        );
        self.engine.reset();
        self.assembler.clear();
        for channel in Channel::ALL {
            self.publish(channel, channel.unknown());
        }
    }

    fn finish_cycle(&mut self, summary: &mut PollSummary) {
        summary.discarded = self.assembler.take_discarded();
        if summary.discarded > 0 {
            warn!(
                discarded = summary.discarded,
                pending = self.assembler.pending(),
                "Dropped bytes that did not form a valid frame"
            );
        }
        if summary.frames > 0 || summary.timed_out {
            if let Err(e) = self.sink.end_cycle() {
                warn!(error = %e, "Sink failed to close cycle");
            }
        }
    }

    fn publish(&mut self, channel: Channel, value: Value) {
        if let Err(e) = self.sink.publish(channel, &value) {
            warn!(%channel, error = %e, "Sink rejected value");
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.liveness.state()
    }

    pub fn engine(&self) -> &DerivedEngine {
        &self.engine
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}

/// Every channel value produced by one frame, in publication order
fn outputs(reading: &Reading, derived: &Derived) -> Vec<(Channel, Value)> {
    let mut out: Vec<(Channel, Value)> = Field::ALL
        .iter()
        .filter(|field| **field != Field::Pressure || reading.has_pressure())
        .map(|field| (field.channel(), Value::number(reading.get(*field))))
        .collect();

    out.extend([
        (
            Channel::PrecipitationIntensity,
            Value::number(derived.precipitation_intensity),
        ),
        (Channel::WindDirection, Value::Text(derived.wind_direction)),
        (
            Channel::WindSpeedDescription,
            Value::Text(derived.wind_speed_description),
        ),
        (Channel::LightDescription, Value::Text(derived.light_description)),
        (
            Channel::PrecipitationDescription,
            Value::Text(derived.precipitation_description),
        ),
        (
            Channel::WeatherConditions,
            Value::Text(derived.condition.label()),
        ),
        (Channel::LowBattery, Value::Flag(Some(reading.low_battery))),
        (Channel::Night, Value::Flag(derived.night)),
    ]);
    out
}
