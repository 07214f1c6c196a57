//! Simulated sensor array for testing

use misol_core::{ByteSource, FrameBuilder};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Byte source emitting one synthetic frame per period
pub struct SimulatorSource {
    period: Duration,
    with_pressure: bool,
    last_emit: Option<Instant>,
    queue: VecDeque<u8>,
    tick: u32,
    rain_counter: u16,
}

impl SimulatorSource {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            with_pressure: true,
            last_emit: None,
            queue: VecDeque::with_capacity(32),
            tick: 0,
            rain_counter: 0,
        }
    }

    /// Emit the pressure block (on by default)
    pub fn with_pressure(mut self, with_pressure: bool) -> Self {
        self.with_pressure = with_pressure;
        self
    }

    fn generate_frame(&mut self) -> Vec<u8> {
        self.tick = self.tick.wrapping_add(1);

        // Pseudo-random swing in -5.0..5.0
        let variation = (self.tick % 100) as f32 / 10.0 - 5.0;
        let temperature = 20.0 + variation;
        let wind_speed = 3.0 + variation.abs();
        if self.tick % 4 == 0 {
            self.rain_counter = self.rain_counter.wrapping_add(1);
        }

        let mut builder = FrameBuilder::new()
            .wind_direction(((self.tick * 23) % 360) as u16)
            .temperature_raw((temperature * 10.0 + 400.0).round() as u16)
            .humidity((65.0 + variation).round() as u8)
            .wind_speed_raw((wind_speed / 1.12 * 8.0).round() as u16)
            .wind_gust_raw((wind_speed * 1.5 / 1.12).round() as u8)
            .rain_counter(self.rain_counter)
            .uv_raw(((variation + 5.0) * 20.0).round() as u16)
            .light_raw(((20_000.0 + variation * 1_000.0) * 10.0).round() as u32);
        if self.with_pressure {
            builder = builder.pressure_raw(((1013.25 + variation * 2.0) * 100.0).round() as u32);
        }
        builder.build()
    }
}

impl ByteSource for SimulatorSource {
    fn available(&mut self) -> usize {
        if self.queue.is_empty() {
            let now = Instant::now();
            let due = self
                .last_emit
                .map_or(true, |last| now.duration_since(last) >= self.period);
            if due {
                let frame = self.generate_frame();
                debug!(tick = self.tick, len = frame.len(), "Simulated frame queued");
                self.queue.extend(frame);
                self.last_emit = Some(now);
            }
        }
        self.queue.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use misol_core::{classify, PacketKind, PRESSURE_FRAME_LEN};

    #[test]
    fn test_simulator_emits_one_frame_per_period() {
        let mut source = SimulatorSource::new(Duration::from_secs(3600));

        assert_eq!(source.available(), PRESSURE_FRAME_LEN);
        let frame: Vec<u8> = std::iter::from_fn(|| source.read()).collect();
        assert_eq!(classify(&frame), PacketKind::BasicWithPressure);

        // Next frame is not due yet
        assert_eq!(source.available(), 0);
    }

    #[test]
    fn test_simulator_frames_are_valid() {
        let mut source = SimulatorSource::new(Duration::ZERO).with_pressure(false);
        for _ in 0..150 {
            let frame = source.generate_frame();
            assert_eq!(classify(&frame), PacketKind::Basic);
        }
    }
}
