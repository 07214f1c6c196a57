//! Frame encoder, used by the simulator and by tests

use crate::frame::{checksum, START_MARKER};

/// Builds a checksummed frame from raw field values
///
/// Values are raw wire units; bits beyond a field's width are dropped.
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    wind_direction: u16,
    low_battery: bool,
    temperature: u16,
    humidity: u8,
    wind_speed: u16,
    wind_gust: u8,
    rain_counter: u16,
    uv: u16,
    light: u32,
    pressure: Option<u32>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 9-bit direction in degrees, 0x1FF when absent
    pub fn wind_direction(mut self, raw: u16) -> Self {
        self.wind_direction = raw & 0x1FF;
        self
    }

    pub fn low_battery(mut self, low: bool) -> Self {
        self.low_battery = low;
        self
    }

    /// 11-bit temperature, tenths of a degree offset by 400
    pub fn temperature_raw(mut self, raw: u16) -> Self {
        self.temperature = raw & 0x7FF;
        self
    }

    pub fn humidity(mut self, raw: u8) -> Self {
        self.humidity = raw;
        self
    }

    /// 9-bit wind speed in 1/8 units of 1.12 m/s
    pub fn wind_speed_raw(mut self, raw: u16) -> Self {
        self.wind_speed = raw & 0x1FF;
        self
    }

    pub fn wind_gust_raw(mut self, raw: u8) -> Self {
        self.wind_gust = raw;
        self
    }

    pub fn rain_counter(mut self, raw: u16) -> Self {
        self.rain_counter = raw;
        self
    }

    /// UV intensity in tenths of µW/cm²
    pub fn uv_raw(mut self, raw: u16) -> Self {
        self.uv = raw;
        self
    }

    /// 24-bit illuminance in tenths of a lux
    pub fn light_raw(mut self, raw: u32) -> Self {
        self.light = raw & 0xFF_FFFF;
        self
    }

    /// 24-bit pressure in Pa; adds the pressure block to the frame
    pub fn pressure_raw(mut self, raw: u32) -> Self {
        self.pressure = Some(raw & 0xFF_FFFF);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut byte3 = ((self.temperature >> 8) & 0x07) as u8;
        if self.wind_direction & 0x100 != 0 {
            byte3 |= 0x80;
        }
        if self.wind_speed & 0x100 != 0 {
            byte3 |= 0x10;
        }
        if self.low_battery {
            byte3 |= 0x08;
        }

        let mut frame = vec![
            START_MARKER,
            0x00,
            self.wind_direction as u8,
            byte3,
            self.temperature as u8,
            self.humidity,
            self.wind_speed as u8,
            self.wind_gust,
            (self.rain_counter >> 8) as u8,
            self.rain_counter as u8,
            (self.uv >> 8) as u8,
            self.uv as u8,
            (self.light >> 16) as u8,
            (self.light >> 8) as u8,
            self.light as u8,
            0x00,
        ];
        frame.push(checksum(&frame));

        if let Some(pressure) = self.pressure {
            let block = [(pressure >> 16) as u8, (pressure >> 8) as u8, pressure as u8];
            frame.extend_from_slice(&block);
            frame.push(checksum(&block));
        }
        frame
    }
}
