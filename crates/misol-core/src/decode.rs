//! Field layout of a station frame
//!
//! Every measurement is described once in [`FIELD_TABLE`]: the bit segments
//! composing its raw value, the raw pattern meaning "sensor absent", and the
//! transform to physical units. [`decode`] walks that table.

use crate::types::{Field, PacketKind, Reading};

/// Millimetres of rain per tipping-bucket tick
pub const RAIN_MM_PER_TICK: f32 = 0.3;

/// Metres per second per anemometer unit
const WIND_MS_PER_UNIT: f32 = 1.12;

/// `(frame[byte] & mask) << shift`
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    byte: usize,
    mask: u8,
    shift: u32,
}

const fn seg(byte: usize, mask: u8, shift: u32) -> Segment {
    Segment { byte, mask, shift }
}

/// Declarative description of one measurement
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    segments: &'static [Segment],
    sentinel: Option<u32>,
    requires_pressure: bool,
    transform: fn(u32) -> f32,
}

pub static FIELD_TABLE: [FieldSpec; Field::COUNT] = [
    FieldSpec {
        field: Field::WindDirection,
        segments: &[seg(2, 0xFF, 0), seg(3, 0x80, 1)],
        sentinel: Some(0x1FF),
        requires_pressure: false,
        transform: |raw| raw as f32,
    },
    FieldSpec {
        field: Field::Temperature,
        segments: &[seg(4, 0xFF, 0), seg(3, 0x07, 8)],
        sentinel: Some(0x7FF),
        requires_pressure: false,
        transform: |raw| (raw as f32 - 400.0) / 10.0,
    },
    FieldSpec {
        field: Field::Humidity,
        segments: &[seg(5, 0xFF, 0)],
        sentinel: Some(0xFF),
        requires_pressure: false,
        transform: |raw| raw as f32,
    },
    FieldSpec {
        field: Field::WindSpeed,
        segments: &[seg(6, 0xFF, 0), seg(3, 0x10, 4)],
        sentinel: Some(0x1FF),
        requires_pressure: false,
        transform: |raw| raw as f32 / 8.0 * WIND_MS_PER_UNIT,
    },
    FieldSpec {
        field: Field::WindGust,
        segments: &[seg(7, 0xFF, 0)],
        sentinel: Some(0xFF),
        requires_pressure: false,
        transform: |raw| raw as f32 * WIND_MS_PER_UNIT,
    },
    FieldSpec {
        field: Field::AccumulatedPrecipitation,
        segments: &[seg(9, 0xFF, 0), seg(8, 0xFF, 8)],
        sentinel: None,
        requires_pressure: false,
        transform: |raw| raw as f32 * RAIN_MM_PER_TICK,
    },
    FieldSpec {
        field: Field::UvIntensity,
        segments: &[seg(11, 0xFF, 0), seg(10, 0xFF, 8)],
        sentinel: Some(0xFFFF),
        requires_pressure: false,
        transform: |raw| raw as f32 / 10.0,
    },
    FieldSpec {
        field: Field::UvIndex,
        segments: &[seg(11, 0xFF, 0), seg(10, 0xFF, 8)],
        sentinel: Some(0xFFFF),
        requires_pressure: false,
        transform: |raw| (raw / 400) as f32,
    },
    FieldSpec {
        field: Field::Light,
        segments: &[seg(14, 0xFF, 0), seg(13, 0xFF, 8), seg(12, 0xFF, 16)],
        sentinel: Some(0xFF_FFFF),
        requires_pressure: false,
        transform: |raw| raw as f32 / 10.0,
    },
    FieldSpec {
        field: Field::Pressure,
        segments: &[seg(17, 0xFF, 16), seg(18, 0xFF, 8), seg(19, 0xFF, 0)],
        sentinel: None,
        requires_pressure: true,
        transform: |raw| raw as f32 / 100.0,
    },
];

const LOW_BATTERY: Segment = seg(3, 0x08, 0);

impl Segment {
    fn extract(&self, frame: &[u8]) -> Option<u32> {
        frame
            .get(self.byte)
            .map(|b| u32::from(b & self.mask) << self.shift)
    }
}

impl FieldSpec {
    /// Raw value composed from the frame's bit segments
    pub fn raw(&self, frame: &[u8]) -> Option<u32> {
        self.segments
            .iter()
            .try_fold(0u32, |acc, s| s.extract(frame).map(|v| acc | v))
    }

    /// Physical value, `None` when the sensor reports no data
    pub fn decode(&self, frame: &[u8], kind: PacketKind) -> Option<f32> {
        if self.requires_pressure && kind != PacketKind::BasicWithPressure {
            return None;
        }
        let raw = self.raw(frame)?;
        if self.sentinel == Some(raw) {
            return None;
        }
        Some((self.transform)(raw))
    }
}

/// Look up the table entry for a field
pub fn field_spec(field: Field) -> &'static FieldSpec {
    &FIELD_TABLE[field as usize]
}

/// Decode every field of a classified frame
pub fn decode(frame: &[u8], kind: PacketKind) -> Reading {
    let mut reading = Reading::empty(kind);
    if kind == PacketKind::Invalid {
        return reading;
    }
    for spec in FIELD_TABLE.iter() {
        reading.set(spec.field, spec.decode(frame, kind));
    }
    reading.low_battery = LOW_BATTERY.extract(frame).map_or(false, |v| v != 0);
    reading.rain_counter = field_spec(Field::AccumulatedPrecipitation)
        .raw(frame)
        .map_or(0, |raw| raw as u16);
    reading
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::FrameBuilder;
    use crate::frame::classify;

    fn decode_frame(frame: &[u8]) -> Reading {
        decode(frame, classify(frame))
    }

    #[test]
    fn test_table_order_matches_fields() {
        for (i, spec) in FIELD_TABLE.iter().enumerate() {
            assert_eq!(spec.field as usize, i);
        }
    }

    #[test]
    fn test_temperature_uses_high_bits() {
        let frame = FrameBuilder::new().temperature_raw(0x7D0).build();
        assert_eq!(frame[3] & 0x07, 0x07);
        assert_eq!(frame[4], 0xD0);
        let reading = decode_frame(&frame);
        assert_eq!(reading.get(Field::Temperature), Some(160.0));
    }

    #[test]
    fn test_negative_temperature() {
        let frame = FrameBuilder::new().temperature_raw(250).build();
        let reading = decode_frame(&frame);
        assert_eq!(reading.get(Field::Temperature), Some(-15.0));
    }

    #[test]
    fn test_basic_fields() {
        let frame = FrameBuilder::new()
            .wind_direction(300)
            .humidity(64)
            .wind_speed_raw(40)
            .wind_gust_raw(10)
            .rain_counter(1234)
            .uv_raw(2500)
            .light_raw(123_456)
            .low_battery(true)
            .build();
        let reading = decode_frame(&frame);

        assert_eq!(reading.kind, PacketKind::Basic);
        assert_eq!(reading.get(Field::WindDirection), Some(300.0));
        assert_eq!(reading.get(Field::Humidity), Some(64.0));
        assert!((reading.get(Field::WindSpeed).unwrap() - 5.6).abs() < 1e-4);
        assert!((reading.get(Field::WindGust).unwrap() - 11.2).abs() < 1e-4);
        assert!((reading.get(Field::AccumulatedPrecipitation).unwrap() - 370.2).abs() < 1e-3);
        assert_eq!(reading.rain_counter, 1234);
        assert_eq!(reading.get(Field::UvIntensity), Some(250.0));
        assert_eq!(reading.get(Field::UvIndex), Some(6.0));
        assert!((reading.get(Field::Light).unwrap() - 12_345.6).abs() < 1e-2);
        assert!(reading.low_battery);
        assert_eq!(reading.get(Field::Pressure), None);
    }

    #[test]
    fn test_ninth_bits_of_wind() {
        let frame = FrameBuilder::new()
            .wind_direction(0x15A)
            .wind_speed_raw(0x108)
            .build();
        let reading = decode_frame(&frame);
        assert_eq!(reading.get(Field::WindDirection), Some(346.0));
        assert!((reading.get(Field::WindSpeed).unwrap() - 264.0 / 8.0 * 1.12).abs() < 1e-3);
    }

    #[test]
    fn test_pressure_only_with_pressure_kind() {
        let frame = FrameBuilder::new().pressure_raw(101_325).build();
        let reading = decode_frame(&frame);
        assert!(reading.has_pressure());
        assert!((reading.get(Field::Pressure).unwrap() - 1013.25).abs() < 1e-3);

        let degraded = decode(&frame, PacketKind::Basic);
        assert_eq!(degraded.get(Field::Pressure), None);
    }

    #[test]
    fn test_sentinels_yield_no_data() {
        let frame = FrameBuilder::new()
            .wind_direction(0x1FF)
            .temperature_raw(0x7FF)
            .humidity(0xFF)
            .wind_speed_raw(0x1FF)
            .wind_gust_raw(0xFF)
            .uv_raw(0xFFFF)
            .light_raw(0xFF_FFFF)
            .rain_counter(42)
            .build();
        let reading = decode_frame(&frame);

        for field in [
            Field::WindDirection,
            Field::Temperature,
            Field::Humidity,
            Field::WindSpeed,
            Field::WindGust,
            Field::UvIntensity,
            Field::UvIndex,
            Field::Light,
        ] {
            assert_eq!(reading.get(field), None, "{:?} should be absent", field);
        }
        assert!((reading.get(Field::AccumulatedPrecipitation).unwrap() - 12.6).abs() < 1e-4);
    }

    #[test]
    fn test_sentinel_is_independent_of_other_fields() {
        let frame = FrameBuilder::new()
            .temperature_raw(0x7FF)
            .humidity(40)
            .wind_direction(90)
            .build();
        let reading = decode_frame(&frame);
        assert_eq!(reading.get(Field::Temperature), None);
        assert_eq!(reading.get(Field::Humidity), Some(40.0));
        assert_eq!(reading.get(Field::WindDirection), Some(90.0));
    }

    #[test]
    fn test_invalid_kind_decodes_nothing() {
        let reading = decode(&[0x24, 0x00], PacketKind::Invalid);
        assert!(Field::ALL.iter().all(|f| reading.get(*f).is_none()));
    }

    #[test]
    fn test_short_buffer_with_pressure_kind_is_total() {
        let frame = FrameBuilder::new().build();
        let reading = decode(&frame, PacketKind::BasicWithPressure);
        assert_eq!(reading.get(Field::Pressure), None);
    }
}
