//! Core data types for decoded station telemetry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label published by text channels when their input is unknown
pub const UNKNOWN: &str = "Unknown";

/// Frame shape reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Invalid,
    Basic,
    BasicWithPressure,
}

/// Numeric measurement carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    WindDirection,
    Temperature,
    Humidity,
    WindSpeed,
    WindGust,
    AccumulatedPrecipitation,
    UvIntensity,
    UvIndex,
    Light,
    Pressure,
}

impl Field {
    pub const COUNT: usize = 10;

    pub const ALL: [Field; Field::COUNT] = [
        Field::WindDirection,
        Field::Temperature,
        Field::Humidity,
        Field::WindSpeed,
        Field::WindGust,
        Field::AccumulatedPrecipitation,
        Field::UvIntensity,
        Field::UvIndex,
        Field::Light,
        Field::Pressure,
    ];

    /// Output channel the decoded value is published on
    pub fn channel(self) -> Channel {
        match self {
            Field::WindDirection => Channel::WindDirectionDegrees,
            Field::Temperature => Channel::Temperature,
            Field::Humidity => Channel::Humidity,
            Field::WindSpeed => Channel::WindSpeed,
            Field::WindGust => Channel::WindGust,
            Field::AccumulatedPrecipitation => Channel::AccumulatedPrecipitation,
            Field::UvIntensity => Channel::UvIntensity,
            Field::UvIndex => Channel::UvIndex,
            Field::Light => Channel::Light,
            Field::Pressure => Channel::Pressure,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Measurements decoded from one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub kind: PacketKind,

    /// Battery-low flag bit
    pub low_battery: bool,

    /// Raw tipping-bucket counter, 0.3 mm per tick
    pub rain_counter: u16,

    values: [Option<f32>; Field::COUNT],
}

impl Reading {
    /// Reading with every field absent
    pub fn empty(kind: PacketKind) -> Self {
        Self {
            kind,
            low_battery: false,
            rain_counter: 0,
            values: [None; Field::COUNT],
        }
    }

    pub fn get(&self, field: Field) -> Option<f32> {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: Option<f32>) {
        self.values[field.index()] = value;
    }

    pub fn has_pressure(&self) -> bool {
        self.kind == PacketKind::BasicWithPressure
    }
}

/// Named output channel handed to the sink
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    WindDirectionDegrees,
    WindGust,
    AccumulatedPrecipitation,
    PrecipitationIntensity,
    Light,
    UvIntensity,
    UvIndex,
    WindDirection,
    WindSpeedDescription,
    LightDescription,
    PrecipitationDescription,
    WeatherConditions,
    LowBattery,
    Night,
}

impl Channel {
    pub const ALL: [Channel; 18] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Pressure,
        Channel::WindSpeed,
        Channel::WindDirectionDegrees,
        Channel::WindGust,
        Channel::AccumulatedPrecipitation,
        Channel::PrecipitationIntensity,
        Channel::Light,
        Channel::UvIntensity,
        Channel::UvIndex,
        Channel::WindDirection,
        Channel::WindSpeedDescription,
        Channel::LightDescription,
        Channel::PrecipitationDescription,
        Channel::WeatherConditions,
        Channel::LowBattery,
        Channel::Night,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Pressure => "pressure",
            Channel::WindSpeed => "wind_speed",
            Channel::WindDirectionDegrees => "wind_direction_degrees",
            Channel::WindGust => "wind_gust",
            Channel::AccumulatedPrecipitation => "accumulated_precipitation",
            Channel::PrecipitationIntensity => "precipitation_intensity",
            Channel::Light => "light",
            Channel::UvIntensity => "uv_intensity",
            Channel::UvIndex => "uv_index",
            Channel::WindDirection => "wind_direction",
            Channel::WindSpeedDescription => "wind_speed_description",
            Channel::LightDescription => "light_description",
            Channel::PrecipitationDescription => "precipitation_description",
            Channel::WeatherConditions => "weather_conditions",
            Channel::LowBattery => "low_battery",
            Channel::Night => "night",
        }
    }

    /// Value published when the station has lost contact
    pub fn unknown(self) -> Value {
        match self {
            Channel::WindDirection
            | Channel::WindSpeedDescription
            | Channel::LightDescription
            | Channel::PrecipitationDescription
            | Channel::WeatherConditions => Value::Text(UNKNOWN),
            Channel::LowBattery | Channel::Night => Value::Flag(None),
            _ => Value::Number(f32::NAN),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A published value; NaN numbers and `None` flags mean "unknown"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f32),
    Text(&'static str),
    Flag(Option<bool>),
}

impl Value {
    pub fn number(value: Option<f32>) -> Self {
        Value::Number(value.unwrap_or(f32::NAN))
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'static str> {
        match self {
            Value::Text(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => *b,
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            Value::Number(v) => v.is_nan(),
            Value::Text(s) => *s == UNKNOWN,
            Value::Flag(b) => b.is_none(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) if v.is_nan() => f.write_str("unknown"),
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Flag(Some(b)) => write!(f, "{}", b),
            Value::Flag(None) => f.write_str("unknown"),
        }
    }
}
