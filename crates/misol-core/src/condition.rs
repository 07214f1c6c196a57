//! Overall weather condition from the current measurements

use crate::types::{Field, Reading};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherCondition {
    Clear,
    Hot,
    Freezing,
    Windy,
    LightRain,
    ModerateRain,
    HeavyRain,
    Cloudy,
    Foggy,
}

impl WeatherCondition {
    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Hot => "Hot",
            WeatherCondition::Freezing => "Freezing",
            WeatherCondition::Windy => "Windy",
            WeatherCondition::LightRain => "Light Rain",
            WeatherCondition::ModerateRain => "Moderate Rain",
            WeatherCondition::HeavyRain => "Heavy Rain",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Foggy => "Foggy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs of the condition cascade; `None` or NaN skips the matching rule
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionInputs {
    pub temperature: Option<f32>,
    pub wind_speed: Option<f32>,
    /// mm/h
    pub rain_intensity: Option<f32>,
    pub light: Option<f32>,
    pub humidity: Option<f32>,
}

impl ConditionInputs {
    pub fn from_reading(reading: &Reading, rain_intensity: Option<f32>) -> Self {
        Self {
            temperature: reading.get(Field::Temperature),
            wind_speed: reading.get(Field::WindSpeed),
            rain_intensity,
            light: reading.get(Field::Light),
            humidity: reading.get(Field::Humidity),
        }
    }
}

fn above(value: Option<f32>, threshold: f32) -> bool {
    value.map_or(false, |v| v > threshold)
}

fn below(value: Option<f32>, threshold: f32) -> bool {
    value.map_or(false, |v| v < threshold)
}

/// Later rules override earlier ones; cloud and fog only apply to a clear sky
pub fn weather_condition(inputs: &ConditionInputs) -> WeatherCondition {
    let mut condition = WeatherCondition::Clear;

    if above(inputs.temperature, 30.0) {
        condition = WeatherCondition::Hot;
    } else if below(inputs.temperature, 0.0) {
        condition = WeatherCondition::Freezing;
    }

    if above(inputs.wind_speed, 25.0) {
        condition = WeatherCondition::Windy;
    }

    if let Some(rain) = inputs.rain_intensity.filter(|r| *r > 0.0) {
        condition = if rain < 2.5 {
            WeatherCondition::LightRain
        } else if rain < 7.6 {
            WeatherCondition::ModerateRain
        } else {
            WeatherCondition::HeavyRain
        };
    }

    if condition == WeatherCondition::Clear && below(inputs.light, 2000.0) {
        condition = WeatherCondition::Cloudy;
    }

    if condition == WeatherCondition::Clear && above(inputs.humidity, 90.0) {
        condition = WeatherCondition::Foggy;
    }

    condition
}
