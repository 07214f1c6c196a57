//! Stateful post-processing of decoded readings

use crate::condition::{weather_condition, ConditionInputs, WeatherCondition};
use crate::describe::{
    compass_direction, light_description, precipitation_description, wind_description,
};
use crate::night::NightDetector;
use crate::rate::PrecipitationRate;
use crate::settings::StationSettings;
use crate::types::{Field, Reading};
use std::time::Instant;

/// Values derived from one reading
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// mm/h
    pub precipitation_intensity: Option<f32>,
    pub night: Option<bool>,
    pub wind_direction: &'static str,
    pub wind_speed_description: &'static str,
    pub light_description: &'static str,
    pub precipitation_description: &'static str,
    pub condition: WeatherCondition,
}

/// Owns the rate and night state that outlive individual frames
#[derive(Debug, Clone)]
pub struct DerivedEngine {
    settings: StationSettings,
    rate: PrecipitationRate,
    night: NightDetector,
}

impl DerivedEngine {
    pub fn new(settings: StationSettings) -> Self {
        Self {
            rate: PrecipitationRate::new(settings.rate_interval(), settings.counter_reset),
            night: NightDetector::new(settings.night_threshold),
            settings,
        }
    }

    pub fn derive(&mut self, reading: &Reading, now: Instant) -> Derived {
        let precipitation_intensity = self.rate.update(reading.rain_counter, now);
        let night = self.night.update(reading.get(Field::UvIntensity));
        let condition =
            weather_condition(&ConditionInputs::from_reading(reading, precipitation_intensity));

        Derived {
            precipitation_intensity,
            night,
            wind_direction: compass_direction(
                reading.get(Field::WindDirection),
                self.settings.north_correction,
                self.settings.compass_resolution,
            ),
            wind_speed_description: wind_description(reading.get(Field::WindSpeed)),
            light_description: light_description(reading.get(Field::Light)),
            precipitation_description: precipitation_description(precipitation_intensity),
            condition,
        }
    }

    /// Drop the rate baseline, and the night state when configured to
    pub fn reset(&mut self) {
        self.rate.reset();
        if self.settings.reset_night_on_timeout {
            self.night.reset();
        }
    }

    pub fn settings(&self) -> &StationSettings {
        &self.settings
    }

    pub fn rate(&self) -> &PrecipitationRate {
        &self.rate
    }

    pub fn night(&self) -> &NightDetector {
        &self.night
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::encode::FrameBuilder;
    use crate::frame::classify;
    use std::time::Duration;

    fn reading(builder: FrameBuilder) -> Reading {
        let frame = builder.build();
        decode(&frame, classify(&frame))
    }

    #[test]
    fn test_derive_labels() {
        let mut engine = DerivedEngine::new(StationSettings::default());
        let derived = engine.derive(
            &reading(
                FrameBuilder::new()
                    .wind_direction(92)
                    .wind_speed_raw(28)
                    .light_raw(1_000_000)
                    .temperature_raw(600)
                    .humidity(50)
                    .uv_raw(300),
            ),
            Instant::now(),
        );

        assert_eq!(derived.wind_direction, "E");
        // 28 / 8 * 1.12 = 3.92 m/s
        assert_eq!(derived.wind_speed_description, "Gentle breeze");
        assert_eq!(derived.light_description, "Direct sunlight");
        assert_eq!(derived.precipitation_intensity, None);
        assert_eq!(derived.precipitation_description, "Unknown");
        assert_eq!(derived.night, Some(false));
        assert_eq!(derived.condition, WeatherCondition::Clear);
    }

    #[test]
    fn test_rain_feeds_condition() {
        let start = Instant::now();
        let mut engine = DerivedEngine::new(StationSettings::default());
        let base = || FrameBuilder::new().temperature_raw(600).light_raw(100_000);

        engine.derive(&reading(base().rain_counter(10)), start);
        let derived = engine.derive(
            &reading(base().rain_counter(14)),
            start + Duration::from_secs(300),
        );

        // 4 ticks over 5 minutes = 14.4 mm/h
        assert!((derived.precipitation_intensity.unwrap() - 14.4).abs() < 1e-3);
        assert_eq!(derived.precipitation_description, "Heavy rain");
        assert_eq!(derived.condition, WeatherCondition::HeavyRain);
    }

    #[test]
    fn test_north_correction_applies() {
        let settings = StationSettings {
            north_correction: 90,
            ..StationSettings::default()
        };
        let mut engine = DerivedEngine::new(settings);
        let derived = engine.derive(&reading(FrameBuilder::new().wind_direction(0)), Instant::now());
        assert_eq!(derived.wind_direction, "E");
    }

    #[test]
    fn test_reset_keeps_night_by_default() {
        let start = Instant::now();
        let mut engine = DerivedEngine::new(StationSettings::default());
        engine.derive(&reading(FrameBuilder::new().uv_raw(0)), start);
        engine.reset();
        assert!(!engine.rate().has_baseline());
        assert_eq!(engine.night().state(), Some(true));

        let mut engine = DerivedEngine::new(StationSettings {
            reset_night_on_timeout: true,
            ..StationSettings::default()
        });
        engine.derive(&reading(FrameBuilder::new().uv_raw(0)), start);
        engine.reset();
        assert_eq!(engine.night().state(), None);
    }
}
