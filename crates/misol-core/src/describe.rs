//! Text labels derived from measurements

use crate::types::UNKNOWN;
use serde::{Deserialize, Serialize};

/// Number of compass sectors used for direction labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassResolution {
    /// N, NNE, NE, ... (22.5° sectors)
    #[default]
    SixteenPoint,
    /// N, NE, E, ... (45° sectors)
    EightPoint,
}

const SIXTEEN_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const EIGHT_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

fn known(value: Option<f32>) -> Option<f32> {
    value.filter(|v| !v.is_nan())
}

/// Compass label for a wind direction, sector 0 centred on north
pub fn compass_direction(
    degrees: Option<f32>,
    north_correction: i32,
    resolution: CompassResolution,
) -> &'static str {
    let Some(degrees) = known(degrees) else {
        return UNKNOWN;
    };
    let labels: &[&'static str] = match resolution {
        CompassResolution::SixteenPoint => &SIXTEEN_POINTS,
        CompassResolution::EightPoint => &EIGHT_POINTS,
    };
    let sector = 360.0 / labels.len() as f64;
    let corrected = f64::from(degrees) + f64::from(north_correction);
    let index = ((corrected + sector / 2.0) / sector).floor() as i64;
    labels[index.rem_euclid(labels.len() as i64) as usize]
}

/// Beaufort-style description of a wind speed in m/s
pub fn wind_description(speed: Option<f32>) -> &'static str {
    let Some(speed) = known(speed) else {
        return UNKNOWN;
    };
    match speed {
        s if s < 0.3 => "Calm",
        s if s <= 1.5 => "Light air",
        s if s <= 3.3 => "Light breeze",
        s if s <= 5.5 => "Gentle breeze",
        s if s <= 7.9 => "Moderate breeze",
        s if s <= 10.7 => "Fresh breeze",
        s if s <= 13.8 => "Strong breeze",
        s if s <= 17.1 => "High wind",
        s if s <= 20.7 => "Gale",
        s if s <= 24.4 => "Severe gale",
        s if s <= 28.4 => "Storm",
        s if s <= 32.6 => "Violent storm",
        _ => "Hurricane force",
    }
}

/// Sky description for an illuminance in lux
pub fn light_description(lux: Option<f32>) -> &'static str {
    let Some(lux) = known(lux) else {
        return UNKNOWN;
    };
    match lux {
        l if l < 2.0 => "Overcast night",
        l if l < 3.0 => "Clear night sky",
        l if l < 50.0 => "Rural night sky",
        l if l < 400.0 => "Dark overcast sky",
        l if l < 4500.0 => "Overcast day",
        l if l < 28_500.0 => "Full daylight",
        l if l < 120_000.0 => "Direct sunlight",
        _ => "Bright direct sunlight",
    }
}

/// Intensity class for a precipitation rate in mm/h
pub fn precipitation_description(rate: Option<f32>) -> &'static str {
    let Some(rate) = known(rate) else {
        return UNKNOWN;
    };
    match rate {
        r if r <= 0.0 => "No precipitation",
        r if r <= 2.5 => "Light rain",
        r if r <= 7.5 => "Moderate rain",
        r if r <= 50.0 => "Heavy rain",
        _ => "Violent rain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_sixteen_points() {
        let dir = |d: f32| compass_direction(Some(d), 0, CompassResolution::SixteenPoint);
        assert_eq!(dir(0.0), "N");
        assert_eq!(dir(11.0), "N");
        assert_eq!(dir(11.25), "NNE");
        assert_eq!(dir(90.0), "E");
        assert_eq!(dir(200.0), "SSW");
        assert_eq!(dir(340.0), "NNW");
        assert_eq!(dir(349.0), "N");
        assert_eq!(dir(355.0), "N");
    }

    #[test]
    fn test_compass_eight_points() {
        let dir = |d: f32| compass_direction(Some(d), 0, CompassResolution::EightPoint);
        assert_eq!(dir(10.0), "N");
        insta::assert_snapshot!(dir(30.0), @"NE");
        assert_eq!(dir(250.0), "W");
        assert_eq!(dir(340.0), "N");
    }

    #[test]
    fn test_compass_north_correction_wraps() {
        assert_eq!(
            compass_direction(Some(10.0), -30, CompassResolution::SixteenPoint),
            "NNW"
        );
        assert_eq!(
            compass_direction(Some(350.0), 100, CompassResolution::SixteenPoint),
            "E"
        );
    }

    #[test]
    fn test_compass_unknown() {
        assert_eq!(
            compass_direction(None, 0, CompassResolution::SixteenPoint),
            UNKNOWN
        );
        assert_eq!(
            compass_direction(Some(f32::NAN), 0, CompassResolution::EightPoint),
            UNKNOWN
        );
    }

    #[test]
    fn test_wind_description_boundaries() {
        assert_eq!(wind_description(Some(0.0)), "Calm");
        assert_eq!(wind_description(Some(0.3)), "Light air");
        assert_eq!(wind_description(Some(1.5)), "Light air");
        assert_eq!(wind_description(Some(1.6)), "Light breeze");
        insta::assert_snapshot!(wind_description(Some(5.0)), @"Gentle breeze");
        assert_eq!(wind_description(Some(17.1)), "High wind");
        assert_eq!(wind_description(Some(30.0)), "Violent storm");
        assert_eq!(wind_description(Some(40.0)), "Hurricane force");
        assert_eq!(wind_description(None), UNKNOWN);
    }

    #[test]
    fn test_light_description() {
        assert_eq!(light_description(Some(1.0)), "Overcast night");
        assert_eq!(light_description(Some(2.0)), "Clear night sky");
        assert_eq!(light_description(Some(10.0)), "Rural night sky");
        assert_eq!(light_description(Some(4500.0)), "Full daylight");
        assert_eq!(light_description(Some(120_000.0)), "Bright direct sunlight");
        assert_eq!(light_description(None), UNKNOWN);
    }

    #[test]
    fn test_precipitation_description() {
        assert_eq!(precipitation_description(Some(0.0)), "No precipitation");
        assert_eq!(precipitation_description(Some(2.5)), "Light rain");
        assert_eq!(precipitation_description(Some(7.5)), "Moderate rain");
        assert_eq!(precipitation_description(Some(30.0)), "Heavy rain");
        assert_eq!(precipitation_description(Some(51.0)), "Violent rain");
        assert_eq!(precipitation_description(Some(f32::NAN)), UNKNOWN);
    }
}
