//! Station behaviour settings, fixed at construction

use crate::describe::CompassResolution;
use crate::night::NightThreshold;
use crate::rate::CounterReset;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationSettings {
    /// Degrees added to the vane reading before labelling (-180..=180)
    pub north_correction: i32,

    pub compass_resolution: CompassResolution,

    /// Minimum minutes between precipitation rate updates
    pub precipitation_intensity_interval: u64,

    pub night_threshold: NightThreshold,

    /// Forget the day/night state when the station goes silent
    pub reset_night_on_timeout: bool,

    pub counter_reset: CounterReset,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            north_correction: 0,
            compass_resolution: CompassResolution::default(),
            precipitation_intensity_interval: 5,
            night_threshold: NightThreshold::default(),
            reset_night_on_timeout: false,
            counter_reset: CounterReset::default(),
        }
    }
}

impl StationSettings {
    pub fn rate_interval(&self) -> Duration {
        Duration::from_secs(self.precipitation_intensity_interval.saturating_mul(60))
    }
}
