//! Day/night detection from UV intensity with hysteresis

use serde::{Deserialize, Serialize};

/// UV intensity thresholds of the night detector
///
/// Deserializes from either `{ lower, upper }` or a single number used for both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThresholdSpec")]
pub struct NightThreshold {
    pub lower: f32,
    pub upper: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdSpec {
    Single(f32),
    Pair { lower: f32, upper: f32 },
}

impl From<ThresholdSpec> for NightThreshold {
    fn from(spec: ThresholdSpec) -> Self {
        match spec {
            ThresholdSpec::Single(value) => Self {
                lower: value,
                upper: value,
            },
            ThresholdSpec::Pair { lower, upper } => Self { lower, upper },
        }
    }
}

impl Default for NightThreshold {
    fn default() -> Self {
        Self {
            lower: 4.5,
            upper: 5.5,
        }
    }
}

impl NightThreshold {
    pub fn midpoint(&self) -> f32 {
        (self.lower + self.upper) / 2.0
    }
}

/// Two-threshold night detector
///
/// Night ends once UV reaches `upper`; day ends once UV drops below `lower`.
#[derive(Debug, Clone)]
pub struct NightDetector {
    threshold: NightThreshold,
    night: Option<bool>,
}

impl NightDetector {
    pub fn new(threshold: NightThreshold) -> Self {
        Self {
            threshold,
            night: None,
        }
    }

    /// Feed a UV intensity; unknown values leave the state alone and report unknown
    pub fn update(&mut self, uv: Option<f32>) -> Option<bool> {
        let uv = uv.filter(|v| !v.is_nan())?;
        let night = match self.night {
            None => uv < self.threshold.midpoint(),
            Some(true) => uv < self.threshold.upper,
            Some(false) => uv < self.threshold.lower,
        };
        self.night = Some(night);
        Some(night)
    }

    pub fn state(&self) -> Option<bool> {
        self.night
    }

    pub fn reset(&mut self) {
        self.night = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_uses_midpoint() {
        let mut detector = NightDetector::new(NightThreshold::default());
        assert_eq!(detector.update(Some(4.9)), Some(true));

        let mut detector = NightDetector::new(NightThreshold::default());
        assert_eq!(detector.update(Some(5.1)), Some(false));
    }

    #[test]
    fn test_day_turns_night_only_below_lower() {
        let mut detector = NightDetector::new(NightThreshold::default());
        assert_eq!(detector.update(Some(10.0)), Some(false));

        for uv in [6.0, 5.5, 5.4, 5.0, 4.6, 4.5] {
            assert_eq!(detector.update(Some(uv)), Some(false), "uv {}", uv);
        }
        assert_eq!(detector.update(Some(4.4)), Some(true));
    }

    #[test]
    fn test_night_turns_day_only_at_upper() {
        let mut detector = NightDetector::new(NightThreshold::default());
        assert_eq!(detector.update(Some(0.0)), Some(true));

        for uv in [4.5, 5.0, 5.4] {
            assert_eq!(detector.update(Some(uv)), Some(true), "uv {}", uv);
        }
        assert_eq!(detector.update(Some(5.5)), Some(false));
    }

    #[test]
    fn test_unknown_uv_keeps_state() {
        let mut detector = NightDetector::new(NightThreshold::default());
        detector.update(Some(0.0));
        assert_eq!(detector.update(None), None);
        assert_eq!(detector.update(Some(f32::NAN)), None);
        assert_eq!(detector.state(), Some(true));

        detector.reset();
        assert_eq!(detector.state(), None);
    }
}
