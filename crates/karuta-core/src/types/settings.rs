// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Slowest rate the Web Speech API accepts.
pub const MIN_RATE: f64 = 0.1;

/// Fastest rate the Web Speech API accepts.
pub const MAX_RATE: f64 = 10.0;

/// How each card is read aloud.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Seconds of silence between two readings of the same card.
    pub interval: u32,
    /// How many times each card is read.
    pub repeat: u32,
    /// Speech rate multiplier.
    pub rate: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            interval: 2,
            repeat: 2,
            rate: 1.2,
        }
    }
}

impl PlaybackSettings {
    pub fn new(interval: u32, repeat: u32, rate: f64) -> Self {
        Self {
            interval,
            repeat,
            rate,
        }
        .normalized()
    }

    /// Clamp values the narration engine cannot use: at least one reading,
    /// and a finite rate within the engine's range.
    pub fn normalized(self) -> Self {
        let rate = if self.rate.is_finite() {
            self.rate.clamp(MIN_RATE, MAX_RATE)
        } else {
            Self::default().rate
        };
        Self {
            interval: self.interval,
            repeat: self.repeat.max(1),
            rate,
        }
    }

    pub fn with_rate(self, rate: f64) -> Self {
        Self { rate, ..self }.normalized()
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PlaybackSettings::default();
        assert_eq!(settings.interval, 2);
        assert_eq!(settings.repeat, 2);
        assert_eq!(settings.rate, 1.2);
        assert_eq!(settings.interval_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_normalized() {
        let settings = PlaybackSettings::new(0, 0, 50.0);
        assert_eq!(settings.repeat, 1);
        assert_eq!(settings.rate, MAX_RATE);
        assert_eq!(settings.with_rate(f64::NAN).rate, 1.2);
        assert_eq!(settings.with_rate(0.0).rate, MIN_RATE);
    }

    #[test]
    fn test_partial_deserialize() -> Result<(), serde_json::Error> {
        let settings: PlaybackSettings = serde_json::from_str(r#"{"repeat": 3}"#)?;
        assert_eq!(settings, PlaybackSettings::new(2, 3, 1.2));
        Ok(())
    }
}
