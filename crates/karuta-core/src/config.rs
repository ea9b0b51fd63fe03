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

//! Drill configuration, read from a TOML file. Every key is optional.

use serde::Deserialize;
use serde::Serialize;

use crate::confirm::GatePolicy;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::range::CardRange;
use crate::types::settings::PlaybackSettings;

/// A named range offered as a one-click choice on the setup screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePreset {
    pub label: String,
    #[serde(flatten)]
    pub range: CardRange,
}

impl RangePreset {
    fn new(start: u32, end: u32) -> Self {
        Self {
            label: format!("{start}-{end}"),
            range: CardRange::new(start, end).unwrap_or_else(|_| CardRange::full()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// Initial values of the setup form.
    pub playback: PlaybackSettings,
    /// Interval options, in seconds.
    pub interval_choices: Vec<u32>,
    /// Repeat options.
    pub repeat_choices: Vec<u32>,
    pub confirm: GatePolicy,
    pub presets: Vec<RangePreset>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackSettings::default(),
            interval_choices: vec![1, 2, 3, 5],
            repeat_choices: vec![1, 2, 3],
            confirm: GatePolicy::default(),
            presets: vec![
                RangePreset::new(1, 20),
                RangePreset::new(21, 40),
                RangePreset::new(41, 60),
                RangePreset::new(61, 80),
                RangePreset::new(81, 100),
                RangePreset::new(1, 100),
            ],
        }
    }
}

impl DrillConfig {
    pub fn from_toml(text: &str) -> Fallible<Self> {
        let config: DrillConfig = toml::from_str(text)?;
        config.validated()
    }

    pub fn from_json(text: &str) -> Fallible<Self> {
        let config: DrillConfig = serde_json::from_str(text)?;
        config.validated()
    }

    fn validated(self) -> Fallible<Self> {
        if self.repeat_choices.contains(&0) {
            return fail("repeat_choices must not contain 0");
        }
        if self.interval_choices.is_empty() || self.repeat_choices.is_empty() {
            return fail("interval_choices and repeat_choices must not be empty");
        }
        Ok(Self {
            playback: self.playback.normalized(),
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() -> Fallible<()> {
        assert_eq!(DrillConfig::from_toml("")?, DrillConfig::default());
        Ok(())
    }

    #[test]
    fn test_parse() -> Fallible<()> {
        let text = r#"
interval_choices = [2, 4]

[playback]
repeat = 3

[confirm]
reset_same_range = false

[[presets]]
label = "first ten"
start = 1
end = 10
"#;
        let config = DrillConfig::from_toml(text)?;
        assert_eq!(config.playback, PlaybackSettings::new(2, 3, 1.2));
        assert_eq!(config.interval_choices, vec![2, 4]);
        assert_eq!(config.repeat_choices, vec![1, 2, 3]);
        assert!(config.confirm.end);
        assert!(!config.confirm.reset_same_range);
        assert_eq!(config.presets.len(), 1);
        assert_eq!(config.presets[0].label, "first ten");
        assert_eq!(config.presets[0].range.len(), 10);
        Ok(())
    }

    #[test]
    fn test_invalid_preset() {
        let text = "[[presets]]\nlabel = \"bad\"\nstart = 90\nend = 120\n";
        assert!(DrillConfig::from_toml(text).is_err());
    }

    #[test]
    fn test_zero_repeat_choice() {
        assert!(DrillConfig::from_toml("repeat_choices = [0, 1]").is_err());
    }

    #[test]
    fn test_json_roundtrip() -> Fallible<()> {
        let config = DrillConfig::default();
        let json = serde_json::to_string(&config)?;
        assert_eq!(DrillConfig::from_json(&json)?, config);
        Ok(())
    }
}
