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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::Serialize;

use crate::types::card::CardId;

/// The lowest card number a range may start at.
pub const MIN_CARD_ID: CardId = 1;

/// The highest card number a range may end at.
pub const MAX_CARD_ID: CardId = 100;

/// Why a start/end pair was rejected. The `Display` text is shown to the
/// user next to the range inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// One or both numbers are blank.
    Missing,
    StartOutOfBounds,
    EndOutOfBounds,
    /// Start is greater than end.
    Inverted,
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::Missing => write!(f, "開始番号と終了番号を入力してください。"),
            RangeError::StartOutOfBounds => write!(
                f,
                "開始番号は{MIN_CARD_ID}〜{MAX_CARD_ID}の範囲で入力してください。"
            ),
            RangeError::EndOutOfBounds => write!(
                f,
                "終了番号は{MIN_CARD_ID}〜{MAX_CARD_ID}の範囲で入力してください。"
            ),
            RangeError::Inverted => write!(f, "開始番号は終了番号以下にしてください。"),
        }
    }
}

impl Error for RangeError {}

/// Raw range input, as typed by the user. Either side may be blank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RangeInput {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl RangeInput {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Read a pair of form fields. Blank or non-numeric text counts as
    /// missing.
    pub fn parse(start: &str, end: &str) -> Self {
        Self {
            start: start.trim().parse().ok(),
            end: end.trim().parse().ok(),
        }
    }

    pub fn validate(self) -> Result<CardRange, RangeError> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(RangeError::Missing);
        };
        let bounds = i64::from(MIN_CARD_ID)..=i64::from(MAX_CARD_ID);
        if !bounds.contains(&start) {
            return Err(RangeError::StartOutOfBounds);
        }
        if !bounds.contains(&end) {
            return Err(RangeError::EndOutOfBounds);
        }
        if start > end {
            return Err(RangeError::Inverted);
        }
        Ok(CardRange {
            start: start as CardId,
            end: end as CardId,
        })
    }
}

/// A validated, inclusive range of card ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeInput")]
pub struct CardRange {
    start: CardId,
    end: CardId,
}

impl CardRange {
    pub fn new(start: CardId, end: CardId) -> Result<Self, RangeError> {
        RangeInput::new(i64::from(start), i64::from(end)).validate()
    }

    /// The whole deck.
    pub fn full() -> Self {
        Self {
            start: MIN_CARD_ID,
            end: MAX_CARD_ID,
        }
    }

    pub fn start(&self) -> CardId {
        self.start
    }

    pub fn end(&self) -> CardId {
        self.end
    }

    pub fn ids(&self) -> RangeInclusive<CardId> {
        self.start..=self.end
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.ids().contains(&id)
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<RangeInput> for CardRange {
    type Error = RangeError;

    fn try_from(value: RangeInput) -> Result<Self, Self::Error> {
        value.validate()
    }
}

impl Display for CardRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_below_bounds() {
        assert_eq!(
            RangeInput::new(0, 50).validate(),
            Err(RangeError::StartOutOfBounds)
        );
    }

    #[test]
    fn test_inverted() {
        assert_eq!(RangeInput::new(10, 5).validate(), Err(RangeError::Inverted));
    }

    #[test]
    fn test_full_range_ok() {
        assert_eq!(RangeInput::new(1, 100).validate(), Ok(CardRange::full()));
    }

    #[test]
    fn test_start_checked_before_end() {
        // Start is reported first, even when the range is also inverted.
        assert_eq!(
            RangeInput::new(101, 50).validate(),
            Err(RangeError::StartOutOfBounds)
        );
        assert_eq!(
            RangeInput::new(50, 101).validate(),
            Err(RangeError::EndOutOfBounds)
        );
    }

    #[test]
    fn test_blank_fields() {
        assert_eq!(RangeInput::parse("", "20").validate(), Err(RangeError::Missing));
        assert_eq!(RangeInput::parse("3", "x").validate(), Err(RangeError::Missing));
        assert_eq!(
            RangeInput::parse(" 3 ", "20").validate(),
            Ok(CardRange { start: 3, end: 20 })
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            RangeError::StartOutOfBounds.to_string(),
            "開始番号は1〜100の範囲で入力してください。"
        );
        assert_eq!(
            RangeError::EndOutOfBounds.to_string(),
            "終了番号は1〜100の範囲で入力してください。"
        );
        assert_eq!(
            RangeError::Inverted.to_string(),
            "開始番号は終了番号以下にしてください。"
        );
        assert_eq!(
            RangeError::Missing.to_string(),
            "開始番号と終了番号を入力してください。"
        );
    }

    #[test]
    fn test_len() -> Result<(), RangeError> {
        assert_eq!(CardRange::new(1, 20)?.len(), 20);
        assert_eq!(CardRange::new(7, 7)?.len(), 1);
        assert!(CardRange::new(7, 7)?.contains(7));
        assert!(!CardRange::new(7, 7)?.contains(8));
        Ok(())
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<CardRange, _> = serde_json::from_str(r#"{"start": 21, "end": 40}"#);
        assert_eq!(ok.ok(), Some(CardRange { start: 21, end: 40 }));
        let bad: Result<CardRange, _> = serde_json::from_str(r#"{"start": 40, "end": 21}"#);
        assert!(bad.is_err());
    }
}
