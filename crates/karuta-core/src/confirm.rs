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

use serde::Deserialize;
use serde::Serialize;

/// Actions that throw away session progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestructiveAction {
    /// Stop drilling and show the summary.
    End,
    /// Reshuffle the same range and start over.
    ResetSameRange,
    /// Discard the session and return to setup.
    ResetAll,
}

impl DestructiveAction {
    pub fn prompt(self) -> ConfirmPrompt {
        let (message, ok_label, cancel_label) = match self {
            DestructiveAction::End => ("本当に終了しますか？", "終了", "キャンセル"),
            DestructiveAction::ResetSameRange => ("本当にリセットしますか？", "リセット", "キャンセル"),
            DestructiveAction::ResetAll => ("本当に戻りますか？", "はい", "いいえ"),
        };
        ConfirmPrompt {
            action: self,
            message: message.to_string(),
            ok_label: ok_label.to_string(),
            cancel_label: cancel_label.to_string(),
        }
    }
}

/// What the confirmation modal shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfirmPrompt {
    pub action: DestructiveAction,
    pub message: String,
    pub ok_label: String,
    pub cancel_label: String,
}

/// Which destructive actions must be confirmed before they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePolicy {
    pub end: bool,
    pub reset_same_range: bool,
    pub reset_all: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            end: true,
            reset_same_range: true,
            reset_all: true,
        }
    }
}

impl GatePolicy {
    /// Nothing is confirmed.
    pub fn open() -> Self {
        Self {
            end: false,
            reset_same_range: false,
            reset_all: false,
        }
    }

    pub fn requires_confirmation(&self, action: DestructiveAction) -> bool {
        match action {
            DestructiveAction::End => self.end,
            DestructiveAction::ResetSameRange => self.reset_same_range,
            DestructiveAction::ResetAll => self.reset_all,
        }
    }
}

/// Result of asking for a destructive action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    Executed,
    /// Nothing happens until [`crate::session::Session::confirm`].
    AwaitingConfirmation(ConfirmPrompt),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gates_everything() {
        let policy = GatePolicy::default();
        assert!(policy.requires_confirmation(DestructiveAction::End));
        assert!(policy.requires_confirmation(DestructiveAction::ResetSameRange));
        assert!(policy.requires_confirmation(DestructiveAction::ResetAll));
        assert!(!GatePolicy::open().requires_confirmation(DestructiveAction::End));
    }

    #[test]
    fn test_prompt_labels() {
        let prompt = DestructiveAction::ResetAll.prompt();
        assert_eq!(prompt.message, "本当に戻りますか？");
        assert_eq!(prompt.ok_label, "はい");
        assert_eq!(prompt.cancel_label, "いいえ");
        let prompt = DestructiveAction::End.prompt();
        assert_eq!(prompt.message, "本当に終了しますか？");
        assert_eq!(prompt.ok_label, "終了");
        assert_eq!(prompt.cancel_label, "キャンセル");
        assert_eq!(DestructiveAction::ResetSameRange.prompt().ok_label, "リセット");
    }
}
