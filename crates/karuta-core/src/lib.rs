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

//! karuta-core: the card reader's logic, free of any I/O.
//!
//! This library provides WASM-compatible types and state machines for:
//! - Validating a range of card numbers and shuffling it into a draw pile
//! - Reading a card aloud a set number of times through a [`Narrator`]
//! - The setup/play/result session flow with confirmation of destructive
//!   actions

pub mod config;
pub mod confirm;
pub mod dataset;
pub mod error;
pub mod playback;
pub mod rng;
pub mod sequencer;
pub mod session;
#[cfg(test)]
mod testing;
pub mod types;

// Re-exports for convenience
pub use config::{DrillConfig, RangePreset};
pub use confirm::{ConfirmPrompt, DestructiveAction, Gate, GatePolicy};
pub use dataset::CardSet;
pub use error::{ErrorReport, Fallible, fail};
pub use playback::{
    Generation, Narrator, PlaybackController, PlaybackEvent, PlaybackState, Scheduler, Utterance,
};
pub use sequencer::DeckSequencer;
pub use session::{Screen, Session, SessionView, Summary};
pub use types::card::{Card, CardId};
pub use types::range::{CardRange, RangeError, RangeInput};
pub use types::settings::PlaybackSettings;
