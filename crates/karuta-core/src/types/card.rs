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

pub type CardId = u32;

/// A single card of the deck. Cards are loaded once and never change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    initial: String,
    content: String,
    level: u32,
}

impl Card {
    pub fn new(
        id: CardId,
        initial: impl Into<String>,
        content: impl Into<String>,
        level: u32,
    ) -> Self {
        Self {
            id,
            initial: initial.into(),
            content: content.into(),
            level,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    /// The character printed in the corner of the card.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}
