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

//! The card dataset: a JSON array of `{id, initial, content, level}` records.

use std::collections::BTreeMap;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::range::CardRange;

/// Every card of the deck, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct CardSet {
    cards: BTreeMap<CardId, Card>,
}

impl CardSet {
    /// Build a set, rejecting duplicate ids.
    pub fn new(cards: Vec<Card>) -> Fallible<Self> {
        let mut map = BTreeMap::new();
        for card in cards {
            let id = card.id();
            if map.insert(id, card).is_some() {
                return fail(format!("duplicate card id {id}"));
            }
        }
        Ok(Self { cards: map })
    }

    /// Parse the JSON dataset.
    pub fn from_json(text: &str) -> Fallible<Self> {
        let cards: Vec<Card> = serde_json::from_str(text)?;
        Self::new(cards)
    }

    pub fn to_json(&self) -> Fallible<String> {
        let cards: Vec<&Card> = self.cards.values().collect();
        Ok(serde_json::to_string(&cards)?)
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Ids in the range that have no card.
    pub fn missing_in(&self, range: CardRange) -> Vec<CardId> {
        range
            .ids()
            .filter(|id| !self.cards.contains_key(id))
            .collect()
    }

    /// Ids of cards that no valid range can select.
    pub fn outside(&self, range: CardRange) -> Vec<CardId> {
        self.cards
            .keys()
            .copied()
            .filter(|id| !range.contains(*id))
            .collect()
    }
}
