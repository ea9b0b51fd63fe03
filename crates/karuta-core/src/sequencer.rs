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

use std::collections::VecDeque;

use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::types::card::CardId;
use crate::types::range::CardRange;

/// The pool of card ids not yet read in this session, in draw order.
#[derive(Clone, Debug)]
pub struct DeckSequencer {
    range: CardRange,
    pool: VecDeque<CardId>,
}

impl DeckSequencer {
    /// Every id in the range, shuffled.
    pub fn initialize(range: CardRange, rng: &mut TinyRng) -> Self {
        Self {
            range,
            pool: shuffled_pool(range, rng),
        }
    }

    /// Take the next id. `None` means the pool is exhausted.
    pub fn draw(&mut self) -> Option<CardId> {
        self.pool.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Size of the range the pool was drawn from.
    pub fn total(&self) -> usize {
        self.range.len()
    }

    pub fn range(&self) -> CardRange {
        self.range
    }

    /// Refill the pool from the same range with a fresh shuffle.
    pub fn reset_within_range(&mut self, rng: &mut TinyRng) {
        self.pool = shuffled_pool(self.range, rng);
    }
}

fn shuffled_pool(range: CardRange, rng: &mut TinyRng) -> VecDeque<CardId> {
    let mut ids: Vec<CardId> = range.ids().collect();
    shuffle(&mut ids, rng);
    ids.into()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::types::range::MAX_CARD_ID;
    use crate::types::range::MIN_CARD_ID;
    use crate::types::range::RangeError;

    #[test]
    fn test_pool_is_permutation_of_range() -> Result<(), RangeError> {
        let mut rng = TinyRng::from_seed(11);
        for start in MIN_CARD_ID..=MAX_CARD_ID {
            for end in (start..=MAX_CARD_ID).step_by(7) {
                let range = CardRange::new(start, end)?;
                let seq = DeckSequencer::initialize(range, &mut rng);
                assert_eq!(seq.remaining(), range.len());
                let mut ids: Vec<CardId> = seq.pool.iter().copied().collect();
                ids.sort_unstable();
                assert_eq!(ids, range.ids().collect::<Vec<_>>());
            }
        }
        Ok(())
    }

    #[test]
    fn test_draw_until_exhausted() -> Result<(), RangeError> {
        let range = CardRange::new(5, 24)?;
        let mut seq = DeckSequencer::initialize(range, &mut TinyRng::from_seed(5));
        let mut seen = HashSet::new();
        while let Some(id) = seq.draw() {
            assert!(range.contains(id));
            assert!(seen.insert(id), "id {id} drawn twice");
        }
        assert_eq!(seen.len(), 20);
        assert_eq!(seq.remaining(), 0);
        assert_eq!(seq.draw(), None);
        assert_eq!(seq.total(), 20);
        Ok(())
    }

    #[test]
    fn test_single_card_range() -> Result<(), RangeError> {
        let mut seq =
            DeckSequencer::initialize(CardRange::new(42, 42)?, &mut TinyRng::from_seed(0));
        assert_eq!(seq.draw(), Some(42));
        assert_eq!(seq.draw(), None);
        Ok(())
    }

    #[test]
    fn test_reset_within_range() -> Result<(), RangeError> {
        let range = CardRange::new(1, 30)?;
        let mut rng = TinyRng::from_seed(9);
        let mut seq = DeckSequencer::initialize(range, &mut rng);
        for _ in 0..12 {
            seq.draw();
        }
        assert_eq!(seq.remaining(), 18);
        seq.reset_within_range(&mut rng);
        assert_eq!(seq.remaining(), 30);
        assert_eq!(seq.range(), range);
        let mut ids: Vec<CardId> = seq.pool.iter().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=30).collect::<Vec<_>>());
        Ok(())
    }
}
