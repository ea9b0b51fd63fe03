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

/// A minimal, zero-dependency, completely insecure PRNG to shuffle the deck.
#[derive(Clone, Debug)]
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    /// Uniform index in `[0, bound]`, inclusive. Draws that would favour the
    /// low residues are rejected. Bounds past `u32::MAX` are clamped to it.
    pub fn index_upto(&mut self, bound: usize) -> usize {
        let zone = u64::from(u32::MAX) + 1;
        let span = (bound as u64).saturating_add(1).min(zone);
        let limit = zone - zone % span;
        loop {
            let draw = u64::from(self.next_u32());
            if draw < limit {
                return (draw % span) as usize;
            }
        }
    }
}

/// Fisher-Yates: walk from the last slot down to 1, swapping each slot with
/// one chosen from the not-yet-fixed prefix.
pub fn shuffle<T>(items: &mut [T], rng: &mut TinyRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index_upto(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = TinyRng::from_seed(42);
        let mut items: Vec<u32> = (1..=50).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a: Vec<u32> = (1..=20).collect();
        let mut b: Vec<u32> = (1..=20).collect();
        shuffle(&mut a, &mut TinyRng::from_seed(7));
        shuffle(&mut b, &mut TinyRng::from_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_trivial_slices() {
        let mut rng = TinyRng::from_seed(1);
        let mut empty: Vec<u32> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());
        let mut one = vec![9];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![9]);
    }

    #[test]
    fn test_index_upto_stays_in_bounds() {
        let mut rng = TinyRng::from_seed(3);
        for bound in 0..64 {
            assert!(rng.index_upto(bound) <= bound);
        }
        assert_eq!(rng.index_upto(0), 0);
    }

    #[test]
    fn test_index_upto_is_even() {
        let mut rng = TinyRng::from_seed(99);
        let mut counts = [0usize; 3];
        for _ in 0..30_000 {
            counts[rng.index_upto(2)] += 1;
        }
        for count in counts {
            assert!((9_000..=11_000).contains(&count), "{counts:?}");
        }
    }
}
