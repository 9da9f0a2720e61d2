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

/// A minimal, zero-dependency, completely insecure PRNG for picking items
/// and shuffling answer choices.
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

    /// Uniform number in `[0, max)`. `max` must be non-zero.
    ///
    /// Draws falling in the short tail of the `u32` range are redrawn, so
    /// every value is equally likely. At most half the range is ever
    /// rejected, so this terminates quickly.
    pub fn below(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        let zone = u32::MAX - (u32::MAX % max);
        loop {
            let n = self.next_u32();
            if n < zone {
                return n % max;
            }
        }
    }

    /// Uniform index into a slice of length `len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.below(len as u32) as usize
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(v: Vec<T>, rng: &mut TinyRng) -> Vec<T> {
    let mut v = v;
    for i in (1..v.len()).rev() {
        let j = rng.index(i + 1);
        v.swap(i, j);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = TinyRng::from_seed(42);
        let mut b = TinyRng::from_seed(42);
        for _ in 0..10 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_below_in_range() {
        let mut rng = TinyRng::from_seed(7);
        for max in 1..50 {
            for _ in 0..20 {
                assert!(rng.below(max) < max);
            }
        }
    }

    #[test]
    fn test_below_one() {
        let mut rng = TinyRng::from_seed(0);
        assert_eq!(rng.below(1), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = TinyRng::from_seed(1234);
        let mut shuffled = shuffle((0..20).collect::<Vec<_>>(), &mut rng);
        shuffled.sort();
        assert_eq!(shuffled, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_empty() {
        let mut rng = TinyRng::from_seed(1);
        let shuffled: Vec<u8> = shuffle(Vec::new(), &mut rng);
        assert!(shuffled.is_empty());
    }
}
