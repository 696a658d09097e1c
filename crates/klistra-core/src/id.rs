//! Short, human-readable paste identifiers.
//!
//! Candidates are a vocabulary word plus a two-digit suffix (`apple42`).
//! Each candidate is checked against the store with a raw existence check,
//! so expired rows that have not been swept yet still count as taken. When
//! every attempt collides the generator falls back to a random alphanumeric
//! string that is returned without a further check.
//!
//! Generation does not reserve anything. The caller commits with
//! [`PasteStore::insert_new`] and regenerates on conflict.

use std::sync::{Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::error::{KlistraError, Result};
use crate::storage::PasteStore;

/// Vocabulary candidates tried before falling back.
pub const MAX_ATTEMPTS: usize = 100;

/// Length of the fallback identifier.
pub const FALLBACK_LENGTH: usize = 12;

const FALLBACK_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const WORDS: &[&str] = &[
    "ape", "bat", "bee", "bug", "cat", "cow", "crab", "crow", "dog", "dove", "duck", "eel",
    "elk", "fox", "frog", "goat", "hare", "hawk", "jay", "lamb", "lion", "mole", "moose",
    "mouse", "otter", "owl", "panda", "pig", "pony", "rabbit", "rat", "seal", "shark",
    "sheep", "snail", "snake", "swan", "tiger", "toad", "whale", "wolf", "zebra", "apple",
    "banana", "grape", "kiwi", "lemon", "lime", "mango", "melon", "olive", "orange", "book",
    "cup", "door", "bed", "phone", "shoe", "lamp", "clock", "key", "glass", "plate", "paris",
    "rome", "lima", "cairo", "osaka", "lagos", "milan", "perth", "tokyo", "seoul",
];

/// Identifier generator with its own random source.
pub struct IdGenerator {
    vocabulary: Vec<String>,
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Generator seeded from OS entropy, using the built-in vocabulary.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic generator, for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            vocabulary: WORDS.iter().map(|word| word.to_string()).collect(),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the vocabulary. An empty vocabulary always uses the fallback.
    pub fn with_vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = words.into_iter().map(Into::into).collect();
        self
    }

    /// Produce an identifier that is absent from `store` when checked.
    ///
    /// # Errors
    ///
    /// Only storage errors from the existence check are returned; running
    /// out of attempts is handled by the fallback.
    pub fn generate(&self, store: &dyn PasteStore) -> Result<String> {
        if !self.vocabulary.is_empty() {
            for _ in 0..MAX_ATTEMPTS {
                let candidate = self.candidate()?;
                if !store.exists(&candidate)? {
                    return Ok(candidate);
                }
            }
            warn!(
                attempts = MAX_ATTEMPTS,
                "identifier attempts exhausted, using random fallback"
            );
        }
        self.fallback()
    }

    fn lock_rng(&self) -> Result<MutexGuard<'_, StdRng>> {
        self.rng
            .lock()
            .map_err(|_| KlistraError::Crypto("Identifier RNG poisoned".to_string()))
    }

    fn candidate(&self) -> Result<String> {
        let mut rng = self.lock_rng()?;
        let word = self
            .vocabulary
            .choose(&mut *rng)
            .ok_or_else(|| KlistraError::InvalidInput("Vocabulary is empty".to_string()))?;
        let suffix: u8 = rng.gen_range(10..=99);
        Ok(format!("{}{}", word, suffix))
    }

    fn fallback(&self) -> Result<String> {
        let mut rng = self.lock_rng()?;
        Ok((0..FALLBACK_LENGTH)
            .map(|_| char::from(FALLBACK_CHARSET[rng.gen_range(0..FALLBACK_CHARSET.len())]))
            .collect())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::SqlitePasteStore;

    const MINUTE: Duration = Duration::from_secs(60);

    fn split_candidate(id: &str) -> (&str, &str) {
        id.split_at(id.len() - 2)
    }

    #[test]
    fn test_candidate_shape() {
        let store = SqlitePasteStore::open_in_memory().unwrap();
        let generator = IdGenerator::seeded(7);

        for _ in 0..50 {
            let id = generator.generate(&store).unwrap();
            let (word, digits) = split_candidate(&id);
            assert!(WORDS.contains(&word), "unexpected word in {}", id);
            let number: u8 = digits.parse().unwrap();
            assert!((10..=99).contains(&number));
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let store = SqlitePasteStore::open_in_memory().unwrap();
        let a = IdGenerator::seeded(42);
        let b = IdGenerator::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.generate(&store).unwrap(), b.generate(&store).unwrap());
        }
    }

    #[test]
    fn test_never_collides_with_occupied_namespace() {
        let store = SqlitePasteStore::open_in_memory().unwrap();

        // Occupy every id for the first half of the vocabulary.
        for word in &WORDS[..WORDS.len() / 2] {
            for suffix in 10..=99 {
                store
                    .put(&format!("{}{}", word, suffix), "{}", MINUTE)
                    .unwrap();
            }
        }

        let generator = IdGenerator::seeded(2024);
        for _ in 0..100 {
            let id = generator.generate(&store).unwrap();
            assert!(!store.exists(&id).unwrap(), "collided on {}", id);
            store
                .insert_new(&id, "{}", store.expires_at(MINUTE).unwrap())
                .unwrap();
        }
    }

    #[test]
    fn test_fallback_when_namespace_full() {
        let store = SqlitePasteStore::open_in_memory().unwrap();
        for suffix in 10..=99 {
            store.put(&format!("solo{}", suffix), "{}", MINUTE).unwrap();
        }

        let generator = IdGenerator::seeded(1).with_vocabulary(["solo"]);
        let id = generator.generate(&store).unwrap();

        assert_eq!(id.len(), FALLBACK_LENGTH);
        assert!(id.bytes().all(|b| FALLBACK_CHARSET.contains(&b)));
        assert!(!id.starts_with("solo"));
    }

    #[test]
    fn test_empty_vocabulary_uses_fallback() {
        let store = SqlitePasteStore::open_in_memory().unwrap();
        let generator = IdGenerator::seeded(3).with_vocabulary(Vec::<String>::new());
        let id = generator.generate(&store).unwrap();
        assert_eq!(id.len(), FALLBACK_LENGTH);
    }
}
