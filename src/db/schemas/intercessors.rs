//! Intercessor pool document
//!
//! Singleton record listing every phone eligible to receive prayer requests.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::types::{RelayError, Result};

/// Key of the pool record in the general table
pub const INTERCESSOR_POOL_KEY: &str = "IntercessorPhones";

/// Intercessor pool document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct IntercessorPool {
    /// Record key, always [`INTERCESSOR_POOL_KEY`]
    pub name: String,

    #[serde(default)]
    pub phones: Vec<String>,
}

impl Default for IntercessorPool {
    fn default() -> Self {
        Self {
            name: INTERCESSOR_POOL_KEY.to_string(),
            phones: Vec::new(),
        }
    }
}

impl IntercessorPool {
    pub fn from_phones<I, S>(phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool = Self::default();
        for phone in phones {
            pool.add(phone.into());
        }
        pool
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.phones.iter().any(|p| p == phone)
    }

    /// Append a phone unless already present. Returns whether it was added.
    pub fn add(&mut self, phone: impl Into<String>) -> bool {
        let phone = phone.into();
        if self.contains(&phone) {
            return false;
        }
        self.phones.push(phone);
        true
    }

    /// Remove every occurrence of a phone. Returns whether any was removed.
    pub fn remove(&mut self, phone: &str) -> bool {
        let before = self.phones.len();
        self.phones.retain(|p| p != phone);
        self.phones.len() != before
    }

    /// Drop duplicate phones, keeping first occurrences in order
    pub fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.phones.retain(|p| seen.insert(p.clone()));
    }

    /// Draw up to `n` distinct phones uniformly without replacement.
    ///
    /// The whole pool is returned when it holds `n` phones or fewer.
    pub fn draw_candidates(&self, n: usize) -> Result<Vec<String>> {
        if self.phones.is_empty() {
            return Err(RelayError::PoolEmpty);
        }

        if self.phones.len() <= n {
            return Ok(self.phones.clone());
        }

        let mut rng = rand::thread_rng();
        Ok(self
            .phones
            .choose_multiple(&mut rng, n)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_add_is_idempotent() {
        let mut pool = IntercessorPool::default();
        assert!(pool.add("111"));
        assert!(!pool.add("111"));
        assert_eq!(pool.phones, vec!["111"]);
    }

    #[test]
    fn test_remove_all_occurrences() {
        let mut pool = IntercessorPool {
            name: INTERCESSOR_POOL_KEY.into(),
            phones: vec!["111".into(), "222".into(), "111".into()],
        };
        assert!(pool.remove("111"));
        assert_eq!(pool.phones, vec!["222"]);
        assert!(!pool.remove("999"));
    }

    #[test]
    fn test_dedup_keeps_order() {
        let mut pool = IntercessorPool {
            name: INTERCESSOR_POOL_KEY.into(),
            phones: vec!["b".into(), "a".into(), "b".into(), "c".into(), "a".into()],
        };
        pool.dedup();
        assert_eq!(pool.phones, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_draw_from_empty_pool() {
        let pool = IntercessorPool::default();
        assert!(matches!(pool.draw_candidates(2), Err(RelayError::PoolEmpty)));
    }

    #[test]
    fn test_draw_small_pool_returns_everything() {
        let pool = IntercessorPool::from_phones(["111", "222"]);
        let drawn = pool.draw_candidates(2).unwrap();
        assert_eq!(drawn, vec!["111", "222"]);
    }

    #[test]
    fn test_draw_is_distinct_and_sized() {
        let pool = IntercessorPool::from_phones((0..20).map(|i| format!("{i:03}")));
        for _ in 0..50 {
            let drawn = pool.draw_candidates(3).unwrap();
            assert_eq!(drawn.len(), 3);
            let unique: HashSet<_> = drawn.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(drawn.iter().all(|p| pool.contains(p)));
        }
    }
}
