use crate::error::ConfigError;
use serde::Serialize;
use std::collections::HashSet;

/// A single bucket on the wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rank {
    /// Short key, unique within a config
    pub key: String,
    /// Display name returned by a spin
    pub name: String,
    /// Relative draw weight
    pub limit: u32,
}

impl Rank {
    pub fn new(key: impl Into<String>, name: impl Into<String>, limit: u32) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            limit,
        }
    }
}

/// Ordered, immutable set of ranks.
///
/// Order is significant: the last rank absorbs the rounding remainder when
/// percentages are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankConfig {
    ranks: Vec<Rank>,
}

impl RankConfig {
    /// Build a config from ranks in display order, rejecting duplicate keys
    pub fn new(ranks: Vec<Rank>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(ranks.len());
        for rank in &ranks {
            if !seen.insert(rank.key.as_str()) {
                return Err(ConfigError::DuplicateKey(rank.key.clone()));
            }
        }
        Ok(Self { ranks })
    }

    /// An empty config (every spin fails)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rank table served by the wheel
    pub fn builtin() -> Self {
        Self {
            ranks: vec![
                Rank::new("E", "E-Ранг", 10),
                Rank::new("D", "D-Ранг", 20),
                Rank::new("C", "C-Ранг", 40),
                Rank::new("B", "B-Ранг", 70),
                Rank::new("A", "A-Ранг", 100),
                Rank::new("S", "S-Ранг", 150),
                Rank::new("NATIONAL", "Национальный Уровень", 300),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rank> {
        self.ranks.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Rank> {
        self.ranks.iter().find(|r| r.key == key)
    }

    /// Rank at a position in config order
    pub fn at(&self, idx: usize) -> Option<&Rank> {
        self.ranks.get(idx)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Sum of all limits, widened so it cannot overflow
    pub fn total_limit(&self) -> u64 {
        self.ranks.iter().map(|r| u64::from(r.limit)).sum()
    }
}
