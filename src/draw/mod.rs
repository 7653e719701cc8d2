use crate::error::{ConfigError, SpinError};
use crate::ranks::RankConfig;
use crate::weights::{self, WeightTable};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

/// Outcome of one spin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spin {
    /// Position of the drawn rank in config order
    #[serde(skip)]
    pub index: usize,
    /// Key of the drawn rank
    #[serde(skip)]
    pub key: String,
    /// Display name
    pub rank: String,
    /// Cached display percentage, not derived from the draw
    pub percent: f64,
}

#[derive(Debug, Clone)]
enum Sampler {
    /// No ranks configured
    Empty,
    /// Every limit is zero
    Uniform(usize),
    Weighted(WeightedIndex<u64>),
}

/// Draws ranks with probability proportional to their limits.
///
/// Holds the config together with its precomputed weight table so each spin
/// is a single sample plus a lookup.
#[derive(Debug, Clone)]
pub struct Drawer {
    ranks: RankConfig,
    weights: WeightTable,
    sampler: Sampler,
}

impl Drawer {
    pub fn new(ranks: RankConfig) -> Result<Self, ConfigError> {
        let weights = weights::normalize(&ranks);
        let sampler = if ranks.is_empty() {
            Sampler::Empty
        } else if ranks.total_limit() == 0 {
            Sampler::Uniform(ranks.len())
        } else {
            Sampler::Weighted(WeightedIndex::new(ranks.iter().map(|r| u64::from(r.limit)))?)
        };

        Ok(Self {
            ranks,
            weights,
            sampler,
        })
    }

    pub fn ranks(&self) -> &RankConfig {
        &self.ranks
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Pick one rank index using raw limits as weights
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SpinError> {
        match &self.sampler {
            Sampler::Empty => Err(SpinError::EmptyConfig),
            Sampler::Uniform(n) => Ok(rng.gen_range(0..*n)),
            Sampler::Weighted(dist) => Ok(dist.sample(rng)),
        }
    }

    /// Draw a rank and attach its display name and cached percentage
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Spin, SpinError> {
        let index = self.draw(rng)?;
        let rank = self.ranks.at(index).ok_or(SpinError::EmptyConfig)?;
        let percent = self.weights.at(index).ok_or(SpinError::EmptyConfig)?;

        Ok(Spin {
            index,
            key: rank.key.clone(),
            rank: rank.name.clone(),
            percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranks::Rank;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drawer(limits: &[u32]) -> Drawer {
        let ranks = limits
            .iter()
            .enumerate()
            .map(|(i, &limit)| Rank::new(format!("K{}", i), format!("Rank {}", i), limit))
            .collect();
        Drawer::new(RankConfig::new(ranks).unwrap()).unwrap()
    }

    fn counts(drawer: &Drawer, n: usize, seed: u64) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut hits = vec![0; drawer.ranks().len()];
        for _ in 0..n {
            hits[drawer.draw(&mut rng).unwrap()] += 1;
        }
        hits
    }

    #[test]
    fn test_empty_config_fails() {
        let drawer = Drawer::new(RankConfig::empty()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(drawer.spin(&mut rng), Err(SpinError::EmptyConfig));
        }
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let hits = counts(&drawer(&[0, 5, 0, 5]), 2_000, 7);
        assert_eq!(hits[0], 0);
        assert_eq!(hits[2], 0);
        assert_eq!(hits[1] + hits[3], 2_000);
    }

    #[test]
    fn test_all_zero_is_uniform() {
        let n = 12_000;
        let hits = counts(&drawer(&[0, 0, 0, 0]), n, 42);
        let expected = n as f64 / 4.0;
        for h in hits {
            assert!((h as f64 - expected).abs() < expected * 0.1, "hits {}", h);
        }
    }

    #[test]
    fn test_weighted_proportions() {
        let n = 10_000;
        let drawer = drawer(&[10, 30, 60]);
        let hits = counts(&drawer, n, 2024);
        for (h, p) in hits.iter().zip([0.10, 0.30, 0.60]) {
            let observed = *h as f64 / n as f64;
            assert!((observed - p).abs() < 0.02, "observed {} expected {}", observed, p);
        }
    }

    #[test]
    fn test_spin_reports_cached_percent() {
        let drawer = Drawer::new(RankConfig::builtin()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let spin = drawer.spin(&mut rng).unwrap();
            assert_eq!(Some(spin.percent), drawer.weights().get(&spin.key));
            assert_eq!(drawer.ranks().get(&spin.key).map(|r| r.name.as_str()), Some(spin.rank.as_str()));
        }
    }
}
