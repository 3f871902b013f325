// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Weighted random choice.
//!
//! Every stochastic decision in the engine goes through this module so that
//! a single seeded `Rng` reproduces an entire run.

use rand::Rng;

use crate::error::{Error, Result};

/// Pick an index with probability proportional to its weight.
///
/// Weights need not be normalized. Zero weights are allowed as long as at
/// least one weight is positive.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Result<usize> {
    let cumulative = cumulative_weights(weights)?;
    Ok(sample_cumulative(rng, &cumulative))
}

/// Pick one of `options` using the parallel `weights` list
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    options: &'a [T],
    weights: &[f64],
) -> Result<&'a T> {
    if options.len() != weights.len() {
        return Err(Error::WeightMismatch {
            options: options.len(),
            weights: weights.len(),
        });
    }
    let index = weighted_index(rng, weights)?;
    Ok(&options[index])
}

/// Geometric weights halving at each rank, best rank first
pub fn exp_weights(n: usize) -> Vec<f64> {
    (0..n).map(|i| 2f64.powi((n - 1 - i) as i32)).collect()
}

/// Integer weights `n, n-1, ..., 1`
pub fn descending_weights(n: usize) -> Vec<f64> {
    (1..=n).rev().map(|w| w as f64).collect()
}

fn cumulative_weights(weights: &[f64]) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Err(Error::EmptyChoice);
    }
    let mut total = 0.0;
    let mut cumulative = Vec::with_capacity(weights.len());
    for &weight in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight("weights must be finite and non-negative"));
        }
        total += weight;
        cumulative.push(total);
    }
    if total <= 0.0 {
        return Err(Error::InvalidWeight("at least one weight must be positive"));
    }
    Ok(cumulative)
}

fn sample_cumulative<R: Rng + ?Sized>(rng: &mut R, cumulative: &[f64]) -> usize {
    let total = cumulative[cumulative.len() - 1];
    let roll = rng.gen::<f64>() * total;
    cumulative
        .partition_point(|&c| c <= roll)
        .min(cumulative.len() - 1)
}

/// A reusable weighted option table.
///
/// The cumulative sums are computed once, so repeated draws are a binary
/// search.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    options: Vec<T>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl<T> WeightedTable<T> {
    /// Build a table, validating that options and weights line up
    pub fn new(options: Vec<T>, weights: Vec<f64>) -> Result<Self> {
        if options.len() != weights.len() {
            return Err(Error::WeightMismatch {
                options: options.len(),
                weights: weights.len(),
            });
        }
        let cumulative = cumulative_weights(&weights)?;
        Ok(Self {
            options,
            weights,
            cumulative,
        })
    }

    /// Draw one option
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.options[sample_cumulative(rng, &self.cumulative)]
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterate `(option, weight)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.options.iter().zip(self.weights.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weighted_choice_mismatch() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = weighted_choice(&mut rng, &[1, 2, 3], &[1.0, 2.0]);
        assert_eq!(
            result,
            Err(Error::WeightMismatch {
                options: 3,
                weights: 2
            })
        );
    }

    #[test]
    fn test_weighted_choice_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let options: [u8; 0] = [];
        assert_eq!(weighted_choice(&mut rng, &options, &[]), Err(Error::EmptyChoice));
    }

    #[test]
    fn test_invalid_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(weighted_index(&mut rng, &[0.0, 0.0]).is_err());
        assert!(weighted_index(&mut rng, &[1.0, -1.0]).is_err());
        assert!(weighted_index(&mut rng, &[f64::NAN]).is_err());
    }

    #[test]
    fn test_zero_weight_never_chosen() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let index = weighted_index(&mut rng, &[0.0, 3.0, 0.0, 1.5]).unwrap();
            assert!(index == 1 || index == 3);
        }
    }

    #[test]
    fn test_weighted_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = WeightedTable::new(vec!['a', 'b'], vec![9.0, 1.0]).unwrap();
        let picks_a = (0..2000).filter(|_| *table.choose(&mut rng) == 'a').count();
        // Expect roughly 1800
        assert!(picks_a > 1650 && picks_a < 1950, "got {}", picks_a);
    }

    #[test]
    fn test_exp_weights() {
        assert_eq!(exp_weights(4), vec![8.0, 4.0, 2.0, 1.0]);
        assert!(exp_weights(0).is_empty());
        assert_eq!(descending_weights(3), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_table_rejects_mismatch() {
        assert!(WeightedTable::new(vec![1, 2], vec![1.0]).is_err());
        let table = WeightedTable::new(vec![1, 2], vec![1.0, 2.0]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().map(|(_, w)| w).sum::<f64>(), 3.0);
    }
}
