// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Where candidate chord types come from.
//!
//! The harmony chooser ranks whatever chord types it is offered. These
//! sources supply them: a hand-weighted list of familiar chords, a pool of
//! rarer colours, a weighted decision tree, or the consonance catalog itself.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::ChordCatalog;
use super::chord_type::{pitch_classes_to_intervals, ChordType};
use crate::error::{Error, Result};
use crate::music::pitch::Pitch;
use crate::random::{weighted_index, WeightedTable};

/// Familiar chords as pitch classes over a root of 0, with draw weights
pub const PRIMARY_CHORDS: [(&[Pitch], f64); 9] = [
    (&[0, 4, 7], 47.0),
    (&[0, 3, 7], 19.0),
    (&[0, 4, 7, 10], 15.0),
    (&[0, 3, 7, 10], 7.0),
    (&[0, 7], 6.0),
    (&[0, 4, 7, 11], 2.0),
    (&[0, 5, 7], 2.0),
    (&[0, 5], 1.0),
    (&[0, 4], 1.0),
];

/// Rarer chords, drawn uniformly
pub const OTHER_CHORDS: [&[Pitch]; 27] = [
    &[0, 3, 10],
    &[0, 2, 7, 9],
    &[0, 2, 5, 7, 9],
    &[0, 2, 7, 10],
    &[0, 3, 5, 7, 10],
    &[0, 2, 5, 10],
    &[0, 2, 4, 7, 9],
    &[0, 7, 10],
    &[0, 2, 5, 7, 10],
    &[0, 2, 4, 9],
    &[0, 7, 9],
    &[0, 3, 8, 10],
    &[0, 4, 8],
    &[0, 2, 4],
    &[0, 3, 5, 8, 10],
    &[0, 3, 5, 7],
    &[0, 2, 5],
    &[0, 5, 8, 10],
    &[0, 2, 4, 7],
    &[0, 5, 7, 10],
    &[0, 8, 10],
    &[0, 5, 7, 9],
    &[0, 2, 9],
    &[0, 2, 5, 7],
    &[0, 3, 5],
    &[0, 2, 10],
    &[0, 3, 5, 10],
];

/// Probability that a mixed draw takes a rarer chord
pub const OTHER_CHORD_PROBABILITY: f64 = 0.1;

/// Attempts per requested candidate when drawing distinct chord types
const DISTINCT_DRAW_ATTEMPTS: usize = 20;

/// Weighted decision tree over chord types
#[derive(Debug, Clone, PartialEq)]
pub enum ChordTree {
    Leaf(ChordType),
    Branch(Vec<(f64, ChordTree)>),
}

impl ChordTree {
    fn leaf(pitch_classes: &[Pitch]) -> Result<Self> {
        Ok(ChordTree::Leaf(pitch_classes_to_intervals(pitch_classes)?))
    }

    /// The default tree: major most of the time, then minor, then sevenths
    /// and open dyads
    pub fn standard() -> Result<Self> {
        Ok(ChordTree::Branch(vec![
            (0.6, Self::leaf(&[0, 4, 7])?),
            (
                0.4,
                ChordTree::Branch(vec![
                    (0.5, Self::leaf(&[0, 3, 7])?),
                    (
                        0.4,
                        ChordTree::Branch(vec![
                            (0.6, Self::leaf(&[0, 4, 7, 10])?),
                            (0.2, Self::leaf(&[0, 3, 7, 10])?),
                            (0.1, Self::leaf(&[0, 4, 7, 11])?),
                            (0.1, Self::leaf(&[0, 5, 7])?),
                        ]),
                    ),
                    (
                        0.1,
                        ChordTree::Branch(vec![
                            (0.7, Self::leaf(&[0, 7])?),
                            (0.2, Self::leaf(&[0, 5])?),
                            (0.1, Self::leaf(&[0, 4])?),
                        ]),
                    ),
                ]),
            ),
        ]))
    }

    /// Walk from the root to a leaf, taking weighted branches
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&ChordType> {
        let mut node = self;
        loop {
            match node {
                ChordTree::Leaf(chord_type) => return Ok(chord_type),
                ChordTree::Branch(children) => {
                    let weights: Vec<f64> = children.iter().map(|(w, _)| *w).collect();
                    node = &children[weighted_index(rng, &weights)?].1;
                }
            }
        }
    }
}

/// Which source feeds the harmony chooser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordSource {
    /// Weighted familiar chords
    #[default]
    Primary,
    /// Familiar chords, with an occasional rarer one
    Mixed,
    /// The weighted decision tree
    Tree,
    /// The consonance catalog, weighted by rank
    Catalog,
    /// The consonance catalog with its "more dissonant" curve
    CatalogDissonant,
    /// A weighted catalog chord on a random root, taken without ranking
    Free,
}

/// Draws chord types from any [`ChordSource`]
#[derive(Debug, Clone)]
pub struct ChordTypeSampler {
    primary: WeightedTable<ChordType>,
    other: Vec<ChordType>,
    tree: ChordTree,
    catalog: WeightedTable<ChordType>,
    catalog_dissonant: WeightedTable<ChordType>,
    distinct: usize,
}

impl ChordTypeSampler {
    pub fn new(catalog: &ChordCatalog) -> Result<Self> {
        let mut primary_types = Vec::with_capacity(PRIMARY_CHORDS.len());
        let mut primary_weights = Vec::with_capacity(PRIMARY_CHORDS.len());
        for (pitch_classes, weight) in PRIMARY_CHORDS {
            primary_types.push(pitch_classes_to_intervals(pitch_classes)?);
            primary_weights.push(weight);
        }
        let other = OTHER_CHORDS
            .iter()
            .map(|pcs| pitch_classes_to_intervals(pcs))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            primary: WeightedTable::new(primary_types, primary_weights)?,
            other,
            tree: ChordTree::standard()?,
            catalog: catalog.weighted(false)?,
            catalog_dissonant: catalog.weighted(true)?,
            distinct: catalog.len().max(PRIMARY_CHORDS.len() + OTHER_CHORDS.len()),
        })
    }

    /// Draw one chord type
    pub fn sample<R: Rng + ?Sized>(&self, source: ChordSource, rng: &mut R) -> Result<ChordType> {
        let chord_type = match source {
            ChordSource::Primary => self.primary.choose(rng),
            ChordSource::Mixed => {
                if rng.gen::<f64>() < OTHER_CHORD_PROBABILITY {
                    self.other.choose(rng).ok_or(Error::EmptyChoice)?
                } else {
                    self.primary.choose(rng)
                }
            }
            ChordSource::Tree => self.tree.choose(rng)?,
            ChordSource::Catalog | ChordSource::Free => self.catalog.choose(rng),
            ChordSource::CatalogDissonant => self.catalog_dissonant.choose(rng),
        };
        Ok(chord_type.clone())
    }

    /// Draw up to `count` chord types that are distinct up to rotation.
    ///
    /// Sources with fewer distinct chord types than `count` return what they
    /// have; the result is never empty when `count > 0`. No source has more
    /// distinct chord types than the catalog, so larger counts are clamped.
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        source: ChordSource,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<ChordType>> {
        let count = count.min(self.distinct);
        let mut chosen: Vec<ChordType> = Vec::with_capacity(count);
        for _ in 0..count.saturating_mul(DISTINCT_DRAW_ATTEMPTS) {
            if chosen.len() >= count {
                break;
            }
            let chord_type = self.sample(source, rng)?;
            if !chosen.iter().any(|c| c.is_rotation_of(&chord_type)) {
                chosen.push(chord_type);
            }
        }
        Ok(chosen)
    }
}
