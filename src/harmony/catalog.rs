// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord class catalog.
//!
//! Enumerates every chord type (up to rotation) that fits in an octave,
//! scores each for consonance from its interval-class content, and turns the
//! consonant ones into a rank-weighted choice table.
//!
//! The catalog is a pure function of nothing: build it once and share it by
//! reference.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::chord_type::{ChordType, OCTAVE};
use super::interval::{interval_content, IntervalContent};
use crate::error::Result;
use crate::random::WeightedTable;

/// Largest chord the default catalog enumerates
pub const DEFAULT_MAX_NOTES: usize = 6;

/// Entries must score above this to be offered for selection
pub const USABLE_THRESHOLD: f64 = 0.0;

/// Per interval class weight (m2, M2, m3, M3, P4, TT)
pub const CONSONANCE_WEIGHTS: [f64; 6] = [-1.828, 0.15, 0.686, 0.894, 1.240, -0.403];

/// Hand-tuned adjustments for particular chord types, keyed by canonical
/// rotation
pub const SPECIAL_CHORDS: [(&[u8], f64); 5] = [
    // Major triad
    (&[3, 5, 4], 0.2),
    // Minor triad
    (&[3, 4, 5], 0.1),
    // Dominant seventh
    (&[2, 4, 3, 3], 0.122),
    // Major second / minor seventh dyad
    (&[2, 10], 0.18),
    // Augmented triad
    (&[4, 4, 4], -0.235),
];

/// Growth factor of the normal rank-weight curve
const RANK_CURVE: f64 = 1.175;

/// Growth factor of the "more dissonant" rank-weight curve
const DISSONANT_RANK_CURVE: f64 = 1.05;

/// Ranks over which the "more dissonant" curve falls off again
const DISSONANT_FALLOFF: i32 = 13;

/// Every partition of `n` into positive parts, each in ascending order
pub fn partitions(n: u8) -> Vec<Vec<u8>> {
    fn extend(remaining: u8, smallest: u8, current: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if remaining == 0 {
            out.push(current.clone());
            return;
        }
        for part in smallest..=remaining {
            current.push(part);
            extend(remaining - part, part, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if n > 0 {
        extend(n, 1, &mut Vec::new(), &mut out);
    }
    out
}

/// Advance to the next lexicographic permutation, returning false after the
/// last one
fn next_permutation(values: &mut [u8]) -> bool {
    let Some(pivot) = values.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let successor = values
        .iter()
        .rposition(|&v| v > values[pivot])
        .unwrap_or(pivot + 1);
    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}

/// Enumerate chord types with 2..=`max_notes` members, one per rotation class.
///
/// Permutations of each partition of 12 are visited in lexicographic order
/// and a permutation is kept only if none of its rotations was kept before.
pub fn chord_classes(max_notes: usize) -> Vec<ChordType> {
    let mut seen: BTreeSet<Vec<u8>> = BTreeSet::new();
    let mut classes = Vec::new();

    for partition in partitions(OCTAVE) {
        if partition.len() < 2 || partition.len() > max_notes {
            continue;
        }
        let mut permutation = partition;
        loop {
            let rotations: Vec<Vec<u8>> = (0..permutation.len())
                .map(|i| {
                    let mut rotated = permutation[i..].to_vec();
                    rotated.extend_from_slice(&permutation[..i]);
                    rotated
                })
                .collect();
            if !rotations.iter().any(|r| seen.contains(r)) {
                seen.insert(permutation.clone());
                if let Ok(chord_type) = ChordType::new(permutation.clone()) {
                    classes.push(chord_type);
                }
            }
            if !next_permutation(&mut permutation) {
                break;
            }
        }
    }

    classes
}

/// Consonance of a chord type from its interval-class content.
///
/// The weighted content is normalized by the number of directed pairs
/// `n * (n - 1)`, then adjusted for the named chords in [`SPECIAL_CHORDS`].
pub fn consonance(chord_type: &ChordType) -> f64 {
    let n = chord_type.len();
    if n < 2 {
        return 0.0;
    }
    let content = interval_content(chord_type);
    let weighted: f64 = content
        .iter()
        .zip(CONSONANCE_WEIGHTS.iter())
        .map(|(&count, &weight)| count as f64 * weight)
        .sum();
    let mut score = weighted / (n * (n - 1)) as f64;

    let canonical = chord_type.canonical();
    if let Some((_, adjustment)) = SPECIAL_CHORDS
        .iter()
        .find(|(intervals, _)| canonical.intervals() == *intervals)
    {
        score += adjustment;
    }
    score
}

/// Rank weights for `len` entries sorted best first
pub fn rank_weights(len: usize, more_dissonant: bool) -> Vec<f64> {
    let len = len as i32;
    let mut weights: Vec<f64> = if more_dissonant {
        let rising = len - DISSONANT_FALLOFF;
        (0..len)
            .map(|k| {
                let exponent = if k < rising {
                    k + 1
                } else {
                    (rising + 1) - (k - rising)
                };
                DISSONANT_RANK_CURVE.powi(exponent)
            })
            .collect()
    } else {
        (1..=len).map(|i| RANK_CURVE.powi(i)).collect()
    };
    weights.reverse();
    weights
}

/// One scored chord type
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub chord_type: ChordType,
    pub interval_content: IntervalContent,
    pub consonance: f64,
}

impl CatalogEntry {
    pub fn new(chord_type: ChordType) -> Self {
        Self {
            interval_content: interval_content(&chord_type),
            consonance: consonance(&chord_type),
            chord_type,
        }
    }
}

/// Immutable, consonance-sorted catalog of chord classes
#[derive(Debug, Clone)]
pub struct ChordCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<ChordType, usize>,
}

impl ChordCatalog {
    /// Build the default catalog (chords of two to six notes)
    pub fn build() -> Self {
        Self::with_max_notes(DEFAULT_MAX_NOTES)
    }

    /// Build a catalog of chords with at most `max_notes` members
    pub fn with_max_notes(max_notes: usize) -> Self {
        let mut entries: Vec<CatalogEntry> = chord_classes(max_notes)
            .into_iter()
            .map(CatalogEntry::new)
            .collect();
        entries.sort_by(|a, b| match b.consonance.total_cmp(&a.consonance) {
            Ordering::Equal => a.chord_type.cmp(&b.chord_type),
            other => other,
        });

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.chord_type.canonical(), i))
            .collect();

        let catalog = Self { entries, index };
        debug!(
            entries = catalog.entries.len(),
            usable = catalog.usable().count(),
            "built chord catalog"
        );
        catalog
    }

    /// All entries, most consonant first
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries scoring above [`USABLE_THRESHOLD`], most consonant first
    pub fn usable(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.consonance > USABLE_THRESHOLD)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for any rotation of `chord_type`
    pub fn get(&self, chord_type: &ChordType) -> Option<&CatalogEntry> {
        self.index
            .get(&chord_type.canonical())
            .map(|&i| &self.entries[i])
    }

    /// Consonance of `chord_type`, computed directly if it is not catalogued
    pub fn consonance_of(&self, chord_type: &ChordType) -> f64 {
        self.get(chord_type)
            .map(|entry| entry.consonance)
            .unwrap_or_else(|| consonance(chord_type))
    }

    /// Usable chord types weighted by consonance rank
    pub fn weighted(&self, more_dissonant: bool) -> Result<WeightedTable<ChordType>> {
        let chord_types: Vec<ChordType> =
            self.usable().map(|entry| entry.chord_type.clone()).collect();
        let weights = rank_weights(chord_types.len(), more_dissonant);
        WeightedTable::new(chord_types, weights)
    }
}

impl Default for ChordCatalog {
    fn default() -> Self {
        Self::build()
    }
}
