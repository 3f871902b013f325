// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmony chooser.
//!
//! Picks the next chord from a set of candidate chord types by ranking every
//! (chord type, root) voicing on two independent axes, voice-leading from the
//! previous chord and intrinsic consonance, then drawing from the best few.

use rand::Rng;
use tracing::{debug, trace};

use super::catalog::ChordCatalog;
use super::chord_type::ChordType;
use super::transition::score_transition;
use crate::error::{Error, Result};
use crate::music::pitch::Pitch;
use crate::random::weighted_index;

/// How many of the best-ranked voicings are eligible
pub const TOP_CANDIDATES: usize = 6;

/// Draw weights for the best-ranked voicings. Positions past the end of this
/// list reuse its last weight.
pub const TOP_CANDIDATE_WEIGHTS: [f64; 5] = [10.0, 5.0, 3.0, 2.0, 1.0];

/// Append-only record of chosen chords
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonyHistory {
    chords: Vec<Vec<Pitch>>,
}

impl HarmonyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history seeded with one chord
    pub fn starting_with(chord: Vec<Pitch>) -> Self {
        Self {
            chords: vec![chord],
        }
    }

    pub fn push(&mut self, chord: Vec<Pitch>) {
        self.chords.push(chord);
    }

    /// The chord the next choice is scored against
    pub fn last(&self) -> Option<&[Pitch]> {
        self.chords.last().map(|c| c.as_slice())
    }

    pub fn chords(&self) -> &[Vec<Pitch>] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

/// A candidate voicing with its scores and ranks (rank 0 is best)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub chord: Vec<Pitch>,
    pub chord_type: ChordType,
    pub root: Pitch,
    pub transition: f64,
    pub consonance: f64,
    pub transition_rank: usize,
    pub consonance_rank: usize,
}

impl ScoredCandidate {
    /// Combined rank; lower is better on both axes together
    pub fn rank(&self) -> usize {
        self.transition_rank + self.consonance_rank
    }
}

/// Weight for each of `n` best-ranked positions
pub fn candidate_weights(n: usize) -> Vec<f64> {
    let last = TOP_CANDIDATE_WEIGHTS.len() - 1;
    (0..n).map(|i| TOP_CANDIDATE_WEIGHTS[i.min(last)]).collect()
}

/// Assign rank positions by descending score; equal scores keep input order
fn assign_ranks(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut ranks = vec![0; scores.len()];
    for (rank, index) in order.into_iter().enumerate() {
        ranks[index] = rank;
    }
    ranks
}

/// Chooses successive harmonies against a shared catalog
#[derive(Debug, Clone, Copy)]
pub struct HarmonyChooser<'a> {
    catalog: &'a ChordCatalog,
}

impl<'a> HarmonyChooser<'a> {
    pub fn new(catalog: &'a ChordCatalog) -> Self {
        Self { catalog }
    }

    /// Score every voicing of every candidate against `last`, sorted by
    /// combined rank (best first, stable)
    pub fn rank_candidates(
        &self,
        last: &[Pitch],
        candidates: &[ChordType],
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = Vec::with_capacity(candidates.len() * 12);
        for chord_type in candidates {
            let consonance = self.catalog.consonance_of(chord_type);
            for (root, chord) in chord_type.build_on_all_roots().into_iter().enumerate() {
                scored.push(ScoredCandidate {
                    transition: score_transition(last, &chord),
                    chord,
                    chord_type: chord_type.clone(),
                    root: root as Pitch,
                    consonance,
                    transition_rank: 0,
                    consonance_rank: 0,
                });
            }
        }

        let transitions: Vec<f64> = scored.iter().map(|c| c.transition).collect();
        let consonances: Vec<f64> = scored.iter().map(|c| c.consonance).collect();
        for (candidate, rank) in scored.iter_mut().zip(assign_ranks(&transitions)) {
            candidate.transition_rank = rank;
        }
        for (candidate, rank) in scored.iter_mut().zip(assign_ranks(&consonances)) {
            candidate.consonance_rank = rank;
        }

        scored.sort_by_key(ScoredCandidate::rank);
        scored
    }

    /// Choose the chord that follows the last entry of `history`.
    ///
    /// Returns the realized chord as pitch classes, rooted on the chosen root.
    pub fn choose_next<R: Rng + ?Sized>(
        &self,
        history: &HarmonyHistory,
        candidates: &[ChordType],
        rng: &mut R,
    ) -> Result<Vec<Pitch>> {
        let last = history.last().ok_or(Error::EmptyHistory)?;
        if candidates.is_empty() {
            return Err(Error::EmptyCandidates);
        }

        let mut ranked = self.rank_candidates(last, candidates);
        ranked.truncate(TOP_CANDIDATES);
        for candidate in &ranked {
            trace!(
                chord = ?candidate.chord,
                transition = candidate.transition,
                consonance = candidate.consonance,
                rank = candidate.rank(),
                "harmony candidate"
            );
        }

        let index = weighted_index(rng, &candidate_weights(ranked.len()))?;
        let choice = ranked.swap_remove(index);
        debug!(chord = ?choice.chord, chord_type = %choice.chord_type, "chose harmony");
        Ok(choice.chord)
    }
}
