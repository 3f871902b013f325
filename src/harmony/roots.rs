// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Perceived-root ranking.
//!
//! Each member of a harmony collects points for the intervals it takes part
//! in. Being the top of a perfect fourth (i.e. the root of a fifth) counts
//! most; sitting a semitone under another member counts heavily against.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::music::pitch::{pitch_class, pitch_class_set, Pitch};
use crate::random::{descending_weights, weighted_choice};

/// Largest interval size considered (the tritone)
const MAX_INTERVAL: usize = 6;

/// Position of a pitch within an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalEnd {
    Bottom = 0,
    Top = 1,
}

/// Points by interval size (semitones) and end
pub const ROOT_WEIGHTS: [[i32; 2]; MAX_INTERVAL + 1] = [
    // [bottom, top]
    [0, 0],
    [-100, 0],
    [0, 0],
    [8, 10],
    [20, 9],
    [50, 200],
    [-1, -1],
];

/// Points earned for sitting at `end` of an interval of `size` semitones
pub fn root_weight(size: usize, end: IntervalEnd) -> i32 {
    ROOT_WEIGHTS
        .get(size)
        .map(|row| row[end as usize])
        .unwrap_or(0)
}

/// Every (bottom, top) pair of members `size` semitones apart, for sizes
/// 1..=6, in harmony order
pub fn interval_pairs(harmony: &[Pitch]) -> Vec<(usize, Pitch, Pitch)> {
    let classes = pitch_class_set(harmony);
    let mut pairs = Vec::new();
    for size in 1..=MAX_INTERVAL {
        for &bottom in &classes {
            let top = pitch_class(bottom + size as Pitch);
            if classes.contains(&top) {
                pairs.push((size, bottom, top));
            }
        }
    }
    pairs
}

/// Total root weight of each member, in harmony order
pub fn root_scores(harmony: &[Pitch]) -> Vec<(Pitch, i32)> {
    let classes = pitch_class_set(harmony);
    let mut totals: HashMap<Pitch, i32> = classes.iter().map(|&pc| (pc, 0)).collect();
    for (size, bottom, top) in interval_pairs(&classes) {
        *totals.entry(bottom).or_insert(0) += root_weight(size, IntervalEnd::Bottom);
        *totals.entry(top).or_insert(0) += root_weight(size, IntervalEnd::Top);
    }
    classes.iter().map(|pc| (*pc, totals[pc])).collect()
}

/// Members of the harmony (as pitch classes), most root-like first.
///
/// Members with equal scores are shuffled among themselves.
pub fn ranked_roots<R: Rng + ?Sized>(harmony: &[Pitch], rng: &mut R) -> Vec<Pitch> {
    let mut scored = root_scores(harmony);
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ranked = Vec::with_capacity(scored.len());
    for group in scored.chunk_by(|a, b| a.1 == b.1) {
        let mut group: Vec<Pitch> = group.iter().map(|(pc, _)| *pc).collect();
        group.shuffle(rng);
        ranked.extend(group);
    }
    ranked
}

/// Pick a root, favouring higher-ranked members with weights `n, n-1, ..., 1`
pub fn choose_root<R: Rng + ?Sized>(harmony: &[Pitch], rng: &mut R) -> Result<Pitch> {
    let ranked = ranked_roots(harmony, rng);
    if ranked.is_empty() {
        return Err(Error::EmptyChoice);
    }
    let weights = descending_weights(ranked.len());
    weighted_choice(rng, &ranked, &weights).copied()
}
