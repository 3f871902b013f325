// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voice-movement score between two realized chords.

use crate::music::pitch::{pitch_class, Pitch};

/// Points for a pair of pitches by mod-12 distance (0..=6)
const DISTANCE_POINTS: [u32; 7] = [100, 20, 15, 0, 0, 10, 0];

/// Smallest distance between two pitches' classes, 0..=6
pub fn class_distance(a: Pitch, b: Pitch) -> Pitch {
    let d = pitch_class(a - b);
    d.min(12 - d)
}

/// Score the smoothness of moving from chord `a` to chord `b`.
///
/// Every pitch of `a` is compared with every pitch of `b`; common tones and
/// small steps earn points. The sum is divided by the total number of pitches.
/// Works on realized chords, not chord types: the roots matter.
pub fn score_transition(a: &[Pitch], b: &[Pitch]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let points: u32 = a
        .iter()
        .flat_map(|&ap| b.iter().map(move |&bp| class_distance(ap, bp)))
        .map(|d| DISTANCE_POINTS[d as usize])
        .sum();
    points as f64 / total as f64
}
