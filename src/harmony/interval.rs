// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Interval-class content of a chord type.

use super::chord_type::ChordType;

/// Number of interval classes (minor second .. tritone)
pub const INTERVAL_CLASSES: usize = 6;

/// Histogram of interval classes: index 0 = minor second, 5 = tritone
pub type IntervalContent = [u32; INTERVAL_CLASSES];

/// Count how often each interval class occurs between members of the chord.
///
/// Every window of consecutive gaps (wrapping around the cycle) spans one
/// interval; spans of six semitones or less are counted. A tritone is seen
/// from both of its ends, so that bucket is halved.
pub fn interval_content(chord_type: &ChordType) -> IntervalContent {
    let intervals = chord_type.intervals();
    let n = intervals.len();
    let mut content = [0u32; INTERVAL_CLASSES];

    for width in 1..n {
        for start in 0..n {
            let span: u32 = (start..start + width)
                .map(|i| intervals[i % n] as u32)
                .sum();
            if (1..=INTERVAL_CLASSES as u32).contains(&span) {
                content[span as usize - 1] += 1;
            }
        }
    }

    content[INTERVAL_CLASSES - 1] /= 2;
    content
}
