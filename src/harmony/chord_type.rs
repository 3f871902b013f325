// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord types and their realization as pitches.
//!
//! A chord type is the cycle of ascending gaps between stacked pitch classes,
//! e.g. `[4, 3, 5]` for a major triad in root position. The gaps always sum
//! to an octave. Two rotations of the same cycle are the same chord type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::music::pitch::{pitch_class, Pitch};

/// Semitones in an octave
pub const OCTAVE: u8 = 12;

/// Validated interval cycle summing to an octave
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ChordType {
    intervals: Vec<u8>,
}

impl ChordType {
    /// Validate an interval list
    pub fn new(intervals: Vec<u8>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(Error::InvalidChordType {
                intervals,
                reason: "no intervals",
            });
        }
        if intervals.contains(&0) {
            return Err(Error::InvalidChordType {
                intervals,
                reason: "intervals must be positive",
            });
        }
        if intervals.iter().map(|&i| i as u32).sum::<u32>() != OCTAVE as u32 {
            return Err(Error::InvalidChordType {
                intervals,
                reason: "intervals must sum to 12",
            });
        }
        Ok(Self { intervals })
    }

    pub fn intervals(&self) -> &[u8] {
        &self.intervals
    }

    /// Number of distinct pitch classes in the chord
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Every rotation of the interval cycle, starting with `self`
    pub fn rotations(&self) -> Vec<ChordType> {
        (0..self.intervals.len())
            .map(|i| {
                let mut rotated = self.intervals[i..].to_vec();
                rotated.extend_from_slice(&self.intervals[..i]);
                ChordType { intervals: rotated }
            })
            .collect()
    }

    /// The lexicographically smallest rotation.
    ///
    /// This is the representative the catalog enumeration keeps for each
    /// rotation class.
    pub fn canonical(&self) -> ChordType {
        self.rotations()
            .into_iter()
            .min()
            .unwrap_or_else(|| self.clone())
    }

    /// True if `other` is a rotation of `self`
    pub fn is_rotation_of(&self, other: &ChordType) -> bool {
        self.len() == other.len() && self.canonical() == other.canonical()
    }

    /// Pitch classes of this chord built on `root`
    pub fn build_on_root(&self, root: Pitch) -> Vec<Pitch> {
        build_on_root(root, self)
    }

    /// This chord built on every root 0..11
    pub fn build_on_all_roots(&self) -> Vec<Vec<Pitch>> {
        build_on_all_roots(self)
    }

    /// Pitch classes built on root 0
    pub fn pitch_classes(&self) -> Vec<Pitch> {
        build_on_root(0, self)
    }

    /// The chord built with each of its members placed on `drone`
    pub fn voicings_on_drone(&self, drone: Pitch) -> Vec<Vec<Pitch>> {
        self.rotations()
            .iter()
            .map(|rotation| rotation.build_on_root(drone))
            .collect()
    }
}

impl TryFrom<Vec<u8>> for ChordType {
    type Error = Error;

    fn try_from(intervals: Vec<u8>) -> Result<Self> {
        Self::new(intervals)
    }
}

impl From<ChordType> for Vec<u8> {
    fn from(chord_type: ChordType) -> Self {
        chord_type.intervals
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.intervals.iter().map(|i| i.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Stack the chord's intervals on `root`, one pitch class per interval.
///
/// The last interval closes the cycle back to the root and adds no pitch.
pub fn build_on_root(root: Pitch, chord_type: &ChordType) -> Vec<Pitch> {
    let mut pitch = pitch_class(root);
    let mut chord = Vec::with_capacity(chord_type.len());
    chord.push(pitch);
    for &interval in &chord_type.intervals[..chord_type.len() - 1] {
        pitch = pitch_class(pitch + interval as Pitch);
        chord.push(pitch);
    }
    chord
}

/// The chord type realized on each of the twelve roots, in root order
pub fn build_on_all_roots(chord_type: &ChordType) -> Vec<Vec<Pitch>> {
    (0..OCTAVE as Pitch)
        .map(|root| build_on_root(root, chord_type))
        .collect()
}

/// Reduce any set of pitches to the interval cycle starting from its lowest
/// pitch class.
///
/// `[12, 16, 31]` reduces to pitch classes `{0, 4, 7}` and so to `[4, 3, 5]`.
pub fn pitch_classes_to_intervals(pitches: &[Pitch]) -> Result<ChordType> {
    let mut classes: Vec<Pitch> = pitches.iter().map(|&p| pitch_class(p)).collect();
    classes.sort_unstable();
    classes.dedup();
    if classes.is_empty() {
        return Err(Error::InvalidChordType {
            intervals: Vec::new(),
            reason: "no pitches",
        });
    }
    let mut intervals: Vec<u8> = classes.windows(2).map(|w| (w[1] - w[0]) as u8).collect();
    intervals.push((classes[0] + OCTAVE as Pitch - classes[classes.len() - 1]) as u8);
    ChordType::new(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(intervals: &[u8]) -> ChordType {
        ChordType::new(intervals.to_vec()).unwrap()
    }

    #[test]
    fn test_chord_type_validation() {
        assert!(ChordType::new(vec![4, 3, 5]).is_ok());
        assert!(ChordType::new(vec![12]).is_ok());
        assert!(ChordType::new(vec![]).is_err());
        assert!(ChordType::new(vec![4, 3, 4]).is_err());
        assert!(ChordType::new(vec![4, 0, 3, 5]).is_err());
    }

    #[test]
    fn test_build_on_root() {
        assert_eq!(build_on_root(9, &chord(&[4, 3, 5])), vec![9, 1, 4]);
        assert_eq!(build_on_root(10, &chord(&[4, 3, 5])), vec![10, 2, 5]);
        assert_eq!(chord(&[4, 3, 5]).build_on_root(21), vec![9, 1, 4]);
    }

    #[test]
    fn test_build_on_all_roots() {
        let voicings = build_on_all_roots(&chord(&[4, 3, 5]));
        assert_eq!(voicings.len(), 12);
        assert_eq!(voicings[0], vec![0, 4, 7]);
        assert_eq!(voicings[5], vec![5, 9, 0]);
        assert_eq!(voicings[11], vec![11, 3, 6]);
        for pair in voicings.windows(2) {
            assert_eq!(pair[0].len(), 3);
            for (a, b) in pair[0].iter().zip(pair[1].iter()) {
                assert_eq!(pitch_class(a + 1), *b);
            }
        }
    }

    #[test]
    fn test_pitch_classes_to_intervals() {
        assert_eq!(pitch_classes_to_intervals(&[12, 16, 31]).unwrap(), chord(&[4, 3, 5]));
        assert_eq!(pitch_classes_to_intervals(&[7, 2, 11]).unwrap(), chord(&[5, 4, 3]));
        assert_eq!(pitch_classes_to_intervals(&[5]).unwrap(), chord(&[12]));
        assert!(pitch_classes_to_intervals(&[]).is_err());
    }

    #[test]
    fn test_round_trip_up_to_rotation() {
        let types = [chord(&[4, 3, 5]), chord(&[2, 4, 3, 3]), chord(&[6, 6]), chord(&[1, 1, 10])];
        for chord_type in &types {
            for root in 0..12 {
                let back = pitch_classes_to_intervals(&build_on_root(root, chord_type)).unwrap();
                assert!(back.is_rotation_of(chord_type), "{} vs {}", back, chord_type);
            }
        }
    }

    #[test]
    fn test_canonical_rotation() {
        assert_eq!(chord(&[4, 3, 5]).canonical(), chord(&[3, 5, 4]));
        assert_eq!(chord(&[5, 3, 4]).canonical(), chord(&[3, 4, 5]));
        assert_eq!(chord(&[10, 2]).canonical(), chord(&[2, 10]));
        assert_eq!(chord(&[4, 4, 4]).rotations().len(), 3);
    }

    #[test]
    fn test_voicings_on_drone() {
        let voicings = chord(&[4, 3, 5]).voicings_on_drone(10);
        assert_eq!(voicings, vec![vec![10, 2, 5], vec![10, 1, 6], vec![10, 3, 7]]);
    }

    #[test]
    fn test_serde_validates() {
        let parsed: std::result::Result<ChordType, _> = serde_yaml::from_str("[4, 3, 5]");
        assert!(parsed.is_ok());
        let invalid: std::result::Result<ChordType, _> = serde_yaml::from_str("[4, 4]");
        assert!(invalid.is_err());
    }
}
