// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Grace-note ornaments.
//!
//! An ornament is a short run of zero-duration pitches sounding just before a
//! melody note. Short neighbour figures come from fixed pattern tables keyed
//! by the direction of approach; a bridge fills a wider leap with pitches
//! spread evenly between the two notes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::music::pitch::Pitch;
use crate::music::register::Register;
use crate::random::weighted_index;

/// Beats of preceding note consumed per grace note
pub const GRACE_NOTE_SPACE: f64 = 0.25;

/// Longest ornament the pattern tables know
pub const MAX_ORNAMENT_LENGTH: usize = 3;

/// Relative draw weights for ornament lengths 1, 2 and 3
pub const LENGTH_WEIGHTS: [f64; MAX_ORNAMENT_LENGTH] = [6.0, 4.0, 1.0];

/// Smallest leap a bridge will fill
pub const MIN_BRIDGE_INTERVAL: Pitch = 3;

/// Offsets from the target approached from below, by length
const ASCENDING_PATTERNS: [&[&[Pitch]]; MAX_ORNAMENT_LENGTH] = [
    &[&[-1], &[-2]],
    &[&[-2, -1], &[1, -1], &[-1, 1]],
    &[&[-3, -2, -1], &[1, 0, -1], &[-1, 1, -1]],
];

/// Offsets from the target approached from above, by length
const DESCENDING_PATTERNS: [&[&[Pitch]]; MAX_ORNAMENT_LENGTH] = [
    &[&[1], &[2]],
    &[&[2, 1], &[-1, 1], &[1, -1]],
    &[&[3, 2, 1], &[-1, 0, 1], &[1, -1, 1]],
];

/// Direction of approach to an ornamented note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Direction of `interval`; a repeated pitch picks either at random
    pub fn of_interval<R: Rng + ?Sized>(interval: Pitch, rng: &mut R) -> Self {
        match interval {
            i if i > 0 => Direction::Ascending,
            i if i < 0 => Direction::Descending,
            _ if rng.gen_bool(0.5) => Direction::Ascending,
            _ => Direction::Descending,
        }
    }

    fn patterns(self, length: usize) -> &'static [&'static [Pitch]] {
        let table = match self {
            Direction::Ascending => &ASCENDING_PATTERNS,
            Direction::Descending => &DESCENDING_PATTERNS,
        };
        table[length.clamp(1, MAX_ORNAMENT_LENGTH) - 1]
    }
}

/// Ornament settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrnamentConfig {
    /// Chance that an eligible note is ornamented (0.0 - 1.0)
    #[serde(default = "default_probability")]
    pub probability: f64,
    /// Shortest preceding note, in beats, that leaves room for grace notes
    #[serde(default = "default_min_previous_duration")]
    pub min_previous_duration: f64,
    /// Chance that an ornament over a leap becomes a bridge (0.0 - 1.0)
    #[serde(default = "default_bridge_probability")]
    pub bridge_probability: f64,
    /// Upper bound on grace notes per ornament
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_probability() -> f64 {
    0.25
}
fn default_min_previous_duration() -> f64 {
    0.5
}
fn default_bridge_probability() -> f64 {
    0.3
}
fn default_max_length() -> usize {
    MAX_ORNAMENT_LENGTH
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            probability: default_probability(),
            min_previous_duration: default_min_previous_duration(),
            bridge_probability: default_bridge_probability(),
            max_length: default_max_length(),
        }
    }
}

/// Up to `count` pitches strictly between `from` and `to`, one drawn from
/// each of `count` equal windows. Returns nothing if the leap is too small.
pub fn bridge<R: Rng + ?Sized>(from: Pitch, to: Pitch, count: usize, rng: &mut R) -> Vec<Pitch> {
    let distance = (to - from).abs();
    let count = (count as Pitch).min(distance - 1);
    if distance < MIN_BRIDGE_INTERVAL || count <= 0 {
        return Vec::new();
    }
    let sign = (to - from).signum();
    // Windows over offsets (lo, hi] in 1..distance, destination excluded
    let width = (distance - 1) as f64 / count as f64;
    (0..count)
        .map(|i| {
            let lo = (width * i as f64).floor() as Pitch;
            let hi = ((width * (i + 1) as f64).floor() as Pitch).max(lo + 1);
            from + sign * rng.gen_range(lo + 1..=hi)
        })
        .collect()
}

/// Decorates melody notes with grace notes
#[derive(Debug, Clone)]
pub struct OrnamentGenerator {
    config: OrnamentConfig,
}

impl OrnamentGenerator {
    pub fn new(config: OrnamentConfig) -> Self {
        Self { config }
    }

    /// Grace notes the preceding note has room for
    pub fn max_length_after(&self, previous_duration: f64) -> usize {
        let room = (previous_duration / GRACE_NOTE_SPACE).floor().max(0.0) as usize;
        room.min(self.config.max_length).min(MAX_ORNAMENT_LENGTH)
    }

    /// A neighbour figure of `length` pitches around `target`
    pub fn neighbor_pattern<R: Rng + ?Sized>(
        direction: Direction,
        length: usize,
        target: Pitch,
        rng: &mut R,
    ) -> Vec<Pitch> {
        let patterns = direction.patterns(length);
        let pattern = patterns[rng.gen_range(0..patterns.len())];
        pattern.iter().map(|o| target + o).collect()
    }

    /// Grace notes before `target`, given the preceding pitch and its
    /// duration. Empty when the note is not ornamented.
    pub fn ornament<R: Rng + ?Sized>(
        &self,
        previous: Pitch,
        previous_duration: f64,
        target: Pitch,
        register: &Register,
        rng: &mut R,
    ) -> Vec<Pitch> {
        if previous_duration < self.config.min_previous_duration {
            return Vec::new();
        }
        let max_length = self.max_length_after(previous_duration);
        if max_length == 0 || rng.gen::<f64>() >= self.config.probability {
            return Vec::new();
        }
        let length = match weighted_index(rng, &LENGTH_WEIGHTS[..max_length]) {
            Ok(index) => index + 1,
            Err(_) => return Vec::new(),
        };

        let interval = target - previous;
        let pitches = if interval.abs() >= MIN_BRIDGE_INTERVAL
            && rng.gen::<f64>() < self.config.bridge_probability
        {
            bridge(previous, target, length, rng)
        } else {
            let direction = Direction::of_interval(interval, rng);
            Self::neighbor_pattern(direction, length, target, rng)
        };

        if pitches.iter().any(|&p| !register.contains(p)) {
            debug!(?pitches, target, "ornament leaves register, dropped");
            return Vec::new();
        }
        pitches
    }
}
