// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Which harmonies sound under a span of time.

use crate::error::{Error, Result};
use crate::harmony::Harmony;
use crate::music::pitch::Pitch;

/// Grid resolution in beats
pub const STEP: f64 = 0.25;

fn to_steps(beats: f64) -> usize {
    (beats / STEP).round().max(0.0) as usize
}

/// A harmony stream laid out on a quarter-beat grid
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonyTimeline {
    classes: Vec<Vec<Pitch>>,
    grid: Vec<usize>,
}

impl HarmonyTimeline {
    /// Lay out `harmonies` end to end. Every harmony occupies at least one
    /// grid step.
    pub fn new(harmonies: &[Harmony]) -> Result<Self> {
        let mut classes = Vec::with_capacity(harmonies.len());
        let mut grid = Vec::new();
        for (index, harmony) in harmonies.iter().enumerate() {
            if !harmony.duration.is_finite() || harmony.duration <= 0.0 {
                return Err(Error::InvalidDuration(harmony.duration));
            }
            classes.push(harmony.pitch_classes());
            grid.extend(std::iter::repeat(index).take(to_steps(harmony.duration).max(1)));
        }
        Ok(Self { classes, grid })
    }

    /// Total length in beats
    pub fn duration(&self) -> f64 {
        self.grid.len() as f64 * STEP
    }

    /// Pitch-class sets of every harmony overlapping `[start, start + duration)`,
    /// in time order. Empty past the end of the stream.
    pub fn overlapping(&self, start: f64, duration: f64) -> Vec<Vec<Pitch>> {
        let first = to_steps(start);
        let last = to_steps(start + duration).max(first + 1).min(self.grid.len());
        let mut indices: Vec<usize> = Vec::new();
        for &index in self.grid.get(first..last).unwrap_or(&[]) {
            if indices.last() != Some(&index) {
                indices.push(index);
            }
        }
        indices.into_iter().map(|i| self.classes[i].clone()).collect()
    }
}
