// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instrument registers.
//!
//! A register is the ordered set of absolute pitches an instrument can play.
//! It is supplied by the caller and never modified by the engine.

use serde::{Deserialize, Serialize};

use super::pitch::{parse_pitch, Pitch, HIGHEST_PITCH, LOWEST_PITCH};
use crate::error::{Error, Result};

/// Ascending, de-duplicated, non-empty list of playable pitches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pitch>", into = "Vec<Pitch>")]
pub struct Register {
    pitches: Vec<Pitch>,
}

impl Register {
    /// Build a register from any list of pitches
    pub fn new(mut pitches: Vec<Pitch>) -> Result<Self> {
        pitches.sort_unstable();
        pitches.dedup();
        if pitches.is_empty() {
            return Err(Error::EmptyRegister);
        }
        Ok(Self { pitches })
    }

    /// Every chromatic pitch from `lowest` to `highest` inclusive, clipped
    /// to the playable pitch range
    pub fn chromatic(lowest: Pitch, highest: Pitch) -> Result<Self> {
        Self::new((lowest.max(LOWEST_PITCH)..=highest.min(HIGHEST_PITCH)).collect())
    }

    /// Chromatic register between two note names, e.g. `("G3", "B5")`
    pub fn parse_range(lowest: &str, highest: &str) -> Result<Self> {
        Self::chromatic(parse_pitch(lowest)?, parse_pitch(highest)?)
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn lowest(&self) -> Pitch {
        self.pitches[0]
    }

    pub fn highest(&self) -> Pitch {
        self.pitches[self.pitches.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn contains(&self, pitch: Pitch) -> bool {
        self.pitches.binary_search(&pitch).is_ok()
    }

    /// The lowest `fraction` of the register (at least one pitch)
    pub fn lower_portion(&self, fraction: f64) -> &[Pitch] {
        let fraction = fraction.clamp(0.0, 1.0);
        let count = ((self.pitches.len() as f64 * fraction).ceil() as usize).max(1);
        &self.pitches[..count.min(self.pitches.len())]
    }

    /// Register pitches at the smallest distance from `pitch`, ascending
    pub fn nearest(&self, pitch: Pitch) -> Vec<Pitch> {
        let best = self
            .pitches
            .iter()
            .map(|p| (p - pitch).abs())
            .min()
            .unwrap_or(0);
        self.pitches
            .iter()
            .copied()
            .filter(|p| (p - pitch).abs() == best)
            .collect()
    }
}

impl TryFrom<Vec<Pitch>> for Register {
    type Error = Error;

    fn try_from(pitches: Vec<Pitch>) -> Result<Self> {
        Self::new(pitches)
    }
}

impl From<Register> for Vec<Pitch> {
    fn from(register: Register) -> Self {
        register.pitches
    }
}
