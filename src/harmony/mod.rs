// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmonic generation.
//!
//! This module enumerates and scores chord classes, realizes chord types on
//! roots, scores voice-leading between chords, chooses chord sequences and
//! ranks the members of a chord by how root-like they sound.

pub mod catalog;
pub mod chooser;
pub mod chord_type;
pub mod drone;
pub mod interval;
pub mod roots;
pub mod sources;
pub mod transition;

use serde::{Deserialize, Serialize};

pub use catalog::{consonance, CatalogEntry, ChordCatalog};
pub use chooser::{HarmonyChooser, HarmonyHistory};
pub use chord_type::{build_on_all_roots, build_on_root, pitch_classes_to_intervals, ChordType};
pub use drone::{Drone, DroneHarmony};
pub use interval::{interval_content, IntervalContent};
pub use roots::{choose_root, ranked_roots};
pub use sources::{ChordSource, ChordTree, ChordTypeSampler};
pub use transition::score_transition;

use crate::music::pitch::Pitch;

/// A realized chord held for a number of beats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harmony {
    /// Absolute pitches, lowest first
    #[serde(rename = "pitch")]
    pub pitches: Vec<Pitch>,
    /// Length in beats
    pub duration: f64,
}

impl Harmony {
    pub fn new(pitches: Vec<Pitch>, duration: f64) -> Self {
        Self { pitches, duration }
    }

    /// Voice pitch classes upward from `bass`, with `root` at the bottom.
    ///
    /// The root lands on the first pitch at or above `bass` with its class;
    /// every other member is stacked in the octave above the root.
    pub fn voiced(pitch_classes: &[Pitch], root: Pitch, bass: Pitch, duration: f64) -> Self {
        let root_class = root.rem_euclid(12);
        let bottom = bass + (root_class - bass).rem_euclid(12);
        let mut pitches: Vec<Pitch> = pitch_classes
            .iter()
            .map(|&pc| bottom + (pc - root_class).rem_euclid(12))
            .collect();
        pitches.sort_unstable();
        pitches.dedup();
        Self { pitches, duration }
    }

    /// Distinct pitch classes of this harmony
    pub fn pitch_classes(&self) -> Vec<Pitch> {
        crate::music::pitch::pitch_class_set(&self.pitches)
    }

    /// Shift every pitch by `semitones`
    pub fn transpose(&mut self, semitones: Pitch) {
        for pitch in &mut self.pitches {
            *pitch += semitones;
        }
    }
}
