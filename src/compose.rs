// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Segment-by-segment composition.
//!
//! A [`Composer`] owns the random source and the running state of a piece:
//! the harmony history, the melody line and the accompaniment. Each segment
//! realizes a harmony stream from its harmonic rhythm and writes a melody
//! (and optionally an accompaniment) over it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::harmony::{
    choose_root, ChordCatalog, ChordSource, ChordType, ChordTypeSampler, Drone, DroneHarmony,
    Harmony, HarmonyChooser, HarmonyHistory,
};
use crate::melody::{
    flatten, next_accompaniment_note, HarmonyTimeline, MelodicNote, MelodyConfig, MelodyEvent,
    MelodyWriter, NotePitch, OrnamentConfig,
};
use crate::music::pitch::Pitch;
use crate::music::register::Register;

/// Default harmony bass pitch (C3)
pub const DEFAULT_BASS: Pitch = 48;

/// Default number of candidate chord types offered per harmony
pub const DEFAULT_CANDIDATES_PER_STEP: usize = 4;

/// Most candidate chord types a composition may ask for per harmony
pub const MAX_CANDIDATES_PER_STEP: usize = 64;

/// How the harmony stream is generated
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonySettings {
    /// Where candidate chord types come from
    pub source: ChordSource,
    /// Candidates drawn per harmony
    pub candidates_per_step: usize,
    /// Fixed candidates offered at every step instead of drawing from `source`
    pub fixed_candidates: Vec<ChordType>,
    /// Pitch classes of the harmony the piece starts from
    pub initial: Vec<Pitch>,
    /// Lowest pitch a harmony root is voiced at or above
    pub bass: Pitch,
    /// Every harmony contains this drone when set
    pub drone: Option<Drone>,
}

impl Default for HarmonySettings {
    fn default() -> Self {
        Self {
            source: ChordSource::default(),
            candidates_per_step: DEFAULT_CANDIDATES_PER_STEP,
            fixed_candidates: Vec::new(),
            initial: vec![0, 4, 7],
            bass: DEFAULT_BASS,
            drone: None,
        }
    }
}

/// A named section: durations of its harmonies and of its melody notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    /// Harmony durations in beats
    pub harmonic_rhythm: Vec<f64>,
    /// Melody note durations in beats
    pub rhythm: Vec<f64>,
}

/// Everything needed to compose a piece
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Random seed; drawn fresh when absent
    pub seed: Option<u64>,
    pub harmony: HarmonySettings,
    pub melody: MelodyConfig,
    pub ornament: OrnamentConfig,
    /// Melody instrument range
    pub register: Register,
    /// Accompaniment instrument range, if an accompaniment is wanted
    pub accompaniment: Option<Register>,
    pub segments: Vec<Segment>,
}

/// Composed output of one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOutput {
    pub name: String,
    pub harmony: Vec<Harmony>,
    /// Melody events with ornaments expanded inline
    pub melody: Vec<MelodyEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accompaniment: Vec<MelodyEvent>,
    /// Melody notes before expansion
    #[serde(skip)]
    pub notes: Vec<MelodicNote>,
}

/// A composed piece with the seed that reproduces it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    pub seed: u64,
    pub segments: Vec<SegmentOutput>,
}

#[derive(Debug, Clone)]
struct Accompanist {
    register: Register,
    previous: Option<Pitch>,
}

/// Generates harmony and melody segment by segment
pub struct Composer<'a> {
    chooser: HarmonyChooser<'a>,
    sampler: ChordTypeSampler,
    drones: DroneHarmony,
    settings: HarmonySettings,
    history: HarmonyHistory,
    melody: MelodyWriter,
    accompanist: Option<Accompanist>,
    seed: u64,
    rng: StdRng,
}

impl<'a> Composer<'a> {
    pub fn new(catalog: &'a ChordCatalog, composition: &Composition) -> Result<Self> {
        let settings = composition.harmony.clone();
        if settings.initial.is_empty() {
            return Err(Error::EmptyHistory);
        }
        if settings.fixed_candidates.is_empty() && settings.candidates_per_step == 0 {
            return Err(Error::EmptyCandidates);
        }

        let drones = DroneHarmony::new(catalog, settings.drone.as_slice())?;
        let seed = composition.seed.unwrap_or_else(rand::random);
        info!(seed, source = ?settings.source, "composer ready");

        Ok(Self {
            chooser: HarmonyChooser::new(catalog),
            sampler: ChordTypeSampler::new(catalog)?,
            drones,
            history: HarmonyHistory::starting_with(settings.initial.clone()),
            settings,
            melody: MelodyWriter::new(
                composition.register.clone(),
                composition.melody.clone(),
                composition.ornament.clone(),
            ),
            accompanist: composition.accompaniment.clone().map(|register| Accompanist {
                register,
                previous: None,
            }),
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The seed this composer's random source started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn history(&self) -> &HarmonyHistory {
        &self.history
    }

    /// Choose, root and voice the next harmony
    pub fn next_harmony(&mut self, duration: f64) -> Result<Harmony> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::InvalidDuration(duration));
        }

        let settings = &self.settings;
        let chord = match &settings.drone {
            Some(drone) => self.drones.choose_over(drone, &mut self.rng)?,
            None if settings.fixed_candidates.is_empty()
                && settings.source == ChordSource::Free =>
            {
                self.drones.choose(&mut self.rng)
            }
            None => {
                let candidates = if settings.fixed_candidates.is_empty() {
                    self.sampler
                        .candidates(settings.source, settings.candidates_per_step, &mut self.rng)?
                } else {
                    settings.fixed_candidates.clone()
                };
                self.chooser.choose_next(&self.history, &candidates, &mut self.rng)?
            }
        };
        self.history.push(chord.clone());

        let root = choose_root(&chord, &mut self.rng)?;
        let harmony = Harmony::voiced(&chord, root, self.settings.bass, duration);
        debug!(pitches = ?harmony.pitches, root, duration, "harmony");
        Ok(harmony)
    }

    /// Compose one segment
    pub fn segment(&mut self, segment: &Segment) -> Result<SegmentOutput> {
        let harmony = segment
            .harmonic_rhythm
            .iter()
            .map(|&duration| self.next_harmony(duration))
            .collect::<Result<Vec<_>>>()?;

        let timeline = HarmonyTimeline::new(&harmony)?;
        let notes = self.melody.write(&timeline, &segment.rhythm, &mut self.rng)?;

        let mut accompaniment = Vec::new();
        if let Some(accompanist) = self.accompanist.as_mut() {
            for chord in &harmony {
                let previous = accompanist
                    .previous
                    .or_else(|| chord.pitches.first().copied())
                    .unwrap_or_else(|| accompanist.register.lowest());
                let pitch = next_accompaniment_note(
                    previous,
                    &chord.pitches,
                    &accompanist.register,
                    &mut self.rng,
                );
                accompanist.previous = Some(pitch);
                accompaniment.push(MelodyEvent {
                    pitch: NotePitch::Pitch(pitch),
                    duration: chord.duration,
                });
            }
        }

        info!(
            segment = %segment.name,
            harmonies = harmony.len(),
            notes = notes.len(),
            "composed segment"
        );
        Ok(SegmentOutput {
            name: segment.name.clone(),
            melody: flatten(&notes),
            harmony,
            accompaniment,
            notes,
        })
    }

    /// Compose every segment in order
    pub fn compose(&mut self, segments: &[Segment]) -> Result<Vec<SegmentOutput>> {
        segments.iter().map(|segment| self.segment(segment)).collect()
    }

    /// Compose every segment and keep the seed alongside them
    pub fn piece(&mut self, segments: &[Segment]) -> Result<Piece> {
        Ok(Piece {
            seed: self.seed,
            segments: self.compose(segments)?,
        })
    }
}

/// Compose a whole piece with a fresh composer
pub fn compose(catalog: &ChordCatalog, composition: &Composition) -> Result<Vec<SegmentOutput>> {
    Composer::new(catalog, composition)?.compose(&composition.segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::pitch::pitch_class;

    fn composition(seed: u64) -> Composition {
        Composition {
            seed: Some(seed),
            harmony: HarmonySettings::default(),
            melody: MelodyConfig::default(),
            ornament: OrnamentConfig::default(),
            register: Register::parse_range("G3", "B5").unwrap(),
            accompaniment: None,
            segments: vec![Segment {
                name: "A".to_string(),
                harmonic_rhythm: vec![2.0; 4],
                rhythm: vec![0.5, 0.5, 1.0, 2.0, 1.0, 1.0, 2.0],
            }],
        }
    }

    #[test]
    fn test_same_seed_same_piece() {
        let catalog = ChordCatalog::build();
        let a = compose(&catalog, &composition(7)).unwrap();
        let b = compose(&catalog, &composition(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].harmony.len(), 4);
    }

    #[test]
    fn test_harmony_voicing() {
        let catalog = ChordCatalog::build();
        let mut composer = Composer::new(&catalog, &composition(3)).unwrap();
        for _ in 0..10 {
            let harmony = composer.next_harmony(1.0).unwrap();
            let span = DEFAULT_BASS..DEFAULT_BASS + 24;
            assert!(harmony.pitches.iter().all(|p| span.contains(p)));
            assert!(harmony.pitches.windows(2).all(|w| w[0] < w[1]));
        }
        // Initial harmony plus ten chosen ones
        assert_eq!(composer.history().len(), 11);
    }

    #[test]
    fn test_drone_in_every_harmony() {
        let catalog = ChordCatalog::build();
        let mut settings = composition(11);
        settings.harmony.drone = Some(Drone::Pitch(2));
        let output = compose(&catalog, &settings).unwrap();
        for harmony in &output[0].harmony {
            assert!(harmony.pitches.iter().any(|&p| pitch_class(p) == 2));
        }
    }

    #[test]
    fn test_free_source_skips_ranking() {
        let catalog = ChordCatalog::build();
        let mut settings = composition(17);
        settings.harmony.source = ChordSource::Free;
        let mut composer = Composer::new(&catalog, &settings).unwrap();
        for _ in 0..12 {
            let harmony = composer.next_harmony(1.0).unwrap();
            assert!(!harmony.pitches.is_empty());
            let chord = composer.history().last().unwrap();
            assert!(chord.iter().all(|p| (0..12).contains(p)));
        }
        assert_eq!(composer.history().len(), 13);
    }

    #[test]
    fn test_fixed_candidates() {
        let catalog = ChordCatalog::build();
        let mut settings = composition(5);
        settings.harmony.fixed_candidates = vec![ChordType::new(vec![4, 3, 5]).unwrap()];
        let mut composer = Composer::new(&catalog, &settings).unwrap();
        for _ in 0..6 {
            let harmony = composer.next_harmony(1.0).unwrap();
            assert_eq!(harmony.pitches.len(), 3);
        }
    }

    #[test]
    fn test_accompaniment_follows_harmony() {
        let catalog = ChordCatalog::build();
        let mut settings = composition(19);
        settings.accompaniment = Some(Register::parse_range("E2", "G5").unwrap());
        let output = compose(&catalog, &settings).unwrap();
        let segment = &output[0];
        assert_eq!(segment.accompaniment.len(), segment.harmony.len());
        for (event, harmony) in segment.accompaniment.iter().zip(&segment.harmony) {
            let pitch = event.pitch.pitch().unwrap();
            assert!(harmony.pitch_classes().contains(&pitch_class(pitch)));
            assert_eq!(event.duration, harmony.duration);
        }
    }

    #[test]
    fn test_piece_is_one_yaml_document() {
        let catalog = ChordCatalog::build();
        let settings = composition(23);
        let piece = Composer::new(&catalog, &settings).unwrap().piece(&settings.segments).unwrap();
        assert_eq!(piece.seed, 23);

        let yaml = serde_yaml::to_string(&piece).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["seed"].as_u64(), Some(23));
        let segments = value["segments"].as_sequence().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0]["name"].as_str(), Some("A"));
        assert!(segments[0]["harmony"].is_sequence());
    }

    #[test]
    fn test_invalid_settings() {
        let catalog = ChordCatalog::build();
        let mut settings = composition(1);
        settings.harmony.initial.clear();
        assert_eq!(Composer::new(&catalog, &settings).err(), Some(Error::EmptyHistory));

        let settings = composition(1);
        let mut composer = Composer::new(&catalog, &settings).unwrap();
        assert!(composer.next_harmony(0.0).is_err());
    }
}
