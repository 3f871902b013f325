// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melody lines over a harmony stream.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ornament::{OrnamentConfig, OrnamentGenerator};
use super::selector::{PitchSelector, DEFAULT_REPEAT_PROBABILITY};
use super::timeline::HarmonyTimeline;
use super::{MelodicNote, NotePitch};
use crate::error::{Error, Result};
use crate::music::pitch::Pitch;
use crate::music::register::Register;

/// Melody line settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MelodyConfig {
    /// Chance of repeating a pitch when no step fits the harmony (0.0 - 1.0)
    #[serde(default = "default_repeat_probability")]
    pub repeat_probability: f64,
    /// Chance that a short first note is replaced by a rest (0.0 - 1.0)
    #[serde(default = "default_leading_rest_probability")]
    pub leading_rest_probability: f64,
    /// Longest first note, in beats, that may become a leading rest
    #[serde(default = "default_short_cell")]
    pub short_cell: f64,
    /// Portion of the register, from the bottom, the first pitch is drawn from
    #[serde(default = "default_initial_range_fraction")]
    pub initial_range_fraction: f64,
}

fn default_repeat_probability() -> f64 {
    DEFAULT_REPEAT_PROBABILITY
}
fn default_leading_rest_probability() -> f64 {
    0.5
}
fn default_short_cell() -> f64 {
    0.5
}
fn default_initial_range_fraction() -> f64 {
    0.5
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self {
            repeat_probability: default_repeat_probability(),
            leading_rest_probability: default_leading_rest_probability(),
            short_cell: default_short_cell(),
            initial_range_fraction: default_initial_range_fraction(),
        }
    }
}

/// Writes a continuous melody across successive harmony streams
#[derive(Debug, Clone)]
pub struct MelodyWriter {
    register: Register,
    config: MelodyConfig,
    ornaments: OrnamentGenerator,
    selector: Option<PitchSelector>,
    /// Last sounding pitch and its duration
    last_note: Option<(Pitch, f64)>,
}

impl MelodyWriter {
    pub fn new(register: Register, config: MelodyConfig, ornaments: OrnamentConfig) -> Self {
        Self {
            register,
            config,
            ornaments: OrnamentGenerator::new(ornaments),
            selector: None,
            last_note: None,
        }
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    /// The most recent melody pitch, if any note has been written
    pub fn previous(&self) -> Option<Pitch> {
        self.selector.as_ref().map(PitchSelector::previous)
    }

    /// Write one note per `rhythm` entry over `timeline`.
    ///
    /// The line carries on from the previous call. Only the very first note
    /// of a writer may become a leading rest.
    pub fn write<R: Rng + ?Sized>(
        &mut self,
        timeline: &HarmonyTimeline,
        rhythm: &[f64],
        rng: &mut R,
    ) -> Result<Vec<MelodicNote>> {
        if let Some(&bad) = rhythm.iter().find(|d| !d.is_finite() || **d <= 0.0) {
            return Err(Error::InvalidDuration(bad));
        }

        let mut notes = Vec::with_capacity(rhythm.len());
        let mut start = 0.0;
        for &duration in rhythm {
            let first = self.selector.is_none();
            let register = &self.register;
            let config = &self.config;
            let selector = self.selector.get_or_insert_with(|| {
                PitchSelector::seeded(register, config.initial_range_fraction, rng)
                    .with_repeat_probability(config.repeat_probability)
            });

            if first
                && duration <= self.config.short_cell
                && rng.gen::<f64>() < self.config.leading_rest_probability
            {
                debug!(duration, "leading rest");
                notes.push(MelodicNote::rest(duration));
                start += duration;
                continue;
            }

            let harmonies = timeline.overlapping(start, duration);
            let selection = selector.next_pitch(&self.register, &harmonies, rng);
            let ornaments = match self.last_note {
                Some((previous, previous_duration)) => self.ornaments.ornament(
                    previous,
                    previous_duration,
                    selection.pitch,
                    &self.register,
                    rng,
                ),
                None => Vec::new(),
            };

            notes.push(MelodicNote {
                pitch: NotePitch::Pitch(selection.pitch),
                duration,
                ornaments,
                strategy: Some(selection.strategy),
            });
            self.last_note = Some((selection.pitch, duration));
            start += duration;
        }
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::Harmony;
    use crate::melody::selector::Strategy;
    use crate::music::pitch::pitch_class;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stream() -> HarmonyTimeline {
        HarmonyTimeline::new(&[
            Harmony::new(vec![48, 52, 55], 2.0),
            Harmony::new(vec![53, 57, 60], 2.0),
            Harmony::new(vec![55, 59, 62], 2.0),
            Harmony::new(vec![48, 52, 55], 2.0),
        ])
        .unwrap()
    }

    fn writer() -> MelodyWriter {
        MelodyWriter::new(
            Register::parse_range("G3", "B5").unwrap(),
            MelodyConfig::default(),
            OrnamentConfig::default(),
        )
    }

    #[test]
    fn test_notes_follow_harmony() {
        let timeline = stream();
        let rhythm = [1.0; 8];
        let mut rng = StdRng::seed_from_u64(42);
        let mut writer = writer();
        let notes = writer.write(&timeline, &rhythm, &mut rng).unwrap();
        assert_eq!(notes.len(), 8);

        let chords = [[0, 4, 7], [5, 9, 0], [7, 11, 2], [0, 4, 7]];
        for (i, note) in notes.iter().enumerate() {
            let pitch = note.pitch.pitch().unwrap();
            assert!(writer.register().contains(pitch));
            match note.strategy {
                Some(Strategy::Unconstrained) => {}
                _ => assert!(chords[i / 2].contains(&pitch_class(pitch))),
            }
            assert!(note.ornaments.iter().all(|&p| writer.register().contains(p)));
        }
    }

    #[test]
    fn test_leading_rest() {
        let timeline = stream();
        let config = MelodyConfig {
            leading_rest_probability: 1.0,
            ..MelodyConfig::default()
        };
        let register = Register::chromatic(55, 83).unwrap();
        let mut writer = MelodyWriter::new(register, config, OrnamentConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let notes = writer.write(&timeline, &[0.5, 1.5, 2.0], &mut rng).unwrap();
        assert!(notes[0].pitch.is_rest());
        assert!(!notes[1].pitch.is_rest());

        // A long first note is never replaced
        let mut writer = MelodyWriter::new(
            Register::chromatic(55, 83).unwrap(),
            MelodyConfig {
                leading_rest_probability: 1.0,
                ..MelodyConfig::default()
            },
            OrnamentConfig::default(),
        );
        let notes = writer.write(&timeline, &[1.0, 1.0], &mut rng).unwrap();
        assert!(notes.iter().all(|n| !n.pitch.is_rest()));
    }

    #[test]
    fn test_line_continues_across_calls() {
        let timeline = stream();
        let mut rng = StdRng::seed_from_u64(7);
        let mut writer = writer();
        writer.write(&timeline, &[2.0, 2.0], &mut rng).unwrap();
        let previous = writer.previous().unwrap();
        let notes = writer.write(&timeline, &[1.0], &mut rng).unwrap();
        let next = notes[0].pitch.pitch().unwrap();
        assert!((next - previous).abs() <= 5 || notes[0].strategy == Some(Strategy::Unconstrained));
    }

    #[test]
    fn test_invalid_rhythm() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(writer().write(&stream(), &[1.0, 0.0], &mut rng).is_err());
        assert!(writer().write(&stream(), &[-1.0], &mut rng).is_err());
    }

    #[test]
    fn test_reproducible() {
        let rhythm = [0.5, 0.5, 1.0, 1.0, 0.25, 0.75, 2.0];
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            writer().write(&stream(), &rhythm, &mut rng).unwrap()
        };
        assert_eq!(run(99), run(99));
    }
}
