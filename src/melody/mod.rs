// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melodic line generation.
//!
//! A melody is a nearest-neighbour walk through an instrument's register
//! constrained to the pitch classes of the harmony sounding under each note,
//! decorated with grace-note ornaments.

pub mod accompaniment;
pub mod line;
pub mod ornament;
pub mod selector;
pub mod timeline;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use accompaniment::{next_accompaniment_note, rank_by_distance};
pub use line::{MelodyConfig, MelodyWriter};
pub use ornament::{bridge, Direction, OrnamentConfig, OrnamentGenerator};
pub use selector::{PitchSelector, Selection, Strategy};
pub use timeline::HarmonyTimeline;

use crate::music::pitch::{pitch_name, Pitch};

/// A sounding pitch or a rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NotePitchRepr", into = "NotePitchRepr")]
pub enum NotePitch {
    Pitch(Pitch),
    Rest,
}

impl NotePitch {
    pub fn pitch(self) -> Option<Pitch> {
        match self {
            NotePitch::Pitch(p) => Some(p),
            NotePitch::Rest => None,
        }
    }

    pub fn is_rest(self) -> bool {
        self == NotePitch::Rest
    }
}

impl fmt::Display for NotePitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotePitch::Pitch(p) => write!(f, "{}", pitch_name(*p)),
            NotePitch::Rest => write!(f, "rest"),
        }
    }
}

/// Wire form: an integer pitch or the string "rest"
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NotePitchRepr {
    Pitch(Pitch),
    Word(String),
}

impl TryFrom<NotePitchRepr> for NotePitch {
    type Error = String;

    fn try_from(repr: NotePitchRepr) -> Result<Self, Self::Error> {
        match repr {
            NotePitchRepr::Pitch(p) => Ok(NotePitch::Pitch(p)),
            NotePitchRepr::Word(word) if word.eq_ignore_ascii_case("rest") => Ok(NotePitch::Rest),
            NotePitchRepr::Word(word) => {
                Err(format!("expected a pitch number or \"rest\", got {:?}", word))
            }
        }
    }
}

impl From<NotePitch> for NotePitchRepr {
    fn from(pitch: NotePitch) -> Self {
        match pitch {
            NotePitch::Pitch(p) => NotePitchRepr::Pitch(p),
            NotePitch::Rest => NotePitchRepr::Word("rest".to_string()),
        }
    }
}

/// A melody note with the grace notes that precede it
#[derive(Debug, Clone, PartialEq)]
pub struct MelodicNote {
    pub pitch: NotePitch,
    /// Length in beats
    pub duration: f64,
    /// Zero-duration grace pitches sounding just before this note
    pub ornaments: Vec<Pitch>,
    /// How the pitch was found; `None` for rests
    pub strategy: Option<Strategy>,
}

impl MelodicNote {
    pub fn rest(duration: f64) -> Self {
        Self {
            pitch: NotePitch::Rest,
            duration,
            ornaments: Vec::new(),
            strategy: None,
        }
    }
}

/// One renderer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyEvent {
    pub pitch: NotePitch,
    pub duration: f64,
}

/// Expand ornaments inline, as zero-duration events before their host note
pub fn flatten(notes: &[MelodicNote]) -> Vec<MelodyEvent> {
    let mut events = Vec::with_capacity(notes.len());
    for note in notes {
        events.extend(note.ornaments.iter().map(|&p| MelodyEvent {
            pitch: NotePitch::Pitch(p),
            duration: 0.0,
        }));
        events.push(MelodyEvent {
            pitch: note.pitch,
            duration: note.duration,
        });
    }
    events
}
