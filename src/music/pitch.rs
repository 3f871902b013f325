// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch values and note-name parsing.
//!
//! Pitches are plain integers: a pitch class (0-11) or an absolute semitone
//! number using MIDI numbering (C4 = 60).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Absolute semitone number, or a pitch class when reduced mod 12
pub type Pitch = i32;

/// Lowest absolute pitch (C-1)
pub const LOWEST_PITCH: Pitch = 0;

/// Highest absolute pitch (G9)
pub const HIGHEST_PITCH: Pitch = 127;

/// Reduce any pitch to its pitch class (0-11)
pub fn pitch_class(pitch: Pitch) -> Pitch {
    pitch.rem_euclid(12)
}

/// Reduce a collection of pitches to distinct pitch classes, keeping first
/// appearance order
pub fn pitch_class_set(pitches: &[Pitch]) -> Vec<Pitch> {
    let mut classes = Vec::with_capacity(pitches.len());
    for &p in pitches {
        let pc = pitch_class(p);
        if !classes.contains(&pc) {
            classes.push(pc);
        }
    }
    classes
}

/// Note names (pitch classes), spelled with flats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl NoteName {
    /// All names in chromatic order
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::Db,
        NoteName::D,
        NoteName::Eb,
        NoteName::E,
        NoteName::F,
        NoteName::Gb,
        NoteName::G,
        NoteName::Ab,
        NoteName::A,
        NoteName::Bb,
        NoteName::B,
    ];

    /// Pitch class (0-11) of this name
    pub fn pitch_class(self) -> Pitch {
        Self::ALL.iter().position(|&n| n == self).unwrap_or(0) as Pitch
    }

    /// Name for a pitch class; any pitch is reduced mod 12 first
    pub fn from_pitch_class(pc: Pitch) -> Self {
        Self::ALL[pitch_class(pc) as usize]
    }

    /// Parse a bare note name (e.g. "C", "C#", "Db", "f#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" | "BS" => Some(NoteName::C),
            "C#" | "CS" | "DB" => Some(NoteName::Db),
            "D" => Some(NoteName::D),
            "D#" | "DS" | "EB" => Some(NoteName::Eb),
            "E" | "FB" => Some(NoteName::E),
            "F" | "E#" | "ES" => Some(NoteName::F),
            "F#" | "FS" | "GB" => Some(NoteName::Gb),
            "G" => Some(NoteName::G),
            "G#" | "GS" | "AB" => Some(NoteName::Ab),
            "A" => Some(NoteName::A),
            "A#" | "AS" | "BB" => Some(NoteName::Bb),
            "B" | "CB" => Some(NoteName::B),
            _ => None,
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteName::C => "C",
            NoteName::Db => "Db",
            NoteName::D => "D",
            NoteName::Eb => "Eb",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Gb => "Gb",
            NoteName::G => "G",
            NoteName::Ab => "Ab",
            NoteName::A => "A",
            NoteName::Bb => "Bb",
            NoteName::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Parse a note name with octave ("G3", "Bb5", "C-1") into an absolute pitch.
///
/// Names outside C-1..=G9 are rejected.
pub fn parse_pitch(s: &str) -> Result<Pitch> {
    let invalid = || Error::InvalidPitchName(s.to_string());
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .ok_or_else(invalid)?;
    let (name, octave) = trimmed.split_at(split);
    let name = NoteName::parse(name).ok_or_else(invalid)?;
    let octave: i32 = octave.parse().map_err(|_| invalid())?;
    let pitch = octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|p| p.checked_add(name.pitch_class()))
        .ok_or_else(invalid)?;
    if !(LOWEST_PITCH..=HIGHEST_PITCH).contains(&pitch) {
        return Err(invalid());
    }
    Ok(pitch)
}

/// Spell an absolute pitch as a note name with octave
pub fn pitch_name(pitch: Pitch) -> String {
    let octave = pitch.div_euclid(12) - 1;
    format!("{}{}", NoteName::from_pitch_class(pitch), octave)
}
