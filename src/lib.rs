// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Algorithmic composition of harmony and melody.
//!
//! The harmony engine enumerates every chord class that fits in an octave,
//! scores each by the consonance of its interval content, and chooses chord
//! sequences by combining that score with voice-leading smoothness. The
//! melody engine walks an instrument's register through the pitch classes of
//! the sounding harmony and decorates the line with grace notes.

pub mod compose;
pub mod config;
pub mod error;
pub mod harmony;
pub mod melody;
pub mod music;
pub mod random;

pub use compose::{compose, Composer, Composition, HarmonySettings, Piece, Segment, SegmentOutput};
pub use config::CompositionFile;
pub use error::{Error, Result};
