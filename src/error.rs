// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the generation engine.
//!
//! Only structural misconfiguration is an error. Every randomness-driven
//! branch has a terminal fallback and never fails.

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the generation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A chord type was not a list of positive intervals summing to 12
    #[error("invalid chord type {intervals:?}: {reason}")]
    InvalidChordType {
        /// The offending interval list
        intervals: Vec<u8>,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Options and weights handed to a weighted choice differ in length
    #[error("weighted choice got {options} options but {weights} weights")]
    WeightMismatch { options: usize, weights: usize },

    /// A weighted choice was asked to pick from nothing
    #[error("weighted choice over an empty option list")]
    EmptyChoice,

    /// A weight was negative, non-finite, or all weights were zero
    #[error("invalid weights: {0}")]
    InvalidWeight(&'static str),

    /// The harmony chooser needs at least one previous harmony
    #[error("harmony history is empty")]
    EmptyHistory,

    /// The harmony chooser was given no candidate chord types
    #[error("no candidate chord types supplied")]
    EmptyCandidates,

    /// A register must contain at least one playable pitch
    #[error("register contains no pitches")]
    EmptyRegister,

    /// A duration was zero, negative or not finite
    #[error("invalid duration {0}")]
    InvalidDuration(f64),

    /// A note name such as "G3" could not be parsed
    #[error("invalid pitch name `{0}`")]
    InvalidPitchName(String),
}
