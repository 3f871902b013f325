// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch and register primitives shared by the harmony and melody engines.

pub mod pitch;
pub mod register;

pub use pitch::{parse_pitch, pitch_class, pitch_class_set, pitch_name, NoteName, Pitch};
pub use register::Register;
