// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! One-note-per-harmony accompaniment.
//!
//! Each note is a chord tone within a fifth of the previous note, favouring
//! repeats and whole steps over wider moves.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::music::pitch::{pitch_class, Pitch};
use crate::music::register::Register;
use crate::random::{exp_weights, weighted_index};

/// Absolute distances in order of preference
pub const DISTANCE_PREFERENCES: [Pitch; 8] = [0, 2, 1, 3, 4, 5, 7, 6];

/// Widest move to a new accompaniment note
pub const MAX_MOVE: Pitch = 7;

fn preference(distance: Pitch) -> usize {
    DISTANCE_PREFERENCES
        .iter()
        .position(|&d| d == distance)
        .unwrap_or(DISTANCE_PREFERENCES.len())
}

/// Order `options` by preferred distance from `previous`. Options at the
/// same distance are shuffled.
pub fn rank_by_distance<R: Rng + ?Sized>(
    previous: Pitch,
    options: &[Pitch],
    rng: &mut R,
) -> Vec<Pitch> {
    let mut ranked = options.to_vec();
    ranked.sort_by_key(|&p| preference((p - previous).abs()));
    for group in ranked.chunk_by_mut(|a, b| (a - previous).abs() == (b - previous).abs()) {
        group.shuffle(rng);
    }
    ranked
}

/// Next accompaniment pitch over `harmony`.
///
/// Draws from chord tones within [`MAX_MOVE`] semitones of `previous`,
/// halving the weight at each rank. When no chord tone is in reach the
/// closest in-register chord tone is taken, and failing that the closest
/// register pitch.
pub fn next_accompaniment_note<R: Rng + ?Sized>(
    previous: Pitch,
    harmony: &[Pitch],
    register: &Register,
    rng: &mut R,
) -> Pitch {
    let classes: Vec<Pitch> = harmony.iter().map(|&p| pitch_class(p)).collect();
    let in_harmony = |p: &Pitch| classes.contains(&pitch_class(*p));

    let options: Vec<Pitch> = (previous - MAX_MOVE..=previous + MAX_MOVE)
        .filter(|p| register.contains(*p) && in_harmony(p))
        .collect();
    if !options.is_empty() {
        let ranked = rank_by_distance(previous, &options, rng);
        if let Ok(index) = weighted_index(rng, &exp_weights(ranked.len())) {
            return ranked[index];
        }
    }

    let chord_tones: Vec<Pitch> = register.pitches().iter().copied().filter(in_harmony).collect();
    let pool: &[Pitch] = if chord_tones.is_empty() {
        register.pitches()
    } else {
        &chord_tones
    };
    pool.iter()
        .copied()
        .min_by_key(|p| (p - previous).abs())
        .unwrap_or(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rank_by_distance() {
        let mut rng = StdRng::seed_from_u64(6);
        let ranked = rank_by_distance(60, &[67, 60, 61, 66], &mut rng);
        assert_eq!(ranked, vec![60, 61, 67, 66]);
    }

    #[test]
    fn test_rank_ties_shuffled() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut firsts = Vec::new();
        for _ in 0..40 {
            let ranked = rank_by_distance(60, &[58, 62, 67], &mut rng);
            assert_eq!(ranked[2], 67);
            firsts.push(ranked[0]);
        }
        assert!(firsts.contains(&58) && firsts.contains(&62));
    }

    #[test]
    fn test_next_note_is_chord_tone_in_reach() {
        let guitar = Register::parse_range("E2", "G5").unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let mut previous = 48;
        for harmony in [[0, 4, 7], [5, 9, 0], [7, 11, 2], [0, 4, 7]].iter().cycle().take(40) {
            let next = next_accompaniment_note(previous, harmony, &guitar, &mut rng);
            assert!(harmony.contains(&pitch_class(next)));
            assert!((next - previous).abs() <= MAX_MOVE);
            assert!(guitar.contains(next));
            previous = next;
        }
    }

    #[test]
    fn test_next_note_out_of_reach() {
        let register = Register::chromatic(40, 52).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        // Nothing within a fifth of 70; the nearest chord tone is E3
        assert_eq!(next_accompaniment_note(70, &[4], &register, &mut rng), 52);
        // No chord tone in the register at all
        let narrow = Register::chromatic(41, 42).unwrap();
        assert_eq!(next_accompaniment_note(70, &[4], &narrow, &mut rng), 42);
    }
}
