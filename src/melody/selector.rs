// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melodic pitch selection.
//!
//! Each new pitch is a small step from the previous one, restricted to the
//! harmony sounding under the note and to the instrument's register. When a
//! note spans several harmonies the selector prefers their common tones, then
//! the most frequent tones. When nothing fits it leaves the harmony and takes
//! a plain step so the line never stalls.

use rand::Rng;
use tracing::trace;

use crate::music::pitch::{pitch_class, Pitch};
use crate::music::register::Register;

/// Step offsets tried first
pub const STEP_OFFSETS: [Pitch; 4] = [-2, -1, 1, 2];

/// Wider offsets tried when no step fits
pub const WIDE_OFFSETS: [Pitch; 6] = [-5, -4, -3, 3, 4, 5];

/// Probability of repeating the previous pitch when no step fits
pub const DEFAULT_REPEAT_PROBABILITY: f64 = 0.12;

/// Which stage of the cascade produced a pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A tone of the single harmony under the note
    Exact,
    /// A tone common to every harmony under the note
    CommonTone,
    /// The most frequent available tone across the harmonies
    FrequentTone,
    /// No harmonic constraint
    Unconstrained,
}

/// How far the line moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Step,
    Repeat,
    Leap,
    /// Unconstrained step
    Adjacent,
    /// Closest register pitch, when no step stays in range
    Nearest,
}

/// A chosen pitch and how it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub pitch: Pitch,
    pub strategy: Strategy,
    pub motion: Motion,
}

impl Selection {
    /// True when the pitch ignores the harmony
    pub fn used_fallback(&self) -> bool {
        self.strategy == Strategy::Unconstrained
    }
}

/// Pitch classes shared by every harmony, in the order of the first
pub fn common_tones(harmonies: &[Vec<Pitch>]) -> Vec<Pitch> {
    let Some((first, rest)) = harmonies.split_first() else {
        return Vec::new();
    };
    let mut common: Vec<Pitch> = Vec::new();
    for &pc in first {
        let pc = pitch_class(pc);
        if common.contains(&pc) {
            continue;
        }
        if rest.iter().all(|h| h.iter().any(|&p| pitch_class(p) == pc)) {
            common.push(pc);
        }
    }
    common
}

/// Every pitch class across the harmonies, most frequent first. Ties keep
/// first-appearance order.
pub fn tones_by_frequency(harmonies: &[Vec<Pitch>]) -> Vec<Pitch> {
    let mut counts: Vec<(Pitch, usize)> = Vec::new();
    for harmony in harmonies {
        let mut seen: Vec<Pitch> = Vec::new();
        for &p in harmony {
            let pc = pitch_class(p);
            if seen.contains(&pc) {
                continue;
            }
            seen.push(pc);
            match counts.iter_mut().find(|(c, _)| *c == pc) {
                Some((_, n)) => *n += 1,
                None => counts.push((pc, 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(pc, _)| pc).collect()
}

/// Ordered (strategy, target pitch classes) attempts for the harmonies
/// under a note
fn plan(harmonies: &[Vec<Pitch>]) -> Vec<(Strategy, Vec<Pitch>)> {
    match harmonies {
        [] => Vec::new(),
        [single] => vec![(Strategy::Exact, single.iter().map(|&p| pitch_class(p)).collect())],
        _ => {
            let mut attempts = Vec::new();
            let common = common_tones(harmonies);
            if !common.is_empty() {
                attempts.push((Strategy::CommonTone, common));
            }
            attempts.extend(
                tones_by_frequency(harmonies)
                    .into_iter()
                    .map(|pc| (Strategy::FrequentTone, vec![pc])),
            );
            attempts
        }
    }
}

/// Walks a melodic line one pitch at a time
#[derive(Debug, Clone, PartialEq)]
pub struct PitchSelector {
    previous: Pitch,
    repeat_probability: f64,
}

impl PitchSelector {
    pub fn new(previous: Pitch) -> Self {
        Self {
            previous,
            repeat_probability: DEFAULT_REPEAT_PROBABILITY,
        }
    }

    /// Start on a random pitch from the lowest `fraction` of the register
    pub fn seeded<R: Rng + ?Sized>(register: &Register, fraction: f64, rng: &mut R) -> Self {
        let portion = register.lower_portion(fraction);
        Self::new(portion[rng.gen_range(0..portion.len())])
    }

    pub fn with_repeat_probability(mut self, probability: f64) -> Self {
        self.repeat_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn previous(&self) -> Pitch {
        self.previous
    }

    /// Candidates from the previous pitch toward `classes`: steps first, then
    /// an occasional repeat, then wider intervals. `None` when nothing fits.
    pub fn candidates_for<R: Rng + ?Sized>(
        &self,
        register: &Register,
        classes: &[Pitch],
        rng: &mut R,
    ) -> Option<(Vec<Pitch>, Motion)> {
        let in_harmony = |p: Pitch| register.contains(p) && classes.contains(&pitch_class(p));
        let reach = |offsets: &[Pitch]| -> Vec<Pitch> {
            offsets
                .iter()
                .map(|o| self.previous + o)
                .filter(|&p| in_harmony(p))
                .collect()
        };

        let steps = reach(&STEP_OFFSETS);
        if !steps.is_empty() {
            return Some((steps, Motion::Step));
        }
        if in_harmony(self.previous) && rng.gen::<f64>() < self.repeat_probability {
            return Some((vec![self.previous], Motion::Repeat));
        }
        let leaps = reach(&WIDE_OFFSETS);
        if !leaps.is_empty() {
            return Some((leaps, Motion::Leap));
        }
        None
    }

    /// Steps from the previous pitch with no harmonic constraint, or the
    /// nearest register pitches when no step stays in range
    pub fn unconstrained(&self, register: &Register) -> (Vec<Pitch>, Motion) {
        let steps: Vec<Pitch> = STEP_OFFSETS
            .iter()
            .map(|o| self.previous + o)
            .filter(|&p| register.contains(p))
            .collect();
        if steps.is_empty() {
            (register.nearest(self.previous), Motion::Nearest)
        } else {
            (steps, Motion::Adjacent)
        }
    }

    /// Choose the next pitch for a note sounding over `harmonies` (pitch-class
    /// sets in time order) and make it the new previous pitch
    pub fn next_pitch<R: Rng + ?Sized>(
        &mut self,
        register: &Register,
        harmonies: &[Vec<Pitch>],
        rng: &mut R,
    ) -> Selection {
        let mut found = None;
        for (strategy, classes) in plan(harmonies) {
            if let Some((candidates, motion)) = self.candidates_for(register, &classes, rng) {
                found = Some((candidates, strategy, motion));
                break;
            }
        }
        let (candidates, strategy, motion) = found.unwrap_or_else(|| {
            let (candidates, motion) = self.unconstrained(register);
            (candidates, Strategy::Unconstrained, motion)
        });

        let pitch = match candidates.len() {
            0 => self.previous,
            n => candidates[rng.gen_range(0..n)],
        };
        trace!(previous = self.previous, pitch, ?strategy, ?motion, "melody pitch");
        self.previous = pitch;
        Selection {
            pitch,
            strategy,
            motion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn violin() -> Register {
        Register::parse_range("G3", "B5").unwrap()
    }

    #[test]
    fn test_common_tones() {
        let harmonies = vec![vec![0, 4, 7], vec![9, 0, 4], vec![4, 7, 11]];
        assert_eq!(common_tones(&harmonies), vec![4]);
        assert!(common_tones(&[vec![0, 4, 7], vec![2, 5, 9]]).is_empty());
        assert!(common_tones(&[]).is_empty());
    }

    #[test]
    fn test_tones_by_frequency() {
        let harmonies = vec![vec![0, 4, 7], vec![2, 7, 11], vec![7, 11, 14]];
        // 7 in three; 2 and 11 in two, with 14 reducing to 2
        assert_eq!(tones_by_frequency(&harmonies), vec![7, 2, 11, 0, 4]);
    }

    #[test]
    fn test_step_into_harmony() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(3);
        let mut selector = PitchSelector::new(65);
        // C major from F4: E4 and G4 are a step away
        let selection = selector.next_pitch(&register, &[vec![0, 4, 7]], &mut rng);
        assert!([64, 67].contains(&selection.pitch));
        assert_eq!(selection.strategy, Strategy::Exact);
        assert_eq!(selection.motion, Motion::Step);
        assert_eq!(selector.previous(), selection.pitch);
    }

    #[test]
    fn test_widen_when_no_step() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(8);
        // From C4 only A3 and E4 (pitch class 9 and 4) sit within a fourth
        for _ in 0..20 {
            let mut selector = PitchSelector::new(60).with_repeat_probability(0.0);
            let selection = selector.next_pitch(&register, &[vec![9, 4]], &mut rng);
            assert_eq!(selection.motion, Motion::Leap);
            assert!([57, 64].contains(&selection.pitch));
        }
    }

    #[test]
    fn test_repeat_previous() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(8);
        let mut selector = PitchSelector::new(60).with_repeat_probability(1.0);
        let selection = selector.next_pitch(&register, &[vec![0, 6]], &mut rng);
        assert_eq!(selection.pitch, 60);
        assert_eq!(selection.motion, Motion::Repeat);
    }

    #[test]
    fn test_common_tone_over_two_harmonies() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(5);
        let mut selector = PitchSelector::new(62);
        let selection = selector.next_pitch(&register, &[vec![0, 4, 7], vec![9, 0, 4]], &mut rng);
        assert_eq!(selection.strategy, Strategy::CommonTone);
        assert!([60, 64].contains(&selection.pitch));
    }

    #[test]
    fn test_frequent_tone_when_nothing_shared() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(5);
        let mut selector = PitchSelector::new(62).with_repeat_probability(0.0);
        // No shared tone; 7 is only reachable by leap, 4 by step
        let selection = selector.next_pitch(&register, &[vec![7, 11], vec![4, 8]], &mut rng);
        assert_eq!(selection.strategy, Strategy::FrequentTone);
        assert_eq!(selection.motion, Motion::Leap);
        assert_eq!(selection.pitch, 67);
    }

    #[test]
    fn test_unconstrained_fallback() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(1);
        let mut selector = PitchSelector::new(70).with_repeat_probability(0.0);
        // E is a tritone from Bb4 in both directions
        let selection = selector.next_pitch(&register, &[vec![4]], &mut rng);
        assert!(selection.used_fallback());
        assert_eq!(selection.motion, Motion::Adjacent);
        assert!((68..=72).contains(&selection.pitch));

        let selection = selector.next_pitch(&register, &[], &mut rng);
        assert!(selection.used_fallback());
    }

    #[test]
    fn test_stays_in_register() {
        let register = Register::chromatic(60, 62).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut selector = PitchSelector::new(40);
        let selection = selector.next_pitch(&register, &[vec![5]], &mut rng);
        assert_eq!(selection.pitch, 60);
        assert_eq!(selection.motion, Motion::Nearest);
        for _ in 0..50 {
            let selection = selector.next_pitch(&register, &[vec![0, 4, 7]], &mut rng);
            assert!(register.contains(selection.pitch));
        }
    }

    #[test]
    fn test_seeded_in_lower_portion() {
        let register = violin();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let selector = PitchSelector::seeded(&register, 0.25, &mut rng);
            assert!(selector.previous() >= 55 && selector.previous() <= 63);
        }
    }
}
