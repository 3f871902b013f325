// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for montreal.
//!
//! A composition file names the random seed, how harmonies are drawn, the
//! melody and ornament settings, instrument registers and the segments to
//! compose. YAML is the primary format; files ending in `.toml` are read as
//! TOML with the same schema.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::compose::{
    Composition, HarmonySettings, Segment, DEFAULT_CANDIDATES_PER_STEP, MAX_CANDIDATES_PER_STEP,
};
use crate::harmony::{pitch_classes_to_intervals, ChordSource, Drone};
use crate::melody::{MelodyConfig, OrnamentConfig};
use crate::music::pitch::{parse_pitch, Pitch};
use crate::music::register::Register;

/// Root configuration for a composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionFile {
    /// Random seed; omit for a fresh piece on every run
    #[serde(default)]
    pub seed: Option<u64>,
    /// Harmony stream settings
    #[serde(default)]
    pub harmony: HarmonyConfig,
    /// Melody line settings
    #[serde(default)]
    pub melody: MelodyConfig,
    /// Grace-note settings
    #[serde(default)]
    pub ornament: OrnamentConfig,
    /// Melody instrument range
    #[serde(default = "default_register")]
    pub register: RegisterConfig,
    /// Accompaniment instrument range; no accompaniment when absent
    #[serde(default)]
    pub accompaniment: Option<RegisterConfig>,
    /// Sections to compose, in order
    #[serde(default = "default_segments")]
    pub segments: Vec<SegmentConfig>,
}

impl CompositionFile {
    /// Load a composition from a YAML or TOML file, chosen by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        };
        parsed.with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a composition from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a composition from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save the composition to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Check every value and resolve names into a [`Composition`]
    pub fn validate(&self) -> Result<Composition> {
        let probabilities = [
            ("melody.repeat_probability", self.melody.repeat_probability),
            ("melody.leading_rest_probability", self.melody.leading_rest_probability),
            ("melody.initial_range_fraction", self.melody.initial_range_fraction),
            ("ornament.probability", self.ornament.probability),
            ("ornament.bridge_probability", self.ornament.bridge_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be between 0.0 and 1.0, got {}", name, value);
            }
        }

        let segments = self
            .segments
            .iter()
            .map(SegmentConfig::validate)
            .collect::<Result<Vec<_>>>()?;

        let accompaniment = match &self.accompaniment {
            Some(range) => Some(range.to_register().context("Invalid accompaniment register")?),
            None => None,
        };

        Ok(Composition {
            seed: self.seed,
            harmony: self.harmony.validate()?,
            melody: self.melody.clone(),
            ornament: self.ornament.clone(),
            register: self.register.to_register().context("Invalid melody register")?,
            accompaniment,
            segments,
        })
    }
}

impl Default for CompositionFile {
    fn default() -> Self {
        Self {
            seed: None,
            harmony: HarmonyConfig::default(),
            melody: MelodyConfig::default(),
            ornament: OrnamentConfig::default(),
            register: default_register(),
            accompaniment: None,
            segments: default_segments(),
        }
    }
}

/// Harmony stream configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarmonyConfig {
    /// Where candidate chord types come from
    #[serde(default)]
    pub source: ChordSource,
    /// Candidate chord types drawn per harmony
    #[serde(default = "default_candidates_per_step")]
    pub candidates_per_step: usize,
    /// Pitch-class sets offered at every step instead of drawing from `source`
    #[serde(default)]
    pub candidates: Vec<Vec<Pitch>>,
    /// Pitch classes of the starting harmony
    #[serde(default = "default_initial")]
    pub initial: Vec<Pitch>,
    /// Note name of the lowest harmony root (e.g., "C3")
    #[serde(default = "default_bass")]
    pub bass: String,
    /// Pitch class, or set of them, held under every harmony
    #[serde(default)]
    pub drone: Option<Drone>,
}

fn default_candidates_per_step() -> usize {
    DEFAULT_CANDIDATES_PER_STEP
}
fn default_initial() -> Vec<Pitch> {
    vec![0, 4, 7]
}
fn default_bass() -> String {
    "C3".to_string()
}

impl Default for HarmonyConfig {
    fn default() -> Self {
        Self {
            source: ChordSource::default(),
            candidates_per_step: default_candidates_per_step(),
            candidates: Vec::new(),
            initial: default_initial(),
            bass: default_bass(),
            drone: None,
        }
    }
}

impl HarmonyConfig {
    fn validate(&self) -> Result<HarmonySettings> {
        if self.initial.is_empty() {
            bail!("harmony.initial must name at least one pitch class");
        }
        if self.candidates.is_empty() && self.candidates_per_step == 0 {
            bail!("harmony.candidates_per_step must be at least 1");
        }
        if self.candidates_per_step > MAX_CANDIDATES_PER_STEP {
            bail!(
                "harmony.candidates_per_step must be at most {}, got {}",
                MAX_CANDIDATES_PER_STEP,
                self.candidates_per_step
            );
        }
        let fixed_candidates = self
            .candidates
            .iter()
            .map(|pcs| {
                pitch_classes_to_intervals(pcs)
                    .with_context(|| format!("Invalid harmony candidate {:?}", pcs))
            })
            .collect::<Result<Vec<_>>>()?;
        let bass = parse_pitch(&self.bass).context("Invalid harmony.bass")?;

        Ok(HarmonySettings {
            source: self.source,
            candidates_per_step: self.candidates_per_step,
            fixed_candidates,
            initial: self.initial.clone(),
            bass,
            drone: self.drone.clone(),
        })
    }
}

/// Instrument range by note name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterConfig {
    /// Lowest playable note (e.g., "G3")
    pub lowest: String,
    /// Highest playable note (e.g., "B5")
    pub highest: String,
}

impl RegisterConfig {
    pub fn new(lowest: &str, highest: &str) -> Self {
        Self {
            lowest: lowest.to_string(),
            highest: highest.to_string(),
        }
    }

    /// Every chromatic pitch from `lowest` to `highest`
    pub fn to_register(&self) -> Result<Register> {
        Ok(Register::parse_range(&self.lowest, &self.highest)?)
    }
}

/// Violin range
fn default_register() -> RegisterConfig {
    RegisterConfig::new("G3", "B5")
}

/// A named section of the piece
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentConfig {
    /// Section name (e.g., "A", "bridge")
    pub name: String,
    /// Harmony durations in beats
    pub harmonic_rhythm: Vec<f64>,
    /// Melody note durations in beats
    pub rhythm: Vec<f64>,
}

impl SegmentConfig {
    fn validate(&self) -> Result<Segment> {
        let all_positive = |durations: &[f64]| durations.iter().all(|d| d.is_finite() && *d > 0.0);
        if self.harmonic_rhythm.is_empty() || !all_positive(&self.harmonic_rhythm) {
            bail!("segment {:?}: harmonic_rhythm must be non-empty positive beats", self.name);
        }
        if !all_positive(&self.rhythm) {
            bail!("segment {:?}: rhythm durations must be positive beats", self.name);
        }
        Ok(Segment {
            name: self.name.clone(),
            harmonic_rhythm: self.harmonic_rhythm.clone(),
            rhythm: self.rhythm.clone(),
        })
    }
}

/// Eight bars of two-beat harmonies under a mixed melody rhythm
fn default_segments() -> Vec<SegmentConfig> {
    let cell = [0.5, 0.5, 1.0, 0.75, 0.25, 1.0];
    vec![SegmentConfig {
        name: "A".to_string(),
        harmonic_rhythm: vec![2.0; 16],
        rhythm: cell.iter().copied().cycle().take(cell.len() * 8).collect(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_composition() {
        let yaml = r#"
seed: 42
harmony:
  source: catalog
  candidates_per_step: 5
  bass: "D3"
melody:
  repeat_probability: 0.2
ornament:
  probability: 0.5
register:
  lowest: "E2"
  highest: "G5"
segments:
  - name: intro
    harmonic_rhythm: [4, 4]
    rhythm: [1, 1, 2, 4]
"#;
        let file = CompositionFile::from_yaml(yaml).unwrap();
        assert_eq!(file.seed, Some(42));
        assert_eq!(file.harmony.source, ChordSource::Catalog);
        assert_eq!(file.harmony.candidates_per_step, 5);
        assert_eq!(file.melody.repeat_probability, 0.2);
        assert_eq!(file.melody.short_cell, 0.5);
        assert_eq!(file.ornament.probability, 0.5);
        assert_eq!(file.segments[0].name, "intro");

        let composition = file.validate().unwrap();
        assert_eq!(composition.harmony.bass, 50);
        assert_eq!(composition.register.lowest(), 40);
        assert_eq!(composition.register.highest(), 79);
        assert_eq!(composition.segments[0].harmonic_rhythm, vec![4.0, 4.0]);
    }

    #[test]
    fn test_default_values() {
        let file = CompositionFile::from_yaml("{}").unwrap();
        assert_eq!(file, CompositionFile::default());
        assert_eq!(file.harmony.initial, vec![0, 4, 7]);
        assert_eq!(file.register, RegisterConfig::new("G3", "B5"));
        assert_eq!(file.segments.len(), 1);

        let composition = file.validate().unwrap();
        assert_eq!(composition.harmony.bass, 48);
        assert!(composition.accompaniment.is_none());
    }

    #[test]
    fn test_fixed_candidates_and_drone() {
        let yaml = r#"
harmony:
  candidates: [[0, 4, 7], [2, 5, 9]]
  drone: [0, 7]
"#;
        let composition = CompositionFile::from_yaml(yaml).unwrap().validate().unwrap();
        assert_eq!(composition.harmony.fixed_candidates.len(), 2);
        assert_eq!(composition.harmony.fixed_candidates[1].intervals(), &[3, 4, 5]);
        assert_eq!(composition.harmony.drone, Some(Drone::Set(vec![0, 7])));
    }

    #[test]
    fn test_validation_errors() {
        let bad_probability = "melody:\n  repeat_probability: 1.5\n";
        assert!(CompositionFile::from_yaml(bad_probability).unwrap().validate().is_err());

        let bad_register = "register:\n  lowest: \"B5\"\n  highest: \"G3\"\n";
        assert!(CompositionFile::from_yaml(bad_register).unwrap().validate().is_err());

        let bad_name = "harmony:\n  bass: \"H2\"\n";
        assert!(CompositionFile::from_yaml(bad_name).unwrap().validate().is_err());

        let bad_rhythm = "segments:\n  - name: A\n    harmonic_rhythm: [2, 0]\n    rhythm: [1]\n";
        assert!(CompositionFile::from_yaml(bad_rhythm).unwrap().validate().is_err());

        let bad_candidate = "harmony:\n  candidates: [[]]\n";
        assert!(CompositionFile::from_yaml(bad_candidate).unwrap().validate().is_err());
    }

    #[test]
    fn test_overflowing_note_names() {
        let bass = "harmony:\n  bass: \"C999999999\"\n";
        assert!(CompositionFile::from_yaml(bass).unwrap().validate().is_err());

        let register = "register:\n  lowest: \"G3\"\n  highest: \"B999999999\"\n";
        assert!(CompositionFile::from_yaml(register).unwrap().validate().is_err());

        let accompaniment = "accompaniment:\n  lowest: \"C-99\"\n  highest: \"G5\"\n";
        assert!(CompositionFile::from_yaml(accompaniment).unwrap().validate().is_err());
    }

    #[test]
    fn test_candidates_per_step_bounds() {
        let huge = "harmony:\n  candidates_per_step: 4611686018427387903\n";
        let error = CompositionFile::from_yaml(huge).unwrap().validate().unwrap_err();
        assert!(error.to_string().contains("candidates_per_step"));

        let mut file = CompositionFile::default();
        file.harmony.candidates_per_step = MAX_CANDIDATES_PER_STEP;
        assert!(file.validate().is_ok());
        file.harmony.candidates_per_step = MAX_CANDIDATES_PER_STEP + 1;
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_load_yaml_and_toml() {
        let dir = tempdir().unwrap();

        let yaml_path = dir.path().join("piece.yaml");
        fs::write(&yaml_path, "seed: 9\nharmony:\n  source: tree\n").unwrap();
        let file = CompositionFile::load(&yaml_path).unwrap();
        assert_eq!(file.seed, Some(9));
        assert_eq!(file.harmony.source, ChordSource::Tree);

        let toml_path = dir.path().join("piece.toml");
        fs::write(
            &toml_path,
            r#"
seed = 3

[harmony]
source = "mixed"

[[segments]]
name = "A"
harmonic_rhythm = [2.0, 2.0]
rhythm = [1.0, 1.0, 2.0]
"#,
        )
        .unwrap();
        let file = CompositionFile::load(&toml_path).unwrap();
        assert_eq!(file.seed, Some(3));
        assert_eq!(file.harmony.source, ChordSource::Mixed);
        assert_eq!(file.segments[0].rhythm, vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.yaml");
        let mut file = CompositionFile::default();
        file.seed = Some(77);
        file.accompaniment = Some(RegisterConfig::new("E2", "G5"));
        file.save(&path).unwrap();
        assert_eq!(CompositionFile::load(&path).unwrap(), file);
    }

    #[test]
    fn test_missing_file() {
        assert!(CompositionFile::load("/nonexistent/piece.yaml").is_err());
    }
}
