// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Catalog-weighted chords, optionally held over a drone.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::ChordCatalog;
use super::chord_type::ChordType;
use crate::error::Result;
use crate::music::pitch::{pitch_class, Pitch};
use crate::random::WeightedTable;

/// A sustained pitch class, or a set of them, every chord must contain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Drone {
    Pitch(Pitch),
    Set(Vec<Pitch>),
}

impl Drone {
    /// The drone reduced to pitch classes
    pub fn normalized(&self) -> Drone {
        match self {
            Drone::Pitch(p) => Drone::Pitch(pitch_class(*p)),
            Drone::Set(pitches) => {
                let mut classes: Vec<Pitch> = pitches.iter().map(|&p| pitch_class(p)).collect();
                classes.sort_unstable();
                classes.dedup();
                Drone::Set(classes)
            }
        }
    }

    /// True if `chord` contains every drone pitch class
    pub fn fits(&self, chord: &[Pitch]) -> bool {
        let contains = |pc: Pitch| chord.iter().any(|&p| pitch_class(p) == pitch_class(pc));
        match self {
            Drone::Pitch(p) => contains(*p),
            Drone::Set(pitches) => pitches.iter().all(|&p| contains(p)),
        }
    }
}

/// Chooses consonance-weighted chords, freely or over a drone
#[derive(Debug, Clone)]
pub struct DroneHarmony {
    chord_types: WeightedTable<ChordType>,
    drone_chords: HashMap<Drone, WeightedTable<Vec<Pitch>>>,
}

impl DroneHarmony {
    /// Prepare chord tables for each drone. A set drone also prepares a
    /// table for each of its members.
    pub fn new(catalog: &ChordCatalog, drones: &[Drone]) -> Result<Self> {
        let chord_types = catalog.weighted(false)?;

        let mut drone_chords = HashMap::new();
        for drone in drones {
            let drone = drone.normalized();
            if let Drone::Set(members) = &drone {
                for &member in members {
                    let single = Drone::Pitch(member);
                    if !drone_chords.contains_key(&single) {
                        let table = Self::table_for(&chord_types, &single)?;
                        drone_chords.insert(single, table);
                    }
                }
            }
            if !drone_chords.contains_key(&drone) {
                let table = Self::table_for(&chord_types, &drone)?;
                drone_chords.insert(drone, table);
            }
        }

        Ok(Self {
            chord_types,
            drone_chords,
        })
    }

    /// Every voicing of every weighted chord type containing the drone,
    /// carrying its chord type's weight
    fn table_for(
        chord_types: &WeightedTable<ChordType>,
        drone: &Drone,
    ) -> Result<WeightedTable<Vec<Pitch>>> {
        let mut chords = Vec::new();
        let mut weights = Vec::new();
        for (chord_type, weight) in chord_types.iter() {
            for chord in chord_type.build_on_all_roots() {
                if drone.fits(&chord) {
                    chords.push(chord);
                    weights.push(weight);
                }
            }
        }
        WeightedTable::new(chords, weights)
    }

    /// A weighted chord type on a uniformly random root
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Pitch> {
        let chord_type = self.chord_types.choose(rng);
        let root = rng.gen_range(0..12);
        chord_type.build_on_root(root)
    }

    /// A weighted chord containing the drone
    pub fn choose_over<R: Rng + ?Sized>(&self, drone: &Drone, rng: &mut R) -> Result<Vec<Pitch>> {
        let drone = drone.normalized();
        match self.drone_chords.get(&drone) {
            Some(table) => Ok(table.choose(rng).clone()),
            None => Ok(Self::table_for(&self.chord_types, &drone)?.choose(rng).clone()),
        }
    }
}
