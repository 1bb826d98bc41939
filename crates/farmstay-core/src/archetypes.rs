//! Archetype registry — behavior weights, animation fallback chains, and
//! custom-state task factories per character kind.
//!
//! Custom states are a capability, not a subclass: the behavior loop hands
//! an unrecognized state name to the archetype's factory function and runs
//! whatever task comes back.

use std::collections::HashMap;

use farmstay_logic::animation::FallbackChain;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{BehaviorTable, BehaviorTask};
use crate::config::SimConfig;

/// Builds the task for one archetype-specific state name, or `None` when
/// the archetype doesn't know the name.
pub type CustomTaskFn = fn(&str, &mut StdRng, &SimConfig) -> Option<BehaviorTask>;

/// Everything one character kind needs: weights, fallbacks, custom states.
pub struct ArchetypeSpec {
    pub name: String,
    pub table: Vec<(String, f32)>,
    /// State barred from consecutive draws, if any.
    pub special: Option<String>,
    pub fallbacks: FallbackChain,
    pub custom: Option<CustomTaskFn>,
}

impl ArchetypeSpec {
    /// Fresh per-actor behavior table from this spec.
    pub fn behavior_table(&self) -> BehaviorTable {
        BehaviorTable::new(self.table.clone(), self.special.clone())
    }
}

/// Name → spec registry shared by the whole simulation.
pub struct ArchetypeLibrary {
    specs: HashMap<String, ArchetypeSpec>,
}

/// One archetype as it appears in `data/archetypes.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeManifestEntry {
    pub name: String,
    pub states: Vec<(String, f32)>,
    #[serde(default)]
    pub special: Option<String>,
    #[serde(default)]
    pub fallbacks: Vec<(String, String)>,
}

impl ArchetypeLibrary {
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// The four stock archetypes.
    pub fn builtin() -> Self {
        let mut library = Self::empty();

        library.insert(ArchetypeSpec {
            name: "farmer".into(),
            table: weighted(&[
                ("idle", 3.0),
                ("walk", 4.0),
                ("run", 1.0),
                ("jump", 0.5),
                ("tend_field", 2.0),
                ("water_crops", 1.0),
            ]),
            special: None,
            fallbacks: FallbackChain::from_pairs(&[
                ("run", "walk"),
                ("walk", "idle"),
                ("water_crops", "tend_field"),
                ("tend_field", "idle"),
            ]),
            custom: Some(farmer_custom),
        });

        library.insert(ArchetypeSpec {
            name: "porter".into(),
            table: weighted(&[
                ("idle", 2.0),
                ("walk", 4.0),
                ("run", 2.0),
                ("jump", 0.5),
                ("visit_lobby", 2.0),
                ("carry_luggage", 1.0),
            ]),
            special: Some("visit_lobby".into()),
            fallbacks: FallbackChain::from_pairs(&[
                ("run", "walk"),
                ("walk", "idle"),
                ("visit_lobby", "walk"),
                ("carry_luggage", "walk"),
            ]),
            custom: Some(porter_custom),
        });

        library.insert(ArchetypeSpec {
            name: "pet".into(),
            table: weighted(&[
                ("idle", 4.0),
                ("walk", 3.0),
                ("run", 3.0),
                ("jump", 2.0),
                ("nap", 2.0),
            ]),
            special: None,
            fallbacks: FallbackChain::from_pairs(&[
                ("run", "walk"),
                ("walk", "idle"),
                ("nap", "idle"),
            ]),
            custom: Some(pet_custom),
        });

        library.insert(ArchetypeSpec {
            name: "shopkeeper".into(),
            table: weighted(&[
                ("idle", 5.0),
                ("walk", 2.0),
                ("jump", 0.5),
                ("restock", 2.0),
            ]),
            special: None,
            fallbacks: FallbackChain::from_pairs(&[("walk", "idle"), ("restock", "idle")]),
            custom: Some(shopkeeper_custom),
        });

        library
    }

    /// Build a library from the archetype manifest JSON. Custom-state
    /// factories attach by archetype name; unknown names get none.
    pub fn from_manifest_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<ArchetypeManifestEntry> = serde_json::from_str(json)?;
        let mut library = Self::empty();
        for entry in entries {
            let pairs: Vec<(&str, &str)> = entry
                .fallbacks
                .iter()
                .map(|(from, to)| (from.as_str(), to.as_str()))
                .collect();
            library.insert(ArchetypeSpec {
                custom: custom_handler_for(&entry.name),
                fallbacks: FallbackChain::from_pairs(&pairs),
                name: entry.name,
                table: entry.states,
                special: entry.special,
            });
        }
        Ok(library)
    }

    pub fn insert(&mut self, spec: ArchetypeSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&ArchetypeSpec> {
        self.specs.get(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }
}

fn weighted(entries: &[(&str, f32)]) -> Vec<(String, f32)> {
    entries
        .iter()
        .map(|(name, weight)| ((*name).to_string(), *weight))
        .collect()
}

fn custom_handler_for(archetype: &str) -> Option<CustomTaskFn> {
    match archetype {
        "farmer" => Some(farmer_custom),
        "porter" => Some(porter_custom),
        "pet" => Some(pet_custom),
        "shopkeeper" => Some(shopkeeper_custom),
        _ => None,
    }
}

fn timed(name: &str, rng: &mut StdRng, low: f32, high: f32) -> Option<BehaviorTask> {
    Some(BehaviorTask::Custom {
        name: name.to_string(),
        remaining: rng.gen_range(low..high),
    })
}

fn farmer_custom(name: &str, rng: &mut StdRng, _config: &SimConfig) -> Option<BehaviorTask> {
    match name {
        "tend_field" => timed(name, rng, 2.0, 5.0),
        "water_crops" => timed(name, rng, 1.5, 3.0),
        _ => None,
    }
}

fn porter_custom(name: &str, rng: &mut StdRng, _config: &SimConfig) -> Option<BehaviorTask> {
    match name {
        "visit_lobby" => timed(name, rng, 1.5, 3.0),
        "carry_luggage" => timed(name, rng, 2.0, 4.0),
        _ => None,
    }
}

fn pet_custom(name: &str, rng: &mut StdRng, _config: &SimConfig) -> Option<BehaviorTask> {
    match name {
        "nap" => timed(name, rng, 4.0, 8.0),
        _ => None,
    }
}

fn shopkeeper_custom(name: &str, rng: &mut StdRng, _config: &SimConfig) -> Option<BehaviorTask> {
    match name {
        "restock" => timed(name, rng, 2.0, 4.0),
        _ => None,
    }
}
