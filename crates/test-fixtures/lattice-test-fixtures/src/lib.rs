//! Shared JSON fixtures for tests and benches.
//!
//! Fixtures live under `<repo>/fixtures` and are indexed by `manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    properties: HashMap<String, String>,
    #[serde(rename = "particle-systems")]
    particle_systems: HashMap<String, ParticleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParticleEntry {
    Path(String),
    Detailed { path: String, fps: f32 },
}

impl ParticleEntry {
    fn as_path(&self) -> &str {
        match self {
            ParticleEntry::Path(path) => path,
            ParticleEntry::Detailed { path, .. } => path,
        }
    }

    fn fps(&self) -> Option<f32> {
        match self {
            ParticleEntry::Path(_) => None,
            ParticleEntry::Detailed { fps, .. } => Some(*fps),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Animatable property documents (`AnimatableProperty` JSON).
pub mod properties {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.properties.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.properties, "property", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.properties, "property", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.properties, "property", name)?;
        Ok(resolve_path(rel))
    }
}

/// Particle system configurations (`ParticleSystemConfig` JSON).
pub mod particle_systems {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.particle_systems.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.particle_systems, "particle system", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.particle_systems, "particle system", name)?;
        super::load_json(entry.as_path())
    }

    /// Composition frame rate recorded alongside the fixture, if any.
    pub fn fps(name: &str) -> Result<Option<f32>> {
        let entry = lookup(&MANIFEST.particle_systems, "particle system", name)?;
        Ok(entry.fps())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.particle_systems, "particle system", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
