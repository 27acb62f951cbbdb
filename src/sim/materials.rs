use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Coefficients returned for a name that is not in the table: `λ(t) = 1.0`.
pub const DEFAULT_LAW: (f64, f64) = (1.0, 0.0);

/// Errors raised when editing the material table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("material name must not be empty")]
    InvalidName,

    #[error("material '{name}' has non-finite coefficients")]
    NonFinite { name: String },

    #[error("material '{name}' not found")]
    NotFound { name: String },

    #[error("material '{name}' already exists")]
    NameCollision { name: String },
}

/// Linear thermal conductivity law `λ(t) = a + b·t`, with `t` in °C and `λ` in W/(m·K).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLaw {
    pub name: String,
    pub a: f64,
    pub b: f64,
}

impl MaterialLaw {
    pub fn new(name: &str, a: f64, b: f64) -> Self {
        Self {
            name: name.to_string(),
            a,
            b,
        }
    }

    /// Conductivity at temperature `t` (°C), unclamped.
    pub fn conductivity_at(&self, t: f64) -> f64 {
        self.a + self.b * t
    }

    pub fn coefficients(&self) -> (f64, f64) {
        (self.a, self.b)
    }
}

impl fmt::Display for MaterialLaw {
    /// Formats the law the way it is previewed next to a layer: `λ = 0.800 + 0.00020t`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.b >= 0.0 { '+' } else { '-' };
        write!(f, "λ = {:.3} {} {:.5}t", self.a, sign, self.b.abs())
    }
}

/// Immutable snapshot of a material lookup.
///
/// Layers keep this snapshot instead of a reference into the table, so later
/// edits (rename, delete, coefficient changes) do not affect an already
/// configured lining until it is resolved again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMaterial {
    pub law: MaterialLaw,
    /// False when the name was missing and [`DEFAULT_LAW`] was substituted.
    pub known: bool,
}

/// External tabular store for the material table.
pub trait MaterialStore {
    fn load(&self) -> anyhow::Result<Vec<MaterialLaw>>;
    fn save(&self, materials: &[MaterialLaw]) -> anyhow::Result<()>;
}

/// Named conductivity laws, unique by name, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    materials: Vec<MaterialLaw>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// Built-in refractory and insulation laws used when no store is available.
    pub fn seed() -> Self {
        let materials = vec![
            MaterialLaw::new("Fire clay brick", 0.8, 0.0002),
            MaterialLaw::new("High-alumina brick", 2.0, 0.0005),
            MaterialLaw::new("Insulating brick", 0.15, 0.0001),
            MaterialLaw::new("Aluminosilicate fibre", 0.05, 0.00015),
            MaterialLaw::new("Carbon steel shell", 45.0, -0.02),
            MaterialLaw::new("Air gap", 0.03, 0.00005),
        ];
        Self { materials }
    }

    /// Builds a table from a list, later duplicates replacing earlier ones.
    pub fn from_laws(laws: Vec<MaterialLaw>) -> Self {
        let mut table = Self::new();
        for law in laws {
            if table.upsert(&law.name, law.a, law.b).is_err() {
                warn!(name = %law.name, "skipping invalid material entry");
            }
        }
        table
    }

    /// Loads the table from a store, falling back to [`MaterialTable::seed`]
    /// when the store fails or holds no usable entries.
    pub fn load_or_seed(store: &dyn MaterialStore) -> Self {
        match store.load() {
            Ok(laws) if !laws.is_empty() => Self::from_laws(laws),
            Ok(_) => {
                warn!("material store is empty, using built-in materials");
                Self::seed()
            }
            Err(err) => {
                warn!(error = %err, "failed to load material store, using built-in materials");
                Self::seed()
            }
        }
    }

    /// Saves the table to a store. Failure is logged and reported as `false`;
    /// the in-memory table is kept either way.
    pub fn save_to(&self, store: &dyn MaterialStore) -> bool {
        match store.save(&self.materials) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to save material store, keeping values in memory");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialLaw> {
        self.materials.iter()
    }

    pub fn lookup(&self, name: &str) -> Option<&MaterialLaw> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Returns `(a, b)` for `name`, or [`DEFAULT_LAW`] when absent.
    ///
    /// A miss is not an error here; use [`MaterialTable::resolve`] to find out
    /// whether the default was substituted.
    pub fn get(&self, name: &str) -> (f64, f64) {
        self.lookup(name)
            .map(MaterialLaw::coefficients)
            .unwrap_or(DEFAULT_LAW)
    }

    /// Snapshots the law for `name`, substituting the default law on a miss.
    pub fn resolve(&self, name: &str) -> ResolvedMaterial {
        match self.lookup(name) {
            Some(law) => ResolvedMaterial {
                law: law.clone(),
                known: true,
            },
            None => {
                warn!(material = name, "unknown material, using default conductivity law");
                ResolvedMaterial {
                    law: MaterialLaw::new(name, DEFAULT_LAW.0, DEFAULT_LAW.1),
                    known: false,
                }
            }
        }
    }

    /// Inserts a new law or replaces the coefficients of an existing one.
    pub fn upsert(&mut self, name: &str, a: f64, b: f64) -> Result<(), MaterialError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MaterialError::InvalidName);
        }
        if !a.is_finite() || !b.is_finite() {
            return Err(MaterialError::NonFinite {
                name: name.to_string(),
            });
        }
        match self.materials.iter_mut().find(|m| m.name == name) {
            Some(existing) => {
                existing.a = a;
                existing.b = b;
            }
            None => self.materials.push(MaterialLaw::new(name, a, b)),
        }
        Ok(())
    }

    /// Removes `name`. No-op when absent; returns whether an entry was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.materials.len();
        self.materials.retain(|m| m.name != name);
        self.materials.len() != before
    }

    /// Renames `old` to `new` and sets its coefficients.
    ///
    /// Renaming onto the name of another existing entry is rejected instead of
    /// silently overwriting that entry. The renamed law keeps its position.
    pub fn rename(&mut self, old: &str, new: &str, a: f64, b: f64) -> Result<(), MaterialError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(MaterialError::InvalidName);
        }
        if !a.is_finite() || !b.is_finite() {
            return Err(MaterialError::NonFinite {
                name: new.to_string(),
            });
        }
        if new != old && self.lookup(new).is_some() {
            return Err(MaterialError::NameCollision {
                name: new.to_string(),
            });
        }
        let entry = self
            .materials
            .iter_mut()
            .find(|m| m.name == old)
            .ok_or_else(|| MaterialError::NotFound {
                name: old.to_string(),
            })?;
        entry.name = new.to_string();
        entry.a = a;
        entry.b = b;
        Ok(())
    }
}
