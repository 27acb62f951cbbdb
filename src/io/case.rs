//! Furnace case files (JSON).
//!
//! A case holds the inputs of one furnace exactly as a user entered them:
//! every dimensional value carries its display unit, and layers refer to
//! materials by name. [`FurnaceCase::resolve`] converts it to SI and snapshots
//! the material laws.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sim::config::BoundaryConditions;
use crate::sim::construction::{LayerSpec, Lining};
use crate::sim::convection::Orientation;
use crate::sim::materials::MaterialTable;
use crate::units::{Category, Quantity};

/// One lining layer as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseLayer {
    pub material: String,
    pub thickness: Quantity,
}

/// Inputs of one furnace in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnaceCase {
    pub inner_diameter: Quantity,
    pub height: Quantity,
    pub inner_temperature: Quantity,
    pub ambient_temperature: Quantity,
    pub emissivity: f64,
    #[serde(default)]
    pub orientation: Orientation,
    pub natural_velocity: Quantity,
    pub fan_flow: Quantity,
    pub fan_diameter: Quantity,
    /// Innermost first.
    pub layers: Vec<CaseLayer>,
}

/// A case converted to SI, ready for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCase {
    pub conditions: BoundaryConditions,
    pub lining: Lining,
    /// Layer materials missing from the table (default law substituted).
    pub unknown_materials: Vec<String>,
}

impl Default for FurnaceCase {
    fn default() -> Self {
        Self {
            inner_diameter: Quantity::new(1500.0, "mm"),
            height: Quantity::new(3.0, "m"),
            inner_temperature: Quantity::new(1000.0, "°C"),
            ambient_temperature: Quantity::new(25.0, "°C"),
            emissivity: 0.9,
            orientation: Orientation::Wall,
            natural_velocity: Quantity::new(0.5, "m/s"),
            fan_flow: Quantity::new(0.0, "m³/h"),
            fan_diameter: Quantity::new(500.0, "mm"),
            layers: vec![
                CaseLayer {
                    material: "Fire clay brick".to_string(),
                    thickness: Quantity::new(115.0, "mm"),
                },
                CaseLayer {
                    material: "High-alumina brick".to_string(),
                    thickness: Quantity::new(230.0, "mm"),
                },
            ],
        }
    }
}

impl FurnaceCase {
    /// Converts every field to SI and resolves layer materials against `table`.
    pub fn resolve(&self, table: &MaterialTable) -> Result<ResolvedCase> {
        let si = |q: &Quantity, category: Category, field: &str| {
            q.to_si(category)
                .with_context(|| format!("Invalid {field}: {q}"))
        };

        let conditions = BoundaryConditions {
            inner_temperature: si(
                &self.inner_temperature,
                Category::Temperature,
                "inner temperature",
            )?,
            ambient_temperature: si(
                &self.ambient_temperature,
                Category::Temperature,
                "ambient temperature",
            )?,
            emissivity: self.emissivity,
            natural_velocity: si(&self.natural_velocity, Category::Velocity, "natural velocity")?,
            fan_flow: si(&self.fan_flow, Category::VolumeFlow, "fan flow")?,
            fan_diameter: si(&self.fan_diameter, Category::Length, "fan diameter")?,
            orientation: self.orientation,
            height: si(&self.height, Category::Length, "height")?,
        };

        let mut specs = Vec::with_capacity(self.layers.len());
        let mut unknown_materials = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let field = format!("layer {} thickness", i + 1);
            let thickness = si(&layer.thickness, Category::Length, &field)?;
            let spec = LayerSpec::from_table(table, &layer.material, thickness);
            if !spec.material.known {
                unknown_materials.push(layer.material.clone());
            }
            specs.push(spec);
        }

        let bore = si(&self.inner_diameter, Category::Length, "inner diameter")?;
        let lining = Lining::build(bore, &specs)?;

        Ok(ResolvedCase {
            conditions,
            lining,
            unknown_materials,
        })
    }
}

/// Reads a case from a JSON file.
pub fn read_case(path: &Path) -> Result<FurnaceCase> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let case: FurnaceCase = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize case from: {}", path.display()))?;
    Ok(case)
}

/// Writes a case to a JSON file.
pub fn write_case(path: &Path, case: &FurnaceCase) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, case)
        .with_context(|| format!("Failed to serialize case to: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_case_resolves_to_si() -> Result<()> {
        let resolved = FurnaceCase::default().resolve(&MaterialTable::seed())?;
        let bc = &resolved.conditions;
        assert_eq!(bc.inner_temperature, 1000.0);
        assert_eq!(bc.fan_flow, 0.0);
        assert!((bc.fan_diameter - 0.5).abs() < 1e-12);
        assert!((resolved.lining.inner_radius() - 0.75).abs() < 1e-12);
        assert!((resolved.lining.outer_radius() - 1.095).abs() < 1e-12);
        assert!(resolved.unknown_materials.is_empty());
        assert_eq!(resolved.lining.layers()[1].material.coefficients(), (2.0, 0.0005));
        Ok(())
    }

    #[test]
    fn test_display_units_are_converted() -> Result<()> {
        let mut case = FurnaceCase::default();
        case.inner_temperature = Quantity::new(1832.0, "°F");
        case.fan_flow = Quantity::new(7200.0, "m³/h");
        case.layers[0].thickness = Quantity::new(4.5, "in");
        let resolved = case.resolve(&MaterialTable::seed())?;
        assert!((resolved.conditions.inner_temperature - 1000.0).abs() < 1e-9);
        assert!((resolved.conditions.fan_flow - 2.0).abs() < 1e-12);
        assert!((resolved.lining.layers()[0].thickness - 0.1143).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_unknown_material_is_reported() -> Result<()> {
        let mut case = FurnaceCase::default();
        case.layers[1].material = "Mystery wool".to_string();
        let resolved = case.resolve(&MaterialTable::seed())?;
        assert_eq!(resolved.unknown_materials, vec!["Mystery wool".to_string()]);
        assert_eq!(resolved.lining.layers()[1].material.coefficients(), (1.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_bad_unit_is_rejected() {
        let mut case = FurnaceCase::default();
        case.height = Quantity::new(3.0, "yd");
        let err = case.resolve(&MaterialTable::seed()).unwrap_err();
        assert!(err.to_string().contains("height"), "got {err}");
    }

    #[test]
    fn test_empty_lining_is_rejected() {
        let mut case = FurnaceCase::default();
        case.layers.clear();
        assert!(case.resolve(&MaterialTable::seed()).is_err());
    }

    #[test]
    fn test_write_and_read_case() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("case.json");
        let mut original = FurnaceCase::default();
        original.orientation = Orientation::Roof;
        write_case(&path, &original)?;
        let loaded = read_case(&path)?;
        assert_eq!(loaded, original);
        Ok(())
    }

    #[test]
    fn test_orientation_defaults_to_wall() -> Result<()> {
        let mut json = serde_json::to_value(FurnaceCase::default())?;
        if let Some(fields) = json.as_object_mut() {
            fields.remove("orientation");
        }
        let case: FurnaceCase = serde_json::from_value(json)?;
        assert_eq!(case.orientation, Orientation::Wall);
        Ok(())
    }

    #[test]
    fn test_read_nonexistent_file() {
        assert!(read_case(Path::new("/nonexistent/path/case.json")).is_err());
    }
}
