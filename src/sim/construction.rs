use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::error::SolveError;
use super::materials::{MaterialLaw, MaterialTable, ResolvedMaterial};

/// One cylindrical shell of the lining, innermost first.
///
/// Radii are derived from the bore diameter and the thicknesses of all inner
/// layers; they are never set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Snapshot of the conductivity law taken when the lining was built.
    pub material: MaterialLaw,
    /// Thickness in meters.
    pub thickness: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Layer {
    /// `ln(r_o / r_i)`, the geometric factor of cylindrical conduction.
    pub fn log_radius_ratio(&self) -> f64 {
        (self.outer_radius / self.inner_radius).ln()
    }

    /// Temperature drop across the layer for a linear heat rate `q_l` [W/m]
    /// at constant conductivity `lambda`.
    pub fn temperature_drop(&self, q_l: f64, lambda: f64) -> f64 {
        q_l * self.log_radius_ratio() / (2.0 * PI * lambda)
    }
}

/// Layer as configured: resolved material plus thickness in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub material: ResolvedMaterial,
    pub thickness: f64,
}

impl LayerSpec {
    pub fn new(material: ResolvedMaterial, thickness: f64) -> Self {
        Self {
            material,
            thickness,
        }
    }

    /// Resolves `name` against the table now; later table edits are not seen.
    pub fn from_table(table: &MaterialTable, name: &str, thickness: f64) -> Self {
        Self::new(table.resolve(name), thickness)
    }

    /// Layer with an explicit law, bypassing the table.
    pub fn with_law(name: &str, a: f64, b: f64, thickness: f64) -> Self {
        Self::new(
            ResolvedMaterial {
                law: MaterialLaw::new(name, a, b),
                known: true,
            },
            thickness,
        )
    }
}

/// Ordered stack of cylindrical layers around a furnace bore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lining {
    /// Bore (inner) diameter in meters.
    pub bore_diameter: f64,
    layers: Vec<Layer>,
}

impl Lining {
    /// Derives layer radii from the bore diameter, innermost layer first.
    ///
    /// Rejects an empty stack, a non-positive bore and any non-positive or
    /// non-finite thickness.
    pub fn build(bore_diameter: f64, specs: &[LayerSpec]) -> Result<Self, SolveError> {
        if !(bore_diameter.is_finite() && bore_diameter > 0.0) {
            return Err(SolveError::invalid(
                "bore_diameter",
                format!("must be positive and finite, got {bore_diameter}"),
            ));
        }
        if specs.is_empty() {
            return Err(SolveError::invalid("layers", "at least one layer is required"));
        }

        let mut radius = bore_diameter / 2.0;
        let mut layers = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if !(spec.thickness.is_finite() && spec.thickness > 0.0) {
                return Err(SolveError::invalid(
                    format!("layers[{i}].thickness"),
                    format!("must be positive and finite, got {}", spec.thickness),
                ));
            }
            let law = &spec.material.law;
            if !(law.a.is_finite() && law.b.is_finite()) {
                return Err(SolveError::invalid(
                    format!("layers[{i}].material"),
                    format!("'{}' has non-finite coefficients", law.name),
                ));
            }
            let outer = radius + spec.thickness;
            layers.push(Layer {
                material: law.clone(),
                thickness: spec.thickness,
                inner_radius: radius,
                outer_radius: outer,
            });
            radius = outer;
        }

        Ok(Self {
            bore_diameter,
            layers,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn inner_radius(&self) -> f64 {
        self.bore_diameter / 2.0
    }

    pub fn outer_radius(&self) -> f64 {
        self.layers
            .last()
            .map(|l| l.outer_radius)
            .unwrap_or_else(|| self.inner_radius())
    }

    pub fn total_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }

    /// Outer lateral area `2π·r_out·H` [m²].
    pub fn outer_area(&self, height: f64) -> f64 {
        2.0 * PI * self.outer_radius() * height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layers() -> Vec<LayerSpec> {
        vec![
            LayerSpec::with_law("Fire clay brick", 0.8, 0.0002, 0.115),
            LayerSpec::with_law("High-alumina brick", 2.0, 0.0005, 0.230),
        ]
    }

    #[test]
    fn test_radii_are_chained() {
        let lining = Lining::build(1.5, &two_layers()).unwrap();
        let layers = lining.layers();
        assert_eq!(layers.len(), 2);
        assert!((layers[0].inner_radius - 0.75).abs() < 1e-12);
        assert!((layers[0].outer_radius - 0.865).abs() < 1e-12);
        assert_eq!(layers[1].inner_radius, layers[0].outer_radius);
        assert!((lining.outer_radius() - 1.095).abs() < 1e-12);
        assert!((lining.total_thickness() - 0.345).abs() < 1e-12);
    }

    #[test]
    fn test_outer_area() {
        let lining = Lining::build(1.5, &two_layers()).unwrap();
        let area = lining.outer_area(3.0);
        assert!((area - 2.0 * PI * 1.095 * 3.0).abs() < 1e-9, "got {area}");
    }

    #[test]
    fn test_temperature_drop_closed_form() {
        let lining = Lining::build(1.5, &two_layers()).unwrap();
        let layer = &lining.layers()[0];
        let drop = layer.temperature_drop(1000.0, 0.8);
        let expected = 1000.0 * (0.865_f64 / 0.75).ln() / (2.0 * PI * 0.8);
        assert!((drop - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_empty_stack() {
        let err = Lining::build(1.5, &[]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidInput { ref field, .. } if field == "layers"));
    }

    #[test]
    fn test_rejects_non_positive_thickness() {
        let mut specs = two_layers();
        specs[1].thickness = 0.0;
        match Lining::build(1.5, &specs).unwrap_err() {
            SolveError::InvalidInput { field, .. } => assert_eq!(field, "layers[1].thickness"),
            other => panic!("unexpected {other:?}"),
        }
        specs[1].thickness = -0.1;
        assert!(Lining::build(1.5, &specs).is_err());
    }

    #[test]
    fn test_rejects_bad_bore() {
        assert!(Lining::build(0.0, &two_layers()).is_err());
        assert!(Lining::build(f64::NAN, &two_layers()).is_err());
    }

    #[test]
    fn test_layer_keeps_snapshot_after_table_edit() {
        let mut table = MaterialTable::seed();
        let spec = LayerSpec::from_table(&table, "Fire clay brick", 0.1);
        table.upsert("Fire clay brick", 5.0, 0.0).unwrap();
        table.delete("Fire clay brick");
        let lining = Lining::build(1.0, &[spec]).unwrap();
        assert_eq!(lining.layers()[0].material.coefficients(), (0.8, 0.0002));
    }
}
