use serde::{Deserialize, Serialize};

use super::convection::Orientation;
use super::error::SolveError;
use super::root_finding::{Bisection, FixedPoint};

/// Boundary conditions of one furnace, in SI units (temperatures in °C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    /// Hot-face temperature t0 [°C].
    pub inner_temperature: f64,
    /// Ambient air temperature ta [°C].
    pub ambient_temperature: f64,
    /// Shell emissivity, in (0, 1].
    pub emissivity: f64,
    /// Natural air velocity around the shell [m/s].
    pub natural_velocity: f64,
    /// Forced-draft volumetric flow [m³/s]. Zero disables the fan.
    pub fan_flow: f64,
    /// Fan duct diameter [m].
    pub fan_diameter: f64,
    pub orientation: Orientation,
    /// Furnace height H [m].
    pub height: f64,
}

impl BoundaryConditions {
    /// Checks every field except the temperature bracket, which the solver
    /// reports separately.
    pub fn validate(&self) -> Result<(), SolveError> {
        let finite = [
            ("inner_temperature", self.inner_temperature),
            ("ambient_temperature", self.ambient_temperature),
            ("emissivity", self.emissivity),
            ("natural_velocity", self.natural_velocity),
            ("fan_flow", self.fan_flow),
            ("fan_diameter", self.fan_diameter),
            ("height", self.height),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(SolveError::invalid(
                    field,
                    format!("not a finite number: {value}"),
                ));
            }
        }
        if !(self.emissivity > 0.0 && self.emissivity <= 1.0) {
            return Err(SolveError::invalid(
                "emissivity",
                format!("must lie in (0, 1], got {}", self.emissivity),
            ));
        }
        if self.height <= 0.0 {
            return Err(SolveError::invalid(
                "height",
                format!("must be positive, got {}", self.height),
            ));
        }
        for (field, value) in [
            ("natural_velocity", self.natural_velocity),
            ("fan_flow", self.fan_flow),
            ("fan_diameter", self.fan_diameter),
        ] {
            if value < 0.0 {
                return Err(SolveError::invalid(
                    field,
                    format!("must not be negative, got {value}"),
                ));
            }
        }
        if self.inner_temperature <= -273.15 || self.ambient_temperature <= -273.15 {
            return Err(SolveError::invalid("temperature", "below absolute zero"));
        }
        Ok(())
    }
}

/// Numerical settings of the lining solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Outer loop on the surface temperature.
    pub surface: Bisection,
    /// Per-layer loop on the inner-face temperature.
    pub layer: FixedPoint,
    /// Initial guess of a layer's temperature rise over its outer face [K].
    pub layer_seed_offset: f64,
    /// Conductivity floor [W/(m·K)].
    pub min_conductivity: f64,
    /// Lower clamp of the surface-to-air difference [K].
    pub min_delta_t: f64,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self {
            surface: Bisection::new(60, 0.05),
            layer: FixedPoint::new(5, 0.1),
            layer_seed_offset: 10.0,
            min_conductivity: 0.01,
            min_delta_t: 1e-3,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions() -> BoundaryConditions {
        BoundaryConditions {
            inner_temperature: 1000.0,
            ambient_temperature: 25.0,
            emissivity: 0.9,
            natural_velocity: 0.5,
            fan_flow: 0.0,
            fan_diameter: 0.5,
            orientation: Orientation::Wall,
            height: 3.0,
        }
    }

    #[test]
    fn test_valid_conditions() {
        assert!(conditions().validate().is_ok());
    }

    #[test]
    fn test_emissivity_domain() {
        let mut bc = conditions();
        bc.emissivity = 1.0;
        assert!(bc.validate().is_ok());
        for bad in [0.0, -0.2, 1.01] {
            bc.emissivity = bad;
            let err = bc.validate().unwrap_err();
            assert!(
                matches!(err, SolveError::InvalidInput { ref field, .. } if field == "emissivity"),
                "emissivity {bad} accepted"
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_and_negative() {
        let mut bc = conditions();
        bc.natural_velocity = f64::NAN;
        assert!(bc.validate().is_err());
        let mut bc = conditions();
        bc.fan_flow = -1.0;
        assert!(bc.validate().is_err());
        let mut bc = conditions();
        bc.height = 0.0;
        assert!(bc.validate().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.surface.max_iterations, 60);
        assert_eq!(config.surface.tolerance, 0.05);
        assert_eq!(config.layer.max_iterations, 5);
        assert_eq!(config.layer.tolerance, 0.1);
        assert_eq!(config.min_conductivity, 0.01);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = SolverConfig::new();
        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
