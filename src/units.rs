//! Conversion between display units and the SI base units used by the solver.
//!
//! Every category except temperature is a pure scale: `si = value * factor`.
//! Temperature is affine and its reference unit is °C, not kelvin, because all
//! material laws and boundary conditions are expressed in °C.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by unit conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("unknown unit category: {0}")]
    UnknownCategory(String),

    #[error("unknown unit '{unit}' for category {category}")]
    UnknownUnit { unit: String, category: Category },

    #[error("value is not a finite number: {value}")]
    NonFinite { value: f64 },
}

/// Physical quantity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Length,
    Temperature,
    Power,
    HeatFlux,
    Conductivity,
    FilmCoefficient,
    Velocity,
    Area,
    VolumeFlow,
}

const LENGTH: &[(&str, f64)] = &[("mm", 0.001), ("m", 1.0), ("cm", 0.01), ("in", 0.0254)];
const TEMPERATURE: &[&str] = &["°C", "K", "°F"];
const POWER: &[(&str, f64)] = &[
    ("W", 1.0),
    ("kW", 1000.0),
    ("kcal/h", 1.16222),
    ("MJ/h", 277.778),
];
const HEAT_FLUX: &[(&str, f64)] = &[
    ("W/m²", 1.0),
    ("kW/m²", 1000.0),
    ("kcal/(m²·h)", 1.16222),
];
const CONDUCTIVITY: &[(&str, f64)] = &[("W/(m·K)", 1.0), ("kcal/(m·h·°C)", 1.16222)];
const FILM_COEFFICIENT: &[(&str, f64)] = &[("W/(m²·K)", 1.0), ("kcal/(m²·h·°C)", 1.16222)];
const VELOCITY: &[(&str, f64)] = &[("m/s", 1.0), ("km/h", 0.27778), ("ft/min", 0.00508)];
const AREA: &[(&str, f64)] = &[("m²", 1.0), ("cm²", 0.0001), ("ft²", 0.0929)];
const VOLUME_FLOW: &[(&str, f64)] = &[("m³/s", 1.0), ("m³/h", 1.0 / 3600.0)];

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Length,
        Category::Temperature,
        Category::Power,
        Category::HeatFlux,
        Category::Conductivity,
        Category::FilmCoefficient,
        Category::Velocity,
        Category::Area,
        Category::VolumeFlow,
    ];

    /// Scale table for linear categories. `None` for temperature.
    fn factors(self) -> Option<&'static [(&'static str, f64)]> {
        match self {
            Category::Length => Some(LENGTH),
            Category::Temperature => None,
            Category::Power => Some(POWER),
            Category::HeatFlux => Some(HEAT_FLUX),
            Category::Conductivity => Some(CONDUCTIVITY),
            Category::FilmCoefficient => Some(FILM_COEFFICIENT),
            Category::Velocity => Some(VELOCITY),
            Category::Area => Some(AREA),
            Category::VolumeFlow => Some(VOLUME_FLOW),
        }
    }

    /// The SI (reference) unit of this category.
    pub fn si_unit(self) -> &'static str {
        match self.factors() {
            Some(table) => table
                .iter()
                .find(|(_, f)| *f == 1.0)
                .map(|(u, _)| *u)
                .unwrap_or(""),
            None => "°C",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Length => "Length",
            Category::Temperature => "Temperature",
            Category::Power => "Power",
            Category::HeatFlux => "HeatFlux",
            Category::Conductivity => "Conductivity",
            Category::FilmCoefficient => "FilmCoefficient",
            Category::Velocity => "Velocity",
            Category::Area => "Area",
            Category::VolumeFlow => "VolumeFlow",
        };
        f.write_str(s)
    }
}

impl FromStr for Category {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Category::Length),
            "temp" | "temperature" => Ok(Category::Temperature),
            "power" => Ok(Category::Power),
            "flux" | "heatflux" => Ok(Category::HeatFlux),
            "conductivity" => Ok(Category::Conductivity),
            "coeff" | "filmcoefficient" => Ok(Category::FilmCoefficient),
            "velocity" => Ok(Category::Velocity),
            "area" => Ok(Category::Area),
            "flow" | "volumeflow" => Ok(Category::VolumeFlow),
            _ => Err(UnitError::UnknownCategory(s.to_string())),
        }
    }
}

/// Unit keys accepted for a category, in display order.
pub fn units(category: Category) -> Vec<&'static str> {
    match category.factors() {
        Some(table) => table.iter().map(|(u, _)| *u).collect(),
        None => TEMPERATURE.to_vec(),
    }
}

fn check_finite(value: f64) -> Result<(), UnitError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(UnitError::NonFinite { value })
    }
}

fn unknown(unit: &str, category: Category) -> UnitError {
    UnitError::UnknownUnit {
        unit: unit.to_string(),
        category,
    }
}

fn factor(unit: &str, category: Category) -> Result<f64, UnitError> {
    category
        .factors()
        .and_then(|table| table.iter().find(|(u, _)| *u == unit))
        .map(|(_, f)| *f)
        .ok_or_else(|| unknown(unit, category))
}

/// Converts a display value to SI (°C for temperature).
pub fn to_si(value: f64, unit: &str, category: Category) -> Result<f64, UnitError> {
    check_finite(value)?;
    if category == Category::Temperature {
        return match unit {
            "°C" => Ok(value),
            "K" => Ok(value - 273.15),
            "°F" => Ok((value - 32.0) * 5.0 / 9.0),
            _ => Err(unknown(unit, category)),
        };
    }
    Ok(value * factor(unit, category)?)
}

/// Converts an SI value (°C for temperature) to a display unit.
pub fn from_si(value: f64, unit: &str, category: Category) -> Result<f64, UnitError> {
    check_finite(value)?;
    if category == Category::Temperature {
        return match unit {
            "°C" => Ok(value),
            "K" => Ok(value + 273.15),
            "°F" => Ok(value * 9.0 / 5.0 + 32.0),
            _ => Err(unknown(unit, category)),
        };
    }
    Ok(value / factor(unit, category)?)
}

/// Re-expresses a display value in another unit of the same category.
pub fn convert(value: f64, from: &str, to: &str, category: Category) -> Result<f64, UnitError> {
    from_si(to_si(value, from, category)?, to, category)
}

/// A display value together with its unit key, as entered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }

    pub fn to_si(&self, category: Category) -> Result<f64, UnitError> {
        to_si(self.value, &self.unit, category)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
