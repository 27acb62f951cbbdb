//! Outer shell heat transfer: natural convection augmented by air movement,
//! plus linearized long-wave radiation to ambient.
//!
//! The natural-convection correlation is `h_nat = C_pos · Δt^0.25`, where
//! `C_pos` depends on how the shell faces the air (vertical wall, roof facing
//! up, floor facing down). Wind and forced draft scale it by the correction
//! factor `ξ = sqrt((v + 0.348) / 0.348)`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stefan-Boltzmann constant [W/(m²·K⁴)].
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Offset from °C to K.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Reference velocity of the air-movement correction [m/s].
const XI_REFERENCE_VELOCITY: f64 = 0.348;

/// Orientation of the furnace shell surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Vertical side wall.
    #[default]
    Wall,
    /// Horizontal roof, heated surface facing up.
    Roof,
    /// Horizontal floor, heated surface facing down.
    Floor,
}

impl Orientation {
    /// Natural-convection coefficient `C_pos`.
    pub fn natural_coefficient(self) -> f64 {
        match self {
            Orientation::Wall => 2.2,
            Orientation::Roof => 2.8,
            Orientation::Floor => 1.5,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Wall => "wall",
            Orientation::Roof => "roof",
            Orientation::Floor => "floor",
        })
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" => Ok(Orientation::Wall),
            "roof" => Ok(Orientation::Roof),
            "floor" => Ok(Orientation::Floor),
            other => Err(format!("unknown orientation '{other}' (wall, roof, floor)")),
        }
    }
}

/// Mean air velocity at the duct outlet of a draft fan [m/s].
///
/// Zero unless both the flow and the duct diameter are positive.
pub fn fan_velocity(flow_m3_per_s: f64, duct_diameter: f64) -> f64 {
    if flow_m3_per_s > 0.0 && duct_diameter > 0.0 {
        let r = duct_diameter / 2.0;
        flow_m3_per_s / (PI * r * r)
    } else {
        0.0
    }
}

/// Air-movement correction factor `ξ`, always ≥ 1 for non-negative velocity.
pub fn correction_factor(velocity: f64) -> f64 {
    ((velocity + XI_REFERENCE_VELOCITY) / XI_REFERENCE_VELOCITY).sqrt()
}

/// Still-air natural convection coefficient [W/(m²·K)].
pub fn natural_h(orientation: Orientation, dt: f64) -> f64 {
    orientation.natural_coefficient() * dt.powf(0.25)
}

/// Linearized radiative coefficient [W/(m²·K)] between a surface at `ts` and
/// surroundings at `ta` (both °C), over the difference `dt`.
pub fn radiative_h(emissivity: f64, ts: f64, ta: f64, dt: f64) -> f64 {
    let ts_k = ts + KELVIN_OFFSET;
    let ta_k = ta + KELVIN_OFFSET;
    emissivity * STEFAN_BOLTZMANN * (ts_k.powi(4) - ta_k.powi(4)) / dt
}

/// Energy balance of the outer surface at one candidate surface temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBalance {
    /// Surface temperature [°C].
    pub t_surface: f64,
    /// Clamped surface-to-air difference [K].
    pub delta_t: f64,
    pub h_conv: f64,
    pub h_rad: f64,
    pub h_total: f64,
    /// Heat dissipated over the outer area [W].
    pub heat_loss: f64,
}

/// Computes the outer energy balance.
///
/// # Arguments
/// - `ts`, `ta`: surface and ambient temperatures [°C]
/// - `xi`: air-movement correction factor
/// - `area`: outer lateral area [m²]
/// - `min_delta_t`: lower clamp of `ts - ta`
pub fn surface_balance(
    orientation: Orientation,
    emissivity: f64,
    ts: f64,
    ta: f64,
    xi: f64,
    area: f64,
    min_delta_t: f64,
) -> SurfaceBalance {
    let dt = (ts - ta).max(min_delta_t);
    let h_conv = natural_h(orientation, dt) * xi;
    let h_rad = radiative_h(emissivity, ts, ta, dt);
    let h_total = h_conv + h_rad;
    SurfaceBalance {
        t_surface: ts,
        delta_t: dt,
        h_conv,
        h_rad,
        h_total,
        heat_loss: h_total * area * dt,
    }
}
