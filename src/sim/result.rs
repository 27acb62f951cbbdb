use serde::{Deserialize, Serialize};

/// Steady-state solution of one lining. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalResult {
    /// Total heat loss over the furnace height [W].
    pub heat_loss: f64,
    /// Heat flux through the outer surface [W/m²].
    pub heat_flux: f64,
    /// Outer surface temperature [°C].
    pub t_surface: f64,
    /// Combined outer film coefficient [W/(m²·K)].
    pub h_total: f64,
    pub h_conv: f64,
    pub h_rad: f64,
    /// Air-movement correction factor ξ.
    pub correction_factor: f64,
    /// Natural plus fan velocity [m/s].
    pub v_total: f64,
    /// Temperatures from the hot face to the outer surface [°C].
    ///
    /// The first entry is the hot-face temperature reconstructed from the
    /// converged surface temperature; the last entry equals `t_surface`.
    pub interface_temperatures: Vec<f64>,
    /// Outer lateral area [m²].
    pub outer_area: f64,
    /// Outer bisection steps used.
    pub iterations: usize,
}

/// A labelled point of the temperature profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub label: String,
    pub temperature: f64,
}

impl ThermalResult {
    /// Labels the interface temperatures: inner wall, interfaces between
    /// layers, outer surface.
    pub fn profile(&self) -> Vec<ProfilePoint> {
        let n = self.interface_temperatures.len();
        self.interface_temperatures
            .iter()
            .enumerate()
            .map(|(i, &temperature)| {
                let label = if i == 0 {
                    "inner wall".to_string()
                } else if i == n - 1 {
                    "outer surface".to_string()
                } else {
                    format!("interface {i}")
                };
                ProfilePoint { label, temperature }
            })
            .collect()
    }

    /// Reconstructed hot-face temperature.
    pub fn inner_temperature(&self) -> f64 {
        self.interface_temperatures
            .first()
            .copied()
            .unwrap_or(self.t_surface)
    }
}
