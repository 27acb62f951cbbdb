//! Steady-state radial heat loss through a cylindrical furnace lining.
//!
//! The unknown is the outer surface temperature `ts`. For a candidate `ts` the
//! outer energy balance gives the heat loss `Q`; pushing that `Q` back through
//! the layers (outermost first) reconstructs the hot-face temperature. The
//! reconstructed hot face grows monotonically with `ts`, so `ts` is found by
//! bisection on `[ta, t0]` until the reconstruction matches `t0`.
//!
//! Each layer's conductivity depends on its own mean temperature, which
//! depends on the unknown inner-face temperature. That implicit relation is
//! solved per layer by fixed-point iteration.

use std::f64::consts::PI;

use tracing::{debug, warn};

use super::config::{BoundaryConditions, SolverConfig};
use super::construction::{Layer, Lining};
use super::convection::{SurfaceBalance, correction_factor, fan_velocity, surface_balance};
use super::error::SolveError;
use super::result::ThermalResult;
use super::root_finding::{FixedPointOutcome, RootFindingError, Side};

/// Solves with the default [`SolverConfig`].
pub fn solve(bc: &BoundaryConditions, lining: &Lining) -> Result<ThermalResult, SolveError> {
    solve_with_config(bc, lining, &SolverConfig::default())
}

/// Solves the coupled surface balance and layer conduction problem.
///
/// Fails fast on invalid inputs and on `t0 <= ta`. Returns
/// [`SolveError::NonConvergence`] when the bracket does not close within
/// `config.surface.max_iterations`.
pub fn solve_with_config(
    bc: &BoundaryConditions,
    lining: &Lining,
    config: &SolverConfig,
) -> Result<ThermalResult, SolveError> {
    bc.validate()?;
    if lining.layers().is_empty() {
        return Err(SolveError::invalid("layers", "at least one layer is required"));
    }

    let t0 = bc.inner_temperature;
    let ta = bc.ambient_temperature;
    if t0 <= ta {
        return Err(SolveError::DegenerateBracket {
            ambient: ta,
            inner: t0,
        });
    }

    let v_total = bc.natural_velocity + fan_velocity(bc.fan_flow, bc.fan_diameter);
    let xi = correction_factor(v_total);
    let area = lining.outer_area(bc.height);

    let bracketed = config
        .surface
        .solve(ta, t0, |ts| {
            let balance = surface_balance(
                bc.orientation,
                bc.emissivity,
                ts,
                ta,
                xi,
                area,
                config.min_delta_t,
            );
            let profile = conduction_profile(lining, balance.heat_loss / bc.height, ts, config);
            let side = if profile[0] < t0 { Side::Below } else { Side::Above };
            (side, (balance, profile))
        })
        .map_err(|err| match err {
            RootFindingError::NotConverged { iterations, width } => {
                warn!(iterations, width, "surface temperature bisection did not converge");
                SolveError::NonConvergence {
                    iterations,
                    bracket_width: width,
                }
            }
            RootFindingError::InvalidBracket { low, high } => SolveError::DegenerateBracket {
                ambient: low,
                inner: high,
            },
        })?;

    let (balance, interface_temperatures): (SurfaceBalance, Vec<f64>) = bracketed.value;
    debug!(
        iterations = bracketed.iterations,
        t_surface = balance.t_surface,
        heat_loss = balance.heat_loss,
        "lining solve converged"
    );

    Ok(ThermalResult {
        heat_loss: balance.heat_loss,
        heat_flux: balance.heat_loss / area,
        t_surface: balance.t_surface,
        h_total: balance.h_total,
        h_conv: balance.h_conv,
        h_rad: balance.h_rad,
        correction_factor: xi,
        v_total,
        interface_temperatures,
        outer_area: area,
        iterations: bracketed.iterations,
    })
}

/// Conductivity of a layer at mean temperature `t_mean`, floored by the config.
pub fn clamped_conductivity(layer: &Layer, t_mean: f64, config: &SolverConfig) -> f64 {
    layer
        .material
        .conductivity_at(t_mean)
        .max(config.min_conductivity)
}

/// Inner-face temperature of `layer` given its outer-face temperature and the
/// linear heat rate `q_l` [W/m] flowing through it.
///
/// Solves `t_in = t_out + q_l·ln(r_o/r_i) / (2π·λ((t_out + t_in)/2))`.
pub fn layer_inner_temperature(
    layer: &Layer,
    q_l: f64,
    t_outer: f64,
    config: &SolverConfig,
) -> FixedPointOutcome {
    let term = q_l * layer.log_radius_ratio() / (2.0 * PI);
    config
        .layer
        .solve(t_outer + config.layer_seed_offset, |t_inner| {
            let lambda = clamped_conductivity(layer, 0.5 * (t_outer + t_inner), config);
            t_outer + term / lambda
        })
}

/// Temperatures at every interface, hot face first and `t_surface` last, for
/// a linear heat rate `q_l` leaving through the outer surface.
pub fn conduction_profile(
    lining: &Lining,
    q_l: f64,
    t_surface: f64,
    config: &SolverConfig,
) -> Vec<f64> {
    let layers = lining.layers();
    let mut temperatures = Vec::with_capacity(layers.len() + 1);
    temperatures.push(t_surface);

    let mut current = t_surface;
    for layer in layers.iter().rev() {
        let outcome = layer_inner_temperature(layer, q_l, current, config);
        if !outcome.converged {
            warn!(
                material = %layer.material.name,
                iterations = outcome.iterations,
                "layer temperature iteration hit its cap"
            );
        }
        current = outcome.value;
        temperatures.push(current);
    }

    temperatures.reverse();
    temperatures
}
