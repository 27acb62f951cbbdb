//! Steady-state heat loss through multi-layer cylindrical furnace linings.
//!
//! The hot-face temperature, ambient conditions and an ordered stack of
//! layers with temperature-dependent conductivity determine a single outer
//! surface temperature at which conduction through the lining equals
//! convective and radiative dissipation to ambient air.

pub mod io;
pub mod sim;
pub mod units;

// Prelude
pub use sim::config::{BoundaryConditions, SolverConfig};
pub use sim::construction::{Layer, LayerSpec, Lining};
pub use sim::convection::Orientation;
pub use sim::error::SolveError;
pub use sim::materials::{MaterialLaw, MaterialStore, MaterialTable, ResolvedMaterial};
pub use sim::result::ThermalResult;
pub use sim::solver::{solve, solve_with_config};
pub use units::{Category, Quantity};
