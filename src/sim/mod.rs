pub mod config;
pub mod construction;
pub mod convection;
pub mod error;
pub mod materials;
pub mod result;
pub mod root_finding;
pub mod solver;
