//! File I/O for furnace cases and the material database.
//!
//! Cases are JSON documents holding user-entered values with their display
//! units; the material database is a `name,a,b` CSV table.

pub mod case;
pub mod materials_csv;

pub use case::{CaseLayer, FurnaceCase, ResolvedCase, read_case, write_case};
pub use materials_csv::CsvMaterialStore;
