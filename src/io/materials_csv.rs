//! CSV material database.
//!
//! One row per material with the header `name,a,b`, where the conductivity
//! law is `λ(t) = a + b·t`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::sim::materials::{MaterialLaw, MaterialStore};

/// Material store backed by a CSV file.
#[derive(Debug, Clone)]
pub struct CsvMaterialStore {
    path: PathBuf,
}

impl CsvMaterialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MaterialStore for CsvMaterialStore {
    fn load(&self) -> Result<Vec<MaterialLaw>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))?;
        read_materials(BufReader::new(file))
            .with_context(|| format!("Failed to read materials from: {}", self.path.display()))
    }

    fn save(&self, materials: &[MaterialLaw]) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create file: {}", self.path.display()))?;
        write_materials(BufWriter::new(file), materials)
            .with_context(|| format!("Failed to write materials to: {}", self.path.display()))
    }
}

/// Reads `name,a,b` rows. Column order follows the header.
pub fn read_materials<R: std::io::Read>(reader: R) -> Result<Vec<MaterialLaw>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut laws = Vec::new();
    for (i, row) in csv_reader.deserialize::<MaterialLaw>().enumerate() {
        // Header is line 1.
        let law = row.with_context(|| format!("Invalid material row at line {}", i + 2))?;
        laws.push(law);
    }
    Ok(laws)
}

pub fn write_materials<W: std::io::Write>(writer: W, materials: &[MaterialLaw]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for law in materials {
        csv_writer.serialize(law)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::materials::MaterialTable;
    use tempfile::tempdir;

    #[test]
    fn test_read_rows() -> Result<()> {
        let data = "name,a,b\nFire clay brick,0.8,0.0002\n Steel , 45.0 , -0.02\n";
        let laws = read_materials(data.as_bytes())?;
        assert_eq!(laws.len(), 2);
        assert_eq!(laws[1], MaterialLaw::new("Steel", 45.0, -0.02));
        Ok(())
    }

    #[test]
    fn test_columns_follow_header() -> Result<()> {
        let data = "b,name,a\n0.0001,Insulating brick,0.15\n";
        let laws = read_materials(data.as_bytes())?;
        assert_eq!(laws[0], MaterialLaw::new("Insulating brick", 0.15, 0.0001));
        Ok(())
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let data = "name,a,b\nBrick,zero,0.0\n";
        let err = read_materials(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "got {err}");
    }

    #[test]
    fn test_store_write_and_load() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvMaterialStore::new(dir.path().join("materials.csv"));
        let mut table = MaterialTable::seed();
        table.upsert("Castable", 1.1, 0.00025)?;
        assert!(table.save_to(&store));

        let loaded = MaterialTable::load_or_seed(&store);
        assert_eq!(loaded, table);
        Ok(())
    }

    #[test]
    fn test_missing_file_falls_back_to_seed() {
        let store = CsvMaterialStore::new("/nonexistent/dir/materials.csv");
        assert!(store.load().is_err());
        assert_eq!(MaterialTable::load_or_seed(&store), MaterialTable::seed());
    }
}
