use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use furnace_lining::io::{CsvMaterialStore, FurnaceCase, read_case, write_case};
use furnace_lining::units::{self, Category};
use furnace_lining::{Lining, MaterialTable, SolveError, ThermalResult, solve};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Heat loss through cylindrical furnace linings",
    long_about = None
)]
struct Cli {
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a furnace case file
    Solve(SolveArgs),
    /// Write the default furnace case to a file
    InitCase {
        path: PathBuf,
    },
    /// Inspect or edit the material database
    Materials(MaterialsArgs),
    /// Convert a value between display units
    Convert {
        value: f64,
        from: String,
        to: String,
        /// Length, Temperature, Power, HeatFlux, Conductivity, FilmCoefficient,
        /// Velocity, Area or VolumeFlow
        category: String,
    },
}

#[derive(Args, Debug)]
struct SolveArgs {
    case: PathBuf,
    /// Material database (CSV); built-in materials are used when missing
    #[arg(long, default_value = "materials.csv")]
    materials: PathBuf,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct MaterialsArgs {
    /// Material database (CSV); created from the built-in set when missing
    #[arg(long, default_value = "materials.csv")]
    db: PathBuf,

    #[command(subcommand)]
    action: MaterialAction,
}

#[derive(Subcommand, Debug)]
enum MaterialAction {
    /// List all materials
    List,
    /// Insert a material or replace its coefficients
    Upsert {
        name: String,
        #[arg(allow_hyphen_values = true)]
        a: f64,
        #[arg(allow_hyphen_values = true)]
        b: f64,
    },
    /// Delete a material
    Delete { name: String },
    /// Rename a material and set its coefficients
    Rename {
        old: String,
        new: String,
        #[arg(allow_hyphen_values = true)]
        a: f64,
        #[arg(allow_hyphen_values = true)]
        b: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match cli.command {
        Command::Solve(args) => run_solve(&args),
        Command::InitCase { path } => {
            write_case(&path, &FurnaceCase::default())?;
            info!(path = %path.display(), "default case written");
            Ok(())
        }
        Command::Materials(args) => run_materials(&args.db, &args.action),
        Command::Convert {
            value,
            from,
            to,
            category,
        } => {
            let category: Category = category.parse()?;
            let converted = units::convert(value, &from, &to, category)?;
            println!("{value} {from} = {converted:.6} {to}");
            Ok(())
        }
    }
}

fn run_solve(args: &SolveArgs) -> Result<()> {
    let case = read_case(&args.case)?;
    let table = MaterialTable::load_or_seed(&CsvMaterialStore::new(&args.materials));
    let resolved = case.resolve(&table)?;

    let result = match solve(&resolved.conditions, &resolved.lining) {
        Ok(result) => result,
        Err(err @ SolveError::NonConvergence { .. }) => {
            return Err(anyhow::Error::new(err).context("could not converge, check the inputs"));
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, &resolved.lining);
    }
    Ok(())
}

fn print_summary(result: &ThermalResult, lining: &Lining) {
    println!("Total heat loss Q       {:>12.0} W", result.heat_loss);
    println!("Heat flux q             {:>12.0} W/m²", result.heat_flux);
    println!("Outer surface           {:>12.1} °C", result.t_surface);
    println!("Outer area              {:>12.2} m²", result.outer_area);
    println!("Film coefficient h      {:>12.2} W/(m²·K)", result.h_total);
    println!("  convection            {:>12.2} W/(m²·K)", result.h_conv);
    println!("  radiation             {:>12.2} W/(m²·K)", result.h_rad);
    println!("Air velocity            {:>12.2} m/s", result.v_total);
    println!("Correction factor ξ     {:>12.2}", result.correction_factor);
    println!();
    println!("Lining (inside out)");
    for (i, layer) in lining.layers().iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:>8.1} mm   {}",
            i + 1,
            layer.material.name,
            layer.thickness * 1000.0,
            layer.material
        );
    }
    println!();
    println!("Temperature profile");
    for point in result.profile() {
        println!("  {:<22} {:>8.1} °C", point.label, point.temperature);
    }
}

fn run_materials(db: &Path, action: &MaterialAction) -> Result<()> {
    let store = CsvMaterialStore::new(db);
    let mut table = MaterialTable::load_or_seed(&store);

    match action {
        MaterialAction::List => {
            for law in table.iter() {
                println!("{:<28} {}", law.name, law);
            }
            return Ok(());
        }
        MaterialAction::Upsert { name, a, b } => table.upsert(name, *a, *b)?,
        MaterialAction::Delete { name } => {
            if !table.delete(name) {
                warn!(material = %name, "material not found, nothing deleted");
            }
        }
        MaterialAction::Rename { old, new, a, b } => table
            .rename(old, new, *a, *b)
            .with_context(|| format!("Failed to rename '{old}' to '{new}'"))?,
    }

    if table.save_to(&store) {
        info!(path = %db.display(), materials = table.len(), "material database saved");
    }
    Ok(())
}
