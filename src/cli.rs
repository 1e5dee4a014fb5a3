use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::debug;
use planar_truss::{AnalysisOptions, ConstraintMethod, Model};

/// Command line arguments for a single analysis run.
#[derive(Parser, Debug)]
#[command(name = "planar-truss")]
#[command(about = "Direct stiffness analysis of pin-jointed planar trusses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the model description (JSON).
    pub model: PathBuf,

    /// How supports are imposed on the stiffness system.
    #[arg(short, long, value_enum, default_value = "penalty")]
    pub method: Method,

    /// Penalty stiffness as a multiple of the largest member stiffness.
    #[arg(long)]
    pub penalty_scale: Option<f64>,

    /// Smallest acceptable pivot relative to the largest stiffness term.
    #[arg(long)]
    pub pivot_tolerance: Option<f64>,

    /// Print the result as JSON instead of a text report.
    #[arg(long)]
    pub json: bool,
}

/// Constraint method names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Large diagonal stiffness at restrained DOFs.
    Penalty,
    /// Solve the free-free block only.
    Partition,
}

impl From<Method> for ConstraintMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Penalty => ConstraintMethod::Penalty,
            Method::Partition => ConstraintMethod::Partition,
        }
    }
}

impl Cli {
    /// Analysis options built from the defaults and any overrides.
    pub fn options(&self) -> AnalysisOptions {
        let mut options = AnalysisOptions::with_method(self.method.into());
        if let Some(scale) = self.penalty_scale {
            options.penalty_scale = scale;
        }
        if let Some(tolerance) = self.pivot_tolerance {
            options.pivot_tolerance = tolerance;
        }
        options
    }
}

/// Read and parse a model file.
pub fn load_model(path: &Path) -> Result<Model> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let model: Model = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse model {}", path.display()))?;
    debug!(
        "loaded {} nodes and {} members from {}",
        model.nodes().len(),
        model.members().len(),
        path.display()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_defaults() {
        let cli = Cli::parse_from([
            "planar-truss",
            "model.json",
            "--method",
            "partition",
            "--penalty-scale",
            "1e6",
        ]);
        let options = cli.options();
        assert_eq!(options.constraint_method, ConstraintMethod::Partition);
        assert_eq!(options.penalty_scale, 1.0e6);
        assert_eq!(
            options.pivot_tolerance,
            AnalysisOptions::default().pivot_tolerance
        );
        assert!(!cli.json);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_model(Path::new("does/not/exist.json")).expect_err("missing file");
        assert!(error.to_string().contains("does/not/exist.json"));
    }
}
