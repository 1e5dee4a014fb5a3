mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{load_model, Cli};
use planar_truss::analyze_with;
use report::render_report;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let model = load_model(&cli.model)?;
    let result = analyze_with(&model, &cli.options())
        .with_context(|| format!("analysis of {} failed", cli.model.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_report(&result));
    }
    Ok(())
}
