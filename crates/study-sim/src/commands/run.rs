use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use study_blocks::load_plugins;
use study_pipeline::{run_study, CommandEngine, RunOptions};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Study directory name under the studies root.
    pub study: String,
    /// Export models and render plots without running the engine.
    #[arg(short = 'p', long = "plot")]
    pub plot_only: bool,
    /// Directory holding `<study>/study.yaml`.
    #[arg(long, default_value = "studies")]
    pub studies_root: PathBuf,
    /// Directory run directories are created in.
    #[arg(long, default_value = "runs")]
    pub runs_root: PathBuf,
    /// Simulation engine executable.
    #[arg(long, default_value = "sim-engine")]
    pub engine: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let plugins = load_plugins()?;
    let options = RunOptions {
        studies_root: args.studies_root.clone(),
        runs_root: args.runs_root.clone(),
        plot_only: args.plot_only,
    };
    let engine = CommandEngine::new(&args.engine);
    let summary = run_study(&args.study, &options, &plugins, &engine)?;
    println!(
        "{} cases written to {}",
        summary.cases.len(),
        summary.run_dir.display()
    );
    Ok(())
}
