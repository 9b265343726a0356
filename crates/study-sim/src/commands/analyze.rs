use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use study_blocks::load_plugins;
use study_pipeline::analyze_study;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Run directory produced by `study-sim run`.
    pub results_dir: PathBuf,
    /// Analysis definition; defaults to the frozen copy in the run directory.
    #[arg(long)]
    pub analysis: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let plugins = load_plugins()?;
    let report = analyze_study(&args.results_dir, args.analysis.as_deref(), &plugins)?;
    println!(
        "{} metrics written to {}",
        report.results.len(),
        report.metrics_path.display()
    );
    for artifact in &report.artifacts {
        println!("assembled {artifact}");
    }
    Ok(())
}
