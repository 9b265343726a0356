use std::error::Error;

use clap::Args;
use study_blocks::load_plugins;
use study_registry::Registry;

#[derive(Args, Debug)]
pub struct PluginsArgs {
    /// Also print default configuration and requirements.
    #[arg(long)]
    pub verbose: bool,
}

pub fn run(args: &PluginsArgs) -> Result<(), Box<dyn Error>> {
    let plugins = load_plugins()?;
    list(&plugins.models, args.verbose);
    list(&plugins.observables, args.verbose);
    list(&plugins.metrics, args.verbose);
    list(&plugins.artifacts, args.verbose);
    Ok(())
}

fn list<P: ?Sized>(registry: &Registry<P>, verbose: bool) {
    println!("{}:", registry.family());
    for descriptor in registry.descriptors() {
        if !verbose {
            println!("  {}", descriptor.type_name());
            continue;
        }
        let defaults = study_core::describe(&descriptor.defaults().clone().into());
        if descriptor.requires().is_empty() {
            println!("  {} {defaults}", descriptor.type_name());
        } else {
            println!(
                "  {} {defaults} requires [{}]",
                descriptor.type_name(),
                descriptor.requires().join(", ")
            );
        }
    }
}
