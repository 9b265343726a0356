pub mod analyze;
pub mod plugins;
pub mod run;
