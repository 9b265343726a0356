//! Parameter sweep expansion: a compact `name -> value | [values]` mapping
//! becomes an ordered, reproducible list of numbered cases.

mod sweep;

pub use sweep::{case_name, expand_parameters, plan_cases, sweep_size, Case};
