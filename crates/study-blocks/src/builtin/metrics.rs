use serde_json::{json, Map, Value};
use study_core::{ConfigMap, ErrorInfo, StudyError};
use study_registry::{BlockMeta, PluginDescriptor, Registry};
use tracing::debug;

use super::{config_str, config_strings};
use crate::context::StudyContext;
use crate::metric::MetricPlugin;

fn object(value: Value) -> ConfigMap {
    value.as_object().cloned().unwrap_or_default()
}

/// Number of completed cases.
struct CaseCount;

impl MetricPlugin for CaseCount {
    fn compute(&self, _block: &BlockMeta, context: &StudyContext) -> Result<Value, StudyError> {
        Ok(json!(context.cases().len()))
    }
}

/// Parameter assignment of every case, keyed by case name.
struct Parameters;

impl MetricPlugin for Parameters {
    fn compute(&self, _block: &BlockMeta, context: &StudyContext) -> Result<Value, StudyError> {
        let mut table = Map::new();
        for case in context.cases() {
            table.insert(case.name.clone(), Value::Object(case.params.clone()));
        }
        Ok(Value::Object(table))
    }
}

/// Per-case totals of the configured tallies.
struct ReactionRates;

impl MetricPlugin for ReactionRates {
    fn compute(&self, block: &BlockMeta, context: &StudyContext) -> Result<Value, StudyError> {
        let tallies = config_strings(block, "tallies").unwrap_or_default();
        let mut table = Map::new();
        for case in context.cases() {
            let output = case.tally_output()?;
            let mut row = Map::new();
            for tally in &tallies {
                row.insert(tally.clone(), json!(output.total(tally)?));
            }
            table.insert(case.name.clone(), Value::Object(row));
        }
        debug!(metric = block.name(), cases = table.len(), "reaction rates collected");
        Ok(Value::Object(table))
    }
}

/// Ratio of production to loss per case, with summary statistics.
struct MultiplicationFactor;

impl MetricPlugin for MultiplicationFactor {
    fn compute(&self, block: &BlockMeta, context: &StudyContext) -> Result<Value, StudyError> {
        let production = config_str(block, "production").unwrap_or("nu-fission");
        let loss = config_str(block, "loss").unwrap_or("absorption");
        let mut per_case = Map::new();
        let mut values = Vec::new();
        for case in context.cases() {
            let output = case.tally_output()?;
            let denominator = output.total(loss)?;
            if denominator == 0.0 {
                return Err(StudyError::Engine(
                    ErrorInfo::new("loss_rate_zero", format!("tally '{loss}' sums to zero"))
                        .with_context("case", case.name.clone())
                        .with_context("metric", block.name()),
                ));
            }
            let k = output.total(production)? / denominator;
            per_case.insert(case.name.clone(), json!(k));
            values.push(k);
        }
        let summary = if values.is_empty() {
            json!({ "mean": null, "min": null, "max": null })
        } else {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            json!({ "mean": mean, "min": min, "max": max })
        };
        Ok(json!({ "cases": per_case, "summary": summary }))
    }
}

pub(super) fn register(registry: &mut Registry<dyn MetricPlugin>) -> Result<(), StudyError> {
    registry.register(PluginDescriptor::new("case_count", || {
        Box::new(CaseCount) as Box<dyn MetricPlugin>
    }))?;
    registry.register(PluginDescriptor::new("parameters", || {
        Box::new(Parameters) as Box<dyn MetricPlugin>
    }))?;
    registry.register(
        PluginDescriptor::new("reaction_rates", || {
            Box::new(ReactionRates) as Box<dyn MetricPlugin>
        })
        .with_defaults(object(json!({ "tallies": ["absorption", "fission"] })))
        .with_requires(["absorption", "fission"]),
    )?;
    registry.register(
        PluginDescriptor::new("multiplication_factor", || {
            Box::new(MultiplicationFactor) as Box<dyn MetricPlugin>
        })
        .with_defaults(object(json!({ "production": "nu-fission", "loss": "absorption" })))
        .with_requires(["nu-fission", "absorption"]),
    )
}
