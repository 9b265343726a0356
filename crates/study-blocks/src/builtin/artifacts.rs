use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use study_core::{describe, ConfigMap, ErrorInfo, StudyError};
use study_registry::{BlockMeta, PluginDescriptor, Registry};
use tracing::info;

use super::figures::{FigureConfig, Histogram};
use super::config_str;
use crate::artifact::ArtifactPlugin;
use crate::context::StudyContext;
use crate::results::ResultsStore;

fn object(value: Value) -> ConfigMap {
    value.as_object().cloned().unwrap_or_default()
}

fn write_text(path: &Path, text: &str) -> Result<(), StudyError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| StudyError::io("artifact_dir", parent, err))?;
    }
    fs::write(path, text).map_err(|err| StudyError::io("artifact_write", path, err))
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => describe(other),
    }
}

/// Two-column CSV of every stored metric.
struct SummaryTable;

impl ArtifactPlugin for SummaryTable {
    fn assemble(
        &self,
        block: &BlockMeta,
        context: &StudyContext,
        results: &ResultsStore,
    ) -> Result<(), StudyError> {
        let path = context.artifact_path(config_str(block, "file").unwrap_or("summary.csv"));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| StudyError::io("artifact_dir", parent, err))?;
        }
        let mut writer =
            csv::Writer::from_path(&path).map_err(|err| StudyError::io("csv_open", &path, err))?;
        writer
            .write_record(["metric", "value"])
            .map_err(|err| StudyError::io("csv_write", &path, err))?;
        for (name, value) in results.iter() {
            writer
                .write_record([name, cell(value).as_str()])
                .map_err(|err| StudyError::io("csv_write", &path, err))?;
        }
        writer
            .flush()
            .map_err(|err| StudyError::io("csv_flush", &path, err))?;
        info!(path = %path.display(), rows = results.len(), "summary table written");
        Ok(())
    }
}

/// Markdown overview: case list with parameters, then every metric.
struct Report;

impl ArtifactPlugin for Report {
    fn assemble(
        &self,
        block: &BlockMeta,
        context: &StudyContext,
        results: &ResultsStore,
    ) -> Result<(), StudyError> {
        let title = config_str(block, "title").unwrap_or("Study report");
        let mut lines = vec![format!("# {title}"), String::new()];
        let count = results.get("case_count").map(cell).unwrap_or_default();
        lines.push(format!("Cases: {count}"));
        lines.push(String::new());
        lines.push("## Cases".into());
        lines.push(String::new());
        for case in context.cases() {
            lines.push(format!(
                "- `{}`: {}",
                case.name,
                describe(&Value::Object(case.params.clone()))
            ));
        }
        lines.push(String::new());
        lines.push("## Metrics".into());
        lines.push(String::new());
        for (name, value) in results.iter() {
            match value {
                Value::Object(_) | Value::Array(_) => {
                    lines.push(format!("- `{name}`: see metrics.yaml"))
                }
                scalar => lines.push(format!("- `{name}`: {}", cell(scalar))),
            }
        }
        lines.push(String::new());
        let path = context.artifact_path(config_str(block, "file").unwrap_or("report.md"));
        write_text(&path, &lines.join("\n"))
    }
}

/// SVG histogram of the per-case multiplication factors.
struct KHistogram;

impl ArtifactPlugin for KHistogram {
    fn assemble(
        &self,
        block: &BlockMeta,
        context: &StudyContext,
        results: &ResultsStore,
    ) -> Result<(), StudyError> {
        let source = config_str(block, "source").unwrap_or("multiplication_factor");
        let per_case = results
            .get(source)
            .and_then(|value| value.get("cases"))
            .and_then(Value::as_object)
            .ok_or_else(|| {
                StudyError::Config(
                    ErrorInfo::new(
                        "histogram_source",
                        format!("result '{source}' has no per-case values"),
                    )
                    .with_context("artifact", block.name()),
                )
            })?;
        let values: Vec<f64> = per_case.values().filter_map(Value::as_f64).collect();
        let config = FigureConfig::from_block(block);
        let histogram = Histogram::from_values(&values, config.bins);
        let path = context.artifact_path(config_str(block, "file").unwrap_or("k_histogram.svg"));
        write_text(&path, &histogram.render_svg(&config, source))
    }
}

pub(super) fn register(registry: &mut Registry<dyn ArtifactPlugin>) -> Result<(), StudyError> {
    registry.register(
        PluginDescriptor::new("summary_table", || {
            Box::new(SummaryTable) as Box<dyn ArtifactPlugin>
        })
        .with_defaults(object(json!({ "file": "summary.csv" }))),
    )?;
    registry.register(
        PluginDescriptor::new("report", || Box::new(Report) as Box<dyn ArtifactPlugin>)
            .with_defaults(object(json!({ "file": "report.md", "title": "Study report" })))
            .with_requires(["case_count"]),
    )?;
    let figure = FigureConfig::default();
    registry.register(
        PluginDescriptor::new("k_histogram", || {
            Box::new(KHistogram) as Box<dyn ArtifactPlugin>
        })
        .with_defaults(object(json!({
            "file": "k_histogram.svg",
            "source": "multiplication_factor",
            "bins": figure.bins,
            "width": figure.width,
            "height": figure.height
        })))
        .with_requires(["multiplication_factor"]),
    )
}

