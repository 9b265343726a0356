use serde_json::json;
use study_core::{merge_shallow, ConfigMap, Params, StudyError};
use study_registry::{BlockMeta, PluginDescriptor, Registry};

use crate::model::{Model, ModelPlugin};

/// Type name of the reference tube-bank model.
pub const EXAMPLE_MODEL: &str = "example_model";

const SETTINGS_KEYS: [&str; 4] = ["batches", "inactive", "particles", "seed"];

fn example_defaults() -> ConfigMap {
    let defaults = json!({
        "N_tubes_y": 10,
        "N_tubes_z": 10,
        "num_layers": 1,
        "velocity": 0,
        "tube_radius": 2.0,
        "no_tubes": false,
        "seed": 1,
        "batches": 100,
        "inactive": 99,
        "particles": 100000
    });
    defaults.as_object().cloned().unwrap_or_default()
}

struct ExampleModel;

impl ModelPlugin for ExampleModel {
    fn build(&self, block: &BlockMeta, params: &Params) -> Result<Model, StudyError> {
        let parameters = merge_shallow(block.config(), params);
        let mut model = Model::new(block.type_name(), parameters);
        for key in SETTINGS_KEYS {
            if let Some(value) = model.parameters.get(key) {
                model.settings.insert(key.to_string(), value.clone());
            }
        }
        Ok(model)
    }
}

pub(super) fn register(registry: &mut Registry<dyn ModelPlugin>) -> Result<(), StudyError> {
    registry.register(
        PluginDescriptor::new(EXAMPLE_MODEL, || Box::new(ExampleModel) as Box<dyn ModelPlugin>)
            .with_defaults(example_defaults()),
    )
}
