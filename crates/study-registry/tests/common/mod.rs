#![allow(dead_code)]

use serde_json::json;
use study_registry::{PluginDescriptor, Registry};

pub trait Probe: Send + Sync {
    fn label(&self) -> &'static str;
}

pub struct Flux;

impl Probe for Flux {
    fn label(&self) -> &'static str {
        "flux"
    }
}

pub struct Heating;

impl Probe for Heating {
    fn label(&self) -> &'static str {
        "heating"
    }
}

pub fn probe_registry() -> Registry<dyn Probe> {
    let mut registry: Registry<dyn Probe> = Registry::new("observable");
    registry
        .register(
            PluginDescriptor::new("flux", || Box::new(Flux) as Box<dyn Probe>).with_defaults(
                json!({"bins": 10, "units": "cm"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
        )
        .unwrap();
    registry
        .register(PluginDescriptor::new("heating", || {
            Box::new(Heating) as Box<dyn Probe>
        }))
        .unwrap();
    registry
}
