mod common;

use common::{probe_registry, Flux, Probe};
use study_core::StudyError;
use study_registry::PluginDescriptor;

#[test]
fn lookup_returns_registered_descriptor() {
    let registry = probe_registry();
    let descriptor = registry.lookup("flux").expect("flux registered");
    assert_eq!(descriptor.type_name(), "flux");
    let block = descriptor.instantiate();
    assert_eq!(block.plugin().label(), "flux");
    assert_eq!(block.name(), "flux");
}

#[test]
fn unknown_lookup_lists_every_registered_name() {
    let registry = probe_registry();
    let err = registry.lookup("fission").expect_err("not registered");
    assert!(matches!(err, StudyError::UnknownPlugin(_)));
    assert_eq!(err.info().code, "plugin_unknown");
    let text = err.to_string();
    for name in registry.names() {
        assert!(text.contains(name), "missing {name} in {text}");
    }
    assert!(text.contains("Available: flux, heating"));
}

#[test]
fn duplicate_registration_fails_and_keeps_first() {
    let mut registry = probe_registry();
    let err = registry
        .register(PluginDescriptor::new("flux", || Box::new(Flux) as Box<dyn Probe>))
        .expect_err("duplicate");
    assert!(matches!(err, StudyError::DuplicateName(_)));
    assert_eq!(registry.len(), 2);
    let kept = registry.lookup("flux").expect("first registration intact");
    assert_eq!(kept.defaults().get("bins"), Some(&serde_json::json!(10)));
}

#[test]
fn names_follow_registration_order() {
    let registry = probe_registry();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["flux", "heating"]);
    assert_eq!(registry.family(), "observable");
    assert!(registry.contains("heating"));
    assert!(!registry.is_empty());
}

#[test]
fn empty_registry_reports_no_alternatives() {
    let registry: study_registry::Registry<dyn Probe> = study_registry::Registry::new("metric");
    let err = registry.lookup("anything").expect_err("empty");
    assert!(err.to_string().contains("unknown metric 'anything'. Available: "));
}
