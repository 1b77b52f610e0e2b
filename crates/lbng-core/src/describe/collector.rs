use crate::config::GeneratorOptions;
use crate::model::{MethodDescriptor, ModelDescriptor, ModelSet};
use crate::registry::{Application, ModelClass};
use crate::utils::{self, ui};
use std::collections::BTreeMap;

/// Build one descriptor per retained class, in registry order.
///
/// Ignored models (by display name) are skipped with a warning; classes without
/// constructor metadata are not application models and are skipped with an error.
pub fn collect(app: &Application, options: &GeneratorOptions) -> ModelSet {
    let mut set = ModelSet::default();

    for class in app.classes() {
        let name = options.format_model_name(&class.name);

        if options.is_ignored(&name) {
            ui::warn(&format!(
                "Skipping {:?} model as it is in models_to_ignore",
                name
            ));
            continue;
        }

        if class.ctor.is_none() {
            ui::error(&format!(
                "Skipping {:?} as it is not a model (no constructor metadata)",
                class.name
            ));
            continue;
        }

        let descriptor = describe_class(class, name);
        match set.position(&descriptor.name) {
            Some(existing) => {
                ui::warn(&format!(
                    "Model {:?} is declared more than once, keeping the last declaration",
                    descriptor.name
                ));
                set.models[existing] = descriptor;
            }
            None => set.models.push(descriptor),
        }
    }

    set
}

fn describe_class(class: &ModelClass, name: String) -> ModelDescriptor {
    let methods = class
        .methods
        .iter()
        .map(|m| MethodDescriptor::from_remote(m, &name))
        .collect();

    ModelDescriptor {
        description: class
            .settings
            .description
            .as_ref()
            .map(|d| d.normalize())
            .unwrap_or_default(),
        declared_name: class.name.clone(),
        rest_path: rest_path(class),
        is_user: class.is_user_type(),
        methods,
        scopes: BTreeMap::new(),
        schema: None,
        name,
    }
}

fn rest_path(class: &ModelClass) -> String {
    match &class.http.path {
        Some(path) => path.clone(),
        None => format!("/{}", utils::pluralize(&class.name.to_lowercase())),
    }
}
