use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::{ModelSet, SchemaDescriptor};
use crate::registry::{Application, PropertyDefinition, PropertyType};

/// Attach a property snapshot to every model.
pub fn build_schemas(app: &Application, set: &mut ModelSet) {
    for model in &mut set.models {
        let properties = app.definition(&model.declared_name);
        model.schema = Some(build_schema(&model.name, properties));
    }
}

pub fn build_schema(
    name: &str,
    properties: Option<&BTreeMap<String, PropertyDefinition>>,
) -> SchemaDescriptor {
    let properties = properties
        .into_iter()
        .flatten()
        .map(|(prop, definition)| (prop.clone(), snapshot(definition)))
        .collect();

    SchemaDescriptor {
        name: name.to_string(),
        properties,
    }
}

/// Shallow copy of a property definition with its type reduced to a name.
fn snapshot(definition: &PropertyDefinition) -> Value {
    let mut entry = definition.extra.clone();
    if let Some(property_type) = &definition.property_type {
        entry.insert("type".to_string(), normalize_type(property_type));
    }
    Value::Object(entry)
}

/// Class references become their model name (or constructor name).
/// Composite types such as `["string"]` are passed through unchanged.
pub fn normalize_type(property_type: &PropertyType) -> Value {
    match property_type {
        PropertyType::Name(name) => Value::String(name.clone()),
        PropertyType::Class { class } => {
            Value::String(class.model_name.clone().unwrap_or_else(|| class.name.clone()))
        }
        PropertyType::Composite(items) => Value::Array(items.clone()),
        PropertyType::Other(value) => value.clone(),
    }
}
