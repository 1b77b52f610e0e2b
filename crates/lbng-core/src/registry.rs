//! The application registry: a JSON export of a REST application's model
//! classes, their remote methods and their property definitions.
//!
//! This is the input side of the generator. Everything here is read-only
//! metadata; the descriptors in [`crate::model`] are built from it.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the built-in user model.
pub const BUILTIN_USER: &str = "User";

/// Remoting versions from this one on describe endpoints as a list.
pub const ENDPOINTS_API_VERSION: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default = "default_remoting_version")]
    pub remoting_version: u32,
    #[serde(default)]
    pub models: Vec<ModelClass>,
}

fn default_remoting_version() -> u32 {
    ENDPOINTS_API_VERSION
}

/// One class as exposed by the REST adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelClass {
    pub name: String,
    /// Present only for genuine application models.
    #[serde(default)]
    pub ctor: Option<SharedConstructor>,
    #[serde(default)]
    pub settings: ModelSettings,
    #[serde(default)]
    pub http: ClassHttp,
    /// Ancestors of the model's instance type, nearest first.
    #[serde(default)]
    pub prototype_chain: Vec<String>,
    /// Relation properties on the prototype, keyed by relation name.
    #[serde(default)]
    pub relations: BTreeMap<String, RelationProperty>,
    /// When present, only these bare method names are publicly reachable.
    #[serde(default)]
    pub exposed_methods: Option<Vec<String>>,
    #[serde(default)]
    pub methods: Vec<RemoteMethod>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedConstructor {
    /// Parameters bound by the constructor, e.g. the `id` path segment.
    #[serde(default)]
    pub accepts: Option<Vec<Parameter>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSettings {
    #[serde(default)]
    pub description: Option<Description>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassHttp {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationProperty {
    #[serde(default)]
    pub target_class: Option<String>,
    #[serde(default, rename = "type")]
    pub relation_type: Option<String>,
}

/// A description given either as one string or as a list of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Lines(Vec<String>),
}

impl Description {
    /// Lines are joined with `\n`.
    pub fn normalize(&self) -> String {
        match self {
            Description::Text(s) => s.clone(),
            Description::Lines(lines) => lines.join("\n"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMethod {
    pub name: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub accepts: Vec<Parameter>,
    #[serde(default)]
    pub returns: Vec<ReturnValue>,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(flatten)]
    pub binding: HttpBinding,
}

impl RemoteMethod {
    /// A method returns an array when its root return value is array-typed.
    pub fn is_returning_array(&self) -> bool {
        self.returns
            .iter()
            .any(|r| r.root && r.type_name.as_ref().map(is_array_type).unwrap_or(false))
    }
}

fn is_array_type(t: &serde_json::Value) -> bool {
    match t {
        serde_json::Value::Array(_) => true,
        serde_json::Value::String(s) => s == "array",
        _ => false,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnValue {
    #[serde(default)]
    pub arg: Option<String>,
    #[serde(default, rename = "type")]
    pub type_name: Option<serde_json::Value>,
    #[serde(default)]
    pub root: bool,
}

/// Where a method's HTTP endpoint is described. Newer remoting exports carry
/// `endpoints`, older ones a single `verb`/`fullPath` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<Endpoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub verb: String,
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "arg")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<serde_json::Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<ParamHttp>,
}

impl Parameter {
    pub fn source(&self) -> Option<ParamSource> {
        self.http.as_ref().and_then(|h| h.source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamHttp {
    #[serde(default)]
    pub source: Option<ParamSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    Path,
    Query,
    Body,
    Header,
    Form,
    Req,
    Res,
    Context,
}

/// A raw property definition. `type` is interpreted, everything else is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Variant order matters: arrays must be tried before class references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyType {
    Name(String),
    Composite(Vec<serde_json::Value>),
    Class {
        #[serde(rename = "$class")]
        class: ClassRef,
    },
    Other(serde_json::Value),
}

/// A reference to a constructor rather than a type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRef {
    #[serde(default)]
    pub model_name: Option<String>,
    pub name: String,
}

impl Application {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry '{}'", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid registry '{}'", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let app: Application = serde_json::from_str(content)?;
        Ok(app)
    }

    /// Classes in the order the REST adapter lists them.
    pub fn classes(&self) -> &[ModelClass] {
        &self.models
    }

    pub fn class(&self, name: &str) -> Option<&ModelClass> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Raw property definitions of the model registered under `name`.
    pub fn definition(&self, name: &str) -> Option<&BTreeMap<String, PropertyDefinition>> {
        self.class(name).map(|m| &m.properties)
    }
}

impl ModelClass {
    /// Class attached to the relation property `property`, if any.
    pub fn relation_target(&self, property: &str) -> Option<&str> {
        self.relations
            .get(property)
            .and_then(|r| r.target_class.as_deref())
    }

    pub fn exposes_method(&self, bare_name: &str) -> bool {
        match &self.exposed_methods {
            Some(allowed) => allowed.iter().any(|m| m == bare_name),
            None => true,
        }
    }

    /// True if the instance type is, or derives from, the built-in user type.
    pub fn is_user_type(&self) -> bool {
        self.name == BUILTIN_USER || self.prototype_chain.iter().any(|b| b == BUILTIN_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app(value: serde_json::Value) -> Application {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn remoting_version_defaults_to_endpoints_api() {
        let a = app(json!({ "models": [] }));
        assert_eq!(a.remoting_version, ENDPOINTS_API_VERSION);
    }

    #[test]
    fn missing_ctor_is_none() {
        let a = app(json!({ "models": [{ "name": "helper" }] }));
        assert!(a.classes()[0].ctor.is_none());
    }

    #[test]
    fn ctor_without_accepts() {
        let a = app(json!({ "models": [{ "name": "gadget", "ctor": {} }] }));
        let ctor = a.classes()[0].ctor.as_ref().unwrap();
        assert!(ctor.accepts.is_none());
    }

    #[test]
    fn description_forms() {
        let one: Description = serde_json::from_value(json!("single")).unwrap();
        assert_eq!(one.normalize(), "single");
        let many: Description = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(many.normalize(), "a\nb");
    }

    #[test]
    fn returning_array_detection() {
        let m: RemoteMethod = serde_json::from_value(json!({
            "name": "find",
            "isStatic": true,
            "returns": [{ "arg": "data", "type": ["gadget"], "root": true }]
        }))
        .unwrap();
        assert!(m.is_returning_array());

        let m: RemoteMethod = serde_json::from_value(json!({
            "name": "count",
            "returns": [{ "arg": "count", "type": "number" }]
        }))
        .unwrap();
        assert!(!m.is_returning_array());

        let m: RemoteMethod = serde_json::from_value(json!({
            "name": "list",
            "returns": [{ "arg": "items", "type": "array", "root": true }]
        }))
        .unwrap();
        assert!(m.is_returning_array());
    }

    #[test]
    fn binding_is_flattened() {
        let m: RemoteMethod = serde_json::from_value(json!({
            "name": "find",
            "verb": "GET",
            "fullPath": "/gadgets"
        }))
        .unwrap();
        assert_eq!(m.binding.verb.as_deref(), Some("GET"));
        assert_eq!(m.binding.full_path.as_deref(), Some("/gadgets"));
        assert!(m.binding.endpoints.is_none());
    }

    #[test]
    fn parameter_source() {
        let p: Parameter = serde_json::from_value(json!({
            "arg": "fk", "type": "any", "required": true, "http": { "source": "path" }
        }))
        .unwrap();
        assert_eq!(p.source(), Some(ParamSource::Path));

        let p: Parameter = serde_json::from_value(json!({ "arg": "options" })).unwrap();
        assert_eq!(p.source(), None);
    }

    #[test]
    fn property_type_variants() {
        let t: PropertyType = serde_json::from_value(json!("string")).unwrap();
        assert_eq!(t, PropertyType::Name("string".into()));

        let t: PropertyType = serde_json::from_value(json!(["string"])).unwrap();
        assert!(matches!(t, PropertyType::Composite(_)));

        let t: PropertyType =
            serde_json::from_value(json!([{ "name": "string" }])).unwrap();
        assert!(matches!(t, PropertyType::Composite(_)));

        let t: PropertyType =
            serde_json::from_value(json!({ "$class": { "modelName": "Address", "name": "ModelCtor" } }))
                .unwrap();
        match t {
            PropertyType::Class { class } => {
                assert_eq!(class.model_name.as_deref(), Some("Address"));
                assert_eq!(class.name, "ModelCtor");
            }
            other => panic!("expected class reference, got {:?}", other),
        }
    }

    #[test]
    fn property_definition_keeps_extra_metadata() {
        let p: PropertyDefinition =
            serde_json::from_value(json!({ "type": "string", "required": true, "max": 40 }))
                .unwrap();
        assert_eq!(p.property_type, Some(PropertyType::Name("string".into())));
        assert_eq!(p.extra["required"], json!(true));
        assert_eq!(p.extra["max"], json!(40));
    }

    #[test]
    fn relation_target_and_filter() {
        let a = app(json!({ "models": [{
            "name": "gadget",
            "relations": {
                "widgets": { "targetClass": "widget", "type": "hasMany" },
                "legacy": { "type": "hasMany" }
            },
            "exposedMethods": ["find"]
        }]}));
        let gadget = a.class("gadget").unwrap();
        assert_eq!(gadget.relation_target("widgets"), Some("widget"));
        assert_eq!(gadget.relation_target("legacy"), None);
        assert_eq!(gadget.relation_target("missing"), None);
        assert!(gadget.exposes_method("find"));
        assert!(!gadget.exposes_method("__get__widgets"));
    }

    #[test]
    fn user_type_detection() {
        let a = app(json!({ "models": [
            { "name": "User" },
            { "name": "customer", "prototypeChain": ["User", "PersistedModel"] },
            { "name": "gadget", "prototypeChain": ["PersistedModel"] }
        ]}));
        assert!(a.class("User").unwrap().is_user_type());
        assert!(a.class("customer").unwrap().is_user_type());
        assert!(!a.class("gadget").unwrap().is_user_type());
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(Application::from_json("not json").is_err());
    }
}
