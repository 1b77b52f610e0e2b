//! Descriptors handed from the describe passes to the renderer.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::registry::{HttpBinding, Parameter, ParamSource, RemoteMethod};

/// Name of the blanket identifier parameter bound by a model's constructor.
pub const ID_PARAM: &str = "id";

#[derive(Debug, Clone, Serialize)]
pub struct ModelDescriptor {
    /// Display name: capitalized and, when configured, namespaced.
    pub name: String,
    /// Name under which the registry declares the model.
    pub declared_name: String,
    pub description: String,
    pub rest_path: String,
    pub is_user: bool,
    pub methods: Vec<MethodDescriptor>,
    /// Relation slots. A name missing from the map has not been resolved yet.
    pub scopes: BTreeMap<String, ScopeState>,
    pub schema: Option<SchemaDescriptor>,
}

impl ModelDescriptor {
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn scope(&self, name: &str) -> Option<&ScopeDescriptor> {
        match self.scopes.get(name) {
            Some(ScopeState::Resolved(scope)) => Some(scope),
            _ => None,
        }
    }

    /// Resolved scopes in name order.
    pub fn resolved_scopes(&self) -> impl Iterator<Item = (&String, &ScopeDescriptor)> {
        self.scopes.iter().filter_map(|(name, state)| match state {
            ScopeState::Resolved(scope) => Some((name, scope)),
            ScopeState::Skipped => None,
        })
    }
}

/// Outcome of resolving one relation of a model. The first matching method
/// decides the outcome; later methods for the same relation reuse it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScopeState {
    Resolved(ScopeDescriptor),
    /// The relation target is not part of the generated module.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeDescriptor {
    /// Display name of the target model.
    pub target: String,
    /// API-facing operation name (`widgets`, `widgets.create`, ...) to method.
    pub methods: BTreeMap<String, MethodDescriptor>,
}

impl ScopeDescriptor {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            methods: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub is_static: bool,
    pub accepts: Vec<Parameter>,
    pub returns_array: bool,
    pub description: String,
    /// Shown to users of the generated client as a deprecation notice.
    pub deprecated: Option<String>,
    /// Marks a method kept for compatibility; the note names the replacement.
    pub internal: Option<String>,
    pub resource_params: Vec<Parameter>,
    pub has_resource_params: bool,
    pub binding: HttpBinding,
    /// Display name of the model whose REST surface serves this method.
    pub owner: String,
}

impl MethodDescriptor {
    pub fn from_remote(method: &RemoteMethod, owner: &str) -> Self {
        Self {
            name: method.name.clone(),
            is_static: method.is_static,
            accepts: method.accepts.clone(),
            returns_array: method.is_returning_array(),
            description: method
                .description
                .as_ref()
                .map(|d| d.normalize())
                .unwrap_or_default(),
            deprecated: method.deprecated.clone(),
            internal: None,
            resource_params: Vec::new(),
            has_resource_params: false,
            binding: method.binding.clone(),
            owner: owner.to_string(),
        }
    }

    /// Copy with a new name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy with a new name that returns an array.
    pub fn returning_array(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            returns_array: true,
            ..self.clone()
        }
    }

    /// Copy with a new `internal` note.
    pub fn with_internal(self, note: Option<String>) -> Self {
        Self {
            internal: note,
            ..self
        }
    }

    /// Copy exposed as a public call: no deprecation, not internal.
    pub fn public(self) -> Self {
        Self {
            deprecated: None,
            internal: None,
            ..self
        }
    }

    /// Path parameters other than the blanket identifier.
    pub fn collect_resource_params(&mut self) {
        for param in &self.accepts {
            if param.source() == Some(ParamSource::Path) && param.name != ID_PARAM {
                self.resource_params.push(param.clone());
                self.has_resource_params = true;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescriptor {
    pub name: String,
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Models of one run, in collection order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelSet {
    pub models: Vec<ModelDescriptor>,
}

impl ModelSet {
    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.models.iter().position(|m| m.name == name)
    }

    /// Position of a model by display name, ignoring case.
    pub fn position_ignore_case(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.models
            .iter()
            .position(|m| m.name.to_lowercase() == lower)
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelDescriptor> {
        self.models.iter()
    }
}
