//! Relation scopes.
//!
//! Remote methods named `prototype.__<op>__<scope>` operate on the relation
//! `<scope>` of a model instance. For each of them the resolver
//!
//! - records a scope on the source model, keyed by an API name
//!   (`widgets`, `widgets.create`, `widgets.destroyAll`, ...), whose method is
//!   what the generated relation accessor calls;
//! - appends a reverse method `::<op>::<model>::<scope>` to the target model, so
//!   the call goes through the target's resource and yields target instances;
//! - marks the original prototype method internal, pointing at the accessor.
//!
//! The first method seen for a relation decides whether it is exposed at all:
//! a relation whose target is not part of the module is latched as skipped.

use regex::Regex;
use std::sync::OnceLock;

use super::augment::{CREATE, CREATE_MANY};
use crate::config::GeneratorOptions;
use crate::model::{ModelSet, ScopeDescriptor, ScopeState};
use crate::registry::{Application, ModelClass};

const PROTOTYPE_PREFIX: &str = "prototype.";

fn relation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^prototype\.__([^_]+)__(.+)$").expect("relation method pattern is valid")
    })
}

/// `prototype.__<op>__<scope>` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMethod {
    pub op: String,
    pub scope: String,
}

impl RelationMethod {
    pub fn parse(method_name: &str) -> Option<Self> {
        let caps = relation_pattern().captures(method_name)?;
        Some(Self {
            op: caps[1].to_string(),
            scope: caps[2].to_string(),
        })
    }

    /// Name of the accessor in the generated client.
    pub fn api_name(&self) -> String {
        match self.op.as_str() {
            "get" => self.scope.clone(),
            "delete" => format!("{}.destroyAll", self.scope),
            op => format!("{}.{}", self.scope, op),
        }
    }

    /// Name of the method appended to the target model.
    pub fn reverse_name(&self, declared_model: &str) -> String {
        format!(
            "::{}::{}::{}",
            self.op,
            declared_model.to_lowercase(),
            self.scope
        )
    }
}

/// Method name without the instance prefix, as used by exposed-method filters.
pub fn bare_method_name(name: &str) -> &str {
    name.strip_prefix(PROTOTYPE_PREFIX).unwrap_or(name)
}

fn to_create_many(s: &str) -> String {
    s.replacen(CREATE, CREATE_MANY, 1)
}

/// Resolve relation scopes of every model, in collection order.
pub fn resolve_scopes(app: &Application, options: &GeneratorOptions, set: &mut ModelSet) {
    for idx in 0..set.models.len() {
        let Some(class) = app.class(&set.models[idx].declared_name) else {
            continue;
        };
        // Reverse methods appended to this model during the loop are not rescanned.
        let count = set.models[idx].methods.len();
        for method_idx in 0..count {
            resolve_scope_method(app, options, class, set, idx, method_idx);
        }
    }
}

fn resolve_scope_method(
    app: &Application,
    options: &GeneratorOptions,
    class: &ModelClass,
    set: &mut ModelSet,
    idx: usize,
    method_idx: usize,
) {
    let method = set.models[idx].methods[method_idx].clone();
    let Some(relation) = RelationMethod::parse(&method.name) else {
        return;
    };
    let Some(target_class) = class.relation_target(&relation.scope) else {
        return;
    };

    let target_idx = match set.models[idx].scopes.get(&relation.scope) {
        Some(ScopeState::Skipped) => return,
        Some(ScopeState::Resolved(scope)) => match set.position(&scope.target) {
            Some(target_idx) => target_idx,
            None => return,
        },
        None => {
            let target_name = options.format_model_name(target_class);
            let Some(target_idx) = set.position_ignore_case(&target_name) else {
                set.models[idx]
                    .scopes
                    .insert(relation.scope.clone(), ScopeState::Skipped);
                return;
            };

            let excluded = app
                .class(&set.models[target_idx].declared_name)
                .map(|target| !target.exposes_method(bare_method_name(&method.name)))
                .unwrap_or(false);
            if excluded {
                return;
            }

            let scope = ScopeDescriptor::new(set.models[target_idx].name.clone());
            set.models[idx]
                .scopes
                .insert(relation.scope.clone(), ScopeState::Resolved(scope));
            target_idx
        }
    };

    let api_name = relation.api_name();
    let note = format!("Use {}.{}() instead.", set.models[idx].name, api_name);
    set.models[idx].methods[method_idx].internal = Some(note.clone());

    let reverse_name = relation.reverse_name(&set.models[idx].declared_name);

    let reverse = method.renamed(&reverse_name).with_internal(Some(note));
    let reverse_many = reverse.name.contains(CREATE).then(|| {
        reverse
            .returning_array(to_create_many(&reverse.name))
            .with_internal(reverse.internal.as_deref().map(to_create_many))
    });
    let target = &mut set.models[target_idx];
    target.methods.push(reverse);
    target.methods.extend(reverse_many);

    let scope_method = method.renamed(&reverse_name).public();
    let scope_many = scope_method.name.contains(CREATE).then(|| {
        (
            to_create_many(&api_name),
            scope_method.returning_array(to_create_many(&scope_method.name)),
        )
    });
    if let Some(ScopeState::Resolved(scope)) = set.models[idx].scopes.get_mut(&relation.scope) {
        scope.methods.insert(api_name, scope_method);
        if let Some((many_api_name, many)) = scope_many {
            scope.methods.insert(many_api_name, many);
        }
    }
}
