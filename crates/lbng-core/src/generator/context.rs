use anyhow::Result;
use serde_json::{json, Value};
use tera::Context;

use crate::config::GeneratorOptions;
use crate::introspection::EndpointIntrospector;
use crate::model::{MethodDescriptor, ModelDescriptor, ModelSet, ScopeDescriptor};
use crate::registry::Parameter;
use crate::utils;

/// Names of the shared services every model factory depends on.
pub mod services {
    pub const AUTH: &str = "LoopBackAuth";
    pub const AUTH_INTERCEPTOR: &str = "LoopBackAuthRequestInterceptor";
    pub const RESOURCE: &str = "LoopBackResource";
}

/// Build the Tera context for the whole module.
pub fn build_context(
    set: &ModelSet,
    options: &GeneratorOptions,
    introspector: &dyn EndpointIntrospector,
) -> Result<Context> {
    let mut ctx = Context::new();
    ctx.insert("module_name", &options.module_name);
    ctx.insert("url_base", &options.url_base());
    ctx.insert("include_common_modules", &options.include_common_modules);
    ctx.insert("include_schema", &options.include_schema);
    ctx.insert("comments", &options.comments);

    ctx.insert(
        "services",
        &json!({
            "auth": options.common_service_name(services::AUTH),
            "auth_interceptor": options.common_service_name(services::AUTH_INTERCEPTOR),
            "resource": options.common_service_name(services::RESOURCE),
        }),
    );

    let models = set
        .iter()
        .map(|model| model_view(model, introspector))
        .collect::<Result<Vec<_>>>()?;
    ctx.insert("models", &models);

    Ok(ctx)
}

fn model_view(model: &ModelDescriptor, introspector: &dyn EndpointIntrospector) -> Result<Value> {
    let actions = model
        .methods
        .iter()
        .map(|m| action_view(model, m, introspector))
        .collect::<Result<Vec<_>>>()?;

    let scopes: Vec<Value> = model
        .resolved_scopes()
        .map(|(name, scope)| scope_view(name, scope))
        .collect();

    let schema_json = match &model.schema {
        Some(schema) => Some(serde_json::to_string(schema)?),
        None => None,
    };

    Ok(json!({
        "name": model.name,
        "doc_lines": doc_lines(&model.description),
        "url": format!("{}/:id", model.rest_path),
        "is_user": model.is_user,
        "actions": actions,
        "scopes": scopes,
        "schema_json": schema_json,
    }))
}

fn action_view(
    model: &ModelDescriptor,
    method: &MethodDescriptor,
    introspector: &dyn EndpointIntrospector,
) -> Result<Value> {
    let verb = introspector.verb(method)?.to_uppercase();
    let url = introspector.full_path(method)?;

    let is_login = model.is_user && method.is_static && method.name == "login";
    let is_logout = model.is_user && method.is_static && method.name == "logout";

    let params_literal = if is_login {
        Some("{ include: 'user' }".to_string())
    } else if method.has_resource_params {
        Some(resource_params_literal(&method.resource_params))
    } else {
        None
    };

    Ok(json!({
        "name": method.name,
        "verb": verb,
        "url": url,
        "is_array": method.returns_array,
        "is_static": method.is_static,
        "internal": method.internal.as_deref().map(single_line),
        "deprecated": method.deprecated.as_deref().map(single_line),
        "doc_lines": doc_lines(&method.description),
        "params": method.accepts.iter().map(param_doc).collect::<Vec<_>>(),
        "params_literal": params_literal,
        "is_login": is_login,
        "is_logout": is_logout,
    }))
}

fn scope_view(name: &str, scope: &ScopeDescriptor) -> Value {
    let operations: Vec<Value> = scope
        .methods
        .iter()
        .map(|(api_name, method)| {
            json!({
                "api_name": api_name,
                "method": method.name,
                "doc_lines": doc_lines(&method.description),
                "params": method.accepts.iter().map(param_doc).collect::<Vec<_>>(),
                "is_array": method.returns_array,
            })
        })
        .collect();

    json!({
        "name": name,
        "target": scope.target,
        "has_default_accessor": scope.methods.contains_key(name),
        "operations": operations,
    })
}

/// `{ 'fk': '@fk' }` for `$resource` action params.
fn resource_params_literal(params: &[Parameter]) -> String {
    let entries: Vec<String> = params
        .iter()
        .map(|p| {
            format!(
                "{}: {}",
                utils::js_string(&p.name),
                utils::js_string(&format!("@{}", p.name))
            )
        })
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

/// One ngdoc `@param` line body: `{type=} name description`.
fn param_doc(param: &Parameter) -> String {
    let type_name = match &param.type_name {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(_)) => "Array".to_string(),
        _ => "*".to_string(),
    };
    let optional = if param.required { "" } else { "=" };
    let mut line = format!("{{{}{}}} {}", type_name, optional, param.name);
    if let Some(description) = &param.description {
        line.push(' ');
        line.push_str(&single_line(&description.normalize()));
    }
    sanitize_comment(&line)
}

/// Description lines safe to place inside a `/** */` block.
fn doc_lines(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }
    description.lines().map(sanitize_comment).collect()
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sanitize_comment(s: &str) -> String {
    s.replace("*/", "*\\/")
}
