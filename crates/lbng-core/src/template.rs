use anyhow::{Context as _, Result};
use lbng_templates::Templates;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new() -> Result<Self> {
        let mut sources = Vec::new();
        for file in Templates::iter() {
            let path = file.as_ref();
            if !path.ends_with(".tera") {
                continue;
            }
            if let Some(content) = Templates::get(path) {
                let content_str = std::str::from_utf8(content.data.as_ref())
                    .with_context(|| format!("Invalid UTF-8 in template '{}'", path))?;
                sources.push((path.to_string(), content_str.to_string()));
            }
        }

        let mut tera = Tera::default();
        // All at once, so includes resolve regardless of embedding order.
        tera.add_raw_templates(sources)?;
        register_filters(&mut tera);

        Ok(TemplateEngine { tera })
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        let result = self
            .tera
            .render(template_name, context)
            .with_context(|| format!("Failed to render template '{}'", template_name))?;
        Ok(result)
    }
}

fn register_filters(tera: &mut Tera) {
    tera.register_filter("q", quote_filter);
    tera.register_filter("js_name", js_name_filter);
}

/// Single-quoted JavaScript string literal.
fn quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(s) => Ok(Value::String(crate::utils::js_string(s))),
        None => Err(tera::Error::msg("q filter expects a string")),
    }
}

/// `prototype.__get__widgets` → `prototype$__get__widgets`
fn js_name_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(s) => Ok(Value::String(s.replace('.', "$"))),
        None => Err(tera::Error::msg("js_name filter expects a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Filter unit tests (direct function calls) ─────────────────────

    fn val(s: &str) -> Value {
        Value::String(s.to_string())
    }
    fn empty_args() -> HashMap<String, Value> {
        HashMap::new()
    }

    #[test]
    fn quote_filter_works() {
        let result = quote_filter(&val("Gadget"), &empty_args()).unwrap();
        assert_eq!(result.as_str().unwrap(), "'Gadget'");
    }

    #[test]
    fn quote_filter_escapes() {
        let result = quote_filter(&val("don't"), &empty_args()).unwrap();
        assert_eq!(result.as_str().unwrap(), "'don\\'t'");
    }

    #[test]
    fn js_name_filter_replaces_dots() {
        let result = js_name_filter(&val("prototype.__get__widgets"), &empty_args()).unwrap();
        assert_eq!(result.as_str().unwrap(), "prototype$__get__widgets");
    }

    #[test]
    fn js_name_filter_leaves_reverse_names() {
        let result = js_name_filter(&val("::get::gadget::widgets"), &empty_args()).unwrap();
        assert_eq!(result.as_str().unwrap(), "::get::gadget::widgets");
    }

    // ── Filter error on non-string ────────────────────────────────────

    #[test]
    fn filters_reject_non_string() {
        let num = Value::Number(serde_json::Number::from(42));
        assert!(quote_filter(&num, &empty_args()).is_err());
        assert!(js_name_filter(&num, &empty_args()).is_err());
    }

    // ── TemplateEngine ────────────────────────────────────────────────

    #[test]
    fn template_engine_creates_successfully() {
        let _engine = TemplateEngine::new().unwrap();
    }

    #[test]
    fn render_inline_template_with_filters() {
        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_template("test", "R[{{ name | js_name | q }}]").unwrap();
        let mut ctx = Context::new();
        ctx.insert("name", "prototype.__get__widgets");
        let result = tera.render("test", &ctx).unwrap();
        assert_eq!(result, "R['prototype$__get__widgets']");
    }

    #[test]
    fn services_template_keys_actions_by_js_name() {
        let engine = TemplateEngine::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("module_name", "shop");
        ctx.insert("url_base", "");
        ctx.insert("include_common_modules", &false);
        ctx.insert("include_schema", &false);
        ctx.insert("comments", &true);
        ctx.insert(
            "services",
            &serde_json::json!({ "auth": "A", "auth_interceptor": "I", "resource": "R" }),
        );
        ctx.insert(
            "models",
            &serde_json::json!([{
                "name": "Gadget",
                "doc_lines": [],
                "url": "/gadgets/:id",
                "is_user": false,
                "scopes": [],
                "schema_json": null,
                "actions": [{
                    "name": "prototype.__get__widgets",
                    "verb": "GET",
                    "url": "/gadgets/:id/widgets",
                    "is_array": true,
                    "internal": null,
                    "deprecated": null,
                    "doc_lines": [],
                    "params": [],
                    "params_literal": null,
                    "is_login": false,
                    "is_logout": false
                }]
            }]),
        );
        let out = engine.render(lbng_templates::SERVICES_TEMPLATE, &ctx).unwrap();
        assert!(out.contains("'prototype$__get__widgets': {"));
        assert!(out.contains("@name shop.Gadget#prototype$__get__widgets"));
        assert!(!out.contains("prototype.__get__widgets"));
    }

    #[test]
    fn render_unknown_template_errors() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("missing.tera", &Context::new()).unwrap_err();
        assert!(err.to_string().contains("missing.tera"));
    }
}
