pub mod context;
pub mod postprocess;

use anyhow::{bail, Result};

use crate::config::GeneratorOptions;
use crate::introspection::select_introspector;
use crate::registry::Application;
use crate::template::TemplateEngine;
use crate::utils;
use lbng_templates::SERVICES_TEMPLATE;
use postprocess::{Downlevel, PostProcessor};

pub use crate::describe::describe_models;

/// Render the AngularJS `$resource` module for every model of `app`.
///
/// Accepts full [`GeneratorOptions`] or a `(module_name, api_url)` pair.
pub fn generate_services(app: &Application, options: impl Into<GeneratorOptions>) -> Result<String> {
    let options = options.into();
    options.validate()?;

    let rendered = match render(app, &options) {
        Ok(rendered) => rendered,
        Err(e) => {
            utils::ui::error(&format!("{:#}", e));
            bail!("Code generation failed: {:#}", e);
        }
    };

    Downlevel.process(&rendered)
}

fn render(app: &Application, options: &GeneratorOptions) -> Result<String> {
    let introspector = select_introspector(app);
    let models = describe_models(app, options);
    let ctx = context::build_context(&models, options, introspector.as_ref())?;

    let engine = TemplateEngine::new()?;
    engine.render(SERVICES_TEMPLATE, &ctx)
}
