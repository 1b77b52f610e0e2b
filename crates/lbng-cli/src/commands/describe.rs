use anyhow::Result;
use colored::Colorize;
use lbng_core::model::ModelSet;
use lbng_core::{describe_models, Application, LbngConfig};
use std::path::Path;

pub fn run(input: &Path) -> Result<()> {
    let config = LbngConfig::load_or_default(Path::new("."))?;
    config.generator.validate()?;

    let app = Application::load(input)?;
    let models = describe_models(&app, &config.generator);
    print!("{}", summary(&models));
    Ok(())
}

fn summary(models: &ModelSet) -> String {
    let mut out = String::new();
    for model in models.iter() {
        out.push_str(&format!("{} {}\n", model.name.bold(), model.rest_path.dimmed()));
        for method in &model.methods {
            let marker = if method.internal.is_some() { " (internal)" } else { "" };
            out.push_str(&format!("  {}{}\n", method.name, marker));
        }
        for (name, scope) in model.resolved_scopes() {
            out.push_str(&format!("  {} {} {}\n", "scope".cyan(), name, scope.target));
            for api_name in scope.methods.keys() {
                out.push_str(&format!("    .{}\n", api_name));
            }
        }
    }
    out.push_str(&format!("{} models\n", models.len()));
    out
}
