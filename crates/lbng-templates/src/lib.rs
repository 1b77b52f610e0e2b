use rust_embed::RustEmbed;

/// Templates for the generated AngularJS module, embedded at compile time.
///
/// `.tera` files are loaded into the template engine; anything else is served raw.
#[derive(RustEmbed)]
#[folder = "templates/"]
pub struct Templates;

/// Entry template rendered for a whole generation run.
pub const SERVICES_TEMPLATE: &str = "services.js.tera";
