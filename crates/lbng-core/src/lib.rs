pub mod config;
pub mod describe;
pub mod generator;
pub mod introspection;
pub mod model;
pub mod registry;
pub mod template;
pub mod utils;

pub use config::{GeneratorOptions, LbngConfig};
pub use generator::{describe_models, generate_services};
pub use registry::Application;
