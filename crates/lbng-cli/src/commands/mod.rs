pub mod describe;
pub mod generate;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lbng_core::GeneratorOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lbng",
    version,
    about = "Generate an AngularJS $resource module from a REST model registry"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the services module
    Generate(GenerateArgs),
    /// Print the models, methods and relation scopes found in a registry
    Describe {
        /// Registry export (JSON)
        input: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Registry export (JSON)
    pub input: PathBuf,
    /// Output file; defaults to `[output] path` in lbng.toml, then stdout
    pub output: Option<PathBuf>,
    /// AngularJS module name
    #[arg(short, long)]
    pub module_name: Option<String>,
    /// Base URL of the REST API
    #[arg(short = 'u', long = "url")]
    pub api_url: Option<String>,
    /// Leave out LoopBackAuth, the auth interceptor and the resource provider
    #[arg(long)]
    pub no_common_modules: bool,
    /// Prefix model services with the module name
    #[arg(long)]
    pub namespace_models: bool,
    /// Prefix the common services with the module name
    #[arg(long)]
    pub namespace_common_models: bool,
    /// Separator between the module name and a namespaced service
    #[arg(long)]
    pub namespace_delimiter: Option<String>,
    /// Model to leave out, by display name (repeatable)
    #[arg(long = "ignore", value_name = "MODEL")]
    pub ignore: Vec<String>,
    /// Emit ngdoc comments
    #[arg(long)]
    pub comments: bool,
    /// Attach a property schema to every model service
    #[arg(long)]
    pub include_schema: bool,
    /// Fail if the output file is out of date instead of writing it
    #[arg(long)]
    pub check: bool,
}

impl GenerateArgs {
    /// Layer command-line flags over options loaded from lbng.toml.
    pub fn apply(&self, mut options: GeneratorOptions) -> GeneratorOptions {
        if let Some(name) = &self.module_name {
            options.module_name = name.clone();
        }
        if let Some(url) = &self.api_url {
            options.api_url = url.clone();
        }
        if self.no_common_modules {
            options.include_common_modules = false;
        }
        if self.namespace_models {
            options.namespace_models = true;
        }
        if self.namespace_common_models {
            options.namespace_common_models = true;
        }
        if let Some(delimiter) = &self.namespace_delimiter {
            options.namespace_delimiter = delimiter.clone();
        }
        options.models_to_ignore.extend(self.ignore.iter().cloned());
        if self.comments {
            options.comments = true;
        }
        if self.include_schema {
            options.include_schema = true;
        }
        options
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => generate::run(&args),
        Commands::Describe { input } => describe::run(&input),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lbng", &mut std::io::stdout());
            Ok(())
        }
    }
}
