use anyhow::{bail, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils;

pub const CONFIG_FILE: &str = "lbng.toml";

/// Options for a single generation run.
///
/// Field names are snake_case in `lbng.toml`; the camelCase spellings used by
/// option objects elsewhere are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    #[serde(alias = "moduleName", alias = "ngModuleName")]
    pub module_name: String,
    #[serde(alias = "apiUrl")]
    pub api_url: String,
    #[serde(alias = "includeCommonModules")]
    pub include_common_modules: bool,
    #[serde(alias = "namespaceModels")]
    pub namespace_models: bool,
    #[serde(alias = "namespaceCommonModels")]
    pub namespace_common_models: bool,
    #[serde(alias = "namespaceDelimiter")]
    pub namespace_delimiter: String,
    #[serde(alias = "modelsToIgnore")]
    pub models_to_ignore: Vec<String>,
    pub comments: bool,
    #[serde(alias = "includeSchema")]
    pub include_schema: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            module_name: "lbServices".to_string(),
            api_url: "/".to_string(),
            include_common_modules: true,
            namespace_models: false,
            namespace_common_models: false,
            namespace_delimiter: ".".to_string(),
            models_to_ignore: Vec::new(),
            comments: false,
            include_schema: false,
        }
    }
}

/// Legacy positional form: `(module_name, api_url)`.
impl From<(&str, &str)> for GeneratorOptions {
    fn from((module_name, api_url): (&str, &str)) -> Self {
        Self {
            module_name: module_name.to_string(),
            api_url: api_url.to_string(),
            ..Self::default()
        }
    }
}

impl GeneratorOptions {
    /// Reject option combinations the generated module cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.namespace_common_models && self.namespace_delimiter == "." {
            bail!(
                "Namespace delimiter '.' is not supported for common models. \
                 Pick another namespace_delimiter or disable namespace_common_models"
            );
        }
        Ok(())
    }

    /// `api_url` without trailing slashes, as used for `urlBase` in the output.
    pub fn url_base(&self) -> String {
        self.api_url.trim_end_matches('/').to_string()
    }

    /// Display name of a model: first character capitalized, optionally namespaced.
    pub fn format_model_name(&self, raw: &str) -> String {
        let name = utils::capitalize(raw);
        if self.namespace_models {
            format!("{}{}{}", self.module_name, self.namespace_delimiter, name)
        } else {
            name
        }
    }

    /// Name of a shared service (`LoopBackAuth`, ...), namespaced when configured.
    pub fn common_service_name(&self, base: &str) -> String {
        if self.namespace_common_models {
            format!("{}{}{}", self.module_name, self.namespace_delimiter, base)
        } else {
            base.to_string()
        }
    }

    pub fn is_ignored(&self, formatted_name: &str) -> bool {
        self.models_to_ignore.iter().any(|m| m == formatted_name)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where `lbng generate` writes when no output path is given.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Active environment, selects the `lbng.{env}.toml` overlay.
    #[serde(default = "default_environment")]
    pub active: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            active: default_environment(),
        }
    }
}

fn default_environment() -> String {
    std::env::var("LBNG_ENV").unwrap_or_else(|_| "development".to_string())
}

/// Contents of `lbng.toml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LbngConfig {
    #[serde(default)]
    pub generator: GeneratorOptions,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Lay `overlay` over `base`: tables merge key by key, anything else is replaced.
fn overlay(base: &mut toml::Value, overlay_value: toml::Value) {
    match (base, overlay_value) {
        (toml::Value::Table(base), toml::Value::Table(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn read_toml(path: &Path) -> Result<toml::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// `LBNG_ENV`, else `[environment] active`, else "development".
fn active_environment(base: &toml::Value) -> String {
    std::env::var("LBNG_ENV").unwrap_or_else(|_| {
        base.get("environment")
            .and_then(|e| e.get("active"))
            .and_then(|a| a.as_str())
            .unwrap_or("development")
            .to_string()
    })
}

impl LbngConfig {
    /// Read `lbng.toml` from `dir`, with `lbng.{env}.toml` laid over it when present.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut value = read_toml(&dir.join(CONFIG_FILE))?;

        let env_path = dir.join(format!("lbng.{}.toml", active_environment(&value)));
        if env_path.exists() {
            overlay(&mut value, read_toml(&env_path)?);
        }

        value
            .try_into()
            .with_context(|| format!("Invalid configuration in {}", dir.display()))
    }

    /// Like `load`, but a missing `lbng.toml` yields the defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        if dir.join(CONFIG_FILE).exists() {
            Self::load(dir)
        } else {
            Ok(Self::default())
        }
    }
}
