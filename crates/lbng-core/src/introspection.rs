//! Reading a method's HTTP endpoint.
//!
//! Registries exported by remoting 3 and later describe each method with a list
//! of endpoints; older ones carry a single verb and full path. The dialect is
//! picked once per run from the registry's remoting version.

use anyhow::{anyhow, bail, Result};

use crate::model::MethodDescriptor;
use crate::registry::{Application, ENDPOINTS_API_VERSION};

pub const VERB: &str = "verb";
pub const FULL_PATH: &str = "fullPath";

pub trait EndpointIntrospector {
    /// A property of the method's first endpoint.
    fn endpoint_property(&self, method: &MethodDescriptor, prop: &str) -> Result<String>;

    fn verb(&self, method: &MethodDescriptor) -> Result<String> {
        self.endpoint_property(method, VERB)
    }

    fn full_path(&self, method: &MethodDescriptor) -> Result<String> {
        self.endpoint_property(method, FULL_PATH)
    }
}

/// Remoting 3+: `endpoints: [{ verb, fullPath }, ...]`.
pub struct EndpointsApi;

impl EndpointIntrospector for EndpointsApi {
    fn endpoint_property(&self, method: &MethodDescriptor, prop: &str) -> Result<String> {
        let endpoint = method
            .binding
            .endpoints
            .as_ref()
            .and_then(|e| e.first())
            .ok_or_else(|| anyhow!("Method '{}' has no endpoints", method.name))?;
        match prop {
            VERB => Ok(endpoint.verb.clone()),
            FULL_PATH => Ok(endpoint.full_path.clone()),
            _ => bail!("Unknown endpoint property: {}", prop),
        }
    }
}

/// Remoting 2: `verb` and `fullPath` directly on the method.
pub struct LegacyHttpApi;

impl EndpointIntrospector for LegacyHttpApi {
    fn endpoint_property(&self, method: &MethodDescriptor, prop: &str) -> Result<String> {
        let value = match prop {
            VERB => method.binding.verb.as_ref(),
            FULL_PATH => method.binding.full_path.as_ref(),
            _ => bail!("Unsupported endpoint property: {}", prop),
        };
        value
            .cloned()
            .ok_or_else(|| anyhow!("Method '{}' has no {}", method.name, prop))
    }
}

pub fn select_introspector(app: &Application) -> Box<dyn EndpointIntrospector> {
    if app.remoting_version >= ENDPOINTS_API_VERSION {
        Box::new(EndpointsApi)
    } else {
        Box::new(LegacyHttpApi)
    }
}
