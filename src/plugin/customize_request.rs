//! Add parameters or headers to outgoing requests.

use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::client::endpoint::Endpoint;
use crate::client::request::Request;
use crate::error::{LucernaError, Result};
use crate::plugin::Plugin;

/// Where a customization is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationKind {
    #[default]
    Param,
    Header,
}

/// A parameter or header added to requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub key: String,
    #[serde(default)]
    pub kind: CustomizationKind,
    pub name: String,
    pub value: String,
    /// Applied to every request; otherwise only to the next one.
    #[serde(default)]
    pub persistent: bool,
    /// Replace existing values instead of appending.
    #[serde(default)]
    pub overwrite: bool,
}

impl Customization {
    pub fn param(key: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Customization {
            key: key.into(),
            kind: CustomizationKind::Param,
            name: name.into(),
            value: value.into(),
            persistent: false,
            overwrite: false,
        }
    }

    pub fn header(key: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Customization {
            kind: CustomizationKind::Header,
            ..Customization::param(key, name, value)
        }
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.key.is_empty() || self.name.is_empty() {
            return Err(LucernaError::invalid_argument(
                "A customization needs a key and a name",
            ));
        }
        Ok(())
    }

    fn apply(&self, request: &mut Request) {
        match (self.kind, self.overwrite) {
            (CustomizationKind::Param, true) => {
                request.set_param(self.name.as_str(), &self.value);
            }
            (CustomizationKind::Param, false) => {
                request.add_param(self.name.as_str(), &self.value);
            }
            (CustomizationKind::Header, true) => {
                request.set_header(self.name.as_str(), self.value.as_str());
            }
            (CustomizationKind::Header, false) => {
                request.add_header(self.name.as_str(), self.value.as_str());
            }
        }
    }
}

/// Applies keyed customizations to every request.
///
/// # Examples
///
/// ```
/// use lucerna::client::endpoint::Endpoint;
/// use lucerna::client::request::Request;
/// use lucerna::plugin::{Customization, CustomizeRequest, Plugin};
///
/// let plugin = CustomizeRequest::new();
/// plugin
///     .add_customization(Customization::param("trace", "debug", "timing"))
///     .unwrap();
///
/// let mut request = Request::new();
/// plugin
///     .pre_execute_request(&mut request, &Endpoint::default())
///     .unwrap();
/// assert_eq!(request.param("debug"), Some("timing"));
/// assert!(plugin.customization("trace").is_none());
/// ```
#[derive(Debug, Default)]
pub struct CustomizeRequest {
    customizations: Mutex<Vec<Customization>>,
}

impl CustomizeRequest {
    pub fn new() -> Self {
        CustomizeRequest::default()
    }

    /// Add a customization, replacing one with the same key.
    pub fn add_customization(&self, customization: Customization) -> Result<()> {
        customization.validate()?;
        let mut customizations = self.customizations.lock();
        match customizations
            .iter_mut()
            .find(|c| c.key == customization.key)
        {
            Some(existing) => *existing = customization,
            None => customizations.push(customization),
        }
        Ok(())
    }

    pub fn customization(&self, key: &str) -> Option<Customization> {
        self.customizations
            .lock()
            .iter()
            .find(|c| c.key == key)
            .cloned()
    }

    pub fn customizations(&self) -> Vec<Customization> {
        self.customizations.lock().clone()
    }

    pub fn remove_customization(&self, key: &str) -> Option<Customization> {
        let mut customizations = self.customizations.lock();
        let index = customizations.iter().position(|c| c.key == key)?;
        Some(customizations.remove(index))
    }

    pub fn clear_customizations(&self) {
        self.customizations.lock().clear();
    }
}

impl Plugin for CustomizeRequest {
    fn pre_execute_request(&self, request: &mut Request, _endpoint: &Endpoint) -> Result<()> {
        let mut customizations = self.customizations.lock();
        for customization in customizations.iter() {
            customization.apply(request);
        }
        let before = customizations.len();
        customizations.retain(|c| c.persistent);
        if customizations.len() < before {
            debug!(
                "Dropped {} one-time request customizations",
                before - customizations.len()
            );
        }
        Ok(())
    }
}
