//! # Module Configuration
//!
//! Which module types load is configurable per platform and run mode. The
//! config carries an optional explicit exclusion list and a prioritized list
//! of platform×mode overrides, each pointing at an alternate exclusion list.
//! Resolution happens once per load: explicit override first, then the first
//! matching platform+mode entry, otherwise no exclusions.

use serde::{Deserialize, Serialize};

/// Platform the host is currently running for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Web,
}

/// How the engine process is running.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RuntimeMode {
    Editor,
    PlayMode,
    Player,
}

/// One platform×mode override pointing at an alternate exclusion list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigOverride {
    pub platform: Platform,
    pub mode: RuntimeMode,
    pub excluded: Vec<String>,
}

/// Module-set configuration, resolved once per load cycle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// When set, wins over every platform override.
    #[serde(default)]
    pub explicit_exclusions: Option<Vec<String>>,
    /// Checked in order; the first platform+mode match applies.
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl ModuleConfig {
    /// The effective exclusion list (fully-qualified type names) for one
    /// load cycle.
    pub fn resolve_exclusions(&self, platform: Platform, mode: RuntimeMode) -> &[String] {
        if let Some(explicit) = &self.explicit_exclusions {
            return explicit;
        }
        if let Some(entry) = self
            .overrides
            .iter()
            .find(|o| o.platform == platform && o.mode == mode)
        {
            return &entry.excluded;
        }
        &[]
    }
}
