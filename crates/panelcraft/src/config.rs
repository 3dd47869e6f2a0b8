//! Layered application settings.
//!
//! Settings come from an optional TOML file, then from environment
//! variables such as `PANELCRAFT_PROVIDER__API_KEY`, later sources winning.

use config::{Config, Environment, File, FileFormat, Map, Source};
use derive_getters::Getters;
use panelcraft_core::{Genre, PanelCount, VoiceHandle};
use panelcraft_error::{ConfigError, PanelcraftResult};
use panelcraft_images::PipelineConfig;
use panelcraft_models::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "panelcraft.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "PANELCRAFT";

/// Defaults applied to new story requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct SessionDefaults {
    /// Panel count when the user does not pick one
    default_panel_count: PanelCount,
    /// Genre when the user does not pick one
    default_genre: Genre,
}

/// Console narration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct NarrationConfig {
    /// Voice selected at startup
    voice: Option<VoiceHandle>,
    /// Reading speed used to pace captions
    words_per_minute: u32,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            voice: None,
            words_per_minute: 180,
        }
    }
}

/// All settings for the `panelcraft` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct PanelcraftConfig {
    /// Script and image provider
    provider: ProviderConfig,
    /// Image pipeline behavior
    pipeline: PipelineConfig,
    /// Story request defaults
    session: SessionDefaults,
    /// Playback narration
    narration: NarrationConfig,
}

impl PanelcraftConfig {
    /// Load settings from `path` (or `panelcraft.toml` if present) and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if an explicit `path` is missing or any
    /// source fails to parse.
    #[tracing::instrument]
    pub fn load(path: Option<&Path>) -> PanelcraftResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::assemble(file, environment())
    }

    /// Load settings from TOML text overlaid with the given environment
    /// variables instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if either source fails to parse.
    pub fn from_toml(toml: &str, env: Map<String, String>) -> PanelcraftResult<Self> {
        Self::assemble(
            File::from_str(toml, FileFormat::Toml),
            environment().source(Some(env)),
        )
    }

    fn assemble(
        file: impl Source + Send + Sync + 'static,
        env: Environment,
    ) -> PanelcraftResult<Self> {
        let config: Self = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(ConfigError::from)?;
        tracing::debug!(
            provider = %config.provider.name(),
            placeholder = config.pipeline.placeholder_mode(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
