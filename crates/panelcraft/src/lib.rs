//! Panelcraft: turn a story idea into a narrated comic.
//!
//! A language model streams a panel-by-panel script, which can be edited
//! and revised panel by panel. Once approved, a character reference image
//! is drawn and every panel image is generated concurrently with one retry.
//! The finished comic can be played back as a narrated slideshow or
//! downloaded to a directory.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use panelcraft::{
//!     ComicController, ComicServicesBuilder, ConsoleNarrator, Intent, OpenAICompatibleClient,
//!     PanelcraftConfig, StoryRequestBuilder,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PanelcraftConfig::load(None)?;
//! let client = Arc::new(OpenAICompatibleClient::new(config.provider().clone())?);
//! let services = ComicServicesBuilder::default()
//!     .scripts(client.clone())
//!     .reviser(client.clone())
//!     .references(client.clone())
//!     .images(client)
//!     .narrator(Arc::new(ConsoleNarrator::new(180)))
//!     .build()?;
//! let controller = ComicController::new(services, config.pipeline().clone());
//!
//! let request = StoryRequestBuilder::default().idea("A robot adopts a kitten").build()?;
//! controller.handle(Intent::Generate(request)).await?;
//! controller.handle(Intent::Approve).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod export;
mod narrator;
mod observer;

pub use config::{
    NarrationConfig, NarrationConfigBuilder, PanelcraftConfig, PanelcraftConfigBuilder,
    SessionDefaults, SessionDefaultsBuilder,
};
pub use export::{DirectoryExporter, SCRIPT_FILE, image_file_name};
pub use narrator::ConsoleNarrator;
pub use observer::LoggingObserver;

pub use panelcraft_core::{
    Genre, ImageRef, ImageStatus, Panel, PanelCount, PanelEdit, PanelScript, SessionPhase,
    StoryRequest, StoryRequestBuilder, VoiceHandle,
};
pub use panelcraft_error::{PanelcraftError, PanelcraftErrorKind, PanelcraftResult};
pub use panelcraft_images::{GenerationSummary, PanelImagePipeline, PipelineConfig};
pub use panelcraft_interface::{
    ComicExporter, ExportReport, NarrationDevice, SessionObserver, SessionSnapshot,
};
pub use panelcraft_models::{OpenAICompatibleClient, ProviderConfig};
pub use panelcraft_script::{ScriptStreamParser, ScriptUpdate};
pub use panelcraft_session::{
    ComicController, ComicServices, ComicServicesBuilder, Intent, IntentOutcome,
    PlaybackController, PlaybackMode, PlaybackState, Slide,
};
