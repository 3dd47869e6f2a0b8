//! Core data types for the Panelcraft comic generation library.
//!
//! This crate provides the vocabulary shared by every stage of the
//! pipeline: panels and their image status, the story request that starts
//! a session, and the session phase.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod genre;
mod image;
mod panel;
mod phase;
mod request;

pub use genre::Genre;
pub use image::ImageRef;
pub use panel::{ImageStatus, Panel, PanelEdit, PanelScript};
pub use phase::SessionPhase;
pub use request::{PanelCount, StoryRequest, StoryRequestBuilder, VoiceHandle};
