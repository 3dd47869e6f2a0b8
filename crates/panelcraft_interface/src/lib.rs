//! Trait definitions for the Panelcraft comic generation library.
//!
//! The core consumes its collaborators only through these traits: the
//! script and image services, the narration device, the display layer and
//! the download-all exporter.
//! Provider crates implement them; tests replace them with mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod display;
mod export;
mod generation;
mod narration;

pub use display::{NullObserver, SessionObserver, SessionSnapshot};
pub use export::{ComicExporter, ExportReport};
pub use generation::{
    FragmentStream, PanelImageGenerator, PanelImageRequest, PanelImageRequestBuilder,
    PanelScriptReviser, ReferenceImageGenerator, RevisionRequest, RevisionRequestBuilder,
    ScriptGenerator,
};
pub use narration::NarrationDevice;
