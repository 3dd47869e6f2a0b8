//! Comic session state for Panelcraft.
//!
//! A [`ComicSession`] moves through
//!
//! ```text
//! Idle -> ScriptStreaming -> ScriptReview -> ImageGenerating -> Completed
//! ```
//!
//! and lives in a [`SessionStore`] that renders a snapshot to the display
//! layer after every change. [`ComicController`] turns display-layer
//! [`Intent`]s into session changes, script streams, image generation and
//! [`PlaybackController`] slideshows.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod intent;
mod playback;
mod session;
mod store;

pub use controller::{ComicController, ComicServices, ComicServicesBuilder};
pub use intent::{Intent, IntentOutcome};
pub use playback::{PlaybackController, PlaybackMode, PlaybackState, Slide};
pub use session::ComicSession;
pub use store::SessionStore;
