//! Story requests and their bounded parameters.

use crate::Genre;
use panelcraft_error::{SessionError, SessionErrorKind};
use serde::{Deserialize, Serialize};

/// Number of panels in a comic, bounded to `5..=10`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct PanelCount(u8);

impl PanelCount {
    /// Smallest supported comic.
    pub const MIN: u8 = 5;
    /// Largest supported comic.
    pub const MAX: u8 = 10;

    /// Validate a requested panel count.
    ///
    /// # Errors
    ///
    /// Returns `PanelCountOutOfRange` outside `5..=10`.
    ///
    /// # Examples
    ///
    /// ```
    /// use panelcraft_core::PanelCount;
    ///
    /// assert_eq!(PanelCount::new(5).unwrap().get(), 5);
    /// assert!(PanelCount::new(11).is_err());
    /// ```
    #[track_caller]
    pub fn new(count: u8) -> Result<Self, SessionError> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(SessionError::new(SessionErrorKind::PanelCountOutOfRange {
                requested: count,
                min: Self::MIN,
                max: Self::MAX,
            }))
        }
    }

    /// The count as a `usize` for comparisons against panel lists.
    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

impl Default for PanelCount {
    fn default() -> Self {
        Self(6)
    }
}

impl TryFrom<u8> for PanelCount {
    type Error = SessionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PanelCount> for u8 {
    fn from(count: PanelCount) -> Self {
        count.0
    }
}

/// Opaque handle naming a narration voice.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
pub struct VoiceHandle(String);

impl VoiceHandle {
    /// The voice name as understood by the narration device.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VoiceHandle {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Everything the user supplies to start a comic.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct StoryRequest {
    /// Free-form story idea
    idea: String,
    /// Genre steering tone and art style
    #[builder(default)]
    genre: Genre,
    /// Number of panels to script
    #[builder(default)]
    panel_count: PanelCount,
}

impl StoryRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.idea {
            Some(idea) if idea.trim().is_empty() => Err(SessionErrorKind::EmptyIdea.to_string()),
            _ => Ok(()),
        }
    }
}
