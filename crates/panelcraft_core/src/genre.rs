//! Story genres offered to the script generator.

use serde::{Deserialize, Serialize};

/// Genre of the comic, steering both script tone and art style.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Genre {
    /// Light-hearted gags
    #[default]
    Comedy,
    /// Character-driven drama
    Drama,
    /// Fights and chases
    Action,
    /// Journeys and discovery
    Adventure,
    /// Magic and myth
    Fantasy,
    /// Science fiction
    SciFi,
    /// Dread and monsters
    Horror,
    /// Clues and reveals
    Mystery,
    /// Love stories
    Romance,
    /// Capes and powers
    Superhero,
    /// Hard-boiled crime
    Noir,
    /// Everyday life
    SliceOfLife,
}

impl Genre {
    /// Art direction appended to image prompts for this genre.
    pub fn art_style(&self) -> &'static str {
        match self {
            Genre::Comedy => "bright flat colors, exaggerated expressions, clean cartoon linework",
            Genre::Drama => "muted palette, cinematic framing, expressive faces",
            Genre::Action => "dynamic angles, speed lines, bold inks",
            Genre::Adventure => "wide vistas, warm saturated colors, detailed backgrounds",
            Genre::Fantasy => "painterly textures, glowing magic effects, ornate costumes",
            Genre::SciFi => "sleek technology, neon accents, hard rim lighting",
            Genre::Horror => "heavy shadows, desaturated tones, unsettling compositions",
            Genre::Mystery => "low-key lighting, tight framing, subtle clues in the background",
            Genre::Romance => "soft pastel colors, gentle lighting, shoujo-style screentones",
            Genre::Superhero => "classic american comic style, halftone dots, heroic poses",
            Genre::Noir => "black and white, high contrast, rain-soaked streets",
            Genre::SliceOfLife => "cozy everyday settings, soft watercolor shading",
        }
    }
}
