//! Prompt wording for scripts, revisions and images.

use panelcraft_core::{Genre, ImageRef, StoryRequest};
use panelcraft_interface::{PanelImageRequest, RevisionRequest};

/// System instruction shared by script and revision calls.
pub const SCRIPT_SYSTEM: &str = "You are a comic book writer. You answer only with JSON, \
never with commentary or Markdown.";

/// Ask for the whole comic as a JSON array.
pub fn script(request: &StoryRequest) -> String {
    let count = request.panel_count().get();
    format!(
        "Write a {genre} comic in exactly {count} panels based on this idea:\n\
         {idea}\n\n\
         Respond with a JSON array of {count} objects, in reading order. Each object has:\n\
         - \"index\": the panel number starting at 1\n\
         - \"script\": what happens and what we see\n\
         - \"imagePrompt\": a detailed illustration prompt for this panel alone\n\
         - \"panelText\": the dialogue or caption lettered into the panel, under 25 words\n\
         Give the story a beginning, a turn and an ending.",
        genre = request.genre(),
        idea = request.idea().trim(),
    )
}

/// Ask for a replacement of one panel as a single JSON object.
pub fn revision(request: &RevisionRequest) -> String {
    let prior = request.prior();
    format!(
        "A {genre} comic of {count} panels is based on this idea:\n\
         {idea}\n\n\
         Panel {index} currently reads:\n\
         script: {script}\n\
         imagePrompt: {image_prompt}\n\
         panelText: {panel_text}\n\n\
         Write a fresh version of panel {index} that still fits its place in the story. \
         Respond with one JSON object with the keys \"script\", \"imagePrompt\" and \"panelText\".",
        genre = request.genre(),
        count = request.panel_count(),
        idea = request.idea().trim(),
        index = request.panel_index(),
        script = prior.script(),
        image_prompt = prior.image_prompt(),
        panel_text = prior.panel_text(),
    )
}

/// Describe the character reference sheet for a story.
pub fn character_sheet(idea: &str, genre: Genre) -> String {
    format!(
        "Character design reference sheet for a comic. Story: {idea}. \
         Show every main character full body from the front and side, with a neutral \
         background and no text. Art style: {style}.",
        idea = idea.trim(),
        style = genre.art_style(),
    )
}

/// Describe one panel image.
pub fn panel_image(request: &PanelImageRequest) -> String {
    let reference = match request.reference() {
        ImageRef::Url(url) => format!("Keep the characters identical to the reference sheet at {url}."),
        ImageRef::Binary { .. } => {
            "Keep the characters identical to the established character reference sheet.".to_string()
        }
    };
    let lettering = if request.panel_text().trim().is_empty() {
        "Do not add any text.".to_string()
    } else {
        format!(
            "Letter this text clearly in a speech bubble or caption box: \"{}\".",
            request.panel_text().trim()
        )
    };
    format!(
        "Single comic panel. {scene} Art style: {style}. {reference} {lettering}",
        scene = request.image_prompt().trim(),
        style = request.genre().art_style(),
    )
}
