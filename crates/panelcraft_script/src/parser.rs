//! Incremental parser for a streamed JSON array of panel objects.
//!
//! The generator streams text such as
//!
//! ```text
//! [{"index": 1, "script": "...", "imagePrompt": "...", "panelText": "..."}, {"index": 2, ...
//! ```
//!
//! and the display layer wants to show every panel as soon as its object is
//! closed. The parser scans each new fragment once, tracking nesting depth
//! and string/escape state, and closes the array right after the last
//! complete top-level element. That repaired prefix is what gets emitted,
//! so a fragment split anywhere (inside a string, between a key and its
//! value, right after a comma) never produces a truncated panel.

use panelcraft_core::{Panel, PanelScript};
use panelcraft_error::{ScriptError, ScriptErrorKind};
use tracing::{debug, trace, warn};

/// What may appear next at the top level of the array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Expect {
    /// Right after `[`: an element or `]`
    #[default]
    ElementOrClose,
    /// Right after `,`: an element only
    Element,
    /// Right after an element: `,` or `]`
    CommaOrClose,
}

/// Incremental parser for a streamed panel array.
///
/// # Examples
///
/// ```
/// use panelcraft_script::ScriptStreamParser;
///
/// let mut parser = ScriptStreamParser::new();
/// assert!(parser.push(r#"[{"script": "a cat", "panelText": "Me"#).is_none());
/// let panels = parser.push(r#"ow"}, {"script": "#).unwrap();
/// assert_eq!(panels.len(), 1);
/// assert_eq!(panels[0].panel_text(), "Meow");
/// assert_eq!(*panels[0].index(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptStreamParser {
    buffer: String,
    /// Next byte of `buffer` to scan
    cursor: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
    /// Saw the array's opening bracket
    opened: bool,
    /// Saw the array's closing bracket
    closed: bool,
    /// Byte offset of the `{` opening the element being scanned
    element_start: Option<usize>,
    expect: Expect,
    panels: Vec<Panel>,
    /// Length of the last panel list handed out
    emitted: usize,
    reported_complete: bool,
    malformed: Option<String>,
}

impl ScriptStreamParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return the panel list if it grew.
    ///
    /// Returns `Some` with every complete panel when this fragment completed
    /// at least one more panel, or when it closed the array. Returns `None`
    /// otherwise; the visible list never shrinks.
    pub fn push(&mut self, fragment: &str) -> Option<Vec<Panel>> {
        self.buffer.push_str(fragment);
        self.scan();

        let grew = self.panels.len() > self.emitted;
        let newly_complete = self.is_complete() && !self.reported_complete;
        if !grew && !newly_complete {
            return None;
        }

        self.emitted = self.panels.len();
        self.reported_complete = self.is_complete();
        debug!(
            panels = self.panels.len(),
            complete = self.reported_complete,
            "Script prefix grew"
        );
        Some(self.panels.clone())
    }

    /// Panels proven complete so far.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Whether the array has been closed without errors.
    pub fn is_complete(&self) -> bool {
        self.closed && self.malformed.is_none()
    }

    /// Everything received so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Authoritative terminal result once the source is exhausted.
    ///
    /// # Errors
    ///
    /// - `Malformed` if an element was not a valid panel object.
    /// - `Unterminated` if the array was never closed.
    #[track_caller]
    pub fn finish(&self) -> Result<Vec<Panel>, ScriptError> {
        if let Some(message) = &self.malformed {
            return Err(ScriptError::new(ScriptErrorKind::Malformed(message.clone())));
        }
        if !self.closed {
            let message = if self.opened {
                "panel array was not closed".to_string()
            } else {
                "no panel array found in response".to_string()
            };
            return Err(ScriptError::new(ScriptErrorKind::Unterminated {
                parsed: self.panels.len(),
                message,
            }));
        }
        Ok(self.panels.clone())
    }

    /// Discard everything and start over from an empty buffer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn scan(&mut self) {
        if self.closed || self.malformed.is_some() {
            self.cursor = self.buffer.len();
            return;
        }

        let bytes = self.buffer.as_bytes();
        let mut completed = Vec::new();
        let mut structural_error = None;
        let mut position = self.cursor;

        while position < bytes.len() {
            let byte = bytes[position];

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                position += 1;
                continue;
            }

            if !self.opened {
                // Prose and code fences before the array are skipped.
                if byte == b'[' {
                    self.opened = true;
                    self.depth = 1;
                    self.expect = Expect::ElementOrClose;
                }
                position += 1;
                continue;
            }

            match byte {
                b'"' => {
                    if self.depth == 1 {
                        structural_error = Some(format!(
                            "unexpected string at top level (byte {})",
                            position
                        ));
                        break;
                    }
                    self.in_string = true;
                }
                b'{' | b'[' => {
                    if self.depth == 1 {
                        if byte == b'[' {
                            structural_error =
                                Some(format!("nested array at top level (byte {})", position));
                            break;
                        }
                        if self.expect == Expect::CommaOrClose {
                            structural_error =
                                Some(format!("missing ',' between panels (byte {})", position));
                            break;
                        }
                        self.element_start = Some(position);
                    }
                    self.depth += 1;
                }
                b'}' | b']' => {
                    if self.depth == 1 {
                        if byte == b'}' {
                            structural_error =
                                Some(format!("unbalanced '}}' at top level (byte {})", position));
                            break;
                        }
                        if self.expect == Expect::Element {
                            structural_error =
                                Some(format!("trailing ',' before ']' (byte {})", position));
                            break;
                        }
                        self.depth = 0;
                        self.closed = true;
                        position += 1;
                        break;
                    }
                    self.depth -= 1;
                    if self.depth == 1 {
                        if let Some(start) = self.element_start.take() {
                            completed.push((start, position + 1));
                        }
                        self.expect = Expect::CommaOrClose;
                    }
                }
                b',' => {
                    if self.depth == 1 {
                        if self.expect != Expect::CommaOrClose {
                            structural_error =
                                Some(format!("unexpected ',' at top level (byte {})", position));
                            break;
                        }
                        self.expect = Expect::Element;
                    }
                }
                byte if byte.is_ascii_whitespace() => {}
                other => {
                    if self.depth == 1 {
                        structural_error = Some(format!(
                            "unexpected '{}' at top level (byte {})",
                            other as char, position
                        ));
                        break;
                    }
                }
            }
            position += 1;
        }

        self.cursor = if self.closed || structural_error.is_some() {
            self.buffer.len()
        } else {
            position
        };

        for (start, end) in completed {
            if self.malformed.is_some() {
                break;
            }
            let slice = &self.buffer[start..end];
            match serde_json::from_str::<PanelScript>(slice) {
                Ok(script) => {
                    let index = self.panels.len() + 1;
                    trace!(panel = index, "Panel object complete");
                    self.panels.push(Panel::pending(index, script));
                }
                Err(e) => {
                    warn!(panel = self.panels.len() + 1, error = %e, "Panel object is not a valid script");
                    self.malformed = Some(format!("panel {}: {}", self.panels.len() + 1, e));
                }
            }
        }

        if self.malformed.is_none() {
            self.malformed = structural_error;
        }
        if let Some(message) = &self.malformed {
            warn!(%message, "Script stream is malformed");
        }
    }
}
