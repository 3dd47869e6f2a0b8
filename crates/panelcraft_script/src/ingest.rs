//! Driving a fragment stream through the parser.

use crate::ScriptStreamParser;
use async_stream::stream;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use panelcraft_core::Panel;
use panelcraft_error::{PanelcraftResult, ScriptError, ScriptErrorKind};
use panelcraft_interface::FragmentStream;
use tracing::{debug, info, warn};

/// One growth step of the streamed script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUpdate {
    /// Every panel proven complete so far, in index order
    pub panels: Vec<Panel>,
    /// Whether the array has been closed; `panels` is then final
    pub complete: bool,
}

/// Feed `fragments` through a fresh [`ScriptStreamParser`].
///
/// Yields a [`ScriptUpdate`] each time the visible panel list grows, ending
/// with one whose `complete` flag is set. A fragment error, or a source
/// that ends before the array closes, is yielded as the final `Err` item;
/// panels yielded before it stay valid.
pub fn ingest_script(mut fragments: FragmentStream) -> BoxStream<'static, PanelcraftResult<ScriptUpdate>> {
    let updates = stream! {
        let mut parser = ScriptStreamParser::new();
        let mut fragment_count = 0usize;

        while let Some(fragment) = fragments.next().await {
            let fragment = match fragment {
                Ok(fragment) => fragment,
                Err(e) => {
                    warn!(
                        fragments = fragment_count,
                        panels = parser.panels().len(),
                        error = %e,
                        "Script stream failed"
                    );
                    yield Err(ScriptError::new(ScriptErrorKind::StreamInterrupted(e.to_string())).into());
                    return;
                }
            };
            fragment_count += 1;

            if let Some(panels) = parser.push(&fragment) {
                let complete = parser.is_complete();
                yield Ok(ScriptUpdate { panels, complete });
                if complete {
                    info!(fragments = fragment_count, panels = parser.panels().len(), "Script stream complete");
                    return;
                }
            }
        }

        debug!(fragments = fragment_count, "Script source exhausted");
        match parser.finish() {
            Ok(panels) => yield Ok(ScriptUpdate { panels, complete: true }),
            Err(e) => {
                warn!(error = %e, "Script stream ended without a complete array");
                yield Err(e.into());
            }
        }
    };
    updates.boxed()
}
