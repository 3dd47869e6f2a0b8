//! Script ingestion for Panelcraft.
//!
//! - [`ScriptStreamParser`] turns an incrementally delivered JSON array of
//!   panel objects into the longest provably complete prefix of panels.
//! - [`ingest_script`] drives a [`FragmentStream`](panelcraft_interface::FragmentStream)
//!   through the parser and yields each growth step.
//! - [`ScriptReviser`] regenerates the script of a single panel.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ingest;
mod parser;
mod revision;

pub use ingest::{ScriptUpdate, ingest_script};
pub use parser::ScriptStreamParser;
pub use revision::ScriptReviser;
