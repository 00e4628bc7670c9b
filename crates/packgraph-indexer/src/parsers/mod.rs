//! Per-format content parsers
//!
//! Each parser loads one content document into a typed structure and
//! reports the document's node id plus its outbound references. Parsers
//! never touch the graph; the builder decides what to do with the results.

pub mod casetype;
pub mod integration;
pub mod layout;
pub mod pack;
pub mod playbook;
pub mod script;

use crate::error::Result;
use packgraph_core::Reference;

pub use casetype::CaseTypeParser;
pub use integration::IntegrationParser;
pub use layout::LayoutParser;
pub use pack::{PackMetadata, PackParser};
pub use playbook::PlaybookParser;
pub use script::ScriptParser;

/// Common surface of the content item parsers.
pub trait ContentParser {
    /// Stable, content-addressed node id of the document.
    fn id(&self) -> &str;

    /// Outbound references of the document.
    fn references(&self) -> Result<Vec<Reference>>;
}
