//! Command-call extractors for embedded script languages

pub mod python;

use crate::extractor::CommandCallExtractor;

/// Get the extractor for a script's declared `type`. Languages without one
/// contribute no dynamic references.
pub fn extractor_for(script_type: &str) -> Option<Box<dyn CommandCallExtractor>> {
    match script_type {
        "python" => Some(Box::new(python::PythonExtractor)),
        _ => None,
    }
}
