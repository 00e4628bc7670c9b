//! Dynamic command-call extraction trait definition

use crate::error::Result;

/// A command name invoked dynamically from script source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReference {
    pub name: String,
    /// 1-based line of the call expression.
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallExtraction {
    Calls(Vec<CommandReference>),
    /// The source does not parse; it contributes no references.
    SyntaxError,
}

impl CallExtraction {
    pub fn into_names(self) -> Vec<String> {
        match self {
            CallExtraction::Calls(calls) => calls.into_iter().map(|c| c.name).collect(),
            CallExtraction::SyntaxError => Vec::new(),
        }
    }
}

/// Finds the commands a script executes by name.
pub trait CommandCallExtractor: Send + Sync {
    fn language(&self) -> &'static str;

    /// Errors are reserved for failures of the analysis itself; source that
    /// does not parse is reported as [`CallExtraction::SyntaxError`].
    fn extract(&self, source: &str) -> Result<CallExtraction>;
}
