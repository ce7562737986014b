//! Parsed tag content of a single source file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// `MODULE` body lines, each ending in a newline
    pub module_info: Vec<String>,
    /// Loose `.. TAGS:` values
    pub tags: Vec<String>,
    /// `COMMAND` / `PLAYERCOMMAND` / `ADMINCOMMAND` body lines, each ending in a newline
    pub command_info: Vec<String>,
    pub hooks: Vec<String>,
    pub functions: Vec<FunctionBlock>,
    /// One entry per `TODO` tag, its body lines concatenated
    pub todos: Vec<String>,
    pub fixmes: Vec<FixmeNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBlock {
    pub signature: String,
    /// Body lines, each preceded by a newline
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixmeNote {
    pub text: String,
    /// 1-based source line
    pub line: usize,
}

impl ParsedDocument {
    /// True when nothing worth a document was found
    pub fn is_empty(&self) -> bool {
        self.module_info.is_empty()
            && self.tags.is_empty()
            && self.command_info.is_empty()
            && self.hooks.is_empty()
            && self.functions.is_empty()
            && self.todos.is_empty()
            && self.fixmes.is_empty()
    }
}
