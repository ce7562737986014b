//! Tag parser — a forward-only, line-by-line state machine.
//!
//! Recognised at the start of a line:
//!
//! - `//###` fix-me notes (leading blanks allowed), one note per line
//! - `//: KEYWORD` tags followed by a body of `//` comment lines
//! - `// .. TAGS: value` loose cross-reference tags
//!
//! Everything else is skipped.

use regex::Regex;
use std::sync::LazyLock;

use super::collaborators::WarningSink;
use super::document::{FixmeNote, FunctionBlock, ParsedDocument};
use super::signature::extract_signature;

/// Category under which grammar warnings are reported
pub const WARNING_CATEGORY: &str = "autodoc";

static RE_FIXME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*//###(.*)$").expect("fixme pattern"));

const TAG_MARKER: &str = "//:";
const LOOSE_TAGS: &str = "// .. TAGS:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Command,
    Player,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Module,
    Todo,
    Command(CommandKind),
    Hook { name: String },
    Function { name: String },
}

impl Tag {
    /// Parse the keyword text that follows a tag marker
    pub fn parse(keyword: &str) -> Option<Tag> {
        match keyword {
            "MODULE" => Some(Tag::Module),
            "TODO" => Some(Tag::Todo),
            "COMMAND" => Some(Tag::Command(CommandKind::Command)),
            "PLAYERCOMMAND" => Some(Tag::Command(CommandKind::Player)),
            "ADMINCOMMAND" => Some(Tag::Command(CommandKind::Admin)),
            _ => {
                if let Some(name) = keyword.strip_prefix("HOOK ") {
                    Some(Tag::Hook {
                        name: name.trim().to_string(),
                    })
                } else {
                    keyword.strip_prefix("FUNCTION ").map(|name| Tag::Function {
                        name: name.trim().to_string(),
                    })
                }
            }
        }
    }
}

/// A body line with the comment marker and one following space removed.
/// Tag markers and non-comment lines end a body.
fn body_text(line: &str) -> Option<&str> {
    if line.starts_with(TAG_MARKER) {
        return None;
    }
    let rest = line.strip_prefix("//")?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Function descriptions only drop the space when text follows it
fn description_text(line: &str) -> Option<&str> {
    let rest = body_text(line)?;
    if line.len() > 3 {
        Some(rest)
    } else {
        line.strip_prefix("//")
    }
}

fn take_body<'l>(lines: &[&'l str], i: &mut usize) -> Vec<&'l str> {
    let mut body = Vec::new();
    while let Some(text) = lines.get(*i).and_then(|l| body_text(*l)) {
        body.push(text);
        *i += 1;
    }
    body
}

pub struct TagParser<'a> {
    warnings: &'a dyn WarningSink,
}

impl<'a> TagParser<'a> {
    pub fn new(warnings: &'a dyn WarningSink) -> Self {
        Self { warnings }
    }

    /// Parse the text of `source_path` into its tagged sections
    pub fn parse(&self, source_path: &str, text: &str) -> ParsedDocument {
        let lines: Vec<&str> = text.lines().collect();
        let mut doc = ParsedDocument::default();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if RE_FIXME.is_match(line) {
                while let Some(caps) = lines.get(i).and_then(|l| RE_FIXME.captures(l)) {
                    doc.fixmes.push(FixmeNote {
                        text: caps[1].trim().to_string(),
                        line: i + 1,
                    });
                    i += 1;
                }
            } else if let Some(rest) = line.strip_prefix(TAG_MARKER) {
                let keyword = rest.trim();
                i += 1;
                match Tag::parse(keyword) {
                    Some(tag) => i = self.consume_tag(&tag, &lines, i, &mut doc),
                    None => self.warnings.log_warning(
                        WARNING_CATEGORY,
                        &format!("Bad header tag: {} line {}: {}", source_path, i, keyword),
                    ),
                }
            } else if let Some(rest) = line.strip_prefix(LOOSE_TAGS) {
                doc.tags.push(rest.get(1..).unwrap_or_default().to_string());
                i += 1;
            } else {
                i += 1;
            }
        }

        doc
    }

    /// Consume the body of `tag` starting at `i`; returns the next line to scan
    fn consume_tag(&self, tag: &Tag, lines: &[&str], mut i: usize, doc: &mut ParsedDocument) -> usize {
        match tag {
            Tag::Function { name } => {
                let mut description = String::new();
                while let Some(text) = lines.get(i).and_then(|l| description_text(l)) {
                    description.push('\n');
                    description.push_str(text);
                    i += 1;
                }
                if let Some(signature) = extract_signature(lines, i, name) {
                    doc.functions.push(FunctionBlock {
                        signature,
                        description,
                    });
                }
            }
            Tag::Todo => doc.todos.push(take_body(lines, &mut i).concat()),
            Tag::Module => {
                let body = take_body(lines, &mut i);
                doc.module_info
                    .extend(body.iter().map(|l| format!("{}\n", l)));
            }
            Tag::Command(_) => {
                let body = take_body(lines, &mut i);
                doc.command_info
                    .extend(body.iter().map(|l| format!("{}\n", l)));
            }
            Tag::Hook { .. } => {
                let body = take_body(lines, &mut i);
                doc.hooks.extend(body.iter().map(|l| l.to_string()));
            }
        }
        i
    }
}
