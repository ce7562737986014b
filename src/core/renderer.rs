//! reStructuredText rendering of one parsed source file.
//!
//! The output layout is consumed by an external help renderer and must stay
//! byte-for-byte stable, including the quirks noted below.

use super::classifier::FileRecord;
use super::document::ParsedDocument;
use super::links::link;

const CODE_BLOCK: &str = ".. code-block:: c";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Path relative to the docs root, e.g. `daemon/daemons-foo_d.rst`
    pub relative_path: String,
    pub content: String,
}

pub struct DocumentRenderer {
    generator_version: String,
}

fn heading(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');
}

impl DocumentRenderer {
    pub fn new(generator_version: impl Into<String>) -> Self {
        Self {
            generator_version: generator_version.into(),
        }
    }

    /// Render `doc`; `None` when it holds nothing worth writing
    pub fn render(&self, record: &FileRecord, doc: &ParsedDocument) -> Option<RenderedDocument> {
        if doc.is_empty() {
            return None;
        }

        let info = record.category.info();
        let mut out = String::new();

        if info.has_header {
            // The underline also covers the title's trailing newline
            let title = format!("{}\n", record.title);
            out.push_str(&title);
            out.push_str(&"*".repeat(title.chars().count()));
            out.push_str("\n\n");
            out.push_str(&format!(
                "Documentation for the {} {} in *{}*.\n\n",
                record.document_name, info.body_label, record.source_path
            ));
        }

        if !doc.module_info.is_empty() {
            heading(&mut out, "Module Information");
            out.push('\n');
            for line in &doc.module_info {
                out.push_str(line);
            }
            out.push('\n');
        }

        if !doc.tags.is_empty() {
            for tag in &doc.tags {
                out.push_str(&format!(".. TAGS: {}\n", tag));
            }
            out.push('\n');
        }

        if !doc.command_info.is_empty() {
            heading(&mut out, info.command_heading);
            out.push('\n');
            self.render_commands(&mut out, record, &doc.command_info);
            out.push_str("\n\n");
        }

        if !doc.hooks.is_empty() {
            heading(&mut out, "Hooks");
            out.push('\n');
            for line in &doc.hooks {
                out.push_str(line);
                out.push('\n');
            }
        }

        if !doc.functions.is_empty() {
            heading(&mut out, "Functions");
            for function in &doc.functions {
                out.push_str(&format!(
                    ".. c:function:: {}\n{}\n\n\n",
                    function.signature, function.description
                ));
            }
        }

        if !doc.todos.is_empty() {
            heading(&mut out, "TODO list");
            out.push('\n');
            // Every entry repeats the whole list
            let all = doc.todos.join(" ");
            for n in 1..=doc.todos.len() {
                out.push_str(&format!("{}. {}\n", n, all));
            }
            out.push('\n');
        }

        for note in &doc.fixmes {
            out.push_str(&format!(".. note:: {} (line {})\n", note.text, note.line));
        }

        let mut content = out.replace(CODE_BLOCK, &format!("\n{}\n", CODE_BLOCK));
        content.push_str(&format!(
            "\n*File generated by {} reStructured Text daemon.*\n",
            self.generator_version
        ));

        Some(RenderedDocument {
            relative_path: record.relative_output(),
            content,
        })
    }

    /// Command lines are copied verbatim; `$$ see:` lines become links,
    /// one per comma-separated segment
    fn render_commands(&self, out: &mut String, record: &FileRecord, lines: &[String]) {
        for line in lines {
            if line.starts_with("$$ see:") || line.starts_with("$$see:") {
                out.push_str("See: ");
                let targets = line.get(7..).unwrap_or_default();
                for target in targets.split(',').map(str::trim) {
                    out.push_str(&link(target, record.category, true));
                    out.push(' ');
                }
                out.push_str("\n\n");
            } else {
                out.push_str(line);
            }
        }
    }
}
