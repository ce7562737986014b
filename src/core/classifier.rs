use serde::{Deserialize, Serialize};

use super::category::Category;

/// Everything derived from a source path before its content is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Logical path such as `/daemons/foo_d.c`
    pub source_path: String,

    pub category: Category,

    /// Output file stem below the category subdirectory
    pub document_name: String,

    /// Bare file name without extension
    pub name: String,

    /// Display title used as the document heading
    pub title: String,
}

impl FileRecord {
    /// Path of the rendered document relative to the docs root
    pub fn relative_output(&self) -> String {
        format!("{}/{}.rst", self.category.subdirectory(), self.document_name)
    }
}

/// Prefix rules, first match wins
const PREFIX_RULES: &[(&str, Category)] = &[
    ("/daemons/", Category::Daemon),
    ("/secure/daemons/", Category::Daemon),
    ("/std/modules/", Category::Module),
    ("/secure/modules/", Category::Module),
    ("/std/", Category::Mudlib),
];

/// Substring rules checked after the prefixes
const SEGMENT_RULES: &[(&str, Category)] = &[
    ("cmds/player", Category::PlayerCommand),
    ("cmds/verbs", Category::Verb),
    ("cmds", Category::Command),
];

pub fn categorize(path: &str) -> Category {
    for (prefix, category) in PREFIX_RULES {
        if path.len() > prefix.len() && path.starts_with(prefix) {
            return *category;
        }
    }
    for (segment, category) in SEGMENT_RULES {
        if path.contains(segment) {
            return *category;
        }
    }
    Category::Api
}

/// Classify a logical source path into its documentation record
pub fn classify(path: &str) -> FileRecord {
    let category = categorize(path);

    let stem = match path.rfind('.') {
        Some(pos) if !path[pos..].contains('/') => &path[..pos],
        _ => path,
    };
    let segments: Vec<&str> = stem.split('/').filter(|s| !s.is_empty()).collect();
    let name = segments.last().copied().unwrap_or_default().to_string();

    let document_name = if category.uses_bare_name() {
        name.clone()
    } else {
        let start = segments.len().saturating_sub(2);
        segments[start..].join("-")
    };

    FileRecord {
        source_path: path.to_string(),
        category,
        document_name,
        title: category.title(&name),
        name,
    }
}
