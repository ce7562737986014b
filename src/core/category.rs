//! Documentation categories and the per-category rendering table.
//!
//! Both the document renderer and the link builder consult [`CategoryInfo`],
//! so titles, subdirectories and link labels cannot drift apart.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Api,
    Daemon,
    Module,
    Mudlib,
    Command,
    PlayerCommand,
    Verb,
}

/// How a link target is turned into its visible label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLabel {
    /// `simul_efun-misc` becomes `simul_efun: misc`
    Scoped,
    /// `Daemon: ` plus the target with any `daemons-` removed
    Daemon,
    /// `Command: ` plus the raw target
    Command,
    /// `Module: ` plus the target without its first hyphen segment
    Module,
    /// The raw target
    Raw,
}

#[derive(Debug)]
pub struct CategoryInfo {
    pub category: Category,
    /// Output subdirectory below the docs root
    pub subdirectory: &'static str,
    /// Label used in "Documentation for the ... <label> in ..."
    pub body_label: &'static str,
    pub title_prefix: &'static str,
    pub title_suffix: &'static str,
    /// Player command documents start directly with their command section
    pub has_header: bool,
    pub command_heading: &'static str,
    pub link_label: LinkLabel,
    pub index_title: &'static str,
    pub index_file: &'static str,
}

static CATEGORIES: [CategoryInfo; 7] = [
    CategoryInfo {
        category: Category::Api,
        subdirectory: "api",
        body_label: "api",
        title_prefix: "",
        title_suffix: "",
        has_header: true,
        command_heading: "Command",
        link_label: LinkLabel::Scoped,
        index_title: "API",
        index_file: "API.rst",
    },
    CategoryInfo {
        category: Category::Daemon,
        subdirectory: "daemon",
        body_label: "daemon",
        title_prefix: "Daemon ",
        title_suffix: "",
        has_header: true,
        command_heading: "Command",
        link_label: LinkLabel::Daemon,
        index_title: "Daemons",
        index_file: "Daemons.rst",
    },
    CategoryInfo {
        category: Category::Module,
        subdirectory: "module",
        body_label: "module",
        title_prefix: "Module *",
        title_suffix: "*",
        has_header: true,
        command_heading: "Command",
        link_label: LinkLabel::Module,
        index_title: "Module",
        index_file: "Modules.rst",
    },
    CategoryInfo {
        category: Category::Mudlib,
        subdirectory: "mudlib",
        body_label: "functions for the mudlib",
        title_prefix: "Mudlib *",
        title_suffix: "*",
        has_header: true,
        command_heading: "Command",
        link_label: LinkLabel::Scoped,
        index_title: "Mudlib",
        index_file: "Mudlib.rst",
    },
    CategoryInfo {
        category: Category::Command,
        subdirectory: "command",
        body_label: "command",
        title_prefix: "Command *",
        title_suffix: "*",
        has_header: true,
        command_heading: "Command",
        link_label: LinkLabel::Command,
        index_title: "Commands",
        index_file: "Commands.rst",
    },
    CategoryInfo {
        category: Category::PlayerCommand,
        subdirectory: "player_command",
        body_label: "player command",
        title_prefix: "Player Command *",
        title_suffix: "*",
        has_header: false,
        command_heading: "Player Command",
        link_label: LinkLabel::Raw,
        index_title: "Player Commands",
        index_file: "Player_Commands.rst",
    },
    CategoryInfo {
        category: Category::Verb,
        subdirectory: "verb",
        body_label: "verb",
        title_prefix: "Verb *",
        title_suffix: "*",
        has_header: true,
        command_heading: "Command",
        link_label: LinkLabel::Raw,
        index_title: "Verbs",
        index_file: "Verbs.rst",
    },
];

/// Order in which index documents are written
pub const INDEX_ORDER: [Category; 7] = [
    Category::PlayerCommand,
    Category::Verb,
    Category::Command,
    Category::Daemon,
    Category::Api,
    Category::Module,
    Category::Mudlib,
];

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Api,
        Category::Daemon,
        Category::Command,
        Category::PlayerCommand,
        Category::Module,
        Category::Mudlib,
        Category::Verb,
    ];

    pub fn info(self) -> &'static CategoryInfo {
        let info = &CATEGORIES[self as usize];
        debug_assert_eq!(info.category, self);
        info
    }

    pub fn subdirectory(self) -> &'static str {
        self.info().subdirectory
    }

    /// Display title such as `Verb *look*`
    pub fn title(self, name: &str) -> String {
        let info = self.info();
        format!("{}{}{}", info.title_prefix, name, info.title_suffix)
    }

    /// Commands, player commands and verbs are documented under their bare file name
    pub fn uses_bare_name(self) -> bool {
        matches!(
            self,
            Category::Command | Category::PlayerCommand | Category::Verb
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.subdirectory())
    }
}

impl LinkLabel {
    pub fn apply(self, target: &str) -> String {
        match self {
            LinkLabel::Scoped => target.replace('-', ": "),
            LinkLabel::Daemon => format!("Daemon: {}", target.replace("daemons-", "")),
            LinkLabel::Command => format!("Command: {}", target),
            LinkLabel::Module => {
                let rest: String = target.split('-').skip(1).collect();
                format!("Module: {}", rest)
            }
            LinkLabel::Raw => target.to_string(),
        }
    }
}
