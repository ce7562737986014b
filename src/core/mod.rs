mod category;
mod classifier;
mod collaborators;
mod document;
mod engine;
mod fs;
mod index_builder;
mod links;
mod renderer;
mod scheduler;
mod signature;
mod state;
mod tags;
mod walker;

pub use category::{Category, CategoryInfo, LinkLabel, INDEX_ORDER};
pub use classifier::{categorize, classify, FileRecord};
pub use collaborators::{
    Clock, HelpNotifier, LogNotifier, MarkerNotifier, SystemClock, TracingWarnings, WarningSink,
};
pub use document::{FixmeNote, FunctionBlock, ParsedDocument};
pub use fs::{DirEntry, EntryKind, FileSystem, LocalFileSystem};
pub use index_builder::{render_index, IndexBuilder, USAGE_DOCUMENT};
pub use links::link;
pub use renderer::{DocumentRenderer, RenderedDocument};
pub use scheduler::{drive, ScanSettings, ScanStatus, Scheduler, SweepReport, TickOutcome};
pub use signature::extract_signature;
pub use state::{ScanState, ROOT_DIR, STATE_SCHEMA_VERSION};
pub use tags::{CommandKind, Tag, TagParser, WARNING_CATEGORY};
pub use walker::{resolve, Expansion, TreeWalker};

// Export the main engine
pub use engine::Engine;
