//! Time-sliced sweep over the source tree.
//!
//! The scheduler never loops on its own: each call to [`Scheduler::tick`]
//! performs at most `burst_size` work units and returns, leaving all progress
//! in [`ScanState`]'s queues. A driver (the async [`drive`] loop, the CLI, or
//! a test) decides when the next tick runs.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::category::Category;
use super::classifier::classify;
use super::collaborators::{Clock, HelpNotifier, LogNotifier, TracingWarnings, WarningSink};
use super::fs::FileSystem;
use super::index_builder::{replace_file, IndexBuilder};
use super::renderer::DocumentRenderer;
use super::state::ScanState;
use super::tags::TagParser;
use super::walker::{resolve, TreeWalker};
use crate::config::Config;
use crate::error::{Result, RstdocError};

/// Everything a sweep needs from the configuration
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub source_root: PathBuf,
    pub docs_dir: PathBuf,
    /// Usage document, relative to the source root
    pub usage_file: PathBuf,
    pub burst_size: usize,
    pub source_extension: String,
    pub excluded_dirs: Vec<String>,
    pub generator_version: String,
}

impl From<&Config> for ScanSettings {
    fn from(config: &Config) -> Self {
        Self {
            source_root: config.project.source_root.clone(),
            docs_dir: config.project.docs_dir.clone(),
            usage_file: config.project.usage_file.clone(),
            burst_size: config.scan.burst_size.max(1),
            source_extension: config.scan.source_extension.clone(),
            excluded_dirs: config.scan.excluded_dirs.clone(),
            generator_version: config.output.generator_version.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Scanning,
    /// The output root could not be created; only a full rebuild clears this
    Disabled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub directories_expanded: usize,
    pub files_processed: usize,
    pub documents_written: usize,
    pub ticks: usize,
    pub work_units: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No sweep in progress
    Idle,
    /// Work remains; tick again after the cooperative delay
    Pending,
    Complete(SweepReport),
}

pub struct Scheduler {
    fs: Box<dyn FileSystem>,
    clock: Box<dyn Clock>,
    warnings: Box<dyn WarningSink>,
    notifier: Box<dyn HelpNotifier>,
    walker: TreeWalker,
    renderer: DocumentRenderer,
    indexer: IndexBuilder,
    docs_dir: PathBuf,
    usage_source: PathBuf,
    burst_size: usize,
    state_path: Option<PathBuf>,
    state: ScanState,
    status: ScanStatus,
    report: SweepReport,
    work_units: u64,
}

impl Scheduler {
    pub fn new(
        settings: ScanSettings,
        state: ScanState,
        fs: Box<dyn FileSystem>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let usage_source = settings.source_root.join(&settings.usage_file);
        let status = if state.disabled {
            ScanStatus::Disabled
        } else {
            ScanStatus::Idle
        };
        Self {
            fs,
            clock,
            warnings: Box::new(TracingWarnings),
            notifier: Box::new(LogNotifier),
            walker: TreeWalker::new(
                settings.source_root,
                &settings.source_extension,
                settings.excluded_dirs,
            ),
            renderer: DocumentRenderer::new(settings.generator_version),
            indexer: IndexBuilder::new(settings.docs_dir.clone()),
            docs_dir: settings.docs_dir,
            usage_source,
            burst_size: settings.burst_size.max(1),
            state_path: None,
            state,
            status,
            report: SweepReport::default(),
            work_units: 0,
        }
    }

    pub fn with_warnings(mut self, warnings: Box<dyn WarningSink>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn HelpNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Persist the state here after every completed sweep
    pub fn with_state_path(mut self, path: PathBuf) -> Self {
        self.state_path = Some(path);
        self
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// Adopt state committed elsewhere, e.g. by a rebuild in another
    /// process. Ignored while a sweep is in progress.
    pub fn reload_state(&mut self, state: ScanState) {
        if self.status == ScanStatus::Scanning {
            return;
        }
        self.status = if state.disabled {
            ScanStatus::Disabled
        } else {
            ScanStatus::Idle
        };
        self.state = state;
    }

    /// Work units performed over the scheduler's lifetime
    pub fn work_units(&self) -> u64 {
        self.work_units
    }

    /// Begin a sweep from the root.
    ///
    /// A forced sweep, or one without a committed watermark, clears the
    /// output tree first. If the output root cannot be created the scheduler
    /// is disabled until the next forced sweep.
    pub fn start_scan(&mut self, force_full: bool) -> Result<()> {
        if self.state.disabled && !force_full {
            debug!("Documentation disabled; ignoring incremental scan request");
            self.status = ScanStatus::Disabled;
            return Err(RstdocError::Disabled);
        }

        if force_full {
            self.state.last_full_scan = 0;
            self.state.disabled = false;
        }
        self.state.reset_queues();
        self.report = SweepReport::default();

        if self.state.last_full_scan == 0 {
            info!("Starting full documentation scan");
            if let Err(e) = self.prepare_output() {
                self.state.pending_directories.clear();
                self.state.disabled = true;
                self.status = ScanStatus::Disabled;
                error!("{}; documentation is disabled until a full rebuild", e);
                self.persist();
                return Err(e);
            }
        } else {
            info!(watermark = self.state.last_full_scan, "Starting incremental documentation scan");
        }

        self.status = ScanStatus::Scanning;
        Ok(())
    }

    /// Perform one bounded burst of work
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != ScanStatus::Scanning {
            return TickOutcome::Idle;
        }

        self.report.ticks += 1;
        let mut units = 0;

        while units < self.burst_size {
            if let Some(dir) = self.state.pending_directories.pop_front() {
                let expansion = self.walker.expand(self.fs.as_ref(), &dir, &mut self.state);
                debug!(
                    "Scanned {}: {} directories, {} files queued",
                    dir, expansion.directories, expansion.files
                );
                self.report.directories_expanded += 1;
            } else if let Some(file) = self.state.pending_files.pop_front() {
                if self.process_file(&file) {
                    self.report.documents_written += 1;
                }
                self.report.files_processed += 1;
            } else {
                break;
            }
            units += 1;
        }

        self.work_units += units as u64;
        self.report.work_units += units;

        if self.state.is_drained() {
            TickOutcome::Complete(self.finish())
        } else {
            TickOutcome::Pending
        }
    }

    /// Tick until the current sweep finishes, without pausing in between
    pub fn run_to_completion(&mut self) -> Option<SweepReport> {
        loop {
            match self.tick() {
                TickOutcome::Pending => continue,
                TickOutcome::Complete(report) => return Some(report),
                TickOutcome::Idle => return None,
            }
        }
    }

    fn prepare_output(&self) -> Result<()> {
        let root = &self.docs_dir;
        if self.fs.exists(root) {
            if let Err(e) = self.fs.remove_dir_all(root) {
                warn!("Cannot clear {}: {}", root.display(), e);
            }
        }
        self.fs
            .create_dir(root)
            .map_err(|source| RstdocError::OutputRoot {
                path: root.clone(),
                source,
            })?;

        for category in Category::ALL {
            let dir = root.join(category.subdirectory());
            if let Err(e) = self.fs.create_dir(&dir) {
                warn!("Cannot create {}: {}", dir.display(), e);
            }
        }
        Ok(())
    }

    /// Parse and render one source file; true when a document was written
    fn process_file(&self, path: &str) -> bool {
        let physical = resolve(self.walker.source_root(), path);
        let text = match self.fs.read_to_string(&physical) {
            Ok(text) => text,
            Err(e) => {
                debug!("Skipping {}: {}", path, e);
                return false;
            }
        };

        let record = classify(path);
        let parsed = TagParser::new(self.warnings.as_ref()).parse(path, &text);
        let Some(rendered) = self.renderer.render(&record, &parsed) else {
            return false;
        };

        let output = self.docs_dir.join(&rendered.relative_path);
        match replace_file(self.fs.as_ref(), &output, &rendered.content) {
            Ok(()) => {
                debug!("{} written to {}", path, output.display());
                true
            }
            Err(e) => {
                warn!("Cannot write {}: {}", output.display(), e);
                false
            }
        }
    }

    fn persist(&self) {
        if let Some(path) = &self.state_path {
            if let Err(e) = self.state.save(path) {
                error!("Cannot persist scan state to {}: {}", path.display(), e);
            }
        }
    }

    fn finish(&mut self) -> SweepReport {
        info!("Done with sub pages; writing indices");
        if let Err(e) = self.indexer.write_all(self.fs.as_ref(), &self.usage_source) {
            warn!("Failed to write indices: {}", e);
        }

        self.state.last_full_scan = self.clock.now();
        self.persist();

        self.notifier.documentation_changed();
        self.status = ScanStatus::Idle;

        let report = std::mem::take(&mut self.report);
        info!(
            directories = report.directories_expanded,
            files = report.files_processed,
            documents = report.documents_written,
            ticks = report.ticks,
            "Documentation sweep complete"
        );
        report
    }
}

/// Tick `scheduler` to completion, yielding to the runtime for `delay`
/// between bursts
pub async fn drive(scheduler: &mut Scheduler, delay: Duration) -> Option<SweepReport> {
    loop {
        match scheduler.tick() {
            TickOutcome::Pending => {
                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(delay).await;
                }
            }
            TickOutcome::Complete(report) => return Some(report),
            TickOutcome::Idle => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::LocalFileSystem;
    use std::cell::Cell;
    use std::path::Path;
    use std::rc::Rc;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now(&self) -> i64 {
            self.0
        }
    }

    struct CountingNotifier(Rc<Cell<usize>>);

    impl HelpNotifier for CountingNotifier {
        fn documentation_changed(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn settings(root: &Path, burst_size: usize) -> ScanSettings {
        ScanSettings {
            source_root: root.join("lib"),
            docs_dir: root.join("docs"),
            usage_file: PathBuf::from("USAGE"),
            burst_size,
            source_extension: "c".to_string(),
            excluded_dirs: vec!["/log/".to_string()],
            generator_version: "test 1".to_string(),
        }
    }

    fn source_tree(root: &Path) {
        let lib = root.join("lib");
        std::fs::create_dir_all(lib.join("daemons")).unwrap();
        std::fs::create_dir_all(lib.join("log")).unwrap();
        std::fs::write(
            lib.join("daemons").join("foo_d.c"),
            "//:MODULE\n//Keeps foo\n",
        )
        .unwrap();
        std::fs::write(lib.join("daemons").join("plain.c"), "int x;\n").unwrap();
        std::fs::write(lib.join("log").join("skip.c"), "//:MODULE\n//x\n").unwrap();
    }

    #[test]
    fn idle_until_started() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = Scheduler::new(
            settings(dir.path(), 10),
            ScanState::default(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(100)),
        );
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(scheduler.work_units(), 0);
    }

    #[test]
    fn full_sweep_writes_documents_and_watermark() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let notified = Rc::new(Cell::new(0));

        let mut scheduler = Scheduler::new(
            settings(dir.path(), 2),
            ScanState::default(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(1_000)),
        )
        .with_notifier(Box::new(CountingNotifier(notified.clone())));

        scheduler.start_scan(false).unwrap();
        assert_eq!(scheduler.status(), ScanStatus::Scanning);
        let report = scheduler.run_to_completion().unwrap();

        // "/", "/daemons/", foo_d.c, plain.c
        assert_eq!(report.work_units, 4);
        assert_eq!(report.ticks, 2);
        assert_eq!(report.documents_written, 1);
        assert_eq!(scheduler.state().last_full_scan, 1_000);
        assert_eq!(scheduler.status(), ScanStatus::Idle);
        assert_eq!(notified.get(), 1);

        let docs = dir.path().join("docs");
        assert!(docs.join("daemon").join("daemons-foo_d.rst").exists());
        assert!(!docs.join("daemon").join("daemons-plain.rst").exists());
        assert!(docs.join("Daemons.rst").exists());
        for category in Category::ALL {
            assert!(docs.join(category.subdirectory()).is_dir());
        }
    }

    #[test]
    fn state_is_persisted_after_sweep() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let state_path = dir.path().join("state").join("scan.json");

        let mut scheduler = Scheduler::new(
            settings(dir.path(), 10),
            ScanState::default(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(77)),
        )
        .with_state_path(state_path.clone());
        scheduler.start_scan(true).unwrap();
        scheduler.run_to_completion().unwrap();

        assert_eq!(ScanState::load(&state_path).unwrap().last_full_scan, 77);
    }

    #[test]
    fn unwritable_output_root_disables() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        // A regular file where the docs directory should be
        let mut config = settings(dir.path(), 10);
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        config.docs_dir = blocker.join("docs");

        let mut scheduler = Scheduler::new(
            config,
            ScanState::default(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(5)),
        );

        let err = scheduler.start_scan(false).unwrap_err();
        assert!(matches!(err, RstdocError::OutputRoot { .. }));
        assert_eq!(scheduler.status(), ScanStatus::Disabled);
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert!(matches!(
            scheduler.start_scan(false),
            Err(RstdocError::Disabled)
        ));
        assert_eq!(scheduler.state().last_full_scan, 0);
        assert!(scheduler.state().disabled);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_root_failure_logs_one_error() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut config = settings(dir.path(), 10);
        config.docs_dir = blocker.join("docs");
        let mut scheduler = Scheduler::new(
            config,
            ScanState::default(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(5)),
        );

        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(scheduler.start_scan(false).is_err());
            assert!(scheduler.start_scan(false).is_err());
        });

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logged.matches("ERROR").count(), 1, "{}", logged);
        assert!(logged.contains("documentation is disabled until a full rebuild"));
    }

    #[test]
    fn rebuild_elsewhere_reenables_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let state_path = dir.path().join("state.json");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut config = settings(dir.path(), 10);
        config.docs_dir = blocker.join("docs");

        let mut watcher = Scheduler::new(
            config.clone(),
            ScanState::load(&state_path).unwrap(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(5)),
        )
        .with_state_path(state_path.clone());
        assert!(watcher.start_scan(false).is_err());
        assert!(ScanState::load(&state_path).unwrap().disabled);

        // A separate rebuild once the output location is usable again
        std::fs::remove_file(&blocker).unwrap();
        let persisted = ScanState::load(&state_path).unwrap();
        let mut rebuild = Scheduler::new(
            config,
            persisted,
            Box::new(LocalFileSystem),
            Box::new(FixedClock(50)),
        )
        .with_state_path(state_path.clone());
        assert_eq!(rebuild.status(), ScanStatus::Disabled);
        rebuild.start_scan(true).unwrap();
        rebuild.run_to_completion().unwrap();
        assert!(blocker.join("docs").join("daemon").join("daemons-foo_d.rst").exists());

        assert!(matches!(watcher.start_scan(false), Err(RstdocError::Disabled)));
        watcher.reload_state(ScanState::load(&state_path).unwrap());
        assert_eq!(watcher.status(), ScanStatus::Idle);
        assert_eq!(watcher.state().last_full_scan, 50);
        watcher.start_scan(false).unwrap();
        assert!(watcher.run_to_completion().is_some());
    }

    #[tokio::test]
    async fn drive_runs_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        source_tree(dir.path());
        let mut scheduler = Scheduler::new(
            settings(dir.path(), 1),
            ScanState::default(),
            Box::new(LocalFileSystem),
            Box::new(FixedClock(9)),
        );
        scheduler.start_scan(false).unwrap();

        let report = drive(&mut scheduler, Duration::ZERO).await.unwrap();
        assert_eq!(report.ticks, 4);
        assert_eq!(drive(&mut scheduler, Duration::ZERO).await, None);
    }
}
