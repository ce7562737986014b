use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RstdocError;
use super::{
    classify, drive, HelpNotifier, LocalFileSystem, LogNotifier, MarkerNotifier, ScanSettings,
    ScanState, Scheduler, SweepReport, SystemClock,
};

const CONFIG_FILE: &str = "Rstdoc.toml";

/// Main orchestration engine: wires configuration to the scheduler and
/// drives sweeps on the async runtime
pub struct Engine {
    config: Config,
    no_delay: bool,
}

impl Engine {
    pub async fn new(config_path: Option<&Path>, no_delay: bool) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        debug!("Loaded configuration: {:?}", config);
        Ok(Self { config, no_delay })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn tick_delay(&self) -> Duration {
        if self.no_delay {
            Duration::ZERO
        } else {
            Duration::from_millis(self.config.scan.tick_delay_ms)
        }
    }

    fn notifier(&self) -> Box<dyn HelpNotifier> {
        match &self.config.help.rebuild_marker {
            Some(marker) => Box::new(MarkerNotifier::new(marker.clone())),
            None => Box::new(LogNotifier),
        }
    }

    fn scheduler(&self) -> Result<Scheduler> {
        let state_path = self.config.project.state_file.clone();
        let state = ScanState::load(&state_path)?;

        Ok(Scheduler::new(
            ScanSettings::from(&self.config),
            state,
            Box::new(LocalFileSystem),
            Box::new(SystemClock),
        )
        .with_notifier(self.notifier())
        .with_state_path(state_path))
    }

    /// Run one sweep to completion. Without `force_full` only files changed
    /// since the last completed sweep are regenerated.
    pub async fn scan(&self, force_full: bool) -> Result<Option<SweepReport>> {
        let mut scheduler = self.scheduler()?;

        info!("Source: {}", self.config.project.source_root.display());
        info!("Output: {}", self.config.project.docs_dir.display());

        scheduler.start_scan(force_full)?;
        let report = drive(&mut scheduler, self.tick_delay()).await;

        if let Some(report) = &report {
            info!(
                "Processed {} files in {} directories, wrote {} documents over {} ticks",
                report.files_processed,
                report.directories_expanded,
                report.documents_written,
                report.ticks
            );
        }
        Ok(report)
    }

    /// Sweep periodically until interrupted
    pub async fn watch(&self) -> Result<()> {
        let sweeps = self.watch_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;
        info!("Stopping watch after {} sweeps", sweeps);
        Ok(())
    }

    /// Sweep at once when no sweep has completed yet, then every
    /// `sweep_interval_secs`, until `shutdown` resolves. State committed by
    /// other processes is reloaded before each sweep. Returns the number of
    /// completed sweeps.
    pub async fn watch_until<F>(&self, shutdown: F) -> Result<usize>
    where
        F: Future<Output = ()>,
    {
        let mut scheduler = self.scheduler()?;
        let period = Duration::from_secs(self.config.scan.sweep_interval_secs.max(1));
        let delay = self.tick_delay();

        let now = tokio::time::Instant::now();
        let first = if scheduler.state().last_full_scan == 0 {
            now
        } else {
            now + period
        };
        let mut ticker = tokio::time::interval_at(first, period);
        let mut completed = 0;

        info!("Watching {} every {}s", self.config.project.source_root.display(), period.as_secs());

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match ScanState::load(&self.config.project.state_file) {
                        Ok(state) => scheduler.reload_state(state),
                        Err(e) => warn!("Cannot reload scan state: {}", e),
                    }
                    if let Err(e) = scheduler.start_scan(false) {
                        debug!("Sweep not started: {}", e);
                        continue;
                    }
                    tokio::select! {
                        report = drive(&mut scheduler, delay) => {
                            if report.is_some() {
                                completed += 1;
                            }
                        }
                        _ = &mut shutdown => {
                            info!("Interrupted during sweep; pending work is discarded");
                            return Ok(completed);
                        }
                    }
                }
                _ = &mut shutdown => return Ok(completed),
            }
        }
    }

    /// Write a default configuration file into `path`
    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let target_dir = match path {
            Some(p) => p,
            None => std::env::current_dir()?,
        };
        let config_file = target_dir.join(CONFIG_FILE);

        if config_file.exists() {
            warn!("{} already exists; leaving it untouched", config_file.display());
            return Ok(());
        }

        std::fs::create_dir_all(&target_dir)?;
        Config::default().save(&config_file)?;
        info!("Initialized rstdoc in: {}", target_dir.display());
        Ok(())
    }

    /// Map a command-line path onto the logical tree: paths under the source
    /// root are rebased, other absolute paths are taken as logical already
    pub fn logical_path(&self, path: &str) -> Result<String> {
        let root = &self.config.project.source_root;
        if let Ok(rest) = Path::new(path).strip_prefix(root) {
            return Ok(format!("/{}", rest.to_string_lossy()));
        }
        if path.starts_with('/') {
            return Ok(path.to_string());
        }
        Err(RstdocError::InvalidPath(path.to_string()).into())
    }

    /// Print how each path would be classified
    pub fn classify(&self, paths: &[String]) -> Result<()> {
        for path in paths {
            let logical = self.logical_path(path)?;
            let record = classify(&logical);
            println!(
                "{}\t{}\t{}\t{}",
                record.source_path,
                record.category,
                record.relative_output(),
                record.title
            );
        }
        Ok(())
    }

    pub fn status(&self) -> Result<()> {
        let state = ScanState::load(&self.config.project.state_file)?;

        if state.last_full_scan == 0 {
            println!("Last sweep:  never (next sweep rebuilds everything)");
        } else {
            let when = chrono::DateTime::from_timestamp(state.last_full_scan, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| state.last_full_scan.to_string());
            println!("Last sweep:  {}", when);
        }
        println!("Pending:     {} directories, {} files", state.pending_directories.len(), state.pending_files.len());
        println!(
            "Output:      {}{}",
            self.config.project.docs_dir.display(),
            if self.config.project.docs_dir.is_dir() { "" } else { " (missing)" }
        );
        Ok(())
    }
}
