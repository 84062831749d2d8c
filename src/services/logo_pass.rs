//! End-to-end logo resolution pass
//!
//! One pass: take the run lock, load or build the index, then walk every
//! channel once, in order, and for each channel without a real logo try to
//! resolve, download and assign one. Per-channel failures are counted and
//! logged; nothing escapes the pass boundary.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use strum::{AsRefStr, Display};
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::run_lock::RunLock;
use crate::config::{CandidatePolicy, Config};
use crate::logo_assets::LogoDownloader;
use crate::logo_index::{Candidates, IndexBuilder, IndexOrigin, LogoIndex, pick_path};
use crate::models::ChannelRecord;
use crate::repositories::{ChannelSource, LogoAssigner};
use crate::sources::LogoSource;
use crate::utils::is_placeholder;

/// What started a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PassTrigger {
    /// Explicit "run now"
    Manual,
    /// Delayed startup run
    Auto,
}

/// Why a pass did not do any work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PassReason {
    /// Another pass holds the run lock
    Locked,
    /// Channel source or logo assigner not configured
    ModelsNotFound,
    /// Listing channels failed
    QueryError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassCounters {
    pub updated: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub missed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSummary {
    pub ok: bool,
    #[serde(flatten)]
    pub counters: PassCounters,
    pub logos_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PassReason>,
    pub trigger: PassTrigger,
    pub pass_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_origin: Option<IndexOrigin>,
    pub index_entries: usize,
    pub elapsed_ms: u64,
}

impl PassSummary {
    fn new(pass_id: Uuid, trigger: PassTrigger, logos_dir: &Path) -> Self {
        Self {
            ok: true,
            counters: PassCounters::default(),
            logos_dir: logos_dir.to_path_buf(),
            reason: None,
            trigger,
            pass_id,
            index_origin: None,
            index_entries: 0,
            elapsed_ms: 0,
        }
    }

    fn stopped(mut self, ok: bool, reason: PassReason) -> Self {
        self.ok = ok;
        self.reason = Some(reason);
        self.counters = PassCounters::default();
        self
    }

    pub fn updated(&self) -> usize {
        self.counters.updated
    }

    pub fn downloaded(&self) -> usize {
        self.counters.downloaded
    }

    pub fn skipped(&self) -> usize {
        self.counters.skipped
    }

    pub fn missed(&self) -> usize {
        self.counters.missed
    }

    pub fn is_locked(&self) -> bool {
        self.reason == Some(PassReason::Locked)
    }
}

pub struct LogoPassCoordinator {
    logos_dir: PathBuf,
    candidate_policy: CandidatePolicy,
    index_builder: IndexBuilder,
    downloader: LogoDownloader,
    run_lock: RunLock,
    channels: Option<Arc<dyn ChannelSource>>,
    assigner: Option<Arc<dyn LogoAssigner>>,
    autorun_started: AtomicBool,
}

impl LogoPassCoordinator {
    pub fn new(config: &Config, source: Arc<dyn LogoSource>) -> Self {
        Self {
            logos_dir: config.storage.logos_dir.clone(),
            candidate_policy: config.matching.candidate_policy,
            index_builder: IndexBuilder::new(
                source.clone(),
                config.storage.index_filename.clone(),
                config.storage.index_ttl,
            ),
            downloader: LogoDownloader::new(source),
            run_lock: RunLock::new(config.lock.path.clone(), config.lock.freshness),
            channels: None,
            assigner: None,
            autorun_started: AtomicBool::new(false),
        }
    }

    pub fn with_channel_source(mut self, channels: Arc<dyn ChannelSource>) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_assigner(mut self, assigner: Arc<dyn LogoAssigner>) -> Self {
        self.assigner = Some(assigner);
        self
    }

    /// Use one store as both the channel source and the assigner
    pub fn with_store<S>(self, store: Arc<S>) -> Self
    where
        S: ChannelSource + LogoAssigner + 'static,
    {
        self.with_channel_source(store.clone()).with_assigner(store)
    }

    /// Run a pass immediately on the caller's task
    pub async fn run_now(&self) -> PassSummary {
        self.run(PassTrigger::Manual).await
    }

    /// Schedule the startup pass after `delay`. Only the first call per
    /// coordinator schedules anything; later calls return `None`.
    pub fn autorun(self: &Arc<Self>, delay: Duration) -> Option<JoinHandle<PassSummary>> {
        if self.autorun_started.swap(true, Ordering::SeqCst) {
            warn!("Autorun already scheduled; ignoring");
            return None;
        }

        info!("Startup: autorun in {}", humantime::format_duration(delay));
        let coordinator = Arc::clone(self);
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator.run(PassTrigger::Auto).await
        }))
    }

    /// Load or build the index for the configured logos directory
    pub async fn load_index(&self) -> LogoIndex {
        self.ensure_logos_dir().await;
        self.index_builder.build(&self.logos_dir).await
    }

    pub async fn run(&self, trigger: PassTrigger) -> PassSummary {
        let pass_id = Uuid::new_v4();
        let span = info_span!("logo_pass", %pass_id, %trigger);
        let started = Instant::now();

        let mut summary = self
            .run_inner(PassSummary::new(pass_id, trigger, &self.logos_dir))
            .instrument(span.clone())
            .await;
        summary.elapsed_ms = started.elapsed().as_millis() as u64;

        span.in_scope(|| {
            info!(
                ok = summary.ok,
                updated = summary.counters.updated,
                downloaded = summary.counters.downloaded,
                skipped = summary.counters.skipped,
                missed = summary.counters.missed,
                reason = summary.reason.as_ref().map(AsRef::<str>::as_ref),
                elapsed_ms = summary.elapsed_ms,
                "Logo pass done"
            );
        });
        summary
    }

    async fn run_inner(&self, summary: PassSummary) -> PassSummary {
        let Some(_lock) = self.run_lock.try_acquire().await else {
            return summary.stopped(true, PassReason::Locked);
        };

        self.ensure_logos_dir().await;

        let (Some(channels), Some(assigner)) = (&self.channels, &self.assigner) else {
            warn!("Channel store not available; nothing to do");
            return summary.stopped(false, PassReason::ModelsNotFound);
        };

        let index = self.index_builder.build(&self.logos_dir).await;

        let records = match channels.list_channels().await {
            Ok(records) => records,
            Err(e) => {
                error!("Could not list channels: {}", e);
                return summary.stopped(false, PassReason::QueryError);
            }
        };

        info!(
            channels = records.len(),
            index_entries = index.len(),
            index_origin = %index.origin(),
            "Scanning channels"
        );

        let mut summary = summary;
        summary.index_origin = Some(index.origin());
        summary.index_entries = index.len();

        for channel in &records {
            self.process_channel(channel, &index, assigner.as_ref(), &mut summary.counters)
                .await;
        }

        summary
    }

    async fn process_channel(
        &self,
        channel: &ChannelRecord,
        index: &LogoIndex,
        assigner: &dyn LogoAssigner,
        counters: &mut PassCounters,
    ) {
        // Real logos are never overwritten
        if !is_placeholder(channel.logo.current_value()) {
            counters.skipped += 1;
            return;
        }

        let candidates = Candidates::for_channel(
            channel.tvg_id.as_deref(),
            channel.name.as_deref(),
            self.candidate_policy,
        );

        let Some(remote_path) = pick_path(index, candidates.iter()) else {
            counters.missed += 1;
            warn!("Miss: {:?}", channel.display_label());
            return;
        };

        let logo = match self.downloader.download(remote_path, &self.logos_dir).await {
            Ok(logo) => logo,
            Err(e) => {
                if e.is_rate_limited() {
                    warn!(path = remote_path, "Rate limited by GitHub when downloading");
                } else {
                    warn!(path = remote_path, "Error downloading logo: {}", e);
                }
                counters.missed += 1;
                return;
            }
        };
        counters.downloaded += 1;
        info!(
            channel = channel.display_label(),
            file = %logo.local_filename,
            bytes = logo.bytes,
            "Downloaded logo"
        );

        match assigner.assign_logo(channel, &logo).await {
            Ok(()) => counters.updated += 1,
            Err(e) => error!(
                channel = channel.display_label(),
                "Logo assignment failed: {}", e
            ),
        }
    }

    async fn ensure_logos_dir(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.logos_dir).await {
            warn!(
                "Could not create logos directory {}: {}",
                self.logos_dir.display(),
                e
            );
        }
    }
}
