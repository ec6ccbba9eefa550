//! Status Poller - watches an asynchronous record-creation job
//!
//! After a duplicate is POSTed the backend answers with a job id. The poller
//! queries the job status right away and then once per interval until the job
//! is CREATED or ERROR, or the attempt budget runs out.
//!
//! Queries are awaited one at a time and missed ticks are skipped, so a slow
//! response never overlaps the next query.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::{Navigator, Notifier, RecordsEditorApi};
use crate::models::callout::{SAVE_NEW_DELAY, SAVE_NEW_ERROR, SAVE_NEW_SUCCESS};
use crate::models::{Callout, JobState, JobStatus};

/// Where a created instance is shown
pub const DEFAULT_VIEW_PATH: &str = "/inventory/view";

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSettings {
    /// Attempts are spread over `bail_time`: one per `interval`, at least one.
    /// The interval is at least 1 ms.
    pub fn from_bail_time(interval: Duration, bail_time: Duration) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let max_attempts =
            (bail_time.as_millis() / interval.as_millis()).clamp(1, u32::MAX as u128) as u32;
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from_bail_time(Duration::from_secs(5), Duration::from_secs(20))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Job finished; the new record has this external id
    Created { external_id: String },
    /// Job reported ERROR, or a status query failed
    Failed,
    /// Attempt budget exhausted while the job was still running
    Delayed,
    /// Handle cancelled or dropped before a terminal state
    Cancelled,
}

pub struct StatusPoller {
    api: Arc<dyn RecordsEditorApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    settings: PollSettings,
    qm_record_id: String,
    view_path: String,
    search: Option<String>,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn RecordsEditorApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        settings: PollSettings,
        qm_record_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            settings,
            qm_record_id: qm_record_id.into(),
            view_path: DEFAULT_VIEW_PATH.to_string(),
            search: None,
        }
    }

    pub fn view_path(mut self, view_path: impl Into<String>) -> Self {
        self.view_path = view_path.into();
        self
    }

    /// Query string kept on the final redirect
    pub fn search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Poll to a terminal outcome. Emits exactly one callout unless cancelled.
    pub async fn run(&self) -> PollOutcome {
        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut state = JobState::Pending;

        for attempt in 1..=self.settings.max_attempts {
            ticker.tick().await;

            match self.api.record_status(&self.qm_record_id).await {
                Ok(JobStatus {
                    status: JobState::Error,
                    ..
                }) => {
                    tracing::error!("Job {} failed after {} queries", self.qm_record_id, attempt);
                    self.notifier.notify(Callout::error(SAVE_NEW_ERROR));
                    return PollOutcome::Failed;
                }
                Ok(JobStatus {
                    status: JobState::Created,
                    external_id: Some(external_id),
                }) => {
                    tracing::info!(
                        "Job {} created record {} after {} queries",
                        self.qm_record_id,
                        external_id,
                        attempt
                    );
                    self.notifier.notify(Callout::success(SAVE_NEW_SUCCESS));
                    self.navigator.navigate(
                        &format!("{}/{}", self.view_path, external_id),
                        self.search.as_deref(),
                    );
                    return PollOutcome::Created { external_id };
                }
                Ok(JobStatus { status, .. }) => {
                    if status != state {
                        tracing::debug!("Job {}: {:?} -> {:?}", self.qm_record_id, state, status);
                        state = status;
                    }
                }
                Err(e) => {
                    // No retry: a failed query ends the session
                    tracing::error!("Status query for job {} failed: {}", self.qm_record_id, e);
                    self.notifier.notify(Callout::error(SAVE_NEW_ERROR));
                    return PollOutcome::Failed;
                }
            }
        }

        tracing::warn!(
            "Job {} still {:?} after {} queries, giving up",
            self.qm_record_id,
            state,
            self.settings.max_attempts
        );
        self.notifier.notify(Callout::info(SAVE_NEW_DELAY));
        PollOutcome::Delayed
    }

    /// Run on the tokio runtime. Dropping the handle cancels the poll.
    pub fn spawn(self) -> PollHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let qm_record_id = self.qm_record_id.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                outcome = self.run() => outcome,
                _ = cancelled(cancel_rx) => {
                    tracing::info!("Polling for job {} cancelled", qm_record_id);
                    PollOutcome::Cancelled
                }
            }
        });

        PollHandle {
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }
}

/// Resolves on an explicit cancel; a detached handle never cancels
async fn cancelled(rx: oneshot::Receiver<()>) {
    if rx.await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Owned handle on a running poll
#[derive(Debug)]
pub struct PollHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    /// Stop polling; no further queries or callouts
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Let the poll run to completion on its own
    pub fn detach(mut self) {
        self.cancel.take();
        self.task.take();
    }

    /// Wait for the outcome. Dropping the returned future before it resolves
    /// cancels the poll, like dropping the handle.
    pub async fn join(mut self) -> PollOutcome {
        let Some(task) = self.task.as_mut() else {
            return PollOutcome::Cancelled;
        };
        let result = task.await;
        self.task = None;
        self.cancel.take();

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Status poll task ended abnormally: {}", e);
                PollOutcome::Failed
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel();
        }
    }
}
