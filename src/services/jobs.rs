use super::refresh::{RefreshMode, RefreshService};
use crate::error::{GearError, Result};
use crate::progress::RefreshProgress;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobState {
    pub status: JobStatus,
    pub mode: Option<RefreshMode>,
    pub current: usize,
    pub total: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl JobState {
    fn running(mode: RefreshMode) -> Self {
        Self {
            status: JobStatus::Running,
            mode: Some(mode),
            started_at: Some(Utc::now()),
            message: Some(format!("Starting {} refresh", mode)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    Log {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Progress {
        current: usize,
        total: usize,
        title: String,
    },
    Completed {
        builds: usize,
    },
    Error {
        message: String,
    },
}

impl ProgressEvent {
    /// Completed and error events end a job's event stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Completed { .. } | ProgressEvent::Error { .. })
    }
}

#[derive(Default)]
struct JobInner {
    state: JobState,
    events: Vec<ProgressEvent>,
}

/// Owns the state of the single background refresh and its event log.
#[derive(Default)]
pub struct JobManager {
    inner: Mutex<JobInner>,
}

impl JobManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JobInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> JobState {
        self.lock().state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.lock().state.status == JobStatus::Running
    }

    /// Events of the current job from `cursor` on, and the cursor to resume from.
    pub fn events_since(&self, cursor: usize) -> (Vec<ProgressEvent>, usize) {
        let inner = self.lock();
        let events: Vec<ProgressEvent> = inner.events.iter().skip(cursor).cloned().collect();
        (events, cursor.max(inner.events.len()))
    }

    /// Marks a job as running. Fails with `Conflict`, leaving the running
    /// job untouched, when one is already active.
    pub fn try_start(self: &Arc<Self>, mode: RefreshMode) -> Result<JobTicket> {
        let mut inner = self.lock();
        if inner.state.status == JobStatus::Running {
            warn!("Rejected {} refresh, another refresh is running", mode);
            return Err(GearError::Conflict("a refresh is already running".to_string()));
        }

        inner.state = JobState::running(mode);
        inner.events.clear();
        info!("Started {} refresh job", mode);

        Ok(JobTicket {
            manager: Arc::clone(self),
            settled: false,
        })
    }

    /// Starts `service.run` on a background task and returns the initial state.
    pub fn spawn_refresh(self: &Arc<Self>, service: Arc<RefreshService>, mode: RefreshMode) -> Result<JobState> {
        let mut ticket = self.try_start(mode)?;
        let state = self.snapshot();

        tokio::spawn(async move {
            let outcome = service.run(mode, &mut ticket).await;
            match outcome {
                Ok(catalog) => ticket.complete(catalog.len()),
                Err(e) => ticket.fail(&e.to_string()),
            }
        });

        Ok(state)
    }

    fn record(&self, event: ProgressEvent) {
        self.lock().events.push(event);
    }

    fn settle(&self, status: JobStatus, message: String, event: ProgressEvent) {
        let mut inner = self.lock();
        inner.state.status = status;
        inner.state.finished_at = Some(Utc::now());
        inner.state.message = Some(message);
        inner.events.push(event);
    }
}

/// Held by the task running a refresh. Dropping it before `complete` or
/// `fail` marks the job failed, so the running flag never sticks.
pub struct JobTicket {
    manager: Arc<JobManager>,
    settled: bool,
}

impl JobTicket {
    pub fn complete(mut self, builds: usize) {
        info!("Refresh job completed with {} builds", builds);
        self.manager.settle(
            JobStatus::Completed,
            format!("Refreshed {} builds", builds),
            ProgressEvent::Completed { builds },
        );
        self.settled = true;
    }

    pub fn fail(mut self, message: &str) {
        error!("Refresh job failed: {}", message);
        self.manager.settle(
            JobStatus::Failed,
            message.to_string(),
            ProgressEvent::Error {
                message: message.to_string(),
            },
        );
        self.settled = true;
    }
}

impl Drop for JobTicket {
    fn drop(&mut self) {
        if !self.settled {
            let message = "Refresh ended unexpectedly".to_string();
            error!("{}", message);
            self.manager.settle(
                JobStatus::Failed,
                message.clone(),
                ProgressEvent::Error { message },
            );
        }
    }
}

impl RefreshProgress for JobTicket {
    fn begin(&mut self, total: usize) {
        let mut inner = self.manager.lock();
        inner.state.total = total;
        inner.state.current = 0;
    }

    fn log(&mut self, msg: &str) {
        self.manager.lock().state.message = Some(msg.to_string());
        self.manager.record(ProgressEvent::Log {
            message: msg.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn item_done(&mut self, current: usize, title: &str) {
        let mut inner = self.manager.lock();
        inner.state.current = current;
        let total = inner.state.total;
        inner.events.push(ProgressEvent::Progress {
            current,
            total,
            title: title.to_string(),
        });
    }
}
