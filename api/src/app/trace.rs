//! Workflow trace
//!
//! Every workflow invocation carries a `WorkflowTrace`. Each recorded step is
//! emitted as a structured `tracing` event tagged with the process name and
//! trace id, and kept in order on the trace so the whole run can be handed to
//! a `TraceSubscriber` when the process fails or asks for a summary.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ports::CommunicationClient;
use crate::error::CommunicationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceLevel::Info => write!(f, "info"),
            TraceLevel::Warn => write!(f, "warn"),
            TraceLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub at: DateTime<Utc>,
    pub level: TraceLevel,
    pub message: String,
}

/// Ordered event log for one workflow invocation
#[derive(Debug, Clone)]
pub struct WorkflowTrace {
    id: Uuid,
    process: &'static str,
    events: Vec<TraceEvent>,
}

impl WorkflowTrace {
    pub fn new(process: &'static str) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(trace_id = %id, process, "Workflow started");
        Self {
            id,
            process,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn process(&self) -> &'static str {
        self.process
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(trace_id = %self.id, process = self.process, "{}", message);
        self.push(TraceLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(trace_id = %self.id, process = self.process, "{}", message);
        self.push(TraceLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(trace_id = %self.id, process = self.process, "{}", message);
        self.push(TraceLevel::Error, message);
    }

    fn push(&mut self, level: TraceLevel, message: String) {
        self.events.push(TraceEvent {
            at: Utc::now(),
            level,
            message,
        });
    }

    /// Human-readable dump, one line per event
    pub fn render(&self) -> String {
        let mut out = format!("{} ({})\n", self.process, self.id);
        for event in &self.events {
            out.push_str(&format!(
                "{} [{}] {}\n",
                event.at.format("%Y-%m-%d %H:%M:%S"),
                event.level,
                event.message
            ));
        }
        out
    }
}

/// Receives finished traces
#[async_trait]
pub trait TraceSubscriber: Send + Sync {
    /// Called when a process fails with an internal error
    async fn on_failure(&self, trace: &WorkflowTrace, error: &str)
        -> Result<(), CommunicationError>;

    /// Called when a completed process wants its trace summarised
    async fn on_summary(&self, trace: &WorkflowTrace, subject: &str)
        -> Result<(), CommunicationError>;
}

/// Forwards traces to everyone holding a role through the communication service
pub struct RoleNotificationSubscriber<CC>
where
    CC: CommunicationClient,
{
    communication: Arc<CC>,
    role: String,
}

impl<CC> RoleNotificationSubscriber<CC>
where
    CC: CommunicationClient,
{
    pub fn new(communication: Arc<CC>, role: impl Into<String>) -> Self {
        Self {
            communication,
            role: role.into(),
        }
    }
}

#[async_trait]
impl<CC> TraceSubscriber for RoleNotificationSubscriber<CC>
where
    CC: CommunicationClient,
{
    async fn on_failure(
        &self,
        trace: &WorkflowTrace,
        error: &str,
    ) -> Result<(), CommunicationError> {
        let subject = format!("{} failed", trace.process());
        let message = format!("{}\n\n{}", error, trace.render());
        self.communication
            .send_notification_to_role(&self.role, &subject, &message)
            .await
    }

    async fn on_summary(
        &self,
        trace: &WorkflowTrace,
        subject: &str,
    ) -> Result<(), CommunicationError> {
        self.communication
            .send_notification_to_role(&self.role, subject, &trace.render())
            .await
    }
}

/// Hand a failed trace to the subscriber. Delivery problems are only logged.
pub async fn report_failure(
    subscriber: &dyn TraceSubscriber,
    trace: &WorkflowTrace,
    error: &str,
) {
    if let Err(e) = subscriber.on_failure(trace, error).await {
        tracing::warn!(
            trace_id = %trace.id(),
            process = trace.process(),
            error = %e,
            "Failed to deliver failure trace"
        );
    }
}
