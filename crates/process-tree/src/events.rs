use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Event,
    /// An alert raised on top of a process event
    Signal,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Fork,
    Exec,
    Exit,
    Output,
    #[serde(untagged)]
    Other(String),
}

impl Default for EventAction {
    fn default() -> Self {
        EventAction::Other(String::new())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EventMeta {
    #[serde(default)]
    pub kind: EventKind,
    #[serde(default)]
    pub action: EventAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

/// Reduced copy of a related process (parent, session or entry leader) taken
/// when the event was emitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcessSnapshot {
    pub pid: i32,
    pub pgid: i32,
    pub user: User,
    pub executable: String,
    pub interactive: bool,
    pub entity_id: String,
    pub name: String,
    pub args: Vec<String>,
    pub args_count: usize,
    pub working_directory: String,
    pub start: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcessFields {
    pub pid: i32,
    pub pgid: i32,
    pub user: User,
    pub executable: String,
    pub interactive: bool,
    /// Identity of one process lifecycle, unlike `pid` which the kernel reuses
    pub entity_id: String,
    pub name: String,
    pub args: Vec<String>,
    pub args_count: usize,
    pub working_directory: String,
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ProcessSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<ProcessSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<ProcessSnapshot>,
}

impl ProcessFields {
    /// Copy of these fields with every field of `snapshot` written over them.
    /// Related snapshots and the exit code are kept.
    pub fn overlaid_with(&self, snapshot: &ProcessSnapshot) -> ProcessFields {
        ProcessFields {
            pid: snapshot.pid,
            pgid: snapshot.pgid,
            user: snapshot.user.clone(),
            executable: snapshot.executable.clone(),
            interactive: snapshot.interactive,
            entity_id: snapshot.entity_id.clone(),
            name: snapshot.name.clone(),
            args: snapshot.args.clone(),
            args_count: snapshot.args_count,
            working_directory: snapshot.working_directory.clone(),
            start: snapshot.start,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlertRule {
    pub uuid: String,
    pub name: String,
    pub category: String,
    pub consumer: String,
    pub description: String,
    pub severity: String,
    pub risk_score: u32,
    pub query: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct OriginalEvent {
    pub action: EventAction,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlertPayload {
    pub rule: AlertRule,
    pub status: String,
    pub workflow_status: String,
    pub reason: String,
    pub original_time: Option<DateTime<Utc>>,
    pub original_event: OriginalEvent,
    pub uuid: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct KibanaFields {
    pub alert: AlertPayload,
}

/// One process lifecycle event, or an alert when `event.kind` is `signal`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProcessEvent {
    #[serde(rename = "@timestamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event: EventMeta,
    #[serde(default)]
    pub process: ProcessFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kibana: Option<KibanaFields>,
}

impl ProcessEvent {
    pub fn is_alert(&self) -> bool {
        self.event.kind == EventKind::Signal
    }

    pub fn alert(&self) -> Option<&AlertPayload> {
        self.kibana.as_ref().map(|kibana| &kibana.alert)
    }

    pub fn parent_entity_id(&self) -> Option<&str> {
        self.process
            .parent
            .as_ref()
            .map(|parent| parent.entity_id.as_str())
            .filter(|entity_id| !entity_id.is_empty())
    }
}

/// A batch of events as returned by one fetch. The cursor is the timestamp of
/// the boundary event and identifies the page.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProcessEventsPage {
    #[serde(default)]
    pub events: Vec<ProcessEvent>,
    pub cursor: String,
}

impl ProcessEventsPage {
    /// Fold the alerts fetched alongside this page into it, with every event
    /// ordered by timestamp. Ties keep events before alerts.
    pub fn merged_with_alerts(mut self, alerts: impl IntoIterator<Item = ProcessEvent>) -> Self {
        self.events.extend(alerts);
        self.events.sort_by_key(|event| event.timestamp);
        self
    }
}
