use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::Serialize;

use crate::events::{EventAction, ProcessEvent};

lazy_static! {
    /// Stand-in details for a process that has not received any event yet
    static ref PLACEHOLDER_EVENT: ProcessEvent = ProcessEvent::default();
}

/// Severity of the worst alert attached to a process.
///
/// Alerts are not scored yet, so every process reports [`AlertLevel::Unscored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum AlertLevel {
    Unscored,
}

/// Every event observed for one process lifecycle, keyed by its entity id.
///
/// Relations are stored as entity ids and resolved through the
/// [`ProcessMap`](crate::ProcessMap) that owns the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Process {
    pub id: String,
    /// Events in arrival order
    pub events: Vec<ProcessEvent>,
    /// Child entity ids in attachment order
    pub children: Vec<String>,
    pub parent: Option<String>,
}

impl Process {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_output(&self) -> bool {
        self.events
            .iter()
            .any(|event| event.event.action == EventAction::Output)
    }

    pub fn has_alerts(&self) -> bool {
        self.events.iter().any(ProcessEvent::is_alert)
    }

    pub fn alerts(&self) -> Vec<&ProcessEvent> {
        self.events.iter().filter(|event| event.is_alert()).collect()
    }

    pub fn has_exec(&self) -> bool {
        self.events
            .iter()
            .any(|event| event.event.action == EventAction::Exec)
    }

    pub fn has_exited(&self) -> bool {
        self.events
            .iter()
            .any(|event| event.event.action == EventAction::Exit)
    }

    fn last_with_action(&self, action: &EventAction) -> Option<&ProcessEvent> {
        self.events
            .iter()
            .rev()
            .find(|event| &event.event.action == action)
    }

    /// The event that represents this process: the latest exec, else the
    /// latest fork, else the latest event of any kind.
    pub fn details(&self) -> &ProcessEvent {
        self.last_with_action(&EventAction::Exec)
            .or_else(|| self.last_with_action(&EventAction::Fork))
            .or_else(|| self.events.last())
            .unwrap_or(&*PLACEHOLDER_EVENT)
    }

    /// False when [`Process::details`] is the empty placeholder
    pub fn has_details(&self) -> bool {
        !self.events.is_empty()
    }

    /// Heuristic for commands typed by the user: an interactive process that
    /// leads a process group other than its parent's.
    pub fn is_user_entered(&self) -> bool {
        let process = &self.details().process;
        match &process.parent {
            Some(parent) => process.interactive && process.pgid != parent.pgid,
            None => false,
        }
    }

    pub fn max_alert_level(&self) -> AlertLevel {
        AlertLevel::Unscored
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        let details = self.details();
        details.process.start.or(details.timestamp)
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.last_with_action(&EventAction::Exit)
            .and_then(|event| event.process.exit_code)
    }

    pub fn command_line(&self) -> String {
        self.details().process.args.join(" ")
    }
}

/// Orders processes by the start time of their details, earliest first.
///
/// Processes without a known start come first. Use with a stable sort so that
/// equal starts keep their input order.
pub fn sort_processes(a: &Process, b: &Process) -> Ordering {
    a.start().cmp(&b.start())
}
